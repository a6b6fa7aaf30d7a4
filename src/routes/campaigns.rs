use crate::db::models::{CreateCampaign, NotificationCategory, UserRole};
use crate::error::AppResult;
use crate::i18n;
use crate::routes::{require_role, Reply};
use crate::services::auth::Session;
use crate::AppState;

pub async fn create(
    state: &AppState,
    session: Option<&Session>,
    input: CreateCampaign,
) -> AppResult<Reply> {
    require_role(session, &[UserRole::Administrator])?;
    input.validate()?;

    let lang = Some(state.lang());
    let campaign = state
        .store
        .append(input.into_campaign(state.store.now()))
        .await?;

    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.campaign_created",
                Some(&[("name", campaign.name.as_str())]),
            ),
            NotificationCategory::System,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "campaign.created", None))
        .with_data(serde_json::to_value(&campaign)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Campaign;
    use crate::routes::test_support::{session, state};
    use crate::routes::{dispatch, Intent};

    fn navidad(start: &str, end: &str) -> CreateCampaign {
        navidad_with_goal(start, end, 500.0)
    }

    fn navidad_with_goal(start: &str, end: &str, goal: f64) -> CreateCampaign {
        CreateCampaign {
            name: "Navidad Solidaria".to_string(),
            description: "Donaciones para las fiestas".to_string(),
            start_date: start.parse().unwrap(),
            end_date: end.parse().unwrap(),
            goal,
        }
    }

    #[tokio::test]
    async fn admin_creates_campaign() {
        let (state, _) = state().await;
        let mut admin = session(UserRole::Administrator);

        let response = dispatch(
            &state,
            &mut admin,
            Intent::CreateCampaign(navidad("2023-12-01", "2023-12-25")),
        )
        .await;

        assert!(response.ok);
        assert_eq!(response.toast.unwrap().message, "Campaña creada con éxito");
        let campaigns = state.store.items::<Campaign>().await;
        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].current, 0.0);
        assert_eq!(campaigns[0].goal, 500.0);
    }

    #[tokio::test]
    async fn inverted_dates_are_rejected() {
        let (state, _) = state().await;
        let mut admin = session(UserRole::Administrator);

        let response = dispatch(
            &state,
            &mut admin,
            Intent::CreateCampaign(navidad("2023-12-25", "2023-12-01")),
        )
        .await;

        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "VALIDATION_ERROR");
        assert!(state.store.items::<Campaign>().await.is_empty());
    }

    #[tokio::test]
    async fn negative_goal_is_a_validation_error() {
        let (state, _) = state().await;
        let mut admin = session(UserRole::Administrator);

        let intent: Intent = serde_json::from_str(
            r#"{"intent":"create_campaign","name":"Navidad","description":"Fiestas","startDate":"2023-12-01","endDate":"2023-12-25","goal":-5}"#,
        )
        .unwrap();
        let response = dispatch(&state, &mut admin, intent).await;

        assert!(!response.ok);
        let error = response.error.unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert_eq!(error.message, "La meta debe ser un número mayor o igual a 0");
        assert!(state.store.items::<Campaign>().await.is_empty());
    }

    #[tokio::test]
    async fn fractional_goal_is_accepted() {
        let (state, _) = state().await;
        let mut admin = session(UserRole::Administrator);

        let intent: Intent = serde_json::from_str(
            r#"{"intent":"create_campaign","name":"Navidad","description":"Fiestas","startDate":"2023-12-01","endDate":"2023-12-25","goal":10.5}"#,
        )
        .unwrap();
        let response = dispatch(&state, &mut admin, intent).await;

        assert!(response.ok);
        assert_eq!(state.store.items::<Campaign>().await[0].goal, 10.5);
        assert!(navidad_with_goal("2023-12-01", "2023-12-25", 0.0).validate().is_ok());
    }

    #[tokio::test]
    async fn restaurant_cannot_create_campaign() {
        let (state, _) = state().await;
        let mut s = session(UserRole::Restaurant);

        let response = dispatch(
            &state,
            &mut s,
            Intent::CreateCampaign(navidad("2023-12-01", "2023-12-25")),
        )
        .await;

        assert!(!response.ok);
        assert_eq!(response.error.unwrap().code, "FORBIDDEN");
    }
}
