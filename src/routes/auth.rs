use crate::db::models::NotificationCategory;
use crate::error::AppResult;
use crate::i18n;
use crate::routes::Reply;
use crate::services::auth::{AuthService, RegisterForm, Session};
use crate::AppState;

pub async fn login(
    state: &AppState,
    session: &mut Option<Session>,
    username: &str,
    password: &str,
) -> AppResult<Reply> {
    let authenticated = AuthService::login(&state.store, username, password).await?;
    *session = Some(authenticated);
    Ok(Reply::message(i18n::tr(
        Some(state.lang()),
        "auth.login_success",
        None,
    )))
}

pub fn logout(state: &AppState, session: &mut Option<Session>) -> AppResult<Reply> {
    if let Some(previous) = session.take() {
        tracing::info!("User '{}' logged out", previous.username);
    }
    Ok(Reply::message(i18n::tr(Some(state.lang()), "auth.logged_out", None)))
}

/// Registration does not log the new user in.
pub async fn register(state: &AppState, form: RegisterForm) -> AppResult<Reply> {
    let lang = Some(state.lang());
    let user = AuthService::register(&state.store, &state.config.auth.admin_code, form).await?;

    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.user_registered",
                Some(&[("username", user.username.as_str())]),
            ),
            NotificationCategory::System,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "auth.register_success", None))
        .with_data(serde_json::json!({ "username": user.username, "role": user.role })))
}

#[cfg(test)]
mod tests {
    use crate::db::models::{Notification, NotificationCategory, RegisterRole, User, UserRole};
    use crate::routes::test_support::state;
    use crate::routes::{dispatch, Intent, ToastKind};
    use crate::services::auth::RegisterForm;

    fn register(username: &str, role: RegisterRole, code: Option<&str>) -> Intent {
        Intent::Register(RegisterForm {
            username: username.to_string(),
            password: "pw".to_string(),
            role,
            admin_code: code.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn second_registration_of_same_name_fails() {
        let (state, _) = state().await;
        let mut session = None;

        let first = dispatch(&state, &mut session, register("ana", RegisterRole::Beneficiary, None)).await;
        assert!(first.ok);
        assert_eq!(first.toast.unwrap().message, "Registro exitoso");

        let second = dispatch(&state, &mut session, register("ana", RegisterRole::Restaurant, None)).await;
        assert!(!second.ok);
        let toast = second.toast.unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.message, "El nombre de usuario ya existe");

        let users = state.store.items::<User>().await;
        assert_eq!(users.iter().filter(|u| u.username == "ana").count(), 1);
    }

    #[tokio::test]
    async fn registration_posts_system_notification() {
        let (state, _) = state().await;
        let mut session = None;

        dispatch(&state, &mut session, register("rest", RegisterRole::Restaurant, None)).await;

        let notifications = state.store.items::<Notification>().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].category, NotificationCategory::System);
        assert!(notifications[0].message.contains("rest"));
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn wrong_admin_code_is_reported() {
        let (state, _) = state().await;
        let mut session = None;

        let response = dispatch(
            &state,
            &mut session,
            register("boss", RegisterRole::Beneficiary, Some("nope")),
        )
        .await;

        assert!(!response.ok);
        assert_eq!(response.toast.unwrap().message, "Código de administrador incorrecto");
        assert!(state.store.items::<User>().await.is_empty());
        assert!(state.store.items::<Notification>().await.is_empty());
    }

    #[tokio::test]
    async fn login_and_logout_update_session() {
        let (state, _) = state().await;
        let mut session = None;
        dispatch(&state, &mut session, register("boss", RegisterRole::Restaurant, Some("ADMIN123"))).await;

        let bad = dispatch(
            &state,
            &mut session,
            Intent::Login {
                username: "boss".to_string(),
                password: "wrong".to_string(),
            },
        )
        .await;
        assert!(!bad.ok);
        assert_eq!(bad.toast.unwrap().message, "Credenciales incorrectas");
        assert!(session.is_none());

        let good = dispatch(
            &state,
            &mut session,
            Intent::Login {
                username: "boss".to_string(),
                password: "pw".to_string(),
            },
        )
        .await;
        assert!(good.ok);
        assert_eq!(good.session.map(|s| s.role), Some(UserRole::Administrator));

        let out = dispatch(&state, &mut session, Intent::Logout).await;
        assert!(out.ok);
        assert!(session.is_none());
    }
}
