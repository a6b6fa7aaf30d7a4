use crate::db::models::{CreateFoodRequest, NotificationCategory, RequestStatus, UserRole};
use crate::error::AppResult;
use crate::i18n;
use crate::routes::{require_role, Reply};
use crate::services::auth::Session;
use crate::AppState;

pub async fn submit(
    state: &AppState,
    session: Option<&Session>,
    input: CreateFoodRequest,
) -> AppResult<Reply> {
    require_role(session, &[UserRole::Beneficiary])?;
    input.validate()?;

    let lang = Some(state.lang());
    let request = state
        .store
        .append(input.into_request(state.store.now()))
        .await?;

    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.request_received",
                Some(&[("name", request.beneficiary_name.as_str())]),
            ),
            NotificationCategory::Request,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "request.created", None))
        .with_data(serde_json::to_value(&request)?))
}

pub async fn update_status(
    state: &AppState,
    session: Option<&Session>,
    id: &str,
    status: RequestStatus,
) -> AppResult<Reply> {
    require_role(session, &[UserRole::Administrator])?;

    let lang = Some(state.lang());
    let request = state.store.set_request_status(id, status).await?;

    let status_label = i18n::tr(lang, &format!("status.{}", status.as_str()), None);
    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.request_status",
                Some(&[
                    ("name", request.beneficiary_name.as_str()),
                    ("status", status_label.as_str()),
                ]),
            ),
            NotificationCategory::Request,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "request.status_updated", None))
        .with_data(serde_json::to_value(&request)?))
}
