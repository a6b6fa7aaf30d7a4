use crate::db::models::{CreateDonation, Donation, DonationStatus, NotificationCategory, UserRole};
use crate::error::{AppError, AppResult};
use crate::i18n;
use crate::routes::{require_role, Reply};
use crate::services::auth::Session;
use crate::AppState;

pub async fn submit(
    state: &AppState,
    session: Option<&Session>,
    input: CreateDonation,
) -> AppResult<Reply> {
    require_role(session, &[UserRole::Restaurant, UserRole::Administrator])?;
    input.validate()?;

    let lang = Some(state.lang());
    let donation = state
        .store
        .append(input.into_donation(state.store.now()))
        .await?;

    let quantity = donation.quantity.to_string();
    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.donation_received",
                Some(&[
                    ("name", donation.name.as_str()),
                    ("quantity", quantity.as_str()),
                    ("category", donation.category.as_str()),
                ]),
            ),
            NotificationCategory::Donation,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "donation.created", None))
        .with_data(serde_json::to_value(&donation)?))
}

pub async fn delete(state: &AppState, session: Option<&Session>, id: &str) -> AppResult<Reply> {
    require_role(session, &[UserRole::Administrator])?;

    let lang = Some(state.lang());
    let removed = state
        .store
        .remove_by_id::<Donation>(id)
        .await?
        .ok_or_else(|| AppError::NotFound("not_found.donation".to_string()))?;

    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.donation_deleted",
                Some(&[("name", removed.name.as_str())]),
            ),
            NotificationCategory::Donation,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "donation.deleted", None)))
}

pub async fn update_status(
    state: &AppState,
    session: Option<&Session>,
    id: &str,
    status: DonationStatus,
) -> AppResult<Reply> {
    require_role(session, &[UserRole::Administrator])?;

    let lang = Some(state.lang());
    let donation = state.store.set_donation_status(id, status).await?;

    let status_label = i18n::tr(lang, &format!("status.{}", status.as_str()), None);
    state
        .store
        .notify(
            i18n::tr(
                lang,
                "messages.donation_status",
                Some(&[
                    ("name", donation.name.as_str()),
                    ("status", status_label.as_str()),
                ]),
            ),
            NotificationCategory::Donation,
        )
        .await?;

    Ok(Reply::message(i18n::tr(lang, "donation.status_updated", None))
        .with_data(serde_json::to_value(&donation)?))
}
