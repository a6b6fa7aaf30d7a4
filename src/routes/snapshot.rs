use serde::Serialize;

use crate::db::models::{Campaign, Donation, FoodRequest, Notification, User, UserRole};
use crate::error::{AppError, AppResult};
use crate::routes::{require_role, Reply};
use crate::services::auth::Session;
use crate::services::reports::build_report;
use crate::AppState;

/// User record without the password.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserView {
    pub id: String,
    pub username: String,
    #[serde(rename = "type")]
    pub role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

/// What the front-end renders its views from.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotView {
    pub donations: Vec<Donation>,
    pub requests: Vec<FoodRequest>,
    pub users: Vec<UserView>,
    pub campaigns: Vec<Campaign>,
    pub notifications: Vec<Notification>,
}

/// Current in-memory collections. Any logged-in user may read them.
pub async fn snapshot(state: &AppState, session: Option<&Session>) -> AppResult<Reply> {
    session.ok_or(AppError::Unauthorized)?;

    let snapshot = state.store.snapshot().await;
    let view = SnapshotView {
        users: snapshot.users.iter().map(UserView::from).collect(),
        donations: snapshot.donations,
        requests: snapshot.requests,
        campaigns: snapshot.campaigns,
        notifications: snapshot.notifications,
    };

    Ok(Reply::data(serde_json::to_value(view)?))
}

pub async fn report(state: &AppState, session: Option<&Session>) -> AppResult<Reply> {
    require_role(session, &[UserRole::Administrator])?;

    let snapshot = state.store.snapshot().await;
    Ok(Reply::data(serde_json::to_value(build_report(&snapshot))?))
}
