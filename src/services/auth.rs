//! Credential gate over the users collection.
//!
//! Passwords are stored and compared in plaintext and the administrator
//! role is granted by a shared code from configuration. Both are known
//! weaknesses of this demo and are not meant to protect real accounts.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::models::{RegisterRole, User, UserRole};
use crate::error::{AppError, AppResult};
use crate::services::store::RetentionStore;

/// The logged-in user as seen by intent dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub username: String,
    pub role: UserRole,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Session {
            user_id: user.id.clone(),
            username: user.username.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: RegisterRole,
    #[serde(default)]
    pub admin_code: Option<String>,
}

pub struct AuthService;

impl AuthService {
    /// Exact username and password match. The error does not say which
    /// field was wrong.
    pub async fn login(store: &RetentionStore, username: &str, password: &str) -> AppResult<Session> {
        let users = store.items::<User>().await;

        match users
            .iter()
            .find(|u| u.username == username && u.password == password)
        {
            Some(user) => {
                tracing::info!("User '{}' logged in as {}", user.username, user.role.as_str());
                Ok(Session::from(user))
            }
            None => {
                tracing::info!("Rejected login attempt for '{}'", username);
                Err(AppError::InvalidCredentials)
            }
        }
    }

    /// Create a user. Duplicate usernames and wrong admin codes are rejected
    /// without touching the users collection.
    pub async fn register(
        store: &RetentionStore,
        admin_code: &str,
        form: RegisterForm,
    ) -> AppResult<User> {
        if form.username.trim().is_empty() || form.password.is_empty() {
            return Err(AppError::Validation(
                "validation.credentials_required".to_string(),
            ));
        }

        let selected = form.role;
        let role = Self::resolve_role(selected, form.admin_code.as_deref(), admin_code);
        let username = form.username.clone();

        let user = User {
            id: Uuid::new_v4().to_string(),
            username: form.username,
            password: form.password,
            role: role.unwrap_or_else(|| selected.into()),
        };

        // Duplicate usernames are reported before a wrong admin code.
        let user = store
            .append_checked(user, |users| {
                if users.iter().any(|u| u.username == username) {
                    return Err(AppError::Conflict("auth.username_taken".to_string()));
                }
                if role.is_none() {
                    return Err(AppError::Forbidden("auth.invalid_admin_code".to_string()));
                }
                Ok(())
            })
            .await?;

        tracing::info!("Registered user '{}' as {}", user.username, user.role.as_str());
        Ok(user)
    }

    /// Role granted for a registration. An empty or absent code keeps the
    /// selected role; the correct code grants administrator; any other code
    /// yields `None`.
    pub fn resolve_role(
        selected: RegisterRole,
        supplied_code: Option<&str>,
        admin_code: &str,
    ) -> Option<UserRole> {
        match supplied_code.filter(|c| !c.is_empty()) {
            None => Some(selected.into()),
            Some(code) if code == admin_code => Some(UserRole::Administrator),
            Some(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{Duration, Utc};
    use tokio_test::assert_ok;

    use crate::db::MemoryStorage;
    use crate::services::clock::ManualClock;

    const CODE: &str = "ADMIN123";

    async fn store() -> RetentionStore {
        RetentionStore::init(
            Arc::new(MemoryStorage::new()),
            Arc::new(ManualClock::new(Utc::now())),
            Duration::hours(24),
        )
        .await
    }

    fn form(username: &str, role: RegisterRole, code: Option<&str>) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password: "secreto".to_string(),
            role,
            admin_code: code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = store().await;
        assert_ok!(AuthService::register(&store, CODE, form("ana", RegisterRole::Beneficiary, None)).await);

        let err = AuthService::register(&store, CODE, form("ana", RegisterRole::Restaurant, None))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        let users = store.items::<User>().await;
        assert_eq!(users.iter().filter(|u| u.username == "ana").count(), 1);
        assert_eq!(users[0].role, UserRole::Beneficiary);
    }

    #[tokio::test]
    async fn admin_code_overrides_selected_role() {
        let store = store().await;
        for (name, role) in [("a", RegisterRole::Beneficiary), ("b", RegisterRole::Restaurant)] {
            let user = assert_ok!(AuthService::register(&store, CODE, form(name, role, Some(CODE))).await);
            assert_eq!(user.role, UserRole::Administrator);
        }
    }

    #[tokio::test]
    async fn wrong_admin_code_aborts_registration() {
        let store = store().await;
        let err = AuthService::register(&store, CODE, form("eve", RegisterRole::Restaurant, Some("guess")))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(ref key) if key == "auth.invalid_admin_code"));
        assert!(store.items::<User>().await.is_empty());
    }

    #[tokio::test]
    async fn empty_admin_code_keeps_selected_role() {
        let store = store().await;
        let user = assert_ok!(
            AuthService::register(&store, CODE, form("rest", RegisterRole::Restaurant, Some(""))).await
        );
        assert_eq!(user.role, UserRole::Restaurant);
    }

    #[tokio::test]
    async fn blank_credentials_are_rejected() {
        let store = store().await;
        let err = AuthService::register(&store, CODE, form("  ", RegisterRole::Beneficiary, None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn login_requires_exact_match() {
        let store = store().await;
        let user = assert_ok!(
            AuthService::register(&store, CODE, form("juan", RegisterRole::Beneficiary, None)).await
        );

        let session = assert_ok!(AuthService::login(&store, "juan", "secreto").await);
        assert_eq!(session.user_id, user.id);
        assert_eq!(session.role, UserRole::Beneficiary);

        for (u, p) in [("juan", "wrong"), ("Juan", "secreto"), ("nobody", "secreto")] {
            let err = AuthService::login(&store, u, p).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidCredentials));
        }
    }
}
