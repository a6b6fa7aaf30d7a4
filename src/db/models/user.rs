use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::collection::{Collection, CollectionEntity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[serde(alias = "administrador")]
    Administrator,
    #[serde(alias = "beneficiario")]
    Beneficiary,
    #[serde(alias = "restaurante")]
    Restaurant,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Administrator => "administrator",
            UserRole::Beneficiary => "beneficiary",
            UserRole::Restaurant => "restaurant",
        }
    }
}

/// Roles selectable on the registration form. Administrator is only granted
/// through the admin code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegisterRole {
    #[default]
    #[serde(alias = "beneficiario")]
    Beneficiary,
    #[serde(alias = "restaurante")]
    Restaurant,
}

impl From<RegisterRole> for UserRole {
    fn from(role: RegisterRole) -> Self {
        match role {
            RegisterRole::Beneficiary => UserRole::Beneficiary,
            RegisterRole::Restaurant => UserRole::Restaurant,
        }
    }
}

/// Stored user record. Passwords are kept in plaintext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
    #[serde(rename = "type")]
    pub role: UserRole,
}

impl CollectionEntity for User {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_role_names_are_accepted() {
        let json = r#"{"id":"1","username":"ana","password":"x","type":"administrador"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, UserRole::Administrator);
        assert!(user.created_at().is_none());
    }

    #[test]
    fn unknown_role_fails_to_parse() {
        let json = r#"{"id":"1","username":"ana","password":"x","type":"superuser"}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }
}
