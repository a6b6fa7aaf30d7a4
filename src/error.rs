use serde::Serialize;

use crate::i18n;

/// Errors surfaced by the store, the auth gate and intent dispatch.
///
/// The `String` payloads of the user-facing variants are i18n keys (or plain
/// text, which `i18n::tr` passes through unchanged when no translation exists).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Incorrect credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthorized,

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl AppError {
    /// Stable machine-readable code for the error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidTransition { .. } => "INVALID_TRANSITION",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Storage(_) | AppError::Migration(_) => "STORAGE_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Localized message suitable for a toast. Internal failures are logged
    /// here and replaced with a generic message.
    pub fn user_message(&self, lang: Option<&str>) -> String {
        match self {
            AppError::InvalidCredentials => i18n::tr(lang, "auth.invalid_credentials", None),
            AppError::Unauthorized => i18n::tr(lang, "auth.login_required", None),
            AppError::Forbidden(key)
            | AppError::NotFound(key)
            | AppError::Conflict(key)
            | AppError::Validation(key)
            | AppError::BadRequest(key) => i18n::tr(lang, key, None),
            AppError::InvalidTransition { from, to } => i18n::tr(
                lang,
                "error.invalid_transition",
                Some(&[("from", from.as_str()), ("to", to.as_str())]),
            ),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                i18n::tr(lang, "error.storage", None)
            }
            AppError::Migration(e) => {
                tracing::error!("Migration error: {:?}", e);
                i18n::tr(lang, "error.storage", None)
            }
            AppError::Serialization(e) => {
                tracing::error!("Serialization error: {:?}", e);
                i18n::tr(lang, "error.internal", None)
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                i18n::tr(lang, "error.internal", None)
            }
        }
    }

    pub fn to_body(&self, lang: Option<&str>) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.user_message(lang),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
