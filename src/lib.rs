pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod routes;
pub mod services;

use config::Config;
use services::store::RetentionStore;

/// Shared application state, handed to intent handlers and background workers.
pub struct AppState {
    pub store: RetentionStore,
    pub config: Config,
}

impl AppState {
    /// Language used for toasts and notification texts.
    pub fn lang(&self) -> &str {
        &self.config.ui.default_lang
    }
}
