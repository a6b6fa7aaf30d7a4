use std::env;
use std::time::Duration;

use serde::Deserialize;

use crate::i18n;

/// Upper bound for `RETENTION_WINDOW_HOURS` (100 years).
pub const MAX_WINDOW_HOURS: i64 = 24 * 365 * 100;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub retention: RetentionConfig,
    pub auth: AuthConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `sqlite://path/to/file.db`, or `memory` for the non-persistent backend.
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Entries at least this old are dropped from the active view.
    pub window_hours: i64,
    /// How often the sweep worker reloads all collections.
    pub sweep_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret that upgrades a registration to the administrator role.
    pub admin_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    /// Auto-dismiss delay attached to every toast.
    pub toast_dismiss_ms: u64,
    pub default_lang: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format.
    pub json: bool,
}

impl RetentionConfig {
    /// Out-of-range values are clamped to `1..=MAX_WINDOW_HOURS`.
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window_hours.clamp(1, MAX_WINDOW_HOURS))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.eq_ignore_ascii_case("memory")
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let window_hours = parse_window_hours(
            &env::var("RETENTION_WINDOW_HOURS").unwrap_or_else(|_| "24".to_string()),
        )?;

        let sweep_interval_seconds: u64 = env::var("RETENTION_SWEEP_INTERVAL_SECONDS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue("RETENTION_SWEEP_INTERVAL_SECONDS".to_string())
            })?;
        if sweep_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue(
                "RETENTION_SWEEP_INTERVAL_SECONDS".to_string(),
            ));
        }

        let default_lang = env::var("DEFAULT_LANG")
            .map(|v| i18n::normalize_language(&v))
            .unwrap_or_else(|_| i18n::DEFAULT_LANG.to_string());
        if !i18n::is_supported_language(&default_lang) {
            return Err(ConfigError::InvalidValue("DEFAULT_LANG".to_string()));
        }

        Ok(Config {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/food.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            retention: RetentionConfig {
                window_hours,
                sweep_interval_seconds,
            },
            auth: AuthConfig {
                admin_code: env::var("ADMIN_CODE").unwrap_or_else(|_| "ADMIN123".to_string()),
            },
            ui: UiConfig {
                toast_dismiss_ms: env::var("TOAST_DISMISS_MS")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
                default_lang,
            },
            logging: LoggingConfig {
                json: match env::var("LOG_FORMAT") {
                    Ok(v) => v.eq_ignore_ascii_case("json"),
                    Err(_) => false,
                },
            },
        })
    }
}

fn parse_window_hours(raw: &str) -> Result<i64, ConfigError> {
    match raw.trim().parse::<i64>() {
        Ok(hours) if (1..=MAX_WINDOW_HOURS).contains(&hours) => Ok(hours),
        _ => Err(ConfigError::InvalidValue(
            "RETENTION_WINDOW_HOURS".to_string(),
        )),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseConfig {
                url: "sqlite://data/food.db".to_string(),
                max_connections: 5,
            },
            retention: RetentionConfig {
                window_hours: 24,
                sweep_interval_seconds: 3600,
            },
            auth: AuthConfig {
                admin_code: "ADMIN123".to_string(),
            },
            ui: UiConfig {
                toast_dismiss_ms: 3000,
                default_lang: i18n::DEFAULT_LANG.to_string(),
            },
            logging: LoggingConfig { json: false },
        }
    }
}
