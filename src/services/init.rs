//! Initialization helpers for the application:
//! - storage backend selection (SQLite file or in-memory)
//! - database connection + migrations
//! - background worker spawn helpers (retention sweep, storage listener)

use std::{path::Path, sync::Arc};

use anyhow::Result;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::config::Config;
use crate::db::{Collection, MemoryStorage, SqliteStorage, StorageBackend};
use crate::AppState;

/// Redact potentially sensitive information from a database URL before logging.
///
/// Attempts to parse the URL and remove userinfo (username:password) components.
/// Falls back to removing everything before '@' or returning "(redacted)".
pub fn redact_db_url(db_url: &str) -> String {
    if let Ok(url) = url::Url::parse(db_url) {
        let scheme = url.scheme();
        let host = url.host_str().unwrap_or("");
        let port_part = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
        let path = url.path();
        format!("{}://{}{}{}", scheme, host, port_part, path)
    } else {
        if let Some(at_pos) = db_url.find('@') {
            let without_creds = &db_url[at_pos + 1..];
            return format!("(redacted){}", without_creds);
        }
        "(redacted)".to_string()
    }
}

/// Open the SQLite database and run migrations.
///
/// Creates the parent directory for the database file (if applicable) and
/// opens a connection pool using `create_if_missing(true)`.
pub async fn init_db(config: &Config) -> Result<sqlx::SqlitePool> {
    let db_url = &config.database.url;
    tracing::info!("Connecting to database: {}", redact_db_url(db_url));

    let db_path = db_url.strip_prefix("sqlite://").unwrap_or(db_url);
    let db_file_path = Path::new(db_path);

    if let Some(parent) = db_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }

    let connect_options = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Build the storage backend selected by `DATABASE_URL`.
pub async fn init_storage(config: &Config) -> Result<Arc<dyn StorageBackend>> {
    if config.database.is_memory() {
        tracing::warn!("Using in-memory storage; data is lost on exit");
        return Ok(Arc::new(MemoryStorage::new()));
    }

    let pool = init_db(config).await?;
    Ok(Arc::new(SqliteStorage::new(pool)))
}

/// Spawn background workers:
/// - periodic retention sweep (reload every `sweep_interval`)
/// - storage listener that reloads when another writer changes a collection
///
/// Returns the `JoinHandle`s so callers can await shutdown. Each worker exits
/// when the `shutdown` sender broadcasts or is dropped.
pub fn spawn_background_workers(
    state: Arc<AppState>,
    shutdown: broadcast::Sender<()>,
) -> Vec<tokio::task::JoinHandle<()>> {
    let mut handles = Vec::new();

    // Retention sweep worker
    {
        let mut shutdown_rx = shutdown.subscribe();
        let state = state.clone();
        let interval = state.config.retention.sweep_interval();
        handles.push(tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Retention sweep worker shutting down");
                        break;
                    }
                    _ = tokio::time::sleep(interval) => {}
                }

                tracing::debug!("Running retention sweep");
                state.store.load().await;
            }
        }));
    }

    // Storage change listener. Subscribe before spawning so no write made
    // after this function returns is missed.
    {
        let mut shutdown_rx = shutdown.subscribe();
        let mut events = state.store.backend().subscribe();
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            let own_origin = state.store.origin();
            loop {
                tokio::select! {
                    _ = shutdown_rx.recv() => {
                        tracing::info!("Storage listener shutting down");
                        break;
                    }
                    event = events.recv() => match event {
                        Ok(event) => {
                            if event.origin == own_origin {
                                continue;
                            }
                            if Collection::from_key(&event.key).is_none() {
                                continue;
                            }
                            tracing::debug!("Collection '{}' changed by another writer, reloading", event.key);
                            state.store.load().await;
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!("Storage listener lagged by {} events, reloading", skipped);
                            state.store.load().await;
                        }
                        Err(RecvError::Closed) => {
                            tracing::info!("Storage event channel closed");
                            break;
                        }
                    }
                }
            }
        }));
    }

    handles
}
