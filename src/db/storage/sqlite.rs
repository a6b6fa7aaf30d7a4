use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::{StorageBackend, StorageEvent, EVENT_CHANNEL_CAPACITY};
use crate::error::{AppError, AppResult};

/// SQLite-backed key/value storage (`kv_store` table).
///
/// Change events are only published to subscribers of this instance; other
/// processes writing the same database file are not observed.
pub struct SqliteStorage {
    pool: SqlitePool,
    events: broadcast::Sender<StorageEvent>,
}

impl SqliteStorage {
    /// Wrap a pool whose migrations have already been run.
    pub fn new(pool: SqlitePool) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { pool, events }
    }
}

#[async_trait]
impl StorageBackend for SqliteStorage {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Storage)?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, origin: Uuid) -> AppResult<()> {
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(AppError::Storage)?;

        tracing::debug!("Persisted key '{}' ({} bytes)", key, value.len());

        let _ = self.events.send(StorageEvent {
            key: key.to_string(),
            origin,
        });
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn memory_pool() -> SqlitePool {
        // A single connection keeps the in-memory database alive and shared.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn upsert_overwrites_value() {
        let storage = SqliteStorage::new(memory_pool().await);
        let origin = Uuid::new_v4();

        assert_eq!(storage.get("users").await.unwrap(), None);

        storage.set("users", "[1]", origin).await.unwrap();
        storage.set("users", "[1,2]", origin).await.unwrap();

        assert_eq!(storage.get("users").await.unwrap(), Some("[1,2]".to_string()));
    }

    #[tokio::test]
    async fn write_is_announced() {
        let storage = SqliteStorage::new(memory_pool().await);
        let mut rx = storage.subscribe();
        let origin = Uuid::new_v4();

        storage.set("campaigns", "[]", origin).await.unwrap();

        assert_eq!(
            rx.recv().await.unwrap(),
            StorageEvent {
                key: "campaigns".to_string(),
                origin,
            }
        );
    }
}
