//! Key/value storage backends.
//!
//! A backend stores one string per key and publishes a [`StorageEvent`] for
//! every write. Each writer identifies itself with an origin id so that
//! subscribers can ignore their own writes, the way a browser only delivers
//! `storage` events to *other* tabs.

use async_trait::async_trait;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::AppResult;

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Capacity of the change-event channel. Slow subscribers observe `Lagged`.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub origin: Uuid,
}

#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Raw value stored under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Overwrite `key` and publish a change event tagged with `origin`.
    async fn set(&self, key: &str, value: &str, origin: Uuid) -> AppResult<()>;

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}
