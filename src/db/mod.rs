pub mod models;
pub mod repository;
pub mod storage;

pub use models::*;
pub use repository::CollectionRepository;
pub use storage::{MemoryStorage, SqliteStorage, StorageBackend, StorageEvent};
