use uuid::Uuid;

use crate::db::models::CollectionEntity;
use crate::db::storage::StorageBackend;
use crate::error::AppResult;

// ============================================================================
// Collection Repository
// ============================================================================

/// Typed access to a collection's serialized sequence.
///
/// Reads never fail: an absent key, a backend error and malformed JSON all
/// come back as an empty sequence. No schema version is stored.
pub struct CollectionRepository;

impl CollectionRepository {
    pub async fn read<T: CollectionEntity>(backend: &dyn StorageBackend) -> Vec<T> {
        let key = T::COLLECTION.key();

        let raw = match backend.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read '{}', treating as empty: {:?}", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Malformed data under '{}', treating as empty: {}", key, e);
                Vec::new()
            }
        }
    }

    /// Serialize the whole sequence and overwrite the collection's key.
    pub async fn write<T: CollectionEntity>(
        backend: &dyn StorageBackend,
        items: &[T],
        origin: Uuid,
    ) -> AppResult<()> {
        let raw = serde_json::to_string(items)?;
        backend.set(T::COLLECTION.key(), &raw, origin).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Notification, NotificationCategory, User, UserRole};
    use crate::db::storage::MemoryStorage;
    use chrono::Utc;

    #[tokio::test]
    async fn absent_key_reads_empty() {
        let storage = MemoryStorage::new();
        let users: Vec<User> = CollectionRepository::read(&storage).await;
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn corrupt_value_reads_empty() {
        let storage = MemoryStorage::new();
        storage
            .set("notifications", "{not json", Uuid::new_v4())
            .await
            .unwrap();

        let items: Vec<Notification> = CollectionRepository::read(&storage).await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn write_preserves_order() {
        let storage = MemoryStorage::new();
        let now = Utc::now();
        let items = vec![
            Notification::new("first", NotificationCategory::System, now),
            Notification::new("second", NotificationCategory::Donation, now),
        ];

        CollectionRepository::write(&storage, &items, Uuid::new_v4())
            .await
            .unwrap();

        let read: Vec<Notification> = CollectionRepository::read(&storage).await;
        assert_eq!(read, items);
    }

    #[tokio::test]
    async fn writes_under_collection_key() {
        let storage = MemoryStorage::new();
        let users = vec![User {
            id: "1".to_string(),
            username: "ana".to_string(),
            password: "secret".to_string(),
            role: UserRole::Beneficiary,
        }];

        CollectionRepository::write(&storage, &users, Uuid::new_v4())
            .await
            .unwrap();

        let raw = storage.get("users").await.unwrap().unwrap();
        assert!(raw.contains("\"type\":\"beneficiary\""));
    }
}
