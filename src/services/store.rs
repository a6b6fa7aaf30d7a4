//! Local retention store.
//!
//! Owns the in-memory mirror of the five collections and keeps it in sync
//! with a [`StorageBackend`]:
//! - `load` reads every collection and drops entries older than the
//!   retention window from the mirror (storage is left untouched),
//! - every mutation updates the mirror first and then persists the full
//!   sequence of the affected collection before returning.
//!
//! Mutations are serialized by a write gate so that a read-modify-write is
//! never interleaved with another mutation or a reload of the same store.
//! Two stores sharing a backend are not coordinated: the last writer wins.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::db::models::*;
use crate::db::{CollectionRepository, StorageBackend};
use crate::error::{AppError, AppResult};
use crate::services::clock::Clock;

/// Point-in-time copy of all collections, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub donations: Vec<Donation>,
    pub requests: Vec<FoodRequest>,
    pub users: Vec<User>,
    pub campaigns: Vec<Campaign>,
    pub notifications: Vec<Notification>,
}

/// Maps an entity type to its sequence inside a [`Snapshot`].
pub trait SnapshotSlot: CollectionEntity {
    fn slot(snapshot: &Snapshot) -> &Vec<Self>;
    fn slot_mut(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

macro_rules! snapshot_slot {
    ($ty:ty, $field:ident) => {
        impl SnapshotSlot for $ty {
            fn slot(snapshot: &Snapshot) -> &Vec<Self> {
                &snapshot.$field
            }

            fn slot_mut(snapshot: &mut Snapshot) -> &mut Vec<Self> {
                &mut snapshot.$field
            }
        }
    };
}

snapshot_slot!(Donation, donations);
snapshot_slot!(FoodRequest, requests);
snapshot_slot!(User, users);
snapshot_slot!(Campaign, campaigns);
snapshot_slot!(Notification, notifications);

/// Keep entries younger than `window`. Entries without a timestamp, and
/// collections exempt from retention, are kept. An entry exactly `window`
/// old is dropped.
pub fn retain_fresh<T: CollectionEntity>(
    items: Vec<T>,
    now: DateTime<Utc>,
    window: Duration,
) -> Vec<T> {
    if !T::COLLECTION.is_retained() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| match item.created_at() {
            Some(created_at) => now - created_at < window,
            None => true,
        })
        .collect()
}

pub struct RetentionStore {
    backend: Arc<dyn StorageBackend>,
    clock: Arc<dyn Clock>,
    window: Duration,
    /// Identifies this store's writes in storage change events.
    origin: Uuid,
    state: RwLock<Snapshot>,
    write_gate: Mutex<()>,
}

impl RetentionStore {
    /// Create a store over `backend` and run the initial load.
    pub async fn init(
        backend: Arc<dyn StorageBackend>,
        clock: Arc<dyn Clock>,
        window: Duration,
    ) -> Self {
        let store = Self {
            backend,
            clock,
            window,
            origin: Uuid::new_v4(),
            state: RwLock::new(Snapshot::default()),
            write_gate: Mutex::new(()),
        };
        store.load().await;
        store
    }

    pub fn origin(&self) -> Uuid {
        self.origin
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Re-read every collection and apply the retention window.
    ///
    /// Idempotent for a given storage content and clock reading. The filtered
    /// result is not written back.
    pub async fn load(&self) {
        let _gate = self.write_gate.lock().await;
        let now = self.clock.now();

        let donations = retain_fresh(
            CollectionRepository::read::<Donation>(&*self.backend).await,
            now,
            self.window,
        );
        let requests = retain_fresh(
            CollectionRepository::read::<FoodRequest>(&*self.backend).await,
            now,
            self.window,
        );
        let users = retain_fresh(
            CollectionRepository::read::<User>(&*self.backend).await,
            now,
            self.window,
        );
        let campaigns = retain_fresh(
            CollectionRepository::read::<Campaign>(&*self.backend).await,
            now,
            self.window,
        );
        let notifications = retain_fresh(
            CollectionRepository::read::<Notification>(&*self.backend).await,
            now,
            self.window,
        );

        let snapshot = Snapshot {
            donations,
            requests,
            users,
            campaigns,
            notifications,
        };

        tracing::debug!(
            donations = snapshot.donations.len(),
            requests = snapshot.requests.len(),
            users = snapshot.users.len(),
            campaigns = snapshot.campaigns.len(),
            notifications = snapshot.notifications.len(),
            "Collections loaded"
        );

        *self.state.write().await = snapshot;
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn items<T: SnapshotSlot>(&self) -> Vec<T> {
        T::slot(&*self.state.read().await).clone()
    }

    pub async fn find<T: SnapshotSlot>(&self, id: &str) -> Option<T> {
        T::slot(&*self.state.read().await)
            .iter()
            .find(|item| item.id() == id)
            .cloned()
    }

    /// Append `entity` to the end of its collection and persist.
    ///
    /// If persisting fails the entity stays in the mirror and the error is
    /// returned.
    pub async fn append<T: SnapshotSlot>(&self, entity: T) -> AppResult<T> {
        self.append_checked(entity, |_| Ok(())).await
    }

    /// Like [`append`](Self::append), but runs `guard` against the current
    /// collection first, inside the write gate. A guard error aborts without
    /// mutation.
    pub async fn append_checked<T, F>(&self, entity: T, guard: F) -> AppResult<T>
    where
        T: SnapshotSlot,
        F: FnOnce(&[T]) -> AppResult<()>,
    {
        let _gate = self.write_gate.lock().await;

        let items = {
            let mut state = self.state.write().await;
            let slot = T::slot_mut(&mut state);
            guard(slot.as_slice())?;
            slot.push(entity.clone());
            slot.clone()
        };

        self.persist(&items).await?;
        tracing::debug!("Appended {} to {}", entity.id(), T::COLLECTION);
        Ok(entity)
    }

    /// Drop every entry matching `predicate` and persist the remainder.
    /// Returns the removed entries; removing nothing still re-persists.
    pub async fn remove_where<T, F>(&self, predicate: F) -> AppResult<Vec<T>>
    where
        T: SnapshotSlot,
        F: Fn(&T) -> bool,
    {
        let _gate = self.write_gate.lock().await;

        let (removed, items) = {
            let mut state = self.state.write().await;
            let slot = T::slot_mut(&mut state);
            let (removed, kept): (Vec<T>, Vec<T>) =
                std::mem::take(slot).into_iter().partition(|item| predicate(item));
            *slot = kept;
            (removed, slot.clone())
        };

        self.persist(&items).await?;
        tracing::debug!("Removed {} entries from {}", removed.len(), T::COLLECTION);
        Ok(removed)
    }

    pub async fn remove_by_id<T: SnapshotSlot>(&self, id: &str) -> AppResult<Option<T>> {
        let mut removed = self.remove_where::<T, _>(|item| item.id() == id).await?;
        Ok(removed.pop())
    }

    /// Apply `change` to the entry with `id` and persist. The change runs on
    /// a copy; if it fails nothing is modified.
    pub async fn update<T, F>(&self, id: &str, change: F) -> AppResult<T>
    where
        T: SnapshotSlot,
        F: FnOnce(&mut T) -> AppResult<()>,
    {
        let _gate = self.write_gate.lock().await;

        let (updated, items) = {
            let mut state = self.state.write().await;
            let slot = T::slot_mut(&mut state);
            let entry = slot
                .iter_mut()
                .find(|item| item.id() == id)
                .ok_or_else(|| AppError::NotFound(format!("not_found.{}", entity_name::<T>())))?;

            let mut candidate = entry.clone();
            change(&mut candidate)?;
            *entry = candidate.clone();
            (candidate, slot.clone())
        };

        self.persist(&items).await?;
        Ok(updated)
    }

    /// Record a notification stamped with the current time.
    pub async fn notify(
        &self,
        message: impl Into<String>,
        category: NotificationCategory,
    ) -> AppResult<Notification> {
        let notification = Notification::new(message, category, self.clock.now());
        self.append(notification).await
    }

    pub async fn set_donation_status(&self, id: &str, status: DonationStatus) -> AppResult<Donation> {
        self.update::<Donation, _>(id, |donation| {
            if !donation.status.can_transition_to(status) {
                return Err(AppError::InvalidTransition {
                    from: donation.status.as_str().to_string(),
                    to: status.as_str().to_string(),
                });
            }
            donation.status = status;
            Ok(())
        })
        .await
    }

    pub async fn set_request_status(&self, id: &str, status: RequestStatus) -> AppResult<FoodRequest> {
        self.update::<FoodRequest, _>(id, |request| {
            if !request.status.can_transition_to(status) {
                return Err(AppError::InvalidTransition {
                    from: request.status.as_str().to_string(),
                    to: status.as_str().to_string(),
                });
            }
            request.status = status;
            Ok(())
        })
        .await
    }

    async fn persist<T: SnapshotSlot>(&self, items: &[T]) -> AppResult<()> {
        CollectionRepository::write(&*self.backend, items, self.origin)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to persist {}; in-memory state kept: {:?}",
                    T::COLLECTION,
                    e
                );
                e
            })
    }
}

fn entity_name<T: CollectionEntity>() -> &'static str {
    match T::COLLECTION {
        Collection::Donations => "donation",
        Collection::Requests => "request",
        Collection::Users => "user",
        Collection::Campaigns => "campaign",
        Collection::Notifications => "notification",
    }
}
