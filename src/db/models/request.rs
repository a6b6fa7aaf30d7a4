use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::collection::{Collection, CollectionEntity};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// A pending request is decided once; decisions are final.
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        self == next || (self == RequestStatus::Pending && next != RequestStatus::Pending)
    }
}

/// A beneficiary's request for food assistance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRequest {
    pub id: String,
    pub beneficiary_name: String,
    pub address: String,
    pub needs: String,
    pub status: RequestStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFoodRequest {
    pub beneficiary_name: String,
    pub address: String,
    pub needs: String,
}

impl CreateFoodRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.beneficiary_name.trim().is_empty()
            || self.address.trim().is_empty()
            || self.needs.trim().is_empty()
        {
            return Err(AppError::Validation("validation.request_fields".to_string()));
        }
        Ok(())
    }

    pub fn into_request(self, now: DateTime<Utc>) -> FoodRequest {
        FoodRequest {
            id: Uuid::new_v4().to_string(),
            beneficiary_name: self.beneficiary_name.trim().to_string(),
            address: self.address.trim().to_string(),
            needs: self.needs.trim().to_string(),
            status: RequestStatus::Pending,
            created_at: now,
        }
    }
}

impl CollectionEntity for FoodRequest {
    const COLLECTION: Collection = Collection::Requests;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
