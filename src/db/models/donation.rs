use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::collection::{Collection, CollectionEntity};
use crate::error::{AppError, AppResult};

pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Accepted,
    Delivered,
}

impl DonationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Accepted => "accepted",
            DonationStatus::Delivered => "delivered",
        }
    }

    /// Donations only move forward: pending -> accepted -> delivered.
    /// Staying in the same status is allowed.
    pub fn can_transition_to(self, next: DonationStatus) -> bool {
        use DonationStatus::*;
        matches!(
            (self, next),
            (Pending, Pending)
                | (Pending, Accepted)
                | (Pending, Delivered)
                | (Accepted, Accepted)
                | (Accepted, Delivered)
                | (Delivered, Delivered)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    /// Donor or restaurant name
    pub name: String,
    /// Free-form category label ("comida preparada", "no perecederos", ...)
    #[serde(rename = "type")]
    pub category: String,
    pub quantity: u32,
    pub image: String,
    pub status: DonationStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDonation {
    pub name: String,
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    pub quantity: u32,
    /// Optional image reference; the placeholder is used when absent.
    #[serde(default)]
    pub image: Option<String>,
}

impl CreateDonation {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.category.trim().is_empty() {
            return Err(AppError::Validation("validation.donation_fields".to_string()));
        }
        Ok(())
    }

    pub fn into_donation(self, now: DateTime<Utc>) -> Donation {
        let image = self
            .image
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

        Donation {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            quantity: self.quantity,
            image,
            status: DonationStatus::Pending,
            created_at: now,
        }
    }
}

impl CollectionEntity for Donation {
    const COLLECTION: Collection = Collection::Donations;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
