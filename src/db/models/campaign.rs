use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::collection::{Collection, CollectionEntity};
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Target amount; may be fractional.
    pub goal: f64,
    /// Progress towards `goal`; starts at 0.
    pub current: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Progress as a percentage of the goal, capped at 100. A zero goal
    /// counts as complete.
    pub fn percent_complete(&self) -> f64 {
        if self.goal <= 0.0 {
            return 100.0;
        }
        ((self.current / self.goal) * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaign {
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub goal: f64,
}

impl CreateCampaign {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() || self.description.trim().is_empty() {
            return Err(AppError::Validation("validation.campaign_fields".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(AppError::Validation("validation.campaign_dates".to_string()));
        }
        if !self.goal.is_finite() || self.goal < 0.0 {
            return Err(AppError::Validation("validation.campaign_goal".to_string()));
        }
        Ok(())
    }

    pub fn into_campaign(self, now: DateTime<Utc>) -> Campaign {
        Campaign {
            id: Uuid::new_v4().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            start_date: self.start_date,
            end_date: self.end_date,
            goal: self.goal,
            current: 0.0,
            created_at: now,
        }
    }
}

impl CollectionEntity for Campaign {
    const COLLECTION: Collection = Collection::Campaigns;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
