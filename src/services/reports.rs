use std::collections::BTreeMap;

use serde::Serialize;

use crate::db::models::{Campaign, DonationStatus, RequestStatus};
use crate::services::store::Snapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignProgress {
    pub id: String,
    pub name: String,
    pub current: f64,
    pub goal: f64,
    pub percent: f64,
}

impl From<&Campaign> for CampaignProgress {
    fn from(c: &Campaign) -> Self {
        CampaignProgress {
            id: c.id.clone(),
            name: c.name.clone(),
            current: c.current,
            goal: c.goal,
            percent: c.percent_complete(),
        }
    }
}

/// Aggregates behind the administrator's reports view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub campaigns: Vec<CampaignProgress>,
    /// Every status is present, zero counts included.
    pub donations_by_status: BTreeMap<&'static str, usize>,
    pub requests_by_status: BTreeMap<&'static str, usize>,
    pub total_quantity: u64,
}

pub fn build_report(snapshot: &Snapshot) -> Report {
    let mut donations_by_status: BTreeMap<&'static str, usize> = [
        DonationStatus::Pending,
        DonationStatus::Accepted,
        DonationStatus::Delivered,
    ]
    .into_iter()
    .map(|s| (s.as_str(), 0))
    .collect();
    for d in &snapshot.donations {
        *donations_by_status.entry(d.status.as_str()).or_default() += 1;
    }

    let mut requests_by_status: BTreeMap<&'static str, usize> = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
    ]
    .into_iter()
    .map(|s| (s.as_str(), 0))
    .collect();
    for r in &snapshot.requests {
        *requests_by_status.entry(r.status.as_str()).or_default() += 1;
    }

    Report {
        campaigns: snapshot.campaigns.iter().map(CampaignProgress::from).collect(),
        donations_by_status,
        requests_by_status,
        total_quantity: snapshot.donations.iter().map(|d| d.quantity as u64).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{CreateCampaign, CreateDonation};
    use chrono::Utc;

    #[test]
    fn empty_snapshot_reports_zero_counts() {
        let report = build_report(&Snapshot::default());
        assert_eq!(report.donations_by_status.get("pending"), Some(&0));
        assert_eq!(report.requests_by_status.get("rejected"), Some(&0));
        assert!(report.campaigns.is_empty());
        assert_eq!(report.total_quantity, 0);
    }

    #[test]
    fn counts_and_progress() {
        let now = Utc::now();
        let mut accepted = CreateDonation {
            name: "Supermercado B".to_string(),
            category: "No perecederos".to_string(),
            quantity: 100,
            image: None,
        }
        .into_donation(now);
        accepted.status = DonationStatus::Accepted;
        let pending = CreateDonation {
            name: "Restaurante A".to_string(),
            category: "Comida preparada".to_string(),
            quantity: 50,
            image: None,
        }
        .into_donation(now);

        let mut campaign = CreateCampaign {
            name: "Campaña de Verano".to_string(),
            description: "Recolección".to_string(),
            start_date: "2023-06-01".parse().unwrap(),
            end_date: "2023-08-31".parse().unwrap(),
            goal: 1000.0,
        }
        .into_campaign(now);
        campaign.current = 750.0;

        let snapshot = Snapshot {
            donations: vec![accepted, pending],
            campaigns: vec![campaign],
            ..Snapshot::default()
        };

        let report = build_report(&snapshot);
        assert_eq!(report.donations_by_status["accepted"], 1);
        assert_eq!(report.donations_by_status["pending"], 1);
        assert_eq!(report.donations_by_status["delivered"], 0);
        assert_eq!(report.total_quantity, 150);
        assert_eq!(report.campaigns[0].percent, 75.0);
    }
}
