use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::display::{resolve_display_status, DealSnapshot, DisplayStatus};
use super::domain::{
    AppealId, AppealResolution, AppealStatus, ComplianceDecision, DealId, DealStatus,
    InfoRequestId, InfoRequestStatus,
};

/// Repository record for a deal and its compliance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealRecord {
    pub deal_id: DealId,
    pub athlete_id: String,
    pub athlete_name: String,
    pub counterparty: String,
    pub description: String,
    pub value_cents: u64,
    pub status: DealStatus,
    pub compliance_decision: Option<ComplianceDecision>,
    pub has_active_appeal: bool,
    pub compliance_score: Option<u8>,
    pub reviewer_notes: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl DealRecord {
    /// Raw string form of the fields the display resolver consumes.
    pub fn snapshot(&self) -> DealSnapshot {
        DealSnapshot {
            status: self.status.label().to_string(),
            compliance_decision: self
                .compliance_decision
                .map(|decision| decision.label().to_string()),
            has_active_appeal: self.has_active_appeal,
        }
    }

    pub fn display_status(&self) -> DisplayStatus {
        resolve_display_status(&self.snapshot())
    }

    pub fn status_view(&self) -> DealStatusView {
        DealStatusView {
            deal_id: self.deal_id.clone(),
            status: self.status.label(),
            compliance_decision: self.compliance_decision.map(ComplianceDecision::label),
            compliance_score: self.compliance_score,
            display: self.display_status(),
        }
    }

    pub fn summary_view(&self) -> DealSummaryView {
        DealSummaryView {
            deal_id: self.deal_id.clone(),
            athlete_name: self.athlete_name.clone(),
            counterparty: self.counterparty.clone(),
            value_cents: self.value_cents,
            status: self.status.label(),
            compliance_decision: self.compliance_decision.map(ComplianceDecision::label),
            display: self.display_status(),
        }
    }

    pub fn detail_view(&self) -> DealView {
        DealView {
            display: self.display_status(),
            deal: self.clone(),
        }
    }
}

/// Reviewer demand for changes or documentation on a deal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoRequest {
    pub request_id: InfoRequestId,
    pub deal_id: DealId,
    pub message: String,
    pub status: InfoRequestStatus,
    pub response: Option<String>,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Athlete challenge to a rejection, pending officer resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appeal {
    pub appeal_id: AppealId,
    pub deal_id: DealId,
    pub reason: String,
    pub status: AppealStatus,
    pub resolution: Option<AppealResolution>,
    pub resolution_notes: Option<String>,
    pub new_decision: Option<ComplianceDecision>,
    pub submitted_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait DealRepository: Send + Sync {
    fn insert_deal(&self, record: DealRecord) -> Result<DealRecord, RepositoryError>;
    fn update_deal(&self, record: DealRecord) -> Result<(), RepositoryError>;
    fn fetch_deal(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError>;
    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError>;
    fn insert_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError>;
    fn update_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError>;
    fn info_requests_for(&self, deal_id: &DealId) -> Result<Vec<InfoRequest>, RepositoryError>;
    fn insert_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError>;
    fn update_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError>;
    fn fetch_appeal(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Trait describing outbound notification hooks (e-mail and in-app adapters).
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, event: NotificationEvent) -> Result<(), NotificationError>;
}

/// Notification payload so routes and tests can assert messaging boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub template: String,
    pub deal_id: DealId,
    pub details: BTreeMap<String, String>,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Sanitized representation of a deal's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct DealStatusView {
    pub deal_id: DealId,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_decision: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_score: Option<u8>,
    pub display: DisplayStatus,
}

/// Row shape for dashboard list views.
#[derive(Debug, Clone, Serialize)]
pub struct DealSummaryView {
    pub deal_id: DealId,
    pub athlete_name: String,
    pub counterparty: String,
    pub value_cents: u64,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_decision: Option<&'static str>,
    pub display: DisplayStatus,
}

/// Full deal payload for detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct DealView {
    pub deal: DealRecord,
    pub display: DisplayStatus,
}
