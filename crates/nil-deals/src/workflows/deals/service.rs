use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::display::DisplayStatus;
use super::domain::{
    AppealId, AppealResolution, AppealStatus, ComplianceDecision, DealId, DealStatus,
    DealSubmission, InfoRequestId, InfoRequestStatus,
};
use super::repository::{
    Appeal, DealRecord, DealRepository, InfoRequest, NotificationError, NotificationEvent,
    NotificationPublisher, RepositoryError,
};
use super::review::{status_for_decision, ReviewGuard, ReviewViolation};
use super::scoring::ScoreOverride;
use super::stats::{portfolio_stats, PortfolioStats};

/// Service composing the review guard, repository, and notification hook.
pub struct DealComplianceService<R, N> {
    guard: ReviewGuard,
    repository: Arc<R>,
    notifications: Arc<N>,
}

static DEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REQUEST_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static APPEAL_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_deal_id() -> DealId {
    let id = DEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DealId(format!("deal-{id:06}"))
}

fn next_request_id() -> InfoRequestId {
    let id = REQUEST_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    InfoRequestId(format!("req-{id:06}"))
}

fn next_appeal_id() -> AppealId {
    let id = APPEAL_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AppealId(format!("appeal-{id:06}"))
}

impl<R, N> DealComplianceService<R, N>
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(repository: Arc<R>, notifications: Arc<N>) -> Self {
        Self::with_guard(ReviewGuard::default(), repository, notifications)
    }

    pub(crate) fn with_guard(
        guard: ReviewGuard,
        repository: Arc<R>,
        notifications: Arc<N>,
    ) -> Self {
        Self {
            guard,
            repository,
            notifications,
        }
    }

    /// Open a new deal in `pending`, returning the repository-backed record.
    pub fn submit(&self, submission: DealSubmission) -> Result<DealRecord, DealServiceError> {
        let record = DealRecord {
            deal_id: next_deal_id(),
            athlete_id: submission.athlete_id,
            athlete_name: submission.athlete_name,
            counterparty: submission.counterparty,
            description: submission.description,
            value_cents: submission.value_cents,
            status: DealStatus::Pending,
            compliance_decision: None,
            has_active_appeal: false,
            compliance_score: None,
            reviewer_notes: None,
            submitted_at: Utc::now(),
            decided_at: None,
        };

        let stored = self.repository.insert_deal(record)?;
        Ok(stored)
    }

    /// Move a pending deal into the officer queue.
    pub fn submit_for_review(&self, deal_id: &DealId) -> Result<DealRecord, DealServiceError> {
        let mut record = self.get(deal_id)?;
        self.guard.check_submission(record.status)?;

        record.status = DealStatus::PendingReview;
        record.submitted_at = Utc::now();
        self.repository.update_deal(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert("athlete".to_string(), record.athlete_name.clone());
        self.publish_event("deal_submitted", &record.deal_id, details)?;

        Ok(record)
    }

    /// Fetch a deal for API responses.
    pub fn get(&self, deal_id: &DealId) -> Result<DealRecord, DealServiceError> {
        let record = self
            .repository
            .fetch_deal(deal_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    pub fn list(&self) -> Result<Vec<DealRecord>, DealServiceError> {
        Ok(self.repository.list_deals()?)
    }

    /// Resolve how a stored deal should currently be presented.
    pub fn display_status(&self, deal_id: &DealId) -> Result<DisplayStatus, DealServiceError> {
        let record = self.get(deal_id)?;
        Ok(record.display_status())
    }

    /// Record an officer decision and apply its lifecycle consequences.
    pub fn review(
        &self,
        deal_id: &DealId,
        decision: ComplianceDecision,
        notes: Option<String>,
        score_override: Option<ScoreOverride>,
    ) -> Result<DealRecord, DealServiceError> {
        let mut record = self.get(deal_id)?;
        self.guard.check_review(
            record.status,
            decision,
            notes.as_deref(),
            score_override.as_ref(),
        )?;

        if decision == ComplianceDecision::InfoRequested {
            let request = InfoRequest {
                request_id: next_request_id(),
                deal_id: record.deal_id.clone(),
                message: notes.clone().unwrap_or_default(),
                status: InfoRequestStatus::Pending,
                response: None,
                requested_at: Utc::now(),
                responded_at: None,
            };
            self.repository.insert_info_request(request)?;
        } else {
            // Any other decision supersedes whatever was still open.
            for mut request in self.repository.info_requests_for(&record.deal_id)? {
                if request.status != InfoRequestStatus::Resolved {
                    request.status = InfoRequestStatus::Resolved;
                    self.repository.update_info_request(request)?;
                }
            }
        }

        let mut reviewer_notes = notes.unwrap_or_default();
        if let Some(override_request) = &score_override {
            if !reviewer_notes.is_empty() {
                reviewer_notes.push('\n');
            }
            reviewer_notes.push_str("Score override: ");
            reviewer_notes.push_str(override_request.justification.trim());
            record.compliance_score = Some(override_request.score);
        }

        record.status = status_for_decision(decision);
        record.compliance_decision = Some(decision);
        record.has_active_appeal = false;
        record.reviewer_notes = if reviewer_notes.is_empty() {
            None
        } else {
            Some(reviewer_notes)
        };
        record.decided_at = Some(Utc::now());
        self.repository.update_deal(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert("decision".to_string(), decision.label().to_string());
        self.publish_event("deal_reviewed", &record.deal_id, details)?;

        Ok(record)
    }

    /// Record an athlete response; the deal re-queues once nothing is pending.
    pub fn respond_to_info(
        &self,
        deal_id: &DealId,
        request_id: &InfoRequestId,
        response: &str,
    ) -> Result<DealRecord, DealServiceError> {
        let mut record = self.get(deal_id)?;

        let requests = self.repository.info_requests_for(deal_id)?;
        let mut target = requests
            .iter()
            .find(|request| &request.request_id == request_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;

        self.guard.check_info_response(target.status, response)?;

        target.status = InfoRequestStatus::Responded;
        target.response = Some(response.trim().to_string());
        target.responded_at = Some(Utc::now());
        self.repository.update_info_request(target.clone())?;

        let still_pending = requests.iter().any(|request| {
            &request.request_id != request_id && request.status == InfoRequestStatus::Pending
        });

        if !still_pending {
            record.status = DealStatus::PendingReview;
            record.compliance_decision = Some(ComplianceDecision::ResponseSubmitted);
            self.repository.update_deal(record.clone())?;

            let mut details = BTreeMap::new();
            details.insert("request_id".to_string(), target.request_id.0.clone());
            self.publish_event("deal_response_submitted", &record.deal_id, details)?;
        }

        Ok(record)
    }

    /// Athlete marks the conditions of a conditional approval as met.
    pub fn complete_conditions(&self, deal_id: &DealId) -> Result<DealRecord, DealServiceError> {
        let mut record = self.get(deal_id)?;
        self.guard
            .check_condition_completion(record.compliance_decision)?;

        record.compliance_decision = Some(ComplianceDecision::ConditionsCompleted);
        record.status = DealStatus::PendingReview;
        self.repository.update_deal(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert(
            "decision".to_string(),
            ComplianceDecision::ConditionsCompleted.label().to_string(),
        );
        self.publish_event("deal_conditions_completed", &record.deal_id, details)?;

        Ok(record)
    }

    /// Open an appeal against a current rejection.
    pub fn submit_appeal(
        &self,
        deal_id: &DealId,
        reason: &str,
    ) -> Result<Appeal, DealServiceError> {
        let mut record = self.get(deal_id)?;
        self.guard.check_appeal(
            record.status,
            record.compliance_decision,
            record.has_active_appeal,
            reason,
        )?;

        let appeal = Appeal {
            appeal_id: next_appeal_id(),
            deal_id: record.deal_id.clone(),
            reason: reason.trim().to_string(),
            status: AppealStatus::Submitted,
            resolution: None,
            resolution_notes: None,
            new_decision: None,
            submitted_at: Utc::now(),
            resolved_at: None,
        };
        self.repository.insert_appeal(appeal.clone())?;

        record.has_active_appeal = true;
        self.repository.update_deal(record.clone())?;

        let mut details = BTreeMap::new();
        details.insert("appeal_id".to_string(), appeal.appeal_id.0.clone());
        self.publish_event("deal_appeal_submitted", &record.deal_id, details)?;

        Ok(appeal)
    }

    /// Close an appeal; modified and reversed resolutions re-decide the deal.
    pub fn resolve_appeal(
        &self,
        appeal_id: &AppealId,
        resolution: AppealResolution,
        notes: &str,
        new_decision: Option<ComplianceDecision>,
    ) -> Result<Appeal, DealServiceError> {
        let mut appeal = self
            .repository
            .fetch_appeal(appeal_id)?
            .ok_or(RepositoryError::NotFound)?;

        if appeal.status == AppealStatus::Resolved {
            return Err(ReviewViolation::AppealAlreadyResolved.into());
        }

        self.guard.check_appeal_resolution(resolution, new_decision)?;

        let mut record = self.get(&appeal.deal_id)?;
        record.has_active_appeal = false;
        if let Some(decision) = new_decision {
            record.status = status_for_decision(decision);
            record.compliance_decision = Some(decision);
            record.decided_at = Some(Utc::now());
        }
        self.repository.update_deal(record.clone())?;

        appeal.status = AppealStatus::Resolved;
        appeal.resolution = Some(resolution);
        appeal.resolution_notes = Some(notes.trim().to_string());
        appeal.new_decision = new_decision;
        appeal.resolved_at = Some(Utc::now());
        self.repository.update_appeal(appeal.clone())?;

        let mut details = BTreeMap::new();
        details.insert("resolution".to_string(), resolution.label().to_string());
        if let Some(decision) = new_decision {
            details.insert("new_decision".to_string(), decision.label().to_string());
        }
        self.publish_event("deal_appeal_resolved", &record.deal_id, details)?;

        Ok(appeal)
    }

    /// Aggregate the whole portfolio for the dashboard.
    pub fn stats(&self) -> Result<PortfolioStats, DealServiceError> {
        let deals = self.repository.list_deals()?;
        Ok(portfolio_stats(&deals))
    }

    fn publish_event(
        &self,
        template: &str,
        deal_id: &DealId,
        details: BTreeMap<String, String>,
    ) -> Result<(), DealServiceError> {
        self.notifications.publish(NotificationEvent {
            template: template.to_string(),
            deal_id: deal_id.clone(),
            details,
        })?;
        Ok(())
    }
}

/// Error raised by the deal compliance service.
#[derive(Debug, thiserror::Error)]
pub enum DealServiceError {
    #[error(transparent)]
    Review(#[from] ReviewViolation),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
