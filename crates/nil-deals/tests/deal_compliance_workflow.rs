use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use nil_deals::workflows::deals::{
    Appeal, AppealId, AppealResolution, ComplianceDecision, DealComplianceService, DealId,
    DealRecord, DealRepository, DealServiceError, DealStatus, DealSubmission, InfoRequest,
    NotificationError, NotificationEvent, NotificationPublisher, RepositoryError, ReviewViolation,
    VisualCategory,
};

#[derive(Default, Clone)]
struct MemoryRepository {
    deals: Arc<Mutex<HashMap<DealId, DealRecord>>>,
    requests: Arc<Mutex<Vec<InfoRequest>>>,
    appeals: Arc<Mutex<HashMap<AppealId, Appeal>>>,
}

impl DealRepository for MemoryRepository {
    fn insert_deal(&self, record: DealRecord) -> Result<DealRecord, RepositoryError> {
        let mut guard = self.deals.lock().expect("deal mutex poisoned");
        if guard.contains_key(&record.deal_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.deal_id.clone(), record.clone());
        Ok(record)
    }

    fn update_deal(&self, record: DealRecord) -> Result<(), RepositoryError> {
        let mut guard = self.deals.lock().expect("deal mutex poisoned");
        guard.insert(record.deal_id.clone(), record);
        Ok(())
    }

    fn fetch_deal(&self, id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Ok(self.deals.lock().expect("deal mutex poisoned").get(id).cloned())
    }

    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(self
            .deals
            .lock()
            .expect("deal mutex poisoned")
            .values()
            .cloned()
            .collect())
    }

    fn insert_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError> {
        self.requests
            .lock()
            .expect("request mutex poisoned")
            .push(request);
        Ok(())
    }

    fn update_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("request mutex poisoned");
        match guard
            .iter_mut()
            .find(|candidate| candidate.request_id == request.request_id)
        {
            Some(slot) => {
                *slot = request;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn info_requests_for(&self, deal_id: &DealId) -> Result<Vec<InfoRequest>, RepositoryError> {
        Ok(self
            .requests
            .lock()
            .expect("request mutex poisoned")
            .iter()
            .filter(|request| &request.deal_id == deal_id)
            .cloned()
            .collect())
    }

    fn insert_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        self.appeals
            .lock()
            .expect("appeal mutex poisoned")
            .insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn update_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        self.appeals
            .lock()
            .expect("appeal mutex poisoned")
            .insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn fetch_appeal(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        Ok(self
            .appeals
            .lock()
            .expect("appeal mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default, Clone)]
struct MemoryNotifications {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl MemoryNotifications {
    fn templates(&self) -> Vec<String> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .iter()
            .map(|event| event.template.clone())
            .collect()
    }
}

impl NotificationPublisher for MemoryNotifications {
    fn publish(&self, event: NotificationEvent) -> Result<(), NotificationError> {
        self.events
            .lock()
            .expect("event mutex poisoned")
            .push(event);
        Ok(())
    }
}

fn build_service() -> (
    DealComplianceService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = DealComplianceService::new(repository.clone(), notifications.clone());
    (service, repository, notifications)
}

fn submission(athlete: &str, value_cents: u64) -> DealSubmission {
    DealSubmission {
        athlete_id: format!("ath-{athlete}"),
        athlete_name: athlete.to_string(),
        counterparty: "Hawkeye Motors".to_string(),
        description: "Sponsored social posts".to_string(),
        value_cents,
    }
}

const APPEAL_REASON: &str = "The flagged post was removed and replaced with a revised version approved by our athletics department.";

#[test]
fn full_lifecycle_from_intake_to_reversed_appeal() {
    let (service, repository, notifications) = build_service();

    // Intake.
    let record = service
        .submit(submission("Jordan Ellis", 250_000))
        .expect("deal opens");
    let deal_id = record.deal_id.clone();
    assert_eq!(record.status, DealStatus::Pending);
    assert_eq!(record.display_status().friendly_label, "Pending Review");

    let record = service
        .submit_for_review(&deal_id)
        .expect("enters the queue");
    assert_eq!(record.status, DealStatus::PendingReview);

    // Officer asks for the contract.
    let record = service
        .review(
            &deal_id,
            ComplianceDecision::InfoRequested,
            Some("Provide the signed sponsorship contract".to_string()),
            None,
        )
        .expect("info request recorded");
    assert_eq!(record.status, DealStatus::InfoRequested);
    assert_eq!(record.display_status().category, VisualCategory::Warning);

    // Athlete responds; the deal re-queues.
    let request = repository
        .info_requests_for(&deal_id)
        .expect("requests load")
        .pop()
        .expect("request present");
    let record = service
        .respond_to_info(&deal_id, &request.request_id, "Contract attached as PDF")
        .expect("response recorded");
    assert_eq!(record.status, DealStatus::PendingReview);
    assert_eq!(
        record.compliance_decision,
        Some(ComplianceDecision::ResponseSubmitted)
    );
    assert_eq!(
        record.display_status().friendly_label,
        "Awaiting Re-Review"
    );

    // Re-review rejects.
    let record = service
        .review(
            &deal_id,
            ComplianceDecision::Rejected,
            Some("Category conflict with the school's exclusive sponsor".to_string()),
            None,
        )
        .expect("rejection recorded");
    assert_eq!(record.status, DealStatus::Rejected);
    assert_eq!(record.display_status().category, VisualCategory::Negative);

    // The rejection resolves the open info request.
    let requests = repository
        .info_requests_for(&deal_id)
        .expect("requests load");
    assert!(requests
        .iter()
        .all(|request| request.status.label() == "resolved"));

    // Appeal takes visual precedence.
    let appeal = service
        .submit_appeal(&deal_id, APPEAL_REASON)
        .expect("appeal opens");
    let display = service.display_status(&deal_id).expect("display resolves");
    assert_eq!(display.category, VisualCategory::Appeal);
    assert_eq!(display.friendly_label, "Under Appeal");

    // Reversal re-decides the deal and clears the appeal flag.
    let resolved = service
        .resolve_appeal(
            &appeal.appeal_id,
            AppealResolution::Reversed,
            "Revised contract resolves the conflict",
            Some(ComplianceDecision::Approved),
        )
        .expect("appeal resolves");
    assert_eq!(resolved.resolution, Some(AppealResolution::Reversed));

    let record = service.get(&deal_id).expect("deal loads");
    assert!(!record.has_active_appeal);
    assert_eq!(record.status, DealStatus::Approved);
    assert_eq!(record.display_status().friendly_label, "Compliant");

    assert_eq!(
        notifications.templates(),
        vec![
            "deal_submitted",
            "deal_reviewed",
            "deal_response_submitted",
            "deal_reviewed",
            "deal_appeal_submitted",
            "deal_appeal_resolved",
        ]
    );
}

#[test]
fn conditional_approval_round_trips_through_condition_completion() {
    let (service, _, _) = build_service();

    let record = service
        .submit(submission("Casey Nguyen", 90_000))
        .expect("deal opens");
    let deal_id = record.deal_id.clone();
    service.submit_for_review(&deal_id).expect("queued");

    service
        .review(
            &deal_id,
            ComplianceDecision::ApprovedWithConditions,
            Some("Add the school disclosure hashtag to every post".to_string()),
            None,
        )
        .expect("conditional approval recorded");

    let record = service
        .complete_conditions(&deal_id)
        .expect("conditions marked met");
    assert_eq!(record.status, DealStatus::PendingReview);
    assert_eq!(
        record.compliance_decision,
        Some(ComplianceDecision::ConditionsCompleted)
    );
    assert_eq!(
        record.display_status().friendly_label,
        "Awaiting Final Approval"
    );

    // Final sign-off is a regular re-review.
    let record = service
        .review(&deal_id, ComplianceDecision::Approved, None, None)
        .expect("final approval recorded");
    assert_eq!(record.status, DealStatus::Approved);
}

#[test]
fn upheld_appeals_keep_the_rejection_but_clear_the_flag() {
    let (service, _, _) = build_service();

    let record = service
        .submit(submission("Sam Reyes", 40_000))
        .expect("deal opens");
    let deal_id = record.deal_id.clone();
    service.submit_for_review(&deal_id).expect("queued");
    service
        .review(&deal_id, ComplianceDecision::Rejected, None, None)
        .expect("rejection recorded");

    let appeal = service
        .submit_appeal(&deal_id, APPEAL_REASON)
        .expect("appeal opens");
    service
        .resolve_appeal(
            &appeal.appeal_id,
            AppealResolution::Upheld,
            "The conflict remains after the revision",
            None,
        )
        .expect("appeal resolves");

    let record = service.get(&deal_id).expect("deal loads");
    assert_eq!(record.status, DealStatus::Rejected);
    assert_eq!(record.compliance_decision, Some(ComplianceDecision::Rejected));
    assert!(!record.has_active_appeal);

    // A resolved appeal does not block a fresh one.
    service
        .submit_appeal(&deal_id, APPEAL_REASON)
        .expect("second appeal opens");
}

#[test]
fn decided_deals_are_not_reviewable_again() {
    let (service, _, _) = build_service();

    let record = service
        .submit(submission("Riley Brooks", 10_000))
        .expect("deal opens");
    let deal_id = record.deal_id.clone();
    service.submit_for_review(&deal_id).expect("queued");
    service
        .review(&deal_id, ComplianceDecision::Approved, None, None)
        .expect("approval recorded");

    let error = service
        .review(&deal_id, ComplianceDecision::Rejected, None, None)
        .expect_err("approved deals leave the queue");
    assert!(matches!(
        error,
        DealServiceError::Review(ReviewViolation::NotReviewable("approved"))
    ));
}

#[test]
fn portfolio_stats_track_the_dashboard_buckets() {
    let (service, _, _) = build_service();

    // One of each bucket: not submitted, pending review, approved,
    // needs action, appealed.
    service
        .submit(submission("Drafted", 10_000))
        .expect("deal opens");

    let pending = service
        .submit(submission("Queued", 20_000))
        .expect("deal opens");
    service
        .submit_for_review(&pending.deal_id)
        .expect("queued");

    let approved = service
        .submit(submission("Approved", 250_000))
        .expect("deal opens");
    service
        .submit_for_review(&approved.deal_id)
        .expect("queued");
    service
        .review(&approved.deal_id, ComplianceDecision::Approved, None, None)
        .expect("approved");

    let flagged = service
        .submit(submission("Flagged", 30_000))
        .expect("deal opens");
    service.submit_for_review(&flagged.deal_id).expect("queued");
    service
        .review(
            &flagged.deal_id,
            ComplianceDecision::InfoRequested,
            Some("Provide the contract".to_string()),
            None,
        )
        .expect("info requested");

    let appealed = service
        .submit(submission("Appealed", 40_000))
        .expect("deal opens");
    service
        .submit_for_review(&appealed.deal_id)
        .expect("queued");
    service
        .review(&appealed.deal_id, ComplianceDecision::Rejected, None, None)
        .expect("rejected");
    service
        .submit_appeal(&appealed.deal_id, APPEAL_REASON)
        .expect("appeal opens");

    let stats = service.stats().expect("stats aggregate");
    assert_eq!(stats.total, 5);
    assert_eq!(stats.not_submitted, 1);
    assert_eq!(stats.pending_review, 1);
    assert_eq!(stats.approved, 1);
    assert_eq!(stats.approved_value_cents, 250_000);
    assert_eq!(stats.needs_action, 1);
    assert_eq!(stats.appealed, 1);
    assert_eq!(stats.pending(), 2);
    assert_eq!(stats.action_required(), 2);
}
