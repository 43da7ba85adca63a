use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::deals::display::DealSnapshot;
use crate::workflows::deals::domain::{
    AppealId, ComplianceDecision, DealId, DealStatus, DealSubmission,
};
use crate::workflows::deals::repository::{
    Appeal, DealRecord, DealRepository, InfoRequest, NotificationError, NotificationEvent,
    NotificationPublisher, RepositoryError,
};
use crate::workflows::deals::{compliance_router, DealComplianceService};

pub(super) fn submission() -> DealSubmission {
    DealSubmission {
        athlete_id: "ath-0042".to_string(),
        athlete_name: "Jordan Ellis".to_string(),
        counterparty: "Hawkeye Motors".to_string(),
        description: "Three sponsored posts featuring the fall truck lineup".to_string(),
        value_cents: 250_000,
    }
}

pub(super) fn snapshot(
    status: &str,
    compliance_decision: Option<&str>,
    has_active_appeal: bool,
) -> DealSnapshot {
    DealSnapshot {
        status: status.to_string(),
        compliance_decision: compliance_decision.map(str::to_string),
        has_active_appeal,
    }
}

pub(super) fn deal(
    suffix: &str,
    status: DealStatus,
    compliance_decision: Option<ComplianceDecision>,
    has_active_appeal: bool,
) -> DealRecord {
    DealRecord {
        deal_id: DealId(format!("deal-{suffix}")),
        athlete_id: "ath-0042".to_string(),
        athlete_name: "Jordan Ellis".to_string(),
        counterparty: "Hawkeye Motors".to_string(),
        description: "Sponsored posts".to_string(),
        value_cents: 150_000,
        status,
        compliance_decision,
        has_active_appeal,
        compliance_score: None,
        reviewer_notes: None,
        submitted_at: Utc::now(),
        decided_at: None,
    }
}

pub(super) fn long_reason() -> String {
    "The flagged post was removed and replaced with a revised version approved by our athletics department.".to_string()
}

pub(super) fn build_service() -> (
    DealComplianceService<MemoryRepository, MemoryNotifications>,
    Arc<MemoryRepository>,
    Arc<MemoryNotifications>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(MemoryNotifications::default());
    let service = DealComplianceService::new(repository.clone(), notifications.clone());
    (service, repository, notifications)
}

pub(super) fn pending_review_deal(
    service: &DealComplianceService<MemoryRepository, MemoryNotifications>,
) -> DealRecord {
    let record = service.submit(submission()).expect("submission succeeds");
    service
        .submit_for_review(&record.deal_id)
        .expect("submission for review succeeds")
}

pub(super) fn rejected_deal(
    service: &DealComplianceService<MemoryRepository, MemoryNotifications>,
) -> DealRecord {
    let record = pending_review_deal(service);
    service
        .review(
            &record.deal_id,
            ComplianceDecision::Rejected,
            Some("Undisclosed category conflict".to_string()),
            None,
        )
        .expect("rejection succeeds")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) deals: Arc<Mutex<HashMap<DealId, DealRecord>>>,
    pub(super) requests: Arc<Mutex<Vec<InfoRequest>>>,
    pub(super) appeals: Arc<Mutex<HashMap<AppealId, Appeal>>>,
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
        let guard = self.deals.lock().expect("deal mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        let guard = self.deals.lock().expect("deal mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn insert_info_request(&self, request: InfoRequest) -> Result<(), RepositoryError> {
        let mut guard = self.requests.lock().expect("request mutex poisoned");
        guard.push(request);
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
        let guard = self.requests.lock().expect("request mutex poisoned");
        Ok(guard
            .iter()
            .filter(|request| &request.deal_id == deal_id)
            .cloned()
            .collect())
    }

    fn insert_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        let mut guard = self.appeals.lock().expect("appeal mutex poisoned");
        if guard.contains_key(&appeal.appeal_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn update_appeal(&self, appeal: Appeal) -> Result<(), RepositoryError> {
        let mut guard = self.appeals.lock().expect("appeal mutex poisoned");
        guard.insert(appeal.appeal_id.clone(), appeal);
        Ok(())
    }

    fn fetch_appeal(&self, id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        let guard = self.appeals.lock().expect("appeal mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifications {
    events: Arc<Mutex<Vec<NotificationEvent>>>,
}

impl MemoryNotifications {
    pub(super) fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("event mutex poisoned").clone()
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

pub(super) struct FailingNotifications;

impl NotificationPublisher for FailingNotifications {
    fn publish(&self, _event: NotificationEvent) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

pub(super) struct ConflictRepository;

impl DealRepository for ConflictRepository {
    fn insert_deal(&self, _record: DealRecord) -> Result<DealRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_deal(&self, _record: DealRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch_deal(&self, _id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Ok(None)
    }

    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_info_request(&self, _request: InfoRequest) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn update_info_request(&self, _request: InfoRequest) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn info_requests_for(&self, _deal_id: &DealId) -> Result<Vec<InfoRequest>, RepositoryError> {
        Ok(Vec::new())
    }

    fn insert_appeal(&self, _appeal: Appeal) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update_appeal(&self, _appeal: Appeal) -> Result<(), RepositoryError> {
        Ok(())
    }

    fn fetch_appeal(&self, _id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl UnavailableRepository {
    fn offline<T>() -> Result<T, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

impl DealRepository for UnavailableRepository {
    fn insert_deal(&self, _record: DealRecord) -> Result<DealRecord, RepositoryError> {
        Self::offline()
    }

    fn update_deal(&self, _record: DealRecord) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn fetch_deal(&self, _id: &DealId) -> Result<Option<DealRecord>, RepositoryError> {
        Self::offline()
    }

    fn list_deals(&self) -> Result<Vec<DealRecord>, RepositoryError> {
        Self::offline()
    }

    fn insert_info_request(&self, _request: InfoRequest) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn update_info_request(&self, _request: InfoRequest) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn info_requests_for(&self, _deal_id: &DealId) -> Result<Vec<InfoRequest>, RepositoryError> {
        Self::offline()
    }

    fn insert_appeal(&self, _appeal: Appeal) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn update_appeal(&self, _appeal: Appeal) -> Result<(), RepositoryError> {
        Self::offline()
    }

    fn fetch_appeal(&self, _id: &AppealId) -> Result<Option<Appeal>, RepositoryError> {
        Self::offline()
    }
}

pub(super) fn assert_conflict_response(response: Response) {
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn compliance_router_with_service(
    service: DealComplianceService<MemoryRepository, MemoryNotifications>,
) -> axum::Router {
    compliance_router(Arc::new(service))
}
