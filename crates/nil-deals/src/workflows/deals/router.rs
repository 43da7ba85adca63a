use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AppealId, AppealResolution, ComplianceDecision, DealId, DealSubmission, InfoRequestId,
};
use super::repository::{DealRecord, DealRepository, NotificationPublisher, RepositoryError};
use super::review::ReviewViolation;
use super::scoring::ScoreOverride;
use super::service::{DealComplianceService, DealServiceError};

/// Router builder exposing the compliance HTTP surface.
pub fn compliance_router<R, N>(service: Arc<DealComplianceService<R, N>>) -> Router
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route(
            "/api/v1/compliance/deals",
            post(submit_handler::<R, N>).get(list_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id",
            get(detail_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id/status",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id/submit",
            post(submit_for_review_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id/respond-info",
            post(respond_info_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/deals/:deal_id/complete-conditions",
            post(complete_conditions_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/appeals",
            post(appeal_handler::<R, N>),
        )
        .route(
            "/api/v1/compliance/appeals/:appeal_id/resolve",
            post(resolve_appeal_handler::<R, N>),
        )
        .route("/api/v1/compliance/stats", get(stats_handler::<R, N>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) decision: ComplianceDecision,
    #[serde(default)]
    pub(crate) notes: Option<String>,
    #[serde(default)]
    pub(crate) score_override: Option<ScoreOverride>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoResponseRequest {
    pub(crate) request_id: String,
    pub(crate) response: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppealRequest {
    pub(crate) deal_id: String,
    pub(crate) reason: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveAppealRequest {
    pub(crate) resolution: AppealResolution,
    pub(crate) notes: String,
    #[serde(default)]
    pub(crate) new_decision: Option<ComplianceDecision>,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    axum::Json(submission): axum::Json<DealSubmission>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit(submission) {
        Ok(record) => (StatusCode::ACCEPTED, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.list() {
        Ok(records) => {
            let deals: Vec<_> = records.iter().map(DealRecord::summary_view).collect();
            (StatusCode::OK, axum::Json(deals)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn detail_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&DealId(deal_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.detail_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&DealId(deal_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_for_review_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit_for_review(&DealId(deal_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.review(
        &DealId(deal_id),
        request.decision,
        request.notes,
        request.score_override,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn respond_info_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
    axum::Json(request): axum::Json<InfoResponseRequest>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.respond_to_info(
        &DealId(deal_id),
        &InfoRequestId(request.request_id),
        &request.response,
    ) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn complete_conditions_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.complete_conditions(&DealId(deal_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn appeal_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    axum::Json(request): axum::Json<AppealRequest>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.submit_appeal(&DealId(request.deal_id), &request.reason) {
        Ok(appeal) => (StatusCode::CREATED, axum::Json(appeal)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resolve_appeal_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(appeal_id): Path<String>,
    axum::Json(request): axum::Json<ResolveAppealRequest>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.resolve_appeal(
        &AppealId(appeal_id),
        request.resolution,
        &request.notes,
        request.new_decision,
    ) {
        Ok(appeal) => (StatusCode::OK, axum::Json(appeal)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn stats_handler<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.stats() {
        Ok(stats) => (StatusCode::OK, axum::Json(stats.view())).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: DealServiceError) -> Response {
    let status = match &error {
        DealServiceError::Review(violation) => violation_status(violation),
        DealServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DealServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DealServiceError::Repository(RepositoryError::Unavailable(_))
        | DealServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

/// Malformed input is unprocessable; actions out of step with the deal's
/// current state are conflicts.
fn violation_status(violation: &ReviewViolation) -> StatusCode {
    match violation {
        ReviewViolation::NotOfficerSubmittable(_)
        | ReviewViolation::MissingInfoRequestNotes
        | ReviewViolation::OverrideScoreOutOfRange { .. }
        | ReviewViolation::JustificationTooShort { .. }
        | ReviewViolation::EmptyInfoResponse
        | ReviewViolation::AppealReasonTooShort { .. }
        | ReviewViolation::MissingReplacementDecision(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ReviewViolation::NotReviewable(_)
        | ReviewViolation::NotAwaitingSubmission(_)
        | ReviewViolation::ConditionsNotPending
        | ReviewViolation::InfoRequestNotPending(_)
        | ReviewViolation::AppealRequiresRejection
        | ReviewViolation::AppealAlreadyActive
        | ReviewViolation::RejectionSuperseded(_)
        | ReviewViolation::AppealAlreadyResolved => StatusCode::CONFLICT,
    }
}
