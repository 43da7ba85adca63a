use crate::infra::{badge_style, deserialize_optional_date, AppState};
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use chrono::NaiveDate;
use nil_deals::error::AppError;
use nil_deals::workflows::deals::{
    compliance_router, DealComplianceService, DealId, DealRepository, DealServiceError,
    NotificationPublisher, RepositoryError,
};
use nil_deals::workflows::roster::{RosterOptions, RosterReport, RosterValidator};
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Full HTTP surface: the library's compliance routes plus the operational
/// endpoints and the API-owned roster and badge views.
pub(crate) fn with_compliance_routes<R, N>(
    service: Arc<DealComplianceService<R, N>>,
) -> axum::Router
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let badge_routes = axum::Router::new()
        .route(
            "/api/v1/compliance/deals/:deal_id/badge",
            axum::routing::get(badge_endpoint::<R, N>),
        )
        .with_state(service.clone());

    compliance_router(service)
        .merge(badge_routes)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/compliance/roster/validate",
            axum::routing::post(roster_validate_endpoint),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Display status plus the concrete style tokens a web badge needs.
pub(crate) async fn badge_endpoint<R, N>(
    State(service): State<Arc<DealComplianceService<R, N>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.get(&DealId(deal_id)) {
        Ok(record) => {
            let display = record.display_status();
            let badge = badge_style(display.category);
            let payload = json!({
                "deal_id": record.deal_id,
                "display": display,
                "badge": badge,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => {
            let status = match &error {
                DealServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": error.to_string() }))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterValidateRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) default_school: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn roster_validate_endpoint(
    Json(payload): Json<RosterValidateRequest>,
) -> Result<Json<RosterReport>, AppError> {
    let RosterValidateRequest {
        csv,
        default_school,
        today,
    } = payload;

    let options = RosterOptions {
        default_school,
        today,
    };
    let report = RosterValidator::from_reader(Cursor::new(csv.into_bytes()), &options)?;
    Ok(Json(report))
}
