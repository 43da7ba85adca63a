//! Deal compliance workflows: intake, officer review, information requests,
//! appeals, score banding, portfolio statistics, and the display-status
//! resolution every dashboard badge is rendered from.

pub mod display;
pub mod domain;
pub mod repository;
pub mod review;
pub mod router;
pub mod scoring;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use display::{
    resolve_display_status, DealSnapshot, DisplayStatus, VisualCategory, UNKNOWN_DISPLAY,
};
pub use domain::{
    AppealId, AppealResolution, AppealStatus, ComplianceDecision, DealId, DealStatus,
    DealSubmission, InfoRequestId, InfoRequestStatus,
};
pub use repository::{
    Appeal, DealRecord, DealRepository, DealStatusView, DealSummaryView, DealView, InfoRequest,
    NotificationError, NotificationEvent, NotificationPublisher, RepositoryError,
};
pub use review::{status_for_decision, ReviewGuard, ReviewPolicy, ReviewViolation};
pub use router::compliance_router;
pub use scoring::{tier_for_decision, tier_for_score, ScoreOverride, ScoreTier};
pub use service::{DealComplianceService, DealServiceError};
pub use stats::{portfolio_stats, PortfolioStats, PortfolioStatsView};
