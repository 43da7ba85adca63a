use super::domain::{AppealResolution, ComplianceDecision, DealStatus, InfoRequestStatus};
use super::scoring::ScoreOverride;

/// Validation errors raised by the review guard.
#[derive(Debug, thiserror::Error)]
pub enum ReviewViolation {
    #[error("decision '{0}' cannot be submitted by a reviewer")]
    NotOfficerSubmittable(&'static str),
    #[error("deal in status '{0}' is not open for review")]
    NotReviewable(&'static str),
    #[error("reviewer notes are required when requesting more information")]
    MissingInfoRequestNotes,
    #[error("override score must be at most {max}, found {found}")]
    OverrideScoreOutOfRange { max: u8, found: u8 },
    #[error("override justification must be at least {min} characters, found {found}")]
    JustificationTooShort { min: usize, found: usize },
    #[error("deal in status '{0}' is not awaiting submission")]
    NotAwaitingSubmission(&'static str),
    #[error("deal has no conditional approval to complete")]
    ConditionsNotPending,
    #[error("a response is required")]
    EmptyInfoResponse,
    #[error("information request is '{0}', not pending")]
    InfoRequestNotPending(&'static str),
    #[error("only rejected deals can be appealed")]
    AppealRequiresRejection,
    #[error("an appeal is already active for this deal")]
    AppealAlreadyActive,
    #[error("the rejection was superseded by status '{0}'")]
    RejectionSuperseded(&'static str),
    #[error("appeal reason must be at least {min} characters, found {found}")]
    AppealReasonTooShort { min: usize, found: usize },
    #[error("resolution '{0}' requires a replacement decision")]
    MissingReplacementDecision(&'static str),
    #[error("appeal is already resolved")]
    AppealAlreadyResolved,
}

const DEFAULT_MIN_JUSTIFICATION_CHARS: usize = 50;
const MAX_COMPLIANCE_SCORE: u8 = 100;

/// Policy dials backing review and appeal validation.
#[derive(Debug, Clone)]
pub struct ReviewPolicy {
    min_justification_chars: usize,
}

impl ReviewPolicy {
    pub fn new(min_justification_chars: usize) -> Self {
        let sanitized = if min_justification_chars == 0 {
            DEFAULT_MIN_JUSTIFICATION_CHARS
        } else {
            min_justification_chars
        };

        Self {
            min_justification_chars: sanitized,
        }
    }

    /// Minimum length for appeal reasons and score-override justifications.
    pub fn min_justification_chars(&self) -> usize {
        self.min_justification_chars
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_JUSTIFICATION_CHARS)
    }
}

/// Guard validating officer and athlete actions before any record mutation.
#[derive(Debug, Clone)]
pub struct ReviewGuard {
    policy: ReviewPolicy,
}

impl Default for ReviewGuard {
    fn default() -> Self {
        Self::with_policy(ReviewPolicy::default())
    }
}

impl ReviewGuard {
    pub fn with_policy(policy: ReviewPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ReviewPolicy {
        &self.policy
    }

    /// Validate an officer decision against the deal's current state.
    pub fn check_review(
        &self,
        status: DealStatus,
        decision: ComplianceDecision,
        notes: Option<&str>,
        score_override: Option<&ScoreOverride>,
    ) -> Result<(), ReviewViolation> {
        if !decision.is_officer_submittable() {
            return Err(ReviewViolation::NotOfficerSubmittable(decision.label()));
        }

        if !status.is_reviewable() {
            return Err(ReviewViolation::NotReviewable(status.label()));
        }

        if decision == ComplianceDecision::InfoRequested
            && notes.map_or(true, |value| value.trim().is_empty())
        {
            return Err(ReviewViolation::MissingInfoRequestNotes);
        }

        if let Some(override_request) = score_override {
            self.check_score_override(override_request)?;
        }

        Ok(())
    }

    pub fn check_score_override(
        &self,
        override_request: &ScoreOverride,
    ) -> Result<(), ReviewViolation> {
        if override_request.score > MAX_COMPLIANCE_SCORE {
            return Err(ReviewViolation::OverrideScoreOutOfRange {
                max: MAX_COMPLIANCE_SCORE,
                found: override_request.score,
            });
        }

        let found = override_request.justification.trim().chars().count();
        if found < self.policy.min_justification_chars {
            return Err(ReviewViolation::JustificationTooShort {
                min: self.policy.min_justification_chars,
                found,
            });
        }

        Ok(())
    }

    /// A deal can only enter the officer queue from `pending`.
    pub fn check_submission(&self, status: DealStatus) -> Result<(), ReviewViolation> {
        if status != DealStatus::Pending {
            return Err(ReviewViolation::NotAwaitingSubmission(status.label()));
        }

        Ok(())
    }

    /// Conditions can only be marked met on a conditionally approved deal.
    pub fn check_condition_completion(
        &self,
        decision: Option<ComplianceDecision>,
    ) -> Result<(), ReviewViolation> {
        if decision != Some(ComplianceDecision::ApprovedWithConditions) {
            return Err(ReviewViolation::ConditionsNotPending);
        }

        Ok(())
    }

    pub fn check_info_response(
        &self,
        request_status: InfoRequestStatus,
        response: &str,
    ) -> Result<(), ReviewViolation> {
        if response.trim().is_empty() {
            return Err(ReviewViolation::EmptyInfoResponse);
        }

        if request_status != InfoRequestStatus::Pending {
            return Err(ReviewViolation::InfoRequestNotPending(
                request_status.label(),
            ));
        }

        Ok(())
    }

    /// Appeals are open to rejected deals whose rejection is still current
    /// and which have no appeal in flight.
    pub fn check_appeal(
        &self,
        status: DealStatus,
        decision: Option<ComplianceDecision>,
        has_active_appeal: bool,
        reason: &str,
    ) -> Result<(), ReviewViolation> {
        if decision != Some(ComplianceDecision::Rejected) {
            return Err(ReviewViolation::AppealRequiresRejection);
        }

        if has_active_appeal {
            return Err(ReviewViolation::AppealAlreadyActive);
        }

        if status != DealStatus::Rejected {
            return Err(ReviewViolation::RejectionSuperseded(status.label()));
        }

        let found = reason.trim().chars().count();
        if found < self.policy.min_justification_chars {
            return Err(ReviewViolation::AppealReasonTooShort {
                min: self.policy.min_justification_chars,
                found,
            });
        }

        Ok(())
    }

    pub fn check_appeal_resolution(
        &self,
        resolution: AppealResolution,
        new_decision: Option<ComplianceDecision>,
    ) -> Result<(), ReviewViolation> {
        if !resolution.requires_new_decision() {
            return Ok(());
        }

        match new_decision {
            None => Err(ReviewViolation::MissingReplacementDecision(
                resolution.label(),
            )),
            Some(decision) if !decision.is_officer_submittable() => {
                Err(ReviewViolation::NotOfficerSubmittable(decision.label()))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Lifecycle status a decision moves a deal into. System-set decisions
/// return the deal to the officer queue.
pub const fn status_for_decision(decision: ComplianceDecision) -> DealStatus {
    match decision {
        ComplianceDecision::Approved => DealStatus::Approved,
        ComplianceDecision::ApprovedWithConditions => DealStatus::ApprovedConditional,
        ComplianceDecision::Rejected => DealStatus::Rejected,
        ComplianceDecision::InfoRequested => DealStatus::InfoRequested,
        ComplianceDecision::ResponseSubmitted | ComplianceDecision::ConditionsCompleted => {
            DealStatus::PendingReview
        }
    }
}
