use serde::{Deserialize, Serialize};

/// Identifier wrapper for submitted deals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Identifier wrapper for information requests.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InfoRequestId(pub String);

/// Identifier wrapper for appeals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AppealId(pub String);

/// Athlete-provided snapshot used to open a deal for compliance tracking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSubmission {
    pub athlete_id: String,
    pub athlete_name: String,
    pub counterparty: String,
    pub description: String,
    pub value_cents: u64,
}

/// Lifecycle state persisted on every deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealStatus {
    Pending,
    PendingReview,
    Active,
    Approved,
    ApprovedConditional,
    Rejected,
    InfoRequested,
    Completed,
    Cancelled,
}

impl DealStatus {
    pub const fn label(self) -> &'static str {
        match self {
            DealStatus::Pending => "pending",
            DealStatus::PendingReview => "pending_review",
            DealStatus::Active => "active",
            DealStatus::Approved => "approved",
            DealStatus::ApprovedConditional => "approved_conditional",
            DealStatus::Rejected => "rejected",
            DealStatus::InfoRequested => "info_requested",
            DealStatus::Completed => "completed",
            DealStatus::Cancelled => "cancelled",
        }
    }

    /// Lenient parse for values arriving from storage; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "pending_review" => Some(Self::PendingReview),
            "active" => Some(Self::Active),
            "approved" => Some(Self::Approved),
            "approved_conditional" => Some(Self::ApprovedConditional),
            "rejected" => Some(Self::Rejected),
            "info_requested" => Some(Self::InfoRequested),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether an officer may record a decision while the deal sits in this status.
    pub const fn is_reviewable(self) -> bool {
        matches!(
            self,
            DealStatus::Pending | DealStatus::PendingReview | DealStatus::InfoRequested
        )
    }
}

/// Outcome of a compliance review, absent until a deal has been reviewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceDecision {
    Approved,
    ApprovedWithConditions,
    Rejected,
    InfoRequested,
    ResponseSubmitted,
    ConditionsCompleted,
}

impl ComplianceDecision {
    pub const fn label(self) -> &'static str {
        match self {
            ComplianceDecision::Approved => "approved",
            ComplianceDecision::ApprovedWithConditions => "approved_with_conditions",
            ComplianceDecision::Rejected => "rejected",
            ComplianceDecision::InfoRequested => "info_requested",
            ComplianceDecision::ResponseSubmitted => "response_submitted",
            ComplianceDecision::ConditionsCompleted => "conditions_completed",
        }
    }

    /// Lenient parse for values arriving from storage; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "approved" => Some(Self::Approved),
            "approved_with_conditions" => Some(Self::ApprovedWithConditions),
            "rejected" => Some(Self::Rejected),
            "info_requested" => Some(Self::InfoRequested),
            "response_submitted" => Some(Self::ResponseSubmitted),
            "conditions_completed" => Some(Self::ConditionsCompleted),
            _ => None,
        }
    }

    /// `response_submitted` and `conditions_completed` are system-set and
    /// cannot be recorded directly by a reviewer.
    pub const fn is_officer_submittable(self) -> bool {
        matches!(
            self,
            ComplianceDecision::Approved
                | ComplianceDecision::ApprovedWithConditions
                | ComplianceDecision::Rejected
                | ComplianceDecision::InfoRequested
        )
    }
}

/// Lifecycle of a submitted appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealStatus {
    Submitted,
    UnderReview,
    Resolved,
}

impl AppealStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AppealStatus::Submitted => "submitted",
            AppealStatus::UnderReview => "under_review",
            AppealStatus::Resolved => "resolved",
        }
    }
}

/// How an officer closed out an appeal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppealResolution {
    Upheld,
    Modified,
    Reversed,
}

impl AppealResolution {
    pub const fn label(self) -> &'static str {
        match self {
            AppealResolution::Upheld => "upheld",
            AppealResolution::Modified => "modified",
            AppealResolution::Reversed => "reversed",
        }
    }

    /// Modified and reversed resolutions replace the original decision.
    pub const fn requires_new_decision(self) -> bool {
        matches!(self, AppealResolution::Modified | AppealResolution::Reversed)
    }
}

/// Lifecycle of a reviewer's information request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfoRequestStatus {
    Pending,
    Responded,
    Resolved,
}

impl InfoRequestStatus {
    pub const fn label(self) -> &'static str {
        match self {
            InfoRequestStatus::Pending => "pending",
            InfoRequestStatus::Responded => "responded",
            InfoRequestStatus::Resolved => "resolved",
        }
    }
}
