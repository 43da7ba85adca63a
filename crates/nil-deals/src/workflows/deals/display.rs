use serde::{Deserialize, Serialize};

use super::domain::{ComplianceDecision, DealStatus};

/// Raw deal fields as dashboards receive them from storage.
///
/// Values are carried as strings on purpose: the resolver is the tolerant
/// boundary between persisted rows and the typed domain, and it must render
/// something sensible for rows the current code no longer recognizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealSnapshot {
    pub status: String,
    #[serde(default)]
    pub compliance_decision: Option<String>,
    #[serde(default)]
    pub has_active_appeal: bool,
}

/// Visual treatment a badge should receive; rendering adapters map this to
/// concrete style tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualCategory {
    Neutral,
    Positive,
    Warning,
    Negative,
    Appeal,
}

impl VisualCategory {
    pub const fn label(self) -> &'static str {
        match self {
            VisualCategory::Neutral => "neutral",
            VisualCategory::Positive => "positive",
            VisualCategory::Warning => "warning",
            VisualCategory::Negative => "negative",
            VisualCategory::Appeal => "appeal",
        }
    }
}

/// Presentation-ready classification of a deal, derived on demand and never
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayStatus {
    pub label: &'static str,
    pub friendly_label: &'static str,
    pub category: VisualCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<&'static str>,
}

const fn known(
    label: &'static str,
    friendly_label: &'static str,
    category: VisualCategory,
) -> DisplayStatus {
    DisplayStatus {
        label,
        friendly_label,
        category,
        tooltip: Some(label),
    }
}

/// Fallback for combinations no rule recognizes. The only display state
/// without a tooltip.
pub const UNKNOWN_DISPLAY: DisplayStatus = DisplayStatus {
    label: "unknown",
    friendly_label: "Unknown",
    category: VisualCategory::Neutral,
    tooltip: None,
};

/// Resolve how a deal should be presented to athletes and officers.
///
/// Rules apply in priority order: an active appeal wins outright (the outcome
/// is in flux), then a recognized decision (the most recent authoritative
/// judgment), then the lifecycle status. Unknown decision strings fall
/// through to the status rule; an unknown status lands on the fallback.
/// Total and side-effect-free: a corrupt row must still render.
pub fn resolve_display_status(snapshot: &DealSnapshot) -> DisplayStatus {
    if snapshot.has_active_appeal {
        return known("under_appeal", "Under Appeal", VisualCategory::Appeal);
    }

    if let Some(decision) = snapshot
        .compliance_decision
        .as_deref()
        .and_then(ComplianceDecision::parse)
    {
        return display_for_decision(decision);
    }

    match DealStatus::parse(&snapshot.status) {
        Some(status) => display_for_status(status),
        None => UNKNOWN_DISPLAY,
    }
}

const fn display_for_decision(decision: ComplianceDecision) -> DisplayStatus {
    match decision {
        ComplianceDecision::Approved => known("approved", "Compliant", VisualCategory::Positive),
        ComplianceDecision::ApprovedWithConditions => known(
            "approved_with_conditions",
            "Approved with Conditions",
            VisualCategory::Warning,
        ),
        ComplianceDecision::Rejected => {
            known("rejected", "Non-Compliant", VisualCategory::Negative)
        }
        ComplianceDecision::InfoRequested => {
            known("info_requested", "Needs Changes", VisualCategory::Warning)
        }
        ComplianceDecision::ResponseSubmitted => known(
            "response_submitted",
            "Awaiting Re-Review",
            VisualCategory::Neutral,
        ),
        ComplianceDecision::ConditionsCompleted => known(
            "conditions_completed",
            "Awaiting Final Approval",
            VisualCategory::Neutral,
        ),
    }
}

const fn display_for_status(status: DealStatus) -> DisplayStatus {
    match status {
        DealStatus::Pending => known("pending", "Pending Review", VisualCategory::Neutral),
        DealStatus::PendingReview => {
            known("pending_review", "Pending Review", VisualCategory::Neutral)
        }
        DealStatus::Active => known("active", "Active", VisualCategory::Positive),
        DealStatus::Approved => known("approved", "Compliant", VisualCategory::Positive),
        DealStatus::ApprovedConditional => known(
            "approved_conditional",
            "Approved with Conditions",
            VisualCategory::Warning,
        ),
        DealStatus::Rejected => known("rejected", "Non-Compliant", VisualCategory::Negative),
        DealStatus::InfoRequested => {
            known("info_requested", "Needs Changes", VisualCategory::Warning)
        }
        DealStatus::Completed => known("completed", "Completed", VisualCategory::Neutral),
        DealStatus::Cancelled => known("cancelled", "Cancelled", VisualCategory::Negative),
    }
}
