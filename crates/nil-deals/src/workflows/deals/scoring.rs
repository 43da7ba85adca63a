use serde::{Deserialize, Serialize};

use super::domain::ComplianceDecision;

/// Banded presentation of a 0-100 compliance score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTier {
    Green,
    Yellow,
    Red,
}

impl ScoreTier {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreTier::Green => "green",
            ScoreTier::Yellow => "yellow",
            ScoreTier::Red => "red",
        }
    }
}

pub const GREEN_THRESHOLD: u8 = 80;
pub const YELLOW_THRESHOLD: u8 = 50;

/// Band an externally produced compliance score.
pub const fn tier_for_score(score: u8) -> ScoreTier {
    if score >= GREEN_THRESHOLD {
        ScoreTier::Green
    } else if score >= YELLOW_THRESHOLD {
        ScoreTier::Yellow
    } else {
        ScoreTier::Red
    }
}

/// Tier implied by a review decision when no numeric score is available.
/// System-set decisions band yellow while the deal remains under active
/// review.
pub const fn tier_for_decision(decision: ComplianceDecision) -> ScoreTier {
    match decision {
        ComplianceDecision::Approved => ScoreTier::Green,
        ComplianceDecision::Rejected => ScoreTier::Red,
        ComplianceDecision::ApprovedWithConditions
        | ComplianceDecision::InfoRequested
        | ComplianceDecision::ResponseSubmitted
        | ComplianceDecision::ConditionsCompleted => ScoreTier::Yellow,
    }
}

/// Officer-supplied replacement for an automated score. Validated by the
/// review guard before it touches a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOverride {
    pub score: u8,
    pub justification: String,
}
