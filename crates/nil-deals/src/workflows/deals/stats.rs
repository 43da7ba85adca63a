use serde::{Deserialize, Serialize};

use super::domain::{ComplianceDecision, DealStatus};
use super::repository::DealRecord;

/// Dashboard counters aggregated over a deal portfolio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total: u64,
    pub pending_review: u64,
    pub not_submitted: u64,
    pub approved: u64,
    pub needs_action: u64,
    pub appealed: u64,
    pub approved_value_cents: u64,
}

impl PortfolioStats {
    /// Deals awaiting compliance attention in any form.
    pub const fn pending(&self) -> u64 {
        self.pending_review + self.not_submitted
    }

    /// Deals blocked on the athlete, appealed or otherwise.
    pub const fn action_required(&self) -> u64 {
        self.needs_action + self.appealed
    }

    pub fn view(&self) -> PortfolioStatsView {
        PortfolioStatsView {
            total: self.total,
            pending_review: self.pending_review,
            not_submitted: self.not_submitted,
            pending: self.pending(),
            approved: self.approved,
            needs_action: self.needs_action,
            appealed: self.appealed,
            action_required: self.action_required(),
            approved_value_cents: self.approved_value_cents,
        }
    }
}

/// Serialized form of the counters plus the derived dashboard rollups.
#[derive(Debug, Clone, Serialize)]
pub struct PortfolioStatsView {
    pub total: u64,
    pub pending_review: u64,
    pub not_submitted: u64,
    pub pending: u64,
    pub approved: u64,
    pub needs_action: u64,
    pub appealed: u64,
    pub action_required: u64,
    pub approved_value_cents: u64,
}

/// Fold a portfolio into the counters the dashboards show.
///
/// An appealed deal counts once under `appealed` and never under
/// `needs_action`; the remaining buckets key off disjoint statuses.
pub fn portfolio_stats(deals: &[DealRecord]) -> PortfolioStats {
    let mut stats = PortfolioStats {
        total: deals.len() as u64,
        ..PortfolioStats::default()
    };

    for deal in deals {
        if deal.has_active_appeal {
            stats.appealed += 1;
        } else if needs_action(deal) {
            stats.needs_action += 1;
        }

        match deal.status {
            DealStatus::PendingReview => stats.pending_review += 1,
            DealStatus::Pending => stats.not_submitted += 1,
            _ => {}
        }

        if counts_as_approved(deal) {
            stats.approved += 1;
            stats.approved_value_cents = stats.approved_value_cents.saturating_add(deal.value_cents);
        }
    }

    stats
}

fn needs_action(deal: &DealRecord) -> bool {
    deal.status == DealStatus::InfoRequested
        || deal.compliance_decision == Some(ComplianceDecision::InfoRequested)
}

fn counts_as_approved(deal: &DealRecord) -> bool {
    match deal.status {
        DealStatus::Approved | DealStatus::ApprovedConditional => true,
        DealStatus::Active => matches!(
            deal.compliance_decision,
            Some(ComplianceDecision::Approved)
                | Some(ComplianceDecision::ApprovedWithConditions)
                | Some(ComplianceDecision::ConditionsCompleted)
        ),
        _ => false,
    }
}
