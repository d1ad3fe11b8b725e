//! Tier progress insights: where a seller sits in the table and how far the
//! next band is.

use serde::Serialize;

use crate::tiers::{CommissionTier, TierLookup, TierTable};
use crate::totals::round_cents;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierInsights {
    pub is_on_highest_tier: bool,
    pub current_tier: Option<CommissionTier>,
    pub next_tier: Option<CommissionTier>,
    /// Sales still needed to enter `next_tier`, 0 when there is none.
    pub amount_to_next_tier: f64,
}

/// Insights against the reference tier table.
pub fn insights(total_individual: f64) -> TierInsights {
    insights_with(TierTable::standard(), total_individual)
}

pub fn insights_with(table: &TierTable, total_individual: f64) -> TierInsights {
    let total_individual = round_cents(total_individual);
    match table.lookup(total_individual) {
        TierLookup::AboveHighest => TierInsights {
            is_on_highest_tier: true,
            current_tier: None,
            next_tier: None,
            amount_to_next_tier: 0.0,
        },
        TierLookup::BelowFirst => {
            let lowest = *table.lowest();
            TierInsights {
                is_on_highest_tier: false,
                current_tier: None,
                next_tier: Some(lowest),
                amount_to_next_tier: (lowest.min - total_individual).max(0.0),
            }
        }
        TierLookup::Within { index, tier } => match table.get(index + 1) {
            Some(next) => TierInsights {
                is_on_highest_tier: false,
                current_tier: Some(*tier),
                next_tier: Some(*next),
                amount_to_next_tier: (next.min - total_individual).max(0.0),
            },
            None => TierInsights {
                is_on_highest_tier: true,
                current_tier: Some(*tier),
                next_tier: None,
                amount_to_next_tier: 0.0,
            },
        },
    }
}
