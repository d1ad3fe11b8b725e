//! Month-by-month history for one seller, newest month first.

use serde::Serialize;

use commission_engine::{evaluate_with, monthly_totals, CommissionResult, MonthKey, MonthlyTotals};

use crate::ledger::SalesLedger;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthSummary {
    pub month: MonthKey,
    pub store_goal: f64,
    pub totals: MonthlyTotals,
    pub commission: CommissionResult,
    /// Store sales as a share of the goal, 0 without a goal.
    pub store_goal_percentage: f64,
    /// The seller's share of the store's sales, 0 when the store sold nothing.
    pub contribution_percentage: f64,
    pub entries: usize,
}

/// Summaries for every month the seller has a bucket for.
pub fn month_history(ledger: &SalesLedger, seller: &str) -> Vec<MonthSummary> {
    let Some(history) = ledger.history(seller) else {
        return Vec::new();
    };

    history
        .iter()
        .rev()
        .map(|(month, data)| {
            let totals = monthly_totals(&data.daily_sales);
            let commission = evaluate_with(
                ledger.tier_table(),
                totals.total_individual,
                totals.total_store,
                data.store_goal,
            );
            MonthSummary {
                month: *month,
                store_goal: data.store_goal,
                totals,
                commission,
                store_goal_percentage: percentage(totals.total_store, data.store_goal),
                contribution_percentage: percentage(totals.total_individual, totals.total_store),
                entries: data.daily_sales.len(),
            }
        })
        .collect()
}

pub(crate) fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}
