//! Commission evaluation.
//!
//! A seller's payout depends on two things: their own monthly total picks a
//! tier rate, and the store's total against its goal decides how much of that
//! tier commission is actually paid:
//!
//! - store at or above goal: 100% of the tier commission
//! - store between 85% and 100% of goal: 70%, the remaining 30% is lost
//! - store below 85% of goal: nothing, the whole tier commission is lost
//!
//! Business conditions (no goal, no sales, total outside the table) are not
//! errors. They produce an ineligible result with a status and a reason the
//! caller can render directly.

use std::fmt;

use serde::Serialize;

use crate::thresholds::{
    FULL_PAYOUT_PERFORMANCE, MINIMUM_STORE_PERFORMANCE, PARTIAL_PAYOUT_MULTIPLIER,
};
use crate::tiers::{CommissionTier, TierLookup, TierTable};
use crate::totals::{round_cents, to_cents};

/// Commission withheld because the store missed its goal.
///
/// Informational only. It is never payable and has no arithmetic with
/// payout amounts; read it through [`Forfeited::amount`] for display.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Forfeited(f64);

impl Forfeited {
    pub const NONE: Forfeited = Forfeited(0.0);

    pub fn amount(self) -> f64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

/// Why a result is or is not eligible.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommissionStatus {
    GoalNotSet,
    NoIndividualSales,
    BelowFirstTier,
    ExceedsMaximumTier,
    StoreBelowMinimum { store_performance: f64 },
    PartialPayout,
    FullPayout,
}

impl CommissionStatus {
    pub fn is_eligible(&self) -> bool {
        matches!(
            self,
            CommissionStatus::PartialPayout | CommissionStatus::FullPayout
        )
    }
}

impl fmt::Display for CommissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommissionStatus::GoalNotSet => write!(f, "Goal Not Set"),
            CommissionStatus::NoIndividualSales => write!(f, "No Individual Sales"),
            CommissionStatus::BelowFirstTier => write!(f, "Below First Tier"),
            CommissionStatus::ExceedsMaximumTier => write!(f, "Exceeds Maximum Tier"),
            CommissionStatus::StoreBelowMinimum { .. } => write!(f, "Store Below Minimum"),
            CommissionStatus::PartialPayout => write!(f, "Partial Payout"),
            CommissionStatus::FullPayout => write!(f, "Full Payout"),
        }
    }
}

/// Outcome of evaluating one seller-month. Derived on demand, never stored.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommissionResult {
    /// Payable commission.
    pub amount: f64,
    /// Tier rate applied, 0 when no tier matched.
    pub rate: f64,
    pub eligible: bool,
    pub status: CommissionStatus,
    pub reason: String,
    pub tier: Option<CommissionTier>,
    /// Store sales / store goal, present whenever a goal is set.
    pub store_performance: Option<f64>,
    pub lost_amount: Forfeited,
}

impl CommissionResult {
    fn ineligible(status: CommissionStatus, reason: String, store_performance: Option<f64>) -> Self {
        Self {
            amount: 0.0,
            rate: 0.0,
            eligible: false,
            status,
            reason,
            tier: None,
            store_performance,
            lost_amount: Forfeited::NONE,
        }
    }
}

/// Evaluate against the reference tier table.
pub fn evaluate(total_individual: f64, total_store: f64, store_goal: f64) -> CommissionResult {
    evaluate_with(TierTable::standard(), total_individual, total_store, store_goal)
}

/// Evaluate against a caller-supplied, already validated table.
///
/// Inputs are rounded to the cent first, and the store thresholds are
/// checked as cent amounts: a store that sold exactly 85% or 100% of its
/// goal meets that threshold regardless of how its total was summed.
pub fn evaluate_with(
    table: &TierTable,
    total_individual: f64,
    total_store: f64,
    store_goal: f64,
) -> CommissionResult {
    debug_assert!(
        total_individual.is_finite() && total_store.is_finite() && store_goal.is_finite(),
        "commission inputs must be finite"
    );
    debug_assert!(total_store >= 0.0, "store total must not be negative");

    let total_individual = round_cents(total_individual);
    let total_store = round_cents(total_store);
    let store_goal = round_cents(store_goal);

    if store_goal <= 0.0 {
        return CommissionResult::ineligible(
            CommissionStatus::GoalNotSet,
            "The store goal has not been set.".to_string(),
            None,
        );
    }

    let store_performance = total_store / store_goal;

    if total_individual <= 0.0 {
        return CommissionResult::ineligible(
            CommissionStatus::NoIndividualSales,
            "No individual sales recorded.".to_string(),
            Some(store_performance),
        );
    }

    let tier = match table.lookup(total_individual) {
        TierLookup::Within { tier, .. } => *tier,
        TierLookup::AboveHighest => {
            return CommissionResult::ineligible(
                CommissionStatus::ExceedsMaximumTier,
                format!(
                    "Your sales ({:.2}) exceed the highest commission tier ({:.2}).",
                    total_individual,
                    table.highest().max
                ),
                Some(store_performance),
            );
        }
        TierLookup::BelowFirst => {
            return CommissionResult::ineligible(
                CommissionStatus::BelowFirstTier,
                format!(
                    "Your sales ({:.2}) did not reach the first commission tier ({:.2}).",
                    total_individual,
                    table.lowest().min
                ),
                Some(store_performance),
            );
        }
    };

    let base_commission = total_individual * tier.rate;

    let store_cents = to_cents(total_store);
    let reaches = |performance: f64| store_cents >= to_cents(store_goal * performance);

    if reaches(FULL_PAYOUT_PERFORMANCE) {
        CommissionResult {
            amount: base_commission,
            rate: tier.rate,
            eligible: true,
            status: CommissionStatus::FullPayout,
            reason: "Store goal met. You receive 100% of your commission.".to_string(),
            tier: Some(tier),
            store_performance: Some(store_performance),
            lost_amount: Forfeited::NONE,
        }
    } else if reaches(MINIMUM_STORE_PERFORMANCE) {
        CommissionResult {
            amount: base_commission * PARTIAL_PAYOUT_MULTIPLIER,
            rate: tier.rate,
            eligible: true,
            status: CommissionStatus::PartialPayout,
            reason: format!(
                "Minimum store goal ({:.0}%) reached. You receive {:.0}% of your commission.",
                MINIMUM_STORE_PERFORMANCE * 100.0,
                PARTIAL_PAYOUT_MULTIPLIER * 100.0
            ),
            tier: Some(tier),
            store_performance: Some(store_performance),
            lost_amount: Forfeited(base_commission * (1.0 - PARTIAL_PAYOUT_MULTIPLIER)),
        }
    } else {
        CommissionResult {
            amount: 0.0,
            rate: tier.rate,
            eligible: false,
            status: CommissionStatus::StoreBelowMinimum { store_performance },
            reason: format!(
                "The store did not reach the {:.0}% minimum ({:.2}%).",
                MINIMUM_STORE_PERFORMANCE * 100.0,
                store_performance * 100.0
            ),
            tier: Some(tier),
            store_performance: Some(store_performance),
            lost_amount: Forfeited(base_commission),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_band_pays_seventy_percent() {
        let r = evaluate(75_000.0, 90_000.0, 100_000.0);
        assert!(r.eligible);
        assert_eq!(r.status, CommissionStatus::PartialPayout);
        assert!((r.rate - 0.0070).abs() < 1e-9);
        // 75,000 x 0.0070 = 525.00, 70% = 367.50, lost 157.50
        assert!((r.amount - 367.50).abs() < 0.01);
        assert!((r.lost_amount.amount() - 157.50).abs() < 0.01);
    }

    #[test]
    fn goal_met_pays_full_commission() {
        let r = evaluate(75_000.0, 100_000.0, 100_000.0);
        assert!(r.eligible);
        assert_eq!(r.status, CommissionStatus::FullPayout);
        assert!((r.amount - 525.0).abs() < 0.01);
        assert!(r.lost_amount.is_zero());
        assert_eq!(r.store_performance, Some(1.0));
    }

    #[test]
    fn store_below_minimum_forfeits_everything() {
        let r = evaluate(75_000.0, 80_000.0, 100_000.0);
        assert!(!r.eligible);
        assert_eq!(r.amount, 0.0);
        assert!((r.lost_amount.amount() - 525.0).abs() < 0.01);
        // The seller qualified individually, so the tier is still reported.
        assert!(r.tier.is_some());
        assert!((r.rate - 0.0070).abs() < 1e-9);
        match r.status {
            CommissionStatus::StoreBelowMinimum { store_performance } => {
                assert!((store_performance - 0.80).abs() < 1e-9)
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn exceeding_table_is_ineligible() {
        let r = evaluate(300_000.0, 150_000.0, 100_000.0);
        assert!(!r.eligible);
        assert_eq!(r.status, CommissionStatus::ExceedsMaximumTier);
        assert!(r.tier.is_none());
        assert_eq!(r.rate, 0.0);
        assert!(r.lost_amount.is_zero());
    }

    #[test]
    fn below_first_tier_is_ineligible() {
        let r = evaluate(50_000.0, 150_000.0, 100_000.0);
        assert!(!r.eligible);
        assert_eq!(r.status, CommissionStatus::BelowFirstTier);
        assert!(r.tier.is_none());
        assert!(r.reason.contains("50000.00"));
    }

    #[test]
    fn missing_goal_short_circuits() {
        let r = evaluate(75_000.0, 100_000.0, 0.0);
        assert!(!r.eligible);
        assert_eq!(r.status, CommissionStatus::GoalNotSet);
        assert_eq!(r.store_performance, None);

        let negative = evaluate(75_000.0, 100_000.0, -10.0);
        assert_eq!(negative.status, CommissionStatus::GoalNotSet);
    }

    #[test]
    fn no_individual_sales_short_circuits() {
        let r = evaluate(0.0, 100_000.0, 100_000.0);
        assert!(!r.eligible);
        assert_eq!(r.status, CommissionStatus::NoIndividualSales);
        assert_eq!(r.amount, 0.0);
        assert!(r.lost_amount.is_zero());
    }

    #[test]
    fn thresholds_are_inclusive() {
        let at_minimum = evaluate(75_000.0, 85_000.0, 100_000.0);
        assert_eq!(at_minimum.status, CommissionStatus::PartialPayout);

        let at_goal = evaluate(75_000.0, 100_000.0, 100_000.0);
        assert_eq!(at_goal.status, CommissionStatus::FullPayout);

        let just_under = evaluate(75_000.0, 84_999.99, 100_000.0);
        assert!(matches!(
            just_under.status,
            CommissionStatus::StoreBelowMinimum { .. }
        ));
    }

    #[test]
    fn totals_summed_from_cent_entries_hit_exact_boundaries() {
        use crate::totals::monthly_totals;
        use crate::types::DailySale;
        use chrono::NaiveDate;

        let entries = |amounts: [(f64, f64); 3]| -> Vec<DailySale> {
            amounts
                .iter()
                .enumerate()
                .map(|(i, (individual, store))| DailySale {
                    id: i as u64 + 1,
                    date: NaiveDate::from_ymd_opt(2024, 7, i as u32 + 1).unwrap(),
                    individual_sale: *individual,
                    store_sale: *store,
                })
                .collect()
        };

        // 60,000.00 individual sits on the top of the 0.60% band.
        let top_of_band = monthly_totals(&entries([
            (19_999.70, 40_000.0),
            (19_999.90, 40_000.0),
            (20_000.40, 40_000.0),
        ]));
        let r = evaluate(top_of_band.total_individual, top_of_band.total_store, 100_000.0);
        assert!((r.rate - 0.0060).abs() < 1e-9);
        assert!((r.amount - 360.0).abs() < 0.01);

        // Store exactly at goal pays in full.
        let at_goal = monthly_totals(&entries([
            (25_000.0, 36_535.77),
            (25_000.0, 38_792.56),
            (25_000.0, 24_671.67),
        ]));
        let r = evaluate(at_goal.total_individual, at_goal.total_store, 100_000.0);
        assert_eq!(r.status, CommissionStatus::FullPayout);

        // Store exactly at 85% pays the partial share.
        let at_minimum = monthly_totals(&entries([
            (25_000.0, 39_701.74),
            (25_000.0, 34_398.00),
            (25_000.0, 10_900.26),
        ]));
        let r = evaluate(at_minimum.total_individual, at_minimum.total_store, 100_000.0);
        assert_eq!(r.status, CommissionStatus::PartialPayout);
        assert!((r.amount - 367.50).abs() < 0.01);
    }

    #[test]
    fn raw_float_drift_is_absorbed() {
        let r = evaluate(60_000.000_000_000_01, 99_999.999_999_999_99, 100_000.0);
        assert_eq!(r.status, CommissionStatus::FullPayout);
        assert!((r.rate - 0.0060).abs() < 1e-9);

        let r = evaluate(75_000.0, 84_999.999_999_999_99, 100_000.0);
        assert_eq!(r.status, CommissionStatus::PartialPayout);
    }

    #[test]
    fn custom_table_is_used() {
        let table = TierTable::new(vec![
            CommissionTier::new(0.01, 1_000.0, 0.10),
            CommissionTier::new(1_000.01, 2_000.0, 0.20),
        ])
        .unwrap();
        let r = evaluate_with(&table, 1_500.0, 10.0, 10.0);
        assert!(r.eligible);
        assert!((r.amount - 300.0).abs() < 0.01);
    }

    #[test]
    fn status_matches_eligibility() {
        for (individual, store) in [(75_000.0, 100_000.0), (75_000.0, 90_000.0), (75_000.0, 10.0)] {
            let r = evaluate(individual, store, 100_000.0);
            assert_eq!(r.status.is_eligible(), r.eligible);
        }
    }

    #[test]
    fn lost_amount_serializes_as_plain_number() {
        let r = evaluate(75_000.0, 90_000.0, 100_000.0);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["lost_amount"].is_number());
        assert_eq!(json["status"]["kind"], "partial_payout");
    }
}
