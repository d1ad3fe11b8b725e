//! Correctness tests for commission-engine.
//!
//! Validates that:
//! 1. Every total maps to at most one tier of the reference table
//! 2. A missing goal or missing individual sales is never eligible
//! 3. Payout never decreases as store sales grow
//! 4. The documented worked examples hold end to end
//! 5. Determinism: same inputs always produce the same outputs

use chrono::NaiveDate;

use commission_engine::{
    evaluate, insights, monthly_totals, remaining_business_days, CommissionStatus, DailySale,
    MonthKey, TierLookup, TierTable,
};

fn sale(id: u64, day: u32, individual: f64, store: f64) -> DailySale {
    DailySale {
        id,
        date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
        individual_sale: individual,
        store_sale: store,
    }
}

/// A month of weekday entries for one seller.
fn july_entries() -> Vec<DailySale> {
    vec![
        sale(1, 1, 4_000.0, 5_000.0),
        sale(2, 2, 3_500.0, 4_800.0),
        sale(3, 3, 5_200.0, 6_100.0),
        sale(4, 4, 6_300.0, 7_900.0),
        sale(5, 5, 7_000.0, 8_200.0),
        sale(6, 8, 9_000.0, 10_000.0),
        sale(7, 9, 10_000.0, 12_000.0),
        sale(8, 10, 12_000.0, 14_000.0),
        sale(9, 11, 8_000.0, 11_000.0),
        sale(10, 12, 10_000.0, 11_000.0),
    ]
}

// ---------------------------------------------------------------------------
// Tier uniqueness
// ---------------------------------------------------------------------------

#[test]
fn every_total_matches_at_most_one_tier() {
    let table = TierTable::standard();
    let mut total = 0.0;
    while total <= 250_000.0 {
        let matches = table.tiers().iter().filter(|t| t.contains(total)).count();
        assert!(matches <= 1, "{} matched {} tiers", total, matches);
        total += 123.45;
    }
}

#[test]
fn lookup_agrees_with_range_membership() {
    let table = TierTable::standard();
    for tier in table.tiers() {
        for total in [tier.min, (tier.min + tier.max) / 2.0, tier.max] {
            match table.lookup(total) {
                TierLookup::Within { tier: found, .. } => assert_eq!(found, tier),
                other => panic!("{} resolved to {:?}", total, other),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Short circuits
// ---------------------------------------------------------------------------

#[test]
fn zero_goal_is_never_eligible() {
    for individual in [0.0, 55_000.0, 75_000.0, 199_999.0, 400_000.0] {
        for store in [0.0, 50_000.0, 1_000_000.0] {
            let r = evaluate(individual, store, 0.0);
            assert!(!r.eligible);
            assert_eq!(r.status, CommissionStatus::GoalNotSet);
        }
    }
}

#[test]
fn zero_individual_sales_are_never_eligible() {
    for store in [0.0, 50_000.0, 100_000.0, 1_000_000.0] {
        for goal in [1.0, 100_000.0, 5_000_000.0] {
            let r = evaluate(0.0, store, goal);
            assert!(!r.eligible);
            assert_eq!(r.status, CommissionStatus::NoIndividualSales);
        }
    }
}

// ---------------------------------------------------------------------------
// Monotonicity
// ---------------------------------------------------------------------------

#[test]
fn amount_is_non_decreasing_in_store_sales() {
    let goal = 100_000.0;
    for individual in [40_000.0, 55_000.0, 75_000.0, 150_000.0, 210_000.0] {
        let mut previous = 0.0;
        let mut store = 0.0;
        while store <= 150_000.0 {
            let r = evaluate(individual, store, goal);
            assert!(
                r.amount >= previous,
                "amount dropped from {} to {} at store {}",
                previous,
                r.amount,
                store
            );
            previous = r.amount;
            store += 500.0;
        }
    }
}

#[test]
fn payout_plus_forfeit_is_the_tier_commission() {
    for store in [80_000.0, 85_000.0, 92_000.0, 100_000.0, 130_000.0] {
        let r = evaluate(75_000.0, store, 100_000.0);
        let total = r.amount + r.lost_amount.amount();
        assert!((total - 525.0).abs() < 0.01, "store {} gave {}", store, total);
    }
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[test]
fn month_of_entries_end_to_end() {
    let entries = july_entries();
    let totals = monthly_totals(&entries);
    assert!((totals.total_individual - 75_000.0).abs() < 0.01);
    assert!((totals.total_store - 90_000.0).abs() < 0.01);

    let r = evaluate(totals.total_individual, totals.total_store, 100_000.0);
    assert!(r.eligible);
    assert!((r.amount - 367.50).abs() < 0.01);
    assert!((r.lost_amount.amount() - 157.50).abs() < 0.01);

    let tips = insights(totals.total_individual);
    assert!((tips.amount_to_next_tier - 5_000.01).abs() < 0.001);
}

#[test]
fn business_days_for_mid_july() {
    let month: MonthKey = "2024-07".parse().unwrap();
    let today = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    assert_eq!(remaining_business_days(month, today), 13);
}

// ---------------------------------------------------------------------------
// Determinism
// ---------------------------------------------------------------------------

#[test]
fn evaluation_is_deterministic() {
    let a = evaluate(123_456.78, 95_000.0, 100_000.0);
    let b = evaluate(123_456.78, 95_000.0, 100_000.0);
    assert_eq!(a, b);
}
