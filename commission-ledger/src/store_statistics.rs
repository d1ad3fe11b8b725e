//! Store-wide statistics across all sellers.
//!
//! Every seller records the store's sales for the days they work, so the
//! same day appears once per seller. The store total for a month counts each
//! date once, taking the highest figure any seller reported for it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use commission_engine::thresholds::CENTS_PER_UNIT;
use commission_engine::{evaluate_with, monthly_totals, to_cents, MonthKey};

use crate::ledger::SalesLedger;
use crate::statistics::BestMonth;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoreMonth {
    pub month: MonthKey,
    pub store_goal: f64,
    pub total_store: f64,
    pub total_individual: f64,
    pub total_commission: f64,
    pub active_sellers: usize,
    pub days_with_sales: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StoreStatistics {
    /// Newest month first.
    pub months: Vec<StoreMonth>,
    pub grand_total_store_sales: f64,
    pub grand_total_individual_sales: f64,
    pub grand_total_commission: f64,
    pub best_month: Option<BestMonth>,
}

/// Highest store figure reported for each date of `month`.
pub fn store_sales_by_day(ledger: &SalesLedger, month: MonthKey) -> BTreeMap<NaiveDate, f64> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for (_, history) in ledger.sellers() {
        let Some(data) = history.get(&month) else {
            continue;
        };
        for sale in &data.daily_sales {
            let day = by_day.entry(sale.date).or_insert(0.0);
            *day = day.max(sale.store_sale);
        }
    }
    by_day
}

/// Sum of the per-day store figures, in whole cents.
pub fn store_total(by_day: &BTreeMap<NaiveDate, f64>) -> f64 {
    let cents: i64 = by_day.values().map(|amount| to_cents(*amount)).sum();
    cents as f64 / CENTS_PER_UNIT
}

/// Aggregate one month across sellers.
///
/// Each active seller's commission is evaluated against the de-duplicated
/// store total and the store-wide goal, not the figures in their own bucket.
pub fn store_month(ledger: &SalesLedger, month: MonthKey) -> StoreMonth {
    let by_day = store_sales_by_day(ledger, month);
    let total_store = store_total(&by_day);
    let store_goal = ledger.store_goal(month);

    let mut result = StoreMonth {
        month,
        store_goal,
        total_store,
        total_individual: 0.0,
        total_commission: 0.0,
        active_sellers: 0,
        days_with_sales: by_day.len(),
    };

    for (_, history) in ledger.sellers() {
        let Some(data) = history.get(&month) else {
            continue;
        };
        if data.daily_sales.is_empty() {
            continue;
        }
        let totals = monthly_totals(&data.daily_sales);
        let commission = evaluate_with(
            ledger.tier_table(),
            totals.total_individual,
            total_store,
            store_goal,
        );
        result.total_individual += totals.total_individual;
        result.total_commission += commission.amount;
        result.active_sellers += 1;
    }

    result
}

pub fn store_statistics(ledger: &SalesLedger) -> StoreStatistics {
    let mut stats = StoreStatistics::default();

    for month in ledger.active_months().into_iter().rev() {
        let aggregate = store_month(ledger, month);
        stats.grand_total_store_sales += aggregate.total_store;
        stats.grand_total_individual_sales += aggregate.total_individual;
        stats.grand_total_commission += aggregate.total_commission;

        let better = stats
            .best_month
            .as_ref()
            .map_or(aggregate.total_store > 0.0, |b| aggregate.total_store > b.sales);
        if better {
            stats.best_month = Some(BestMonth {
                month,
                sales: aggregate.total_store,
            });
        }
        stats.months.push(aggregate);
    }

    stats
}
