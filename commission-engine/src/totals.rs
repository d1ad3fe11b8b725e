//! Monthly aggregation of daily sale records.

use serde::Serialize;

use crate::thresholds::CENTS_PER_UNIT;
use crate::types::DailySale;

/// Nearest whole number of cents.
pub fn to_cents(amount: f64) -> i64 {
    (amount * CENTS_PER_UNIT).round() as i64
}

/// `amount` rounded to the nearest cent.
pub fn round_cents(amount: f64) -> f64 {
    to_cents(amount) as f64 / CENTS_PER_UNIT
}

/// Sums of a month's entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct MonthlyTotals {
    pub total_individual: f64,
    pub total_store: f64,
}

/// Sum individual and store sales across `sales`. Empty input yields zeros.
///
/// Entries are summed in whole cents, so the totals are exact cent values.
pub fn monthly_totals<'a, I>(sales: I) -> MonthlyTotals
where
    I: IntoIterator<Item = &'a DailySale>,
{
    let (individual, store) = sales
        .into_iter()
        .fold((0i64, 0i64), |(individual, store), sale| {
            (
                individual + to_cents(sale.individual_sale),
                store + to_cents(sale.store_sale),
            )
        });
    MonthlyTotals {
        total_individual: individual as f64 / CENTS_PER_UNIT,
        total_store: store as f64 / CENTS_PER_UNIT,
    }
}
