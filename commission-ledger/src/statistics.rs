//! Per-seller statistics: the active month and all-time figures.

use chrono::NaiveDate;
use serde::Serialize;

use commission_engine::{
    evaluate_with, monthly_totals, CommissionResult, MonthKey, MonthlyData, MonthlyTotals,
    TierTable,
};

use crate::ledger::SalesLedger;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestDay {
    pub date: NaiveDate,
    pub sales: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestMonth {
    pub month: MonthKey,
    pub sales: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthStats {
    pub sales_days: usize,
    pub average_daily_sale: f64,
    pub best_day: Option<BestDay>,
    pub totals: MonthlyTotals,
    pub commission: CommissionResult,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AllTimeStats {
    pub total_sales: f64,
    pub total_commission: f64,
    pub total_months: usize,
    pub average_monthly_sales: f64,
    pub best_month: Option<BestMonth>,
    pub total_entries: usize,
}

/// Figures for one month's bucket.
///
/// The best day is the single entry with the highest individual sale; ties
/// keep the earliest entry recorded.
pub fn month_stats(table: &TierTable, data: &MonthlyData) -> MonthStats {
    let totals = monthly_totals(&data.daily_sales);
    let commission = evaluate_with(
        table,
        totals.total_individual,
        totals.total_store,
        data.store_goal,
    );

    let sales_days = data.daily_sales.len();
    let average_daily_sale = if sales_days > 0 {
        totals.total_individual / sales_days as f64
    } else {
        0.0
    };

    let best_day = data
        .daily_sales
        .iter()
        .filter(|s| s.individual_sale > 0.0)
        .fold(None::<BestDay>, |best, sale| match best {
            Some(b) if b.sales >= sale.individual_sale => Some(b),
            _ => Some(BestDay {
                date: sale.date,
                sales: sale.individual_sale,
            }),
        });

    MonthStats {
        sales_days,
        average_daily_sale,
        best_day,
        totals,
        commission,
    }
}

/// Stats for a seller's month, using an empty bucket when none exists.
pub fn seller_month_stats(ledger: &SalesLedger, seller: &str, month: MonthKey) -> MonthStats {
    let empty = MonthlyData::with_goal(ledger.store_goal(month));
    let data = ledger.month(seller, month).unwrap_or(&empty);
    month_stats(ledger.tier_table(), data)
}

/// Totals across every month the seller has a bucket for.
pub fn all_time_stats(ledger: &SalesLedger, seller: &str) -> AllTimeStats {
    let Some(history) = ledger.history(seller) else {
        return AllTimeStats::default();
    };

    let mut stats = AllTimeStats::default();
    for (month, data) in history {
        let totals = monthly_totals(&data.daily_sales);
        let commission = evaluate_with(
            ledger.tier_table(),
            totals.total_individual,
            totals.total_store,
            data.store_goal,
        );

        stats.total_months += 1;
        stats.total_entries += data.daily_sales.len();
        stats.total_sales += totals.total_individual;
        stats.total_commission += commission.amount;

        let better = stats
            .best_month
            .as_ref()
            .map_or(totals.total_individual > 0.0, |b| totals.total_individual > b.sales);
        if better {
            stats.best_month = Some(BestMonth {
                month: *month,
                sales: totals.total_individual,
            });
        }
    }

    if stats.total_months > 0 {
        stats.average_monthly_sales = stats.total_sales / stats.total_months as f64;
    }
    stats
}
