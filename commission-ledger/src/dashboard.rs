//! Month dashboards: the manager's store view and a seller's own summary.

use chrono::NaiveDate;
use serde::Serialize;

use commission_engine::{
    evaluate_with, insights_with, monthly_totals, remaining_business_days, GoalPace, MonthKey,
    TierInsights,
};

use crate::history::percentage;
use crate::ledger::SalesLedger;
use crate::leaderboard::{LeaderboardEntry, TopSellers};
use crate::store_statistics::{store_sales_by_day, store_total};
use crate::types::SellerMonth;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ManagerDashboard {
    pub month: MonthKey,
    pub pace: GoalPace,
    pub active_sellers: usize,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SellerSummary {
    pub summary: SellerMonth,
    pub insights: TierInsights,
    /// Pace computed from the store figures in the seller's own bucket.
    pub pace: GoalPace,
}

/// Store-wide view of `month` as seen on `today`.
///
/// `top` limits the leaderboard length; `None` lists every active seller.
pub fn manager_dashboard(
    ledger: &SalesLedger,
    month: MonthKey,
    today: NaiveDate,
    top: Option<usize>,
) -> ManagerDashboard {
    let by_day = store_sales_by_day(ledger, month);
    let total_store = store_total(&by_day);
    let store_goal = ledger.store_goal(month);

    let pace = GoalPace::project(
        store_goal,
        total_store,
        by_day.len(),
        remaining_business_days(month, today),
    );

    let entries: Vec<LeaderboardEntry> = ledger
        .sellers()
        .filter_map(|(seller, history)| {
            let data = history.get(&month)?;
            if data.daily_sales.is_empty() {
                return None;
            }
            let totals = monthly_totals(&data.daily_sales);
            let commission = evaluate_with(
                ledger.tier_table(),
                totals.total_individual,
                total_store,
                store_goal,
            );
            Some(LeaderboardEntry {
                rank: 0,
                seller: seller.clone(),
                total_individual: totals.total_individual,
                commission: commission.amount,
                eligible: commission.eligible,
                share_of_store: percentage(totals.total_individual, total_store),
            })
        })
        .collect();

    let active_sellers = entries.len();
    let leaderboard = TopSellers::new(top).rank(entries);

    log::info!(
        "dashboard month={} store_total={:.2} goal={:.2} sellers={}",
        month,
        total_store,
        store_goal,
        active_sellers
    );

    ManagerDashboard {
        month,
        pace,
        active_sellers,
        leaderboard,
    }
}

/// A seller's view of `month`: commission, tier progress and store pace.
pub fn seller_summary(
    ledger: &SalesLedger,
    seller: &str,
    month: MonthKey,
    today: NaiveDate,
) -> SellerSummary {
    let summary = ledger.commission_for(seller, month);
    let insights = insights_with(ledger.tier_table(), summary.totals.total_individual);

    let days_with_sales = ledger
        .month(seller, month)
        .map_or(0, |data| data.daily_sales.len());
    let pace = GoalPace::project(
        summary.store_goal,
        summary.totals.total_store,
        days_with_sales,
        remaining_business_days(month, today),
    );

    SellerSummary {
        summary,
        insights,
        pace,
    }
}
