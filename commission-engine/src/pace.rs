//! Store goal pace: how much the store must sell per remaining business day
//! to reach its goal, compared with what it has averaged so far.
//!
//! Projection only. None of these values feed into commission eligibility.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct GoalPace {
    pub store_goal: f64,
    pub total_store: f64,
    /// `total_store / store_goal * 100`, 0 without a goal.
    pub goal_percentage: f64,
    pub remaining_business_days: u32,
    /// Sales per remaining business day needed to close the gap.
    pub required_daily_average: f64,
    /// Sales per day that had at least one entry.
    pub actual_daily_average: f64,
    pub days_with_sales: usize,
}

impl GoalPace {
    pub fn project(
        store_goal: f64,
        total_store: f64,
        days_with_sales: usize,
        remaining_business_days: u32,
    ) -> Self {
        let goal_percentage = if store_goal > 0.0 {
            total_store / store_goal * 100.0
        } else {
            0.0
        };

        let required_daily_average = if store_goal > total_store && remaining_business_days > 0 {
            (store_goal - total_store) / remaining_business_days as f64
        } else {
            0.0
        };

        let actual_daily_average = if days_with_sales > 0 {
            total_store / days_with_sales as f64
        } else {
            0.0
        };

        Self {
            store_goal,
            total_store,
            goal_percentage,
            remaining_business_days,
            required_daily_average,
            actual_daily_average,
            days_with_sales,
        }
    }

    /// Whether the goal has already been reached.
    pub fn goal_reached(&self) -> bool {
        self.store_goal > 0.0 && self.total_store >= self.store_goal
    }
}
