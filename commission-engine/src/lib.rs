//! Commission engine: pure, deterministic payout math for retail sellers.
//!
//! Nothing in this crate reads input or holds state. Every result is recomputed
//! from the month's entries and the store goal.

pub mod calendar;
pub mod error;
pub mod evaluator;
pub mod insights;
pub mod pace;
pub mod thresholds;
pub mod tiers;
pub mod totals;
pub mod types;

pub use calendar::remaining_business_days;
pub use error::{MonthKeyError, TierTableError};
pub use evaluator::{evaluate, evaluate_with, CommissionResult, CommissionStatus, Forfeited};
pub use insights::{insights, insights_with, TierInsights};
pub use pace::GoalPace;
pub use tiers::{CommissionTier, TierLookup, TierTable};
pub use totals::{monthly_totals, round_cents, to_cents, MonthlyTotals};
pub use types::{DailySale, MonthKey, MonthlyData};
