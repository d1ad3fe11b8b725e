use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use commission_engine::{CommissionResult, MonthKey, MonthlyData, MonthlyTotals};

/// Sellers are identified by the login they record entries under.
pub type SellerId = String;

/// One seller's months, keyed chronologically.
pub type SalesHistory = BTreeMap<MonthKey, MonthlyData>;

/// Fields a seller submits for a new or edited entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewSale {
    pub date: NaiveDate,
    pub individual_sale: f64,
    pub store_sale: f64,
}

/// Totals and commission for one seller-month, computed on read.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SellerMonth {
    pub seller: SellerId,
    pub month: MonthKey,
    pub store_goal: f64,
    pub totals: MonthlyTotals,
    pub commission: CommissionResult,
}
