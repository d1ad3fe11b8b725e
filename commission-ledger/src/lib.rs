//! Sales ledger and reporting built on `commission-engine`.
//!
//! The ledger files daily entries into per-seller monthly buckets. Every
//! report in this crate (history, statistics, dashboards) is derived from
//! those buckets on read.

pub mod dashboard;
pub mod error;
pub mod history;
pub mod leaderboard;
pub mod ledger;
pub mod sales_loader;
pub mod statistics;
pub mod store_statistics;
pub mod types;

pub use dashboard::{manager_dashboard, seller_summary, ManagerDashboard, SellerSummary};
pub use error::{LedgerError, LedgerResult};
pub use history::{month_history, MonthSummary};
pub use leaderboard::{LeaderboardEntry, TopSellers};
pub use ledger::SalesLedger;
pub use statistics::{all_time_stats, seller_month_stats, AllTimeStats, MonthStats};
pub use store_statistics::{store_statistics, StoreMonth, StoreStatistics};
pub use types::{NewSale, SalesHistory, SellerId, SellerMonth};
