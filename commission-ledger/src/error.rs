//! Ledger error types.
//!
//! Every failure mode has a named variant. No stringly-typed errors.

use chrono::NaiveDate;
use thiserror::Error;

use commission_engine::{MonthKey, MonthKeyError, TierTableError};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount for {field}: {value} (must be a positive number)")]
    InvalidAmount { field: &'static str, value: f64 },

    #[error("Invalid store goal: {0} (must be zero or a positive number)")]
    InvalidGoal(f64),

    #[error("Date {date} is outside {month}")]
    DateOutsideMonth { date: NaiveDate, month: MonthKey },

    #[error("Sale {id} not found for seller '{seller}' in {month}")]
    UnknownSale {
        seller: String,
        month: MonthKey,
        id: u64,
    },

    #[error("Duplicate sale id {0}")]
    DuplicateSale(u64),

    #[error("No sale ids left to assign")]
    IdsExhausted,

    #[error("Seller id must not be empty")]
    EmptySeller,

    #[error(transparent)]
    Month(#[from] MonthKeyError),

    #[error("Invalid tier table: {0}")]
    TierTable(#[from] TierTableError),

    #[error("CSV parse error at line {line}: {source}")]
    Csv {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
