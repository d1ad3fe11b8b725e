//! Tier table error types.
//!
//! A malformed table is a data-definition bug. It is reported when the
//! table is built, never while evaluating a commission.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TierTableError {
    #[error("Tier table is empty")]
    Empty,

    #[error("Tier {index} has non-finite bounds or rate")]
    NonFinite { index: usize },

    #[error("Tier {index} is inverted: min {min:.2} > max {max:.2}")]
    InvertedBand { index: usize, min: f64, max: f64 },

    #[error("Tier {index} has a negative rate: {rate}")]
    NegativeRate { index: usize, rate: f64 },

    #[error("Gap between tier {index} (max {max:.2}) and the next tier (min {next_min:.2})")]
    Gap { index: usize, max: f64, next_min: f64 },

    #[error("Tier {index} (max {max:.2}) overlaps the next tier (min {next_min:.2})")]
    Overlap { index: usize, max: f64, next_min: f64 },
}

/// Result type alias for tier table construction.
pub type TierTableResult<T> = Result<T, TierTableError>;

/// A month identifier that is not a valid `YYYY-MM` string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid month '{input}': expected YYYY-MM")]
pub struct MonthKeyError {
    pub input: String,
}
