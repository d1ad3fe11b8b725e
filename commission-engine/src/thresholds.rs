//! Fixed business constants for commission eligibility.
//!
//! These are not configurable. Changing a value here changes the payout of
//! every seller in every month, including historical months that are
//! recomputed on read.

/// Store performance (store sales / store goal) at or above which the seller
/// receives the full tier commission.
pub const FULL_PAYOUT_PERFORMANCE: f64 = 1.0;

/// Minimum store performance for any payout. Between this and
/// `FULL_PAYOUT_PERFORMANCE` the seller receives a reduced commission.
pub const MINIMUM_STORE_PERFORMANCE: f64 = 0.85;

/// Share of the tier commission paid in the partial band.
pub const PARTIAL_PAYOUT_MULTIPLIER: f64 = 0.70;

/// Cents per currency unit. Totals, tier bounds and threshold amounts are
/// compared in whole cents; adjacent tiers are exactly one cent apart.
pub const CENTS_PER_UNIT: f64 = 100.0;
