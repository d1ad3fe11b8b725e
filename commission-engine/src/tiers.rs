//! Commission tier table.
//!
//! Tiers are contiguous bands of individual sales volume, sorted ascending,
//! each paying a fixed rate on the seller's whole monthly total. The table is
//! validated once at construction so lookups never have to deal with gaps
//! or overlaps.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{TierTableError, TierTableResult};
use crate::totals::to_cents;

/// One band of the commission table. Both bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommissionTier {
    pub min: f64,
    pub max: f64,
    pub rate: f64,
}

impl CommissionTier {
    pub const fn new(min: f64, max: f64, rate: f64) -> Self {
        Self { min, max, rate }
    }

    /// Whether `total` falls inside `[min, max]`.
    pub fn contains(&self, total: f64) -> bool {
        total >= self.min && total <= self.max
    }
}

/// Reference table: 50,000.01 to 200,000 in 10,000-wide bands, rate rising
/// by 0.05 percentage points per band.
pub const REFERENCE_TIERS: [CommissionTier; 15] = [
    CommissionTier::new(50_000.01, 60_000.0, 0.0060),
    CommissionTier::new(60_000.01, 70_000.0, 0.0065),
    CommissionTier::new(70_000.01, 80_000.0, 0.0070),
    CommissionTier::new(80_000.01, 90_000.0, 0.0075),
    CommissionTier::new(90_000.01, 100_000.0, 0.0080),
    CommissionTier::new(100_000.01, 110_000.0, 0.0085),
    CommissionTier::new(110_000.01, 120_000.0, 0.0090),
    CommissionTier::new(120_000.01, 130_000.0, 0.0095),
    CommissionTier::new(130_000.01, 140_000.0, 0.0100),
    CommissionTier::new(140_000.01, 150_000.0, 0.0105),
    CommissionTier::new(150_000.01, 160_000.0, 0.0110),
    CommissionTier::new(160_000.01, 170_000.0, 0.0115),
    CommissionTier::new(170_000.01, 180_000.0, 0.0120),
    CommissionTier::new(180_000.01, 190_000.0, 0.0125),
    CommissionTier::new(190_000.01, 200_000.0, 0.0130),
];

static STANDARD_TABLE: OnceLock<TierTable> = OnceLock::new();

/// Where a sales total lands relative to the table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TierLookup<'a> {
    BelowFirst,
    Within { index: usize, tier: &'a CommissionTier },
    AboveHighest,
}

/// A validated, non-empty, contiguous tier table.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TierTable {
    tiers: Vec<CommissionTier>,
}

impl TierTable {
    /// Validate and wrap a list of tiers.
    ///
    /// Tiers must be sorted ascending and each `max` must sit exactly one
    /// cent below the next tier's `min`.
    pub fn new(tiers: Vec<CommissionTier>) -> TierTableResult<Self> {
        if let Err(e) = validate(&tiers) {
            log::warn!("rejected tier table of {} tiers: {}", tiers.len(), e);
            return Err(e);
        }
        Ok(Self { tiers })
    }

    /// The reference table used by [`crate::evaluator::evaluate`].
    pub fn standard() -> &'static TierTable {
        STANDARD_TABLE.get_or_init(|| {
            debug_assert!(validate(&REFERENCE_TIERS).is_ok());
            TierTable {
                tiers: REFERENCE_TIERS.to_vec(),
            }
        })
    }

    pub fn tiers(&self) -> &[CommissionTier] {
        &self.tiers
    }

    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false for a constructed table; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn lowest(&self) -> &CommissionTier {
        &self.tiers[0]
    }

    pub fn highest(&self) -> &CommissionTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&CommissionTier> {
        self.tiers.get(index)
    }

    /// Locate the tier for `total` with a binary search over the upper bounds.
    ///
    /// The total and the bounds are compared in whole cents, so a total that
    /// is a fraction of a cent off (float summation, sub-cent input) lands in
    /// the band of its nearest cent.
    pub fn lookup(&self, total: f64) -> TierLookup<'_> {
        if total.is_nan() {
            return TierLookup::BelowFirst;
        }
        let cents = to_cents(total);
        let index = self.tiers.partition_point(|t| to_cents(t.max) < cents);
        match self.tiers.get(index) {
            None => TierLookup::AboveHighest,
            Some(tier) if index == 0 && cents < to_cents(tier.min) => TierLookup::BelowFirst,
            Some(tier) => TierLookup::Within { index, tier },
        }
    }
}

fn validate(tiers: &[CommissionTier]) -> TierTableResult<()> {
    if tiers.is_empty() {
        return Err(TierTableError::Empty);
    }

    for (index, tier) in tiers.iter().enumerate() {
        if !(tier.min.is_finite() && tier.max.is_finite() && tier.rate.is_finite()) {
            return Err(TierTableError::NonFinite { index });
        }
        if tier.min > tier.max {
            return Err(TierTableError::InvertedBand {
                index,
                min: tier.min,
                max: tier.max,
            });
        }
        if tier.rate < 0.0 {
            return Err(TierTableError::NegativeRate {
                index,
                rate: tier.rate,
            });
        }
    }

    for (index, pair) in tiers.windows(2).enumerate() {
        let (current, next) = (&pair[0], &pair[1]);
        let step = to_cents(next.min) - to_cents(current.max);
        if step > 1 {
            return Err(TierTableError::Gap {
                index,
                max: current.max,
                next_min: next.min,
            });
        }
        if step < 1 {
            return Err(TierTableError::Overlap {
                index,
                max: current.max,
                next_min: next.min,
            });
        }
    }

    Ok(())
}
