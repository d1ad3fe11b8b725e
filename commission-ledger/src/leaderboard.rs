//! Leaderboard ranking.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::SellerId;

/// A seller's line on the monthly leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position, filled in after ranking.
    pub rank: usize,
    pub seller: SellerId,
    pub total_individual: f64,
    pub commission: f64,
    pub eligible: bool,
    /// Seller's sales as a share of the store's month, in percent.
    pub share_of_store: f64,
}

/// Highest individual total first. A NaN total never ranks above a real one;
/// equal totals fall back to seller id.
fn by_total_desc(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    let by_total = match (a.total_individual.is_nan(), b.total_individual.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_individual.total_cmp(&a.total_individual),
    };
    by_total.then_with(|| a.seller.cmp(&b.seller))
}

/// Ranks sellers by individual sales, optionally keeping only the top `limit`.
pub struct TopSellers {
    pub limit: Option<usize>,
}

impl TopSellers {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    /// Sort, truncate and number the entries.
    pub fn rank(&self, mut entries: Vec<LeaderboardEntry>) -> Vec<LeaderboardEntry> {
        let candidates = entries.len();
        entries.sort_by(by_total_desc);
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i + 1;
        }
        log::debug!("leaderboard kept {} of {} sellers", entries.len(), candidates);
        entries
    }
}
