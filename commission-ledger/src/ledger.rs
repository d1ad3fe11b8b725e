//! In-memory sales ledger.
//!
//! Holds every seller's monthly buckets plus the store-wide goal for each
//! month. Buckets are created lazily on first activity and inherit the
//! store-wide goal. Commission is never stored here; `commission_for`
//! recomputes it from the bucket on every call.

use std::collections::{BTreeMap, BTreeSet};

use commission_engine::{
    evaluate_with, monthly_totals, DailySale, MonthKey, MonthlyData, TierTable,
};

use crate::error::{LedgerError, LedgerResult};
use crate::types::{NewSale, SalesHistory, SellerId, SellerMonth};

#[derive(Clone, Debug, Default)]
pub struct SalesLedger {
    sellers: BTreeMap<SellerId, SalesHistory>,
    store_goals: BTreeMap<MonthKey, f64>,
    ids: BTreeSet<u64>,
    next_id: u64,
    tiers: Option<TierTable>,
}

impl SalesLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom validated tier table instead of the reference table.
    pub fn with_tier_table(mut self, table: TierTable) -> Self {
        self.tiers = Some(table);
        self
    }

    pub fn tier_table(&self) -> &TierTable {
        self.tiers.as_ref().unwrap_or_else(|| TierTable::standard())
    }

    // -----------------------------------------------------------------------
    // Buckets
    // -----------------------------------------------------------------------

    /// Get or lazily create a seller's bucket for `month`.
    pub fn ensure_month(&mut self, seller: &str, month: MonthKey) -> LedgerResult<&mut MonthlyData> {
        if seller.trim().is_empty() {
            return Err(LedgerError::EmptySeller);
        }
        let goal = self.store_goal(month);
        Ok(self
            .sellers
            .entry(seller.to_string())
            .or_default()
            .entry(month)
            .or_insert_with(|| MonthlyData::with_goal(goal)))
    }

    /// Store-wide goal for `month`, 0 when none was set.
    pub fn store_goal(&self, month: MonthKey) -> f64 {
        self.store_goals.get(&month).copied().unwrap_or(0.0)
    }

    /// Set the store-wide goal and apply it to every seller's bucket for
    /// that month. Buckets created later inherit it.
    pub fn set_store_goal(&mut self, month: MonthKey, goal: f64) -> LedgerResult<()> {
        validate_goal(goal)?;
        self.store_goals.insert(month, goal);
        for history in self.sellers.values_mut() {
            if let Some(data) = history.get_mut(&month) {
                data.store_goal = goal;
            }
        }
        log::debug!("store goal for {} set to {:.2}", month, goal);
        Ok(())
    }

    /// Set the goal on one seller's bucket only.
    pub fn set_seller_goal(&mut self, seller: &str, month: MonthKey, goal: f64) -> LedgerResult<()> {
        validate_goal(goal)?;
        self.ensure_month(seller, month)?.store_goal = goal;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Entries
    // -----------------------------------------------------------------------

    /// Record a new entry and assign it a fresh id.
    pub fn add_sale(&mut self, seller: &str, month: MonthKey, sale: NewSale) -> LedgerResult<DailySale> {
        validate_sale(&sale, month)?;
        if seller.trim().is_empty() {
            return Err(LedgerError::EmptySeller);
        }
        let id = self.allocate_id()?;
        let record = DailySale {
            id,
            date: sale.date,
            individual_sale: sale.individual_sale,
            store_sale: sale.store_sale,
        };
        self.ensure_month(seller, month)?
            .daily_sales
            .push(record.clone());
        self.ids.insert(id);
        log::debug!("seller={} month={} added sale {}", seller, month, id);
        Ok(record)
    }

    /// File an entry that already carries an id (e.g. loaded from CSV).
    /// The month is taken from the entry's date.
    pub fn insert_sale(&mut self, seller: &str, sale: DailySale) -> LedgerResult<()> {
        let month = MonthKey::of(sale.date);
        validate_amount("individual_sale", sale.individual_sale)?;
        validate_amount("store_sale", sale.store_sale)?;
        if self.ids.contains(&sale.id) {
            return Err(LedgerError::DuplicateSale(sale.id));
        }
        let id = sale.id;
        self.ensure_month(seller, month)?.daily_sales.push(sale);
        self.ids.insert(id);
        self.next_id = self.next_id.max(id.saturating_add(1));
        Ok(())
    }

    /// Replace the fields of an existing entry, keeping its id.
    pub fn update_sale(
        &mut self,
        seller: &str,
        month: MonthKey,
        id: u64,
        sale: NewSale,
    ) -> LedgerResult<DailySale> {
        validate_sale(&sale, month)?;
        let record = self
            .sellers
            .get_mut(seller)
            .and_then(|history| history.get_mut(&month))
            .and_then(|data| data.daily_sales.iter_mut().find(|s| s.id == id))
            .ok_or_else(|| LedgerError::UnknownSale {
                seller: seller.to_string(),
                month,
                id,
            })?;

        record.date = sale.date;
        record.individual_sale = sale.individual_sale;
        record.store_sale = sale.store_sale;
        log::debug!("seller={} month={} updated sale {}", seller, month, id);
        Ok(record.clone())
    }

    /// Remove an entry. Returns whether anything was removed; a missing
    /// month or id is not an error and creates nothing.
    pub fn delete_sale(&mut self, seller: &str, month: MonthKey, id: u64) -> bool {
        let Some(data) = self
            .sellers
            .get_mut(seller)
            .and_then(|history| history.get_mut(&month))
        else {
            return false;
        };

        let before = data.daily_sales.len();
        data.daily_sales.retain(|s| s.id != id);
        let removed = data.daily_sales.len() != before;
        if removed {
            self.ids.remove(&id);
            log::debug!("seller={} month={} deleted sale {}", seller, month, id);
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn month(&self, seller: &str, month: MonthKey) -> Option<&MonthlyData> {
        self.sellers.get(seller).and_then(|history| history.get(&month))
    }

    pub fn history(&self, seller: &str) -> Option<&SalesHistory> {
        self.sellers.get(seller)
    }

    pub fn sellers(&self) -> impl Iterator<Item = (&SellerId, &SalesHistory)> {
        self.sellers.iter()
    }

    pub fn seller_ids(&self) -> Vec<SellerId> {
        self.sellers.keys().cloned().collect()
    }

    pub fn store_goals(&self) -> &BTreeMap<MonthKey, f64> {
        &self.store_goals
    }

    /// Every month any seller has a bucket for, or that has a store goal,
    /// oldest first.
    pub fn months(&self) -> Vec<MonthKey> {
        let months: BTreeSet<MonthKey> = self
            .sellers
            .values()
            .flat_map(|history| history.keys().copied())
            .chain(self.store_goals.keys().copied())
            .collect();
        months.into_iter().collect()
    }

    /// Months in which at least one seller recorded an entry, oldest first.
    pub fn active_months(&self) -> Vec<MonthKey> {
        let months: BTreeSet<MonthKey> = self
            .sellers
            .values()
            .flat_map(|history| history.iter())
            .filter(|(_, data)| !data.daily_sales.is_empty())
            .map(|(month, _)| *month)
            .collect();
        months.into_iter().collect()
    }

    pub fn total_entries(&self) -> usize {
        self.ids.len()
    }

    /// Totals and commission for one seller-month. A missing bucket is
    /// evaluated as empty against the store-wide goal.
    pub fn commission_for(&self, seller: &str, month: MonthKey) -> SellerMonth {
        let empty = MonthlyData::with_goal(self.store_goal(month));
        let data = self.month(seller, month).unwrap_or(&empty);
        let totals = monthly_totals(&data.daily_sales);
        let commission = evaluate_with(
            self.tier_table(),
            totals.total_individual,
            totals.total_store,
            data.store_goal,
        );
        SellerMonth {
            seller: seller.to_string(),
            month,
            store_goal: data.store_goal,
            totals,
            commission,
        }
    }

    fn allocate_id(&mut self) -> LedgerResult<u64> {
        let mut id = self.next_id;
        while self.ids.contains(&id) {
            id = id.checked_add(1).ok_or(LedgerError::IdsExhausted)?;
        }
        self.next_id = id.saturating_add(1);
        Ok(id)
    }
}

fn validate_amount(field: &'static str, value: f64) -> LedgerResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidAmount { field, value })
    }
}

fn validate_goal(goal: f64) -> LedgerResult<()> {
    if goal.is_finite() && goal >= 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidGoal(goal))
    }
}

fn validate_sale(sale: &NewSale, month: MonthKey) -> LedgerResult<()> {
    validate_amount("individual_sale", sale.individual_sale)?;
    validate_amount("store_sale", sale.store_sale)?;
    if !month.contains(sale.date) {
        return Err(LedgerError::DateOutsideMonth {
            date: sale.date,
            month,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use commission_engine::CommissionStatus;

    fn july() -> MonthKey {
        "2024-07".parse().unwrap()
    }

    fn entry(day: u32, individual: f64, store: f64) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(2024, 7, day).unwrap(),
            individual_sale: individual,
            store_sale: store,
        }
    }

    #[test]
    fn add_sale_creates_bucket_and_assigns_ids() {
        let mut ledger = SalesLedger::new();
        let a = ledger.add_sale("ana", july(), entry(1, 1_000.0, 5_000.0)).unwrap();
        let b = ledger.add_sale("ana", july(), entry(2, 2_000.0, 6_000.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(ledger.month("ana", july()).unwrap().daily_sales.len(), 2);
        assert_eq!(ledger.total_entries(), 2);
    }

    #[test]
    fn non_positive_amounts_rejected() {
        let mut ledger = SalesLedger::new();
        let err = ledger
            .add_sale("ana", july(), entry(1, 0.0, 5_000.0))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidAmount { field: "individual_sale", .. }
        ));
        let err = ledger
            .add_sale("ana", july(), entry(1, 10.0, f64::NAN))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { field: "store_sale", .. }));
        assert!(ledger.month("ana", july()).is_none());
    }

    #[test]
    fn date_must_fall_in_month() {
        let mut ledger = SalesLedger::new();
        let sale = NewSale {
            date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
            individual_sale: 10.0,
            store_sale: 10.0,
        };
        assert!(matches!(
            ledger.add_sale("ana", july(), sale),
            Err(LedgerError::DateOutsideMonth { .. })
        ));
    }

    #[test]
    fn empty_seller_rejected() {
        let mut ledger = SalesLedger::new();
        assert!(matches!(
            ledger.add_sale("  ", july(), entry(1, 10.0, 10.0)),
            Err(LedgerError::EmptySeller)
        ));
    }

    #[test]
    fn update_keeps_id_and_replaces_fields() {
        let mut ledger = SalesLedger::new();
        let original = ledger.add_sale("ana", july(), entry(1, 1_000.0, 5_000.0)).unwrap();
        let updated = ledger
            .update_sale("ana", july(), original.id, entry(3, 1_500.0, 7_000.0))
            .unwrap();
        assert_eq!(updated.id, original.id);
        let stored = &ledger.month("ana", july()).unwrap().daily_sales[0];
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2024, 7, 3).unwrap());
        assert!((stored.individual_sale - 1_500.0).abs() < 0.01);
    }

    #[test]
    fn update_unknown_sale_fails() {
        let mut ledger = SalesLedger::new();
        assert!(matches!(
            ledger.update_sale("ana", july(), 42, entry(1, 10.0, 10.0)),
            Err(LedgerError::UnknownSale { id: 42, .. })
        ));
    }

    #[test]
    fn delete_is_a_noop_for_missing_month() {
        let mut ledger = SalesLedger::new();
        assert!(!ledger.delete_sale("ana", july(), 1));
        assert!(ledger.history("ana").is_none());

        let sale = ledger.add_sale("ana", july(), entry(1, 10.0, 10.0)).unwrap();
        assert!(!ledger.delete_sale("ana", july(), sale.id + 100));
        assert!(ledger.delete_sale("ana", july(), sale.id));
        assert!(ledger.month("ana", july()).unwrap().daily_sales.is_empty());
        assert_eq!(ledger.total_entries(), 0);
    }

    #[test]
    fn store_goal_propagates_to_existing_and_new_buckets() {
        let mut ledger = SalesLedger::new();
        ledger.add_sale("ana", july(), entry(1, 10.0, 10.0)).unwrap();
        ledger.set_store_goal(july(), 100_000.0).unwrap();
        assert_eq!(ledger.month("ana", july()).unwrap().store_goal, 100_000.0);

        ledger.add_sale("bruno", july(), entry(2, 10.0, 10.0)).unwrap();
        assert_eq!(ledger.month("bruno", july()).unwrap().store_goal, 100_000.0);
    }

    #[test]
    fn negative_goal_rejected() {
        let mut ledger = SalesLedger::new();
        assert!(matches!(
            ledger.set_store_goal(july(), -1.0),
            Err(LedgerError::InvalidGoal(_))
        ));
    }

    #[test]
    fn insert_sale_rejects_duplicate_ids_and_advances_counter() {
        let mut ledger = SalesLedger::new();
        let sale = DailySale {
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            individual_sale: 10.0,
            store_sale: 20.0,
        };
        ledger.insert_sale("ana", sale.clone()).unwrap();
        assert!(matches!(
            ledger.insert_sale("bruno", sale),
            Err(LedgerError::DuplicateSale(7))
        ));
        let next = ledger.add_sale("ana", july(), entry(2, 10.0, 10.0)).unwrap();
        assert_eq!(next.id, 8);
    }

    #[test]
    fn running_out_of_ids_is_an_error() {
        let mut ledger = SalesLedger::new();
        let last = DailySale {
            id: u64::MAX,
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            individual_sale: 10.0,
            store_sale: 20.0,
        };
        ledger.insert_sale("ana", last).unwrap();
        assert!(matches!(
            ledger.add_sale("ana", july(), entry(2, 10.0, 10.0)),
            Err(LedgerError::IdsExhausted)
        ));
        assert_eq!(ledger.total_entries(), 1);
        assert_eq!(ledger.month("ana", july()).unwrap().daily_sales.len(), 1);
    }

    #[test]
    fn rejected_seller_does_not_consume_an_id() {
        let mut ledger = SalesLedger::new();
        assert!(ledger.add_sale("", july(), entry(1, 10.0, 10.0)).is_err());
        assert!(ledger.add_sale(" ", july(), entry(1, 10.0, 10.0)).is_err());
        let first = ledger.add_sale("ana", july(), entry(1, 10.0, 10.0)).unwrap();
        assert_eq!(first.id, 0);
    }

    #[test]
    fn active_months_skip_goal_only_and_empty_months() {
        let mut ledger = SalesLedger::new();
        let june: MonthKey = "2024-06".parse().unwrap();
        let august: MonthKey = "2024-08".parse().unwrap();
        ledger.add_sale("ana", july(), entry(1, 10.0, 10.0)).unwrap();
        ledger.ensure_month("bruno", june).unwrap();
        ledger.set_store_goal(august, 50_000.0).unwrap();
        assert_eq!(ledger.active_months(), vec![july()]);
        assert_eq!(ledger.months(), vec![june, july(), august]);
    }

    #[test]
    fn commission_is_recomputed_from_bucket() {
        let mut ledger = SalesLedger::new();
        ledger.set_store_goal(july(), 100_000.0).unwrap();
        ledger.add_sale("ana", july(), entry(1, 40_000.0, 50_000.0)).unwrap();
        let first = ledger.commission_for("ana", july());
        assert_eq!(first.commission.status, CommissionStatus::BelowFirstTier);

        ledger.add_sale("ana", july(), entry(2, 35_000.0, 50_000.0)).unwrap();
        let second = ledger.commission_for("ana", july());
        assert!(second.commission.eligible);
        assert!((second.commission.amount - 525.0).abs() < 0.01);
    }

    #[test]
    fn missing_bucket_evaluates_as_empty() {
        let ledger = SalesLedger::new();
        let month = ledger.commission_for("nobody", july());
        assert_eq!(month.commission.status, CommissionStatus::GoalNotSet);
        assert_eq!(month.totals.total_individual, 0.0);
    }

    #[test]
    fn months_are_sorted_across_sellers() {
        let mut ledger = SalesLedger::new();
        let june: MonthKey = "2024-06".parse().unwrap();
        ledger.add_sale("ana", july(), entry(1, 10.0, 10.0)).unwrap();
        ledger.ensure_month("bruno", june).unwrap();
        assert_eq!(ledger.months(), vec![june, july()]);
    }
}
