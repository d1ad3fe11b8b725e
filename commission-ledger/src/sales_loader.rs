//! CSV loaders for daily sales and store goals, plus the JSON tier table.
//!
//! Sales CSV columns (header required, `id` optional):
//!   seller, date, individual_sale, store_sale[, id]
//!
//! Goals CSV columns (`seller` optional, blank means store-wide):
//!   month, store_goal[, seller]

use std::io::Read;

use chrono::NaiveDate;
use serde::Deserialize;

use commission_engine::{CommissionTier, DailySale, MonthKey, TierTable};

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::SalesLedger;
use crate::types::NewSale;

/// One row of the sales CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SaleRecord {
    pub seller: String,
    pub date: NaiveDate,
    pub individual_sale: f64,
    pub store_sale: f64,
    #[serde(default)]
    pub id: Option<u64>,
}

impl SaleRecord {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }

    pub fn to_new_sale(&self) -> NewSale {
        NewSale {
            date: self.date,
            individual_sale: self.individual_sale,
            store_sale: self.store_sale,
        }
    }
}

/// One row of the goals CSV.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GoalRecord {
    pub month: MonthKey,
    pub store_goal: f64,
    #[serde(default)]
    pub seller: Option<String>,
}

fn deserialize_rows<T, R>(reader: R) -> LedgerResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.deserialize().enumerate() {
        let row: T = result.map_err(|source| LedgerError::Csv {
            line: line_num + 2,
            source,
        })?;
        rows.push(row);
    }
    Ok(rows)
}

fn open(path: &str) -> LedgerResult<std::fs::File> {
    std::fs::File::open(path).map_err(|source| LedgerError::Io {
        path: path.to_string(),
        source,
    })
}

/// Load sale records from a CSV reader.
pub fn load_sales<R: Read>(reader: R) -> LedgerResult<Vec<SaleRecord>> {
    deserialize_rows(reader)
}

/// Load sale records from a CSV file path.
pub fn load_sales_file(path: &str) -> LedgerResult<Vec<SaleRecord>> {
    let records = load_sales(open(path)?)?;
    log::info!("loaded {} sale records from {}", records.len(), path);
    Ok(records)
}

/// Load goal records from a CSV reader.
pub fn load_goals<R: Read>(reader: R) -> LedgerResult<Vec<GoalRecord>> {
    deserialize_rows(reader)
}

/// Load goal records from a CSV file path.
pub fn load_goals_file(path: &str) -> LedgerResult<Vec<GoalRecord>> {
    let records = load_goals(open(path)?)?;
    log::info!("loaded {} goal records from {}", records.len(), path);
    Ok(records)
}

/// Load and validate a tier table from a JSON array of `{min, max, rate}`.
pub fn load_tier_table<R: Read>(reader: R) -> LedgerResult<TierTable> {
    let tiers: Vec<CommissionTier> = serde_json::from_reader(reader)?;
    Ok(TierTable::new(tiers)?)
}

pub fn load_tier_table_file(path: &str) -> LedgerResult<TierTable> {
    let table = load_tier_table(open(path)?)?;
    log::info!("loaded tier table with {} tiers from {}", table.len(), path);
    Ok(table)
}

/// File every record into a ledger.
///
/// Store-wide goals are applied first so new buckets inherit them, then
/// rows carrying an explicit id, then rows without one, and finally
/// per-seller goal overrides.
pub fn build_ledger(
    sales: &[SaleRecord],
    goals: &[GoalRecord],
    tiers: Option<TierTable>,
) -> LedgerResult<SalesLedger> {
    let mut ledger = SalesLedger::new();
    if let Some(table) = tiers {
        ledger = ledger.with_tier_table(table);
    }

    let (seller_goals, store_goals): (Vec<&GoalRecord>, Vec<&GoalRecord>) = goals
        .iter()
        .partition(|g| g.seller.as_deref().is_some_and(|s| !s.trim().is_empty()));

    for goal in store_goals {
        ledger.set_store_goal(goal.month, goal.store_goal)?;
    }

    for record in sales.iter().filter(|r| r.id.is_some()) {
        if let Some(id) = record.id {
            ledger.insert_sale(
                &record.seller,
                DailySale {
                    id,
                    date: record.date,
                    individual_sale: record.individual_sale,
                    store_sale: record.store_sale,
                },
            )?;
        }
    }

    for record in sales.iter().filter(|r| r.id.is_none()) {
        ledger.add_sale(&record.seller, record.month(), record.to_new_sale())?;
    }

    for goal in seller_goals {
        if let Some(seller) = goal.seller.as_deref().map(str::trim) {
            if ledger.history(seller).is_none() {
                log::warn!("goal for {} set on seller {} with no sales", goal.month, seller);
            }
            ledger.set_seller_goal(seller, goal.month, goal.store_goal)?;
        }
    }

    log::info!(
        "ledger built: {} sellers, {} months, {} entries",
        ledger.seller_ids().len(),
        ledger.months().len(),
        ledger.total_entries()
    );
    Ok(ledger)
}
