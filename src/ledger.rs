//! Ledger entries and the abstract store they live in.
//!
//! Entries are append-only and immutable; balances are always derived by
//! summing over them, never stored and incremented. That is what lets
//! concurrent appends for one owner proceed with nothing more than the
//! store's native write atomicity.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Sale,
    Credit,
    Payment,
}

impl TransactionType {
    /// Label used in user-facing confirmations.
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Credit => "credit",
            TransactionType::Payment => "payment",
        }
    }
}

/// One immutable bookkeeping record. Created exclusively by the transaction
/// writer; corrections are a new offsetting entry, never an update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub owner_id: String,
    pub entry_type: TransactionType,
    pub item: Option<String>,
    pub qty: Option<u32>,
    pub amount: f64,
    pub person_name: Option<String>,
    /// Business date of the transaction (may lag `recorded_at` when the
    /// shopkeeper logs something after the fact).
    pub occurred_on: NaiveDate,
    pub recorded_at: DateTime<Utc>,
}

/// Row-selection predicate understood by every store operation. Unset fields
/// match everything; both ranges are half-open.
#[derive(Debug, Clone, Default)]
pub struct LedgerFilter {
    pub owner_id: String,
    pub types: Vec<TransactionType>,
    pub person_name: Option<String>,
    pub recorded_within: Option<(DateTime<Utc>, DateTime<Utc>)>,
    pub occurred_within: Option<(NaiveDate, NaiveDate)>,
}

impl LedgerFilter {
    pub fn for_owner(owner_id: &str) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            ..Self::default()
        }
    }

    pub fn entry_type(mut self, entry_type: TransactionType) -> Self {
        self.types.push(entry_type);
        self
    }

    /// Exact match on the stored person name, case-sensitive.
    pub fn person(mut self, person: &str) -> Self {
        self.person_name = Some(person.to_string());
        self
    }

    pub fn recorded_between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.recorded_within = Some((start, end));
        self
    }

    pub fn occurred_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.occurred_within = Some((start, end));
        self
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if entry.owner_id != self.owner_id {
            return false;
        }
        if !self.types.is_empty() && !self.types.contains(&entry.entry_type) {
            return false;
        }
        if let Some(person) = &self.person_name {
            if entry.person_name.as_deref() != Some(person.as_str()) {
                return false;
            }
        }
        if let Some((start, end)) = self.recorded_within {
            if entry.recorded_at < start || entry.recorded_at >= end {
                return false;
            }
        }
        if let Some((start, end)) = self.occurred_within {
            if entry.occurred_on < start || entry.occurred_on >= end {
                return false;
            }
        }
        true
    }
}

/// Per-type aggregate returned by `group_sum_count`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAggregate {
    pub entry_type: TransactionType,
    pub total: f64,
    pub count: u64,
}

/// Abstract durable store. Concrete backends (SQL, document store, the
/// in-memory reference below) live outside the core pipeline.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Appends one immutable entry and returns it as persisted.
    async fn append(&self, entry: LedgerEntry) -> StoreResult<LedgerEntry>;

    /// Sum of `amount` over matching entries; 0 when none match.
    async fn sum_amount(&self, filter: &LedgerFilter) -> StoreResult<f64>;

    /// Per-type sum and row count over matching entries. Types with no rows
    /// are omitted.
    async fn group_sum_count(&self, filter: &LedgerFilter) -> StoreResult<Vec<TypeAggregate>>;
}

/// In-memory reference store. Backs the test suite and small single-process
/// deployments.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn append(&self, entry: LedgerEntry) -> StoreResult<LedgerEntry> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError("ledger mutex poisoned".to_string()))?;
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn sum_amount(&self, filter: &LedgerFilter) -> StoreResult<f64> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError("ledger mutex poisoned".to_string()))?;
        Ok(entries
            .iter()
            .filter(|e| filter.matches(e))
            .map(|e| e.amount)
            .sum())
    }

    async fn group_sum_count(&self, filter: &LedgerFilter) -> StoreResult<Vec<TypeAggregate>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError("ledger mutex poisoned".to_string()))?;

        let mut groups: Vec<TypeAggregate> = Vec::new();
        for entry_type in [
            TransactionType::Sale,
            TransactionType::Credit,
            TransactionType::Payment,
        ] {
            let rows: Vec<&LedgerEntry> = entries
                .iter()
                .filter(|e| e.entry_type == entry_type && filter.matches(e))
                .collect();
            if !rows.is_empty() {
                groups.push(TypeAggregate {
                    entry_type,
                    total: rows.iter().map(|e| e.amount).sum(),
                    count: rows.len() as u64,
                });
            }
        }
        Ok(groups)
    }
}
