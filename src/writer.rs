//! Appends validated transactions to the ledger. The only mutation in the
//! whole core.

use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::error::{AssistantError, Result};
use crate::intent::{ResolvedIntent, TransactionDraft};
use crate::ledger::{LedgerEntry, LedgerStore, TransactionType};
use crate::utils::parse_business_date;

pub struct TransactionWriter {
    store: Arc<dyn LedgerStore>,
}

impl TransactionWriter {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Validates a mutating intent and appends exactly one entry. A store
    /// failure surfaces as `WriteFailed` so the caller never confirms a
    /// transaction that was not persisted.
    pub async fn record(&self, owner_id: &str, intent: &ResolvedIntent) -> Result<LedgerEntry> {
        let (entry_type, draft) = match intent {
            ResolvedIntent::CreateSale(draft) => (TransactionType::Sale, draft),
            ResolvedIntent::CreateCredit(draft) => (TransactionType::Credit, draft),
            ResolvedIntent::CreatePayment(draft) => (TransactionType::Payment, draft),
            other => {
                return Err(AssistantError::InvalidTransaction(format!(
                    "{:?} is not a recordable transaction",
                    other
                )))
            }
        };

        let amount = settled_amount(draft)?;
        let entry = LedgerEntry {
            owner_id: owner_id.to_string(),
            entry_type,
            item: draft.item.clone(),
            qty: draft.qty,
            amount,
            person_name: draft.person.clone(),
            occurred_on: parse_business_date(draft.date.as_deref()),
            recorded_at: Utc::now(),
        };

        info!(
            "recording {} of {} for owner {}",
            entry_type.label(),
            amount,
            owner_id
        );
        self.store
            .append(entry)
            .await
            .map_err(|e| AssistantError::WriteFailed(e.to_string()))
    }
}

fn settled_amount(draft: &TransactionDraft) -> Result<f64> {
    match draft.amount {
        Some(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => Err(AssistantError::InvalidTransaction(
            "amount must be a positive number".to_string(),
        )),
    }
}
