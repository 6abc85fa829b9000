//! Intent payloads exchanged between the classifier tiers and the rest of
//! the pipeline.
//!
//! `RawIntent` is the loosely-typed shape either tier may produce (fields
//! present or absent depending on the message). The resolver collapses it
//! into `ResolvedIntent`, a closed set of variants where each arm carries
//! only what that intent needs.

use serde::{Deserialize, Serialize};

/// Wire-level intent names accepted from either classifier tier.
pub const VALID_INTENTS: [&str; 9] = [
    "create_sale",
    "create_credit",
    "create_payment",
    "get_today_sales",
    "get_person_credit",
    "get_week_summary",
    "get_total_sales_by_date",
    "small_talk",
    "unrecognized",
];

/// Unvalidated extraction output. Lives for one request only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIntent {
    pub intent: Option<String>,
    pub item: Option<String>,
    pub qty: Option<u32>,
    pub price: Option<f64>,
    pub total: Option<f64>,
    pub amount: Option<f64>,
    pub person: Option<String>,
    pub date: Option<String>,
}

impl RawIntent {
    pub fn unrecognized() -> Self {
        Self {
            intent: Some("unrecognized".to_string()),
            ..Self::default()
        }
    }

    /// Keeps `total` and `amount` mirrored when only one side was extracted.
    /// Either field may carry the settled value depending on which tier (and
    /// which phrasing) produced it.
    pub fn mirror_total_amount(&mut self) {
        match (self.total, self.amount) {
            (Some(total), None) => self.amount = Some(total),
            (None, Some(amount)) => self.total = Some(amount),
            _ => {}
        }
    }
}

/// Fields of a mutating intent before and after normalization. `amount` is
/// the settled monetary value; the resolver guarantees it is finite and
/// positive before the writer ever sees the draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub item: Option<String>,
    pub qty: Option<u32>,
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub person: Option<String>,
    pub date: Option<String>,
}

/// Canonical classified form of one inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedIntent {
    CreateSale(TransactionDraft),
    CreateCredit(TransactionDraft),
    CreatePayment(TransactionDraft),
    GetTodaySales,
    GetPersonCredit { person: Option<String> },
    GetWeekSummary,
    GetSalesByDate { date: Option<String> },
    SmallTalk,
    Unrecognized,
}

impl ResolvedIntent {
    /// Maps an extraction payload onto the closed variant set. Unknown or
    /// absent intent names become `Unrecognized`.
    pub fn from_raw(mut raw: RawIntent) -> Self {
        raw.mirror_total_amount();

        let draft = TransactionDraft {
            item: raw.item.clone(),
            qty: raw.qty,
            price: raw.price,
            amount: raw.amount,
            person: raw.person.clone(),
            date: raw.date.clone(),
        };

        match raw.intent.as_deref() {
            Some("create_sale") => ResolvedIntent::CreateSale(draft),
            Some("create_credit") => ResolvedIntent::CreateCredit(draft),
            Some("create_payment") => ResolvedIntent::CreatePayment(draft),
            Some("get_today_sales") => ResolvedIntent::GetTodaySales,
            Some("get_person_credit") => ResolvedIntent::GetPersonCredit { person: raw.person },
            Some("get_week_summary") => ResolvedIntent::GetWeekSummary,
            Some("get_total_sales_by_date") => ResolvedIntent::GetSalesByDate { date: raw.date },
            Some("small_talk") => ResolvedIntent::SmallTalk,
            _ => ResolvedIntent::Unrecognized,
        }
    }

    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            ResolvedIntent::CreateSale(_)
                | ResolvedIntent::CreateCredit(_)
                | ResolvedIntent::CreatePayment(_)
        )
    }
}
