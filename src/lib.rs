//! # Khata Assistant
//!
//! The core of a conversational bookkeeping assistant for shopkeepers: a
//! free-form text or voice message comes in, a ledger entry or an aggregate
//! answer goes out.
//!
//! ## Core Concepts
//!
//! - **Two-tier classification**: a deterministic lexical fast path handles
//!   the common Hindi/Hinglish/English phrasings; everything else (and all
//!   voice) goes to a generative structured-extraction fallback.
//! - **Append-only ledger**: sales, credits, and payments are immutable
//!   entries; balances and summaries are always derived by aggregation,
//!   never stored and incremented.
//! - **Full-settlement inference**: "Rahul ne sara udhar wapas diya" records
//!   a payment equal to Rahul's outstanding balance without the shopkeeper
//!   stating an amount.
//!
//! Transport, user linking, and durable storage are external collaborators:
//! the pipeline consumes plain text plus an optional audio clip and an
//! abstract [`LedgerStore`], and produces template replies.
//!
//! ## Example
//!
//! ```rust,ignore
//! use khata_assistant::{Assistant, IncomingMessage, MemoryLedger};
//! use khata_assistant::llm::{GeminiClient, GeminiExtractor};
//! use std::sync::Arc;
//!
//! let store = Arc::new(MemoryLedger::new());
//! let extractor = Arc::new(GeminiExtractor::new(GeminiClient::new(api_key)));
//! let assistant = Assistant::new(store, extractor);
//!
//! let reply = assistant
//!     .handle(&IncomingMessage {
//!         owner_id: "shop-1".to_string(),
//!         text: "Rahul ko ₹500 udhar diya".to_string(),
//!         audio: None,
//!     })
//!     .await?;
//! ```

pub mod classifier;
pub mod error;
pub mod intent;
pub mod ledger;
pub mod query;
pub mod resolver;
pub mod response;
pub mod utils;
pub mod writer;

#[cfg(feature = "gemini")]
pub mod llm;

pub use error::{AssistantError, Result, StoreError};
pub use intent::{RawIntent, ResolvedIntent, TransactionDraft};
pub use ledger::{
    LedgerEntry, LedgerFilter, LedgerStore, MemoryLedger, TransactionType, TypeAggregate,
};
pub use query::{LedgerQueryEngine, WeekSummary};
pub use resolver::{IntentExtractor, IntentResolver};
pub use writer::TransactionWriter;

use log::{debug, warn};
use std::sync::Arc;

/// One inbound chat message, transport already stripped away. `owner_id` is
/// the already-resolved internal shopkeeper identifier.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub owner_id: String,
    pub text: String,
    pub audio: Option<AudioClip>,
}

/// Decoded voice attachment, still base64 so it can be handed straight to
/// the extraction backend.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub data_base64: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
}

/// The full pipeline for one message: resolve the intent, dispatch to the
/// writer or the query engine, compose the reply.
pub struct Assistant {
    resolver: IntentResolver,
    writer: TransactionWriter,
    queries: LedgerQueryEngine,
}

impl Assistant {
    pub fn new(store: Arc<dyn LedgerStore>, extractor: Arc<dyn IntentExtractor>) -> Self {
        Self {
            resolver: IntentResolver::new(extractor, Arc::clone(&store)),
            writer: TransactionWriter::new(Arc::clone(&store)),
            queries: LedgerQueryEngine::new(store),
        }
    }

    /// Handles one message end to end. Every internal failure is folded into
    /// a user-facing template here, with one exception: a ledger write
    /// failure propagates, so the caller never confirms a transaction that
    /// was not persisted.
    pub async fn handle(&self, message: &IncomingMessage) -> Result<Reply> {
        let owner = message.owner_id.as_str();
        let intent = match self
            .resolver
            .resolve(owner, &message.text, message.audio.as_ref())
            .await
        {
            Ok(intent) => intent,
            Err(error) => return recover(error),
        };
        debug!("dispatching intent: {:?}", intent);

        match intent {
            intent @ (ResolvedIntent::CreateSale(_)
            | ResolvedIntent::CreateCredit(_)
            | ResolvedIntent::CreatePayment(_)) => {
                match self.writer.record(owner, &intent).await {
                    Ok(entry) => Ok(reply(response::confirmation(&entry))),
                    Err(error) => recover(error),
                }
            }
            ResolvedIntent::GetTodaySales => match self.queries.today_sales(owner).await {
                Ok(total) => Ok(reply(response::today_sales(total))),
                Err(error) => recover(error),
            },
            ResolvedIntent::GetPersonCredit { person: None } => {
                Ok(reply(response::person_name_missing()))
            }
            ResolvedIntent::GetPersonCredit {
                person: Some(person),
            } => match self.queries.person_credit(owner, &person).await {
                Ok(balance) => Ok(reply(response::person_credit(&person, balance))),
                Err(error) => recover(error),
            },
            ResolvedIntent::GetWeekSummary => match self.queries.week_summary(owner).await {
                Ok(summary) => Ok(reply(response::week_summary(&summary))),
                Err(error) => recover(error),
            },
            ResolvedIntent::GetSalesByDate { date } => {
                let date = date.unwrap_or_else(|| "today".to_string());
                match self.queries.sales_by_date(owner, &date).await {
                    Ok(total) => Ok(reply(response::sales_by_date(&date, total))),
                    Err(error) => recover(error),
                }
            }
            ResolvedIntent::SmallTalk | ResolvedIntent::Unrecognized => {
                Ok(reply(response::help()))
            }
        }
    }
}

fn reply(text: impl Into<String>) -> Reply {
    Reply { text: text.into() }
}

/// Maps pipeline failures onto their user-facing templates. `WriteFailed` is
/// the one error allowed to escape the core.
fn recover(error: AssistantError) -> Result<Reply> {
    match error {
        AssistantError::PaymentDetailsMissing => Ok(reply(response::payment_details_missing())),
        AssistantError::NothingOutstanding(person) => {
            Ok(reply(response::nothing_outstanding(&person)))
        }
        AssistantError::InvalidTransaction(detail) => {
            debug!("rejected transaction: {}", detail);
            Ok(reply(response::invalid_transaction()))
        }
        AssistantError::QueryFailed(ref detail) => {
            warn!("ledger read failed: {}", detail);
            Ok(reply(response::retry_later()))
        }
        AssistantError::WriteFailed(_) => Err(error),
        other => {
            warn!("unexpected pipeline error: {}", other);
            Ok(reply(response::help()))
        }
    }
}
