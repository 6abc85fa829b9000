use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Payment needs a person name or an amount")]
    PaymentDetailsMissing,

    #[error("No outstanding balance for {0}")]
    NothingOutstanding(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Ledger query failed: {0}")]
    QueryFailed(String),

    #[error("Ledger write failed: {0}")]
    WriteFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Error raised by a `LedgerStore` backend. Call sites decide whether it
/// surfaces as `QueryFailed` or `WriteFailed`.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct StoreError(pub String);

pub type Result<T> = std::result::Result<T, AssistantError>;
