//! Generative fallback tier: Gemini structured extraction for messages the
//! lexical classifier cannot resolve, and for all voice input.

pub mod client;
pub mod extractor;
pub mod prompts;
pub mod types;

pub use client::*;
pub use extractor::*;
pub use types::*;
