//! Structured field extraction from receipt text.
//!
//! The parser has one rule: it never returns an error. Any internal failure
//! (API error, malformed response, missing keys) collapses to the
//! all-`UNKNOWN` record and processing continues.

mod json;
mod openai;
pub mod prompts;

pub use json::extract_json_object;
pub use openai::OpenAiParser;

use async_trait::async_trait;

use crate::models::record::ReceiptFields;

/// Turns raw receipt text into the three structured fields.
#[async_trait]
pub trait FieldParser {
    /// Parse `text`. Infallible by contract: failures come back as the
    /// all-`UNKNOWN` record, never as an error.
    async fn parse_fields(&self, text: &str) -> ReceiptFields;
}
