//! Core library for donation receipt filing.
//!
//! This crate provides:
//! - Text extraction from PDF and image receipts (embedded text + OCR)
//! - LLM-backed parsing of recipient, amount and date fields
//! - Deterministic, collision-free output naming
//! - The sequential filing pipeline with its CSV ledger

pub mod error;
pub mod extract;
pub mod ledger;
pub mod materialize;
pub mod models;
pub mod naming;
pub mod ocr;
pub mod parse;
pub mod pipeline;

pub use error::{ExtractError, MaterializeError, ReciboError, Result};
pub use extract::{DocumentExtractor, TextExtractor};
pub use ledger::LedgerWriter;
pub use models::{Outcome, OutcomeRow, ReceiptFields, ReciboConfig};
pub use parse::{FieldParser, OpenAiParser};
pub use pipeline::{Pipeline, ProgressSink, RunSummary};
