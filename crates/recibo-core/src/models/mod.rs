//! Data models for the receipt pipeline.

pub mod config;
pub mod record;

pub use config::ReciboConfig;
pub use record::{Outcome, OutcomeRow, ReceiptFields};
