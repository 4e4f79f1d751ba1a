//! Per-run CSV ledger, one row per processed file.
//!
//! The ledger is opened fresh for each run (overwriting any prior log of the
//! same name) and flushed after every row, so a crash mid-run leaves a
//! truncated-but-valid prefix instead of a buffered loss.

use std::fs::File;
use std::path::Path;

use crate::error::Result;
use crate::models::record::OutcomeRow;

/// Fixed 7-column ledger header.
pub const LEDGER_HEADER: [&str; 7] = [
    "Original Filename",
    "RecipientOrgName",
    "Amount",
    "Date",
    "New Filename",
    "Status",
    "Error Message",
];

/// Append-only CSV writer for the run's outcome rows.
pub struct LedgerWriter {
    writer: csv::Writer<File>,
}

impl LedgerWriter {
    /// Create (or truncate) the ledger at `path` and write the header row.
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(LEDGER_HEADER)?;
        writer.flush().map_err(csv::Error::from)?;

        Ok(Self { writer })
    }

    /// Write one outcome row and flush it to disk.
    pub fn append(&mut self, row: &OutcomeRow) -> Result<()> {
        self.writer.write_record([
            row.original_filename.as_str(),
            row.recipient_org.as_str(),
            row.amount.as_str(),
            row.date.as_str(),
            row.new_filename.as_str(),
            &row.outcome.to_string(),
            row.error_message.as_str(),
        ])?;
        self.writer.flush().map_err(csv::Error::from)?;

        Ok(())
    }
}
