//! The per-file processing pipeline: extract, parse, classify, file, log.
//!
//! Strictly sequential: extraction for file N+1 never starts before file N's
//! ledger row is flushed. The output tree is owned by the run; callers must
//! not invoke [`Pipeline::run`] twice concurrently on the same output root.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, info};

use crate::error::{ExtractError, ReciboError, Result};
use crate::extract::TextExtractor;
use crate::ledger::LedgerWriter;
use crate::materialize::materialize;
use crate::models::record::{Outcome, OutcomeRow};
use crate::naming::{error_base_name, failed_base_name, success_base_name, unique_pdf_path};
use crate::parse::FieldParser;

/// Bucket for receipts that parsed but carry at least one unknown field.
pub const FAILED_DIR: &str = "failed_receipts";

/// Bucket for receipts whose processing raised an error.
pub const ERROR_DIR: &str = "error_receipts";

/// Live progress port. Decouples the pipeline from its presentation layer;
/// the CLI renders these lines to the console, a GUI would marshal them to
/// its log widget.
pub trait ProgressSink {
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files iterated (always equals the ledger's row count).
    pub processed: usize,
    /// Fully parsed and filed at the output root.
    pub succeeded: usize,
    /// Parsed with missing fields, filed under `failed_receipts/`.
    pub failed: usize,
    /// Errored, original copied under `error_receipts/`.
    pub errored: usize,
    /// Errored and the error-bucket copy failed too; original untouched.
    pub critical: usize,
}

/// The receipt filing pipeline.
pub struct Pipeline<E, P> {
    extractor: E,
    parser: P,
}

impl<E: TextExtractor, P: FieldParser> Pipeline<E, P> {
    pub fn new(extractor: E, parser: P) -> Self {
        Self { extractor, parser }
    }

    /// Process `files` in the order given, filing outputs under
    /// `output_root` and appending one row per file to the ledger at
    /// `ledger_path`.
    ///
    /// An empty file list or an empty output root aborts before any
    /// filesystem mutation, with a single warning on the sink.
    pub async fn run(
        &self,
        files: &[PathBuf],
        output_root: &Path,
        ledger_path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary> {
        if files.is_empty() {
            sink.warning("No files selected for processing. Please select files first.");
            return Ok(RunSummary::default());
        }
        if output_root.as_os_str().is_empty() {
            sink.warning("No output folder selected. Please choose a destination folder.");
            return Ok(RunSummary::default());
        }

        if let Some(parent) = ledger_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::create_dir_all(output_root)?;
        std::fs::create_dir_all(output_root.join(FAILED_DIR))?;
        std::fs::create_dir_all(output_root.join(ERROR_DIR))?;

        sink.info(&format!("Found {} files selected for processing.", files.len()));
        sink.info(&format!("Outputting processed files to: {}", output_root.display()));

        let mut ledger = LedgerWriter::create(ledger_path)?;
        let mut summary = RunSummary::default();

        for path in files {
            let filename = display_name(path);
            sink.info(&format!("Processing '{}'...", filename));

            let mut row = OutcomeRow::new(&filename);

            if let Err(e) = self.process_file(path, output_root, &mut row, sink).await {
                self.file_into_error_bucket(path, output_root, &mut row, e, sink);
            }

            // Exactly one row per file, whatever branch resolved it.
            ledger.append(&row)?;

            summary.processed += 1;
            match row.outcome {
                Outcome::Success => summary.succeeded += 1,
                Outcome::MissingData => summary.failed += 1,
                Outcome::Error(_) => summary.errored += 1,
                Outcome::Critical(_) => summary.critical += 1,
            }
        }

        sink.info("Receipt processing complete.");
        sink.info(&format!(
            "Check '{}' for details and '{}' for processed files.",
            ledger_path.display(),
            output_root.display()
        ));

        Ok(summary)
    }

    /// The happy and missing-data paths. Any error bubbles to the caller,
    /// which routes the file into the error bucket.
    async fn process_file(
        &self,
        path: &Path,
        output_root: &Path,
        row: &mut OutcomeRow,
        sink: &dyn ProgressSink,
    ) -> Result<()> {
        let text = self.extractor.extract_text(path)?;
        if text.trim().is_empty() {
            return Err(ExtractError::EmptyExtraction.into());
        }
        debug!("Extracted {} chars from {}", text.len(), path.display());

        sink.info("  - Parsing fields from extracted text...");
        let fields = self.parser.parse_fields(&text).await.normalized();
        row.record_fields(&fields);

        let (outcome, target_dir, base_name) = if fields.is_complete() {
            (Outcome::Success, output_root.to_path_buf(), success_base_name(&fields))
        } else {
            (
                Outcome::MissingData,
                output_root.join(FAILED_DIR),
                failed_base_name(path, Local::now()),
            )
        };

        let dest = unique_pdf_path(&target_dir, &base_name);
        row.new_filename = display_name(&dest);

        sink.info(&format!("  - Status: {}. Filing to '{}'.", outcome, target_dir.display()));
        materialize(path, &dest)?;
        info!("Filed {} as {}", path.display(), dest.display());

        row.outcome = outcome;
        Ok(())
    }

    /// The error path: record the failure, then best-effort copy/convert the
    /// original into `error_receipts/`. A secondary failure escalates to
    /// CRITICAL and leaves the original untouched.
    fn file_into_error_bucket(
        &self,
        path: &Path,
        output_root: &Path,
        row: &mut OutcomeRow,
        error: ReciboError,
        sink: &dyn ProgressSink,
    ) {
        let message = error.to_string();
        sink.error(&format!("  - ERROR processing '{}': {}", row.original_filename, message));
        row.outcome = Outcome::Error(message.clone());
        row.error_message = message;

        let error_dir = output_root.join(ERROR_DIR);
        let dest = unique_pdf_path(&error_dir, &error_base_name(path, Local::now()));
        row.new_filename = display_name(&dest);

        if !path.exists() {
            sink.warning(&format!(
                "  - Original file '{}' is missing. Cannot copy to error folder.",
                row.original_filename
            ));
            return;
        }

        match materialize(path, &dest) {
            Ok(()) => {
                sink.info(&format!(
                    "  - Copied '{}' to error folder as '{}'.",
                    row.original_filename, row.new_filename
                ));
            }
            Err(copy_error) => {
                sink.error(&format!(
                    "  - CRITICAL ERROR: Could not copy '{}' to error folder '{}': {}. \
                     Original left in place; unresolved data loss risk.",
                    row.original_filename,
                    error_dir.display(),
                    copy_error
                ));
                row.outcome = Outcome::Critical(copy_error.to_string());
                row.error_message = format!("Failed to copy to error folder: {}", copy_error);
            }
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
