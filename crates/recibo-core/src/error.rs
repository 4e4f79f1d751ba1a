//! Error types for the recibo-core library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the recibo library.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// Text extraction error.
    #[error("{0}")]
    Extract(#[from] ExtractError),

    /// Output materialization error (copy or image-to-PDF conversion).
    #[error("{0}")]
    Materialize(#[from] MaterializeError),

    /// Ledger write error.
    #[error("ledger error: {0}")]
    Ledger(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while turning an input file into text.
///
/// Display strings double as the ledger's `Error Message` column, so they
/// stay stable across releases.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The input file exists but cannot be opened for reading.
    #[error("Cannot read file: {}", .0.display())]
    Unreadable(PathBuf),

    /// The extension is not one of the accepted receipt formats.
    #[error("Unsupported file type: {0}. Only PDF and common image formats are supported.")]
    UnsupportedFormat(String),

    /// Extraction ran but produced only whitespace.
    #[error("No discernible text extracted from the file.")]
    EmptyExtraction,

    /// The embedded-text PDF path failed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// The image could not be decoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// The OCR engine could not be loaded or failed on the image.
    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// Errors raised while producing the output PDF at its resolved path.
#[derive(Error, Debug)]
pub enum MaterializeError {
    /// Copy or write failed (disk full, permissions, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The source image could not be decoded for conversion.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Building the single-page PDF failed.
    #[error("failed to build PDF: {0}")]
    Pdf(String),
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
