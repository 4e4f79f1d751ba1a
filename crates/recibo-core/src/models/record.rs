//! Receipt field record and per-file outcome row.

use serde::{Deserialize, Serialize};

/// Sentinel marking a field the parser could not determine.
///
/// Propagates distinctly from an empty string: an empty or whitespace-only
/// value is normalized to the sentinel before it leaves the parser.
pub const UNKNOWN: &str = "UNKNOWN";

/// Structured fields pulled from one receipt's text.
///
/// Every field is either a non-empty string or the literal [`UNKNOWN`]
/// sentinel; nothing partial flows past the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptFields {
    /// Organization that received the donation/payment.
    #[serde(rename = "RecipientOrgName", default)]
    pub recipient_org: String,

    /// Total amount, digits and at most one decimal point, no currency symbol.
    #[serde(rename = "Amount", default)]
    pub amount: String,

    /// Receipt date as `MM.DD.YYYY` when known.
    #[serde(rename = "Date", default)]
    pub date: String,
}

impl ReceiptFields {
    /// The all-unknown record the parser falls back to on any failure.
    pub fn unknown() -> Self {
        Self {
            recipient_org: UNKNOWN.to_string(),
            amount: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
        }
    }

    /// Enforce the field invariant: trim each value and collapse anything
    /// empty to the sentinel.
    pub fn normalized(self) -> Self {
        Self {
            recipient_org: normalize_field(self.recipient_org),
            amount: normalize_field(self.amount),
            date: normalize_field(self.date),
        }
    }

    /// True when no field carries the sentinel.
    pub fn is_complete(&self) -> bool {
        self.recipient_org != UNKNOWN && self.amount != UNKNOWN && self.date != UNKNOWN
    }
}

impl Default for ReceiptFields {
    fn default() -> Self {
        Self::unknown()
    }
}

fn normalize_field(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Final classification of one processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All three fields known; file placed in the output root.
    Success,
    /// At least one field unknown; file placed in `failed_receipts/`.
    MissingData,
    /// Processing raised an error; original copied to `error_receipts/`.
    Error(String),
    /// The error-bucket copy itself failed; original left untouched.
    Critical(String),
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::MissingData => write!(f, "FAILED - Missing Data"),
            Outcome::Error(msg) => write!(f, "ERROR - {}", msg),
            Outcome::Critical(msg) => write!(f, "CRITICAL ERROR - {}", msg),
        }
    }
}

/// One ledger row, created at the start of a file's unit of work and written
/// exactly once when the unit resolves. Field values are whatever was
/// populated before the terminating branch; the rest stay at their defaults.
#[derive(Debug, Clone)]
pub struct OutcomeRow {
    /// Input file name (no directory components).
    pub original_filename: String,
    /// Parsed organization, or the sentinel.
    pub recipient_org: String,
    /// Parsed amount as the parser returned it (cents intact), or the sentinel.
    pub amount: String,
    /// Parsed date, or the sentinel.
    pub date: String,
    /// Name of the materialized output PDF, empty if none was resolved.
    pub new_filename: String,
    /// Final classification.
    pub outcome: Outcome,
    /// Error detail for the ERROR/CRITICAL paths, empty otherwise.
    pub error_message: String,
}

impl OutcomeRow {
    /// Row with sentinel/blank defaults for a file about to be processed.
    pub fn new(original_filename: &str) -> Self {
        Self {
            original_filename: original_filename.to_string(),
            recipient_org: UNKNOWN.to_string(),
            amount: UNKNOWN.to_string(),
            date: UNKNOWN.to_string(),
            new_filename: String::new(),
            outcome: Outcome::Error("not processed".to_string()),
            error_message: String::new(),
        }
    }

    /// Copy the parsed fields into the row for the ledger.
    pub fn record_fields(&mut self, fields: &ReceiptFields) {
        self.recipient_org = fields.recipient_org.clone();
        self.amount = fields.amount.clone();
        self.date = fields.date.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalized_collapses_blank_fields() {
        let fields = ReceiptFields {
            recipient_org: "  Red Cross  ".to_string(),
            amount: "   ".to_string(),
            date: String::new(),
        }
        .normalized();

        assert_eq!(fields.recipient_org, "Red Cross");
        assert_eq!(fields.amount, UNKNOWN);
        assert_eq!(fields.date, UNKNOWN);
        assert!(!fields.is_complete());
    }

    #[test]
    fn test_is_complete() {
        let mut fields = ReceiptFields {
            recipient_org: "Red Cross".to_string(),
            amount: "125.50".to_string(),
            date: "03.22.2023".to_string(),
        };
        assert!(fields.is_complete());

        fields.date = UNKNOWN.to_string();
        assert!(!fields.is_complete());
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Success.to_string(), "SUCCESS");
        assert_eq!(Outcome::MissingData.to_string(), "FAILED - Missing Data");
        assert_eq!(
            Outcome::Error("File not found: /tmp/x.pdf".to_string()).to_string(),
            "ERROR - File not found: /tmp/x.pdf"
        );
        assert_eq!(
            Outcome::Critical("disk full".to_string()).to_string(),
            "CRITICAL ERROR - disk full"
        );
    }

    #[test]
    fn test_deserialize_missing_keys_default_empty() {
        let fields: ReceiptFields = serde_json::from_str(r#"{"Amount": "50"}"#).unwrap();
        let fields = fields.normalized();
        assert_eq!(fields.amount, "50");
        assert_eq!(fields.recipient_org, UNKNOWN);
        assert_eq!(fields.date, UNKNOWN);
    }
}
