//! Filename construction for filed receipts.
//!
//! Turns parsed fields into a sanitized base name, and probes the target
//! folder for the first collision-free `.pdf` name. All functions here are
//! pure except [`unique_pdf_path`], which touches the filesystem.

use chrono::{DateTime, Local};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

use crate::models::record::{ReceiptFields, UNKNOWN};

/// Maximum length of the organization part, in characters.
const MAX_ORG_LEN: usize = 50;

lazy_static! {
    // Boundary between a lowercase letter and the uppercase letter that
    // follows it, e.g. "SomeCharityFoundation".
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z])([A-Z])").unwrap();

    static ref MULTI_SPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// Sanitize the organization field for use in a filename.
///
/// Strips filesystem-hostile characters and 0x00-0x1F controls, splits
/// CamelCase into spaced words, collapses whitespace runs, and truncates to
/// 50 characters. The sentinel maps to `UnknownOrg` untouched.
pub fn org_filename_part(recipient_org: &str) -> String {
    if recipient_org == UNKNOWN {
        return "UnknownOrg".to_string();
    }

    let cleaned: String = recipient_org
        .chars()
        .filter(|c| {
            !matches!(*c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
                && !('\u{0000}'..='\u{001f}').contains(c)
        })
        .collect();

    let spaced = CAMEL_BOUNDARY.replace_all(cleaned.trim(), "${1} ${2}");
    let collapsed = MULTI_SPACE.replace_all(spaced.trim(), " ");

    if collapsed.chars().count() > MAX_ORG_LEN {
        collapsed.chars().take(MAX_ORG_LEN).collect::<String>().trim().to_string()
    } else {
        collapsed.to_string()
    }
}

/// Sanitize the amount field for use in a filename.
///
/// Keeps digits and dots, then drops everything from the first dot on.
/// Dropping cents is a deliberate lossy truncation, not rounding; the ledger
/// keeps the full parsed amount. The sentinel maps to `UnknownAmount`.
pub fn amount_filename_part(amount: &str) -> String {
    if amount == UNKNOWN {
        return "UnknownAmount".to_string();
    }

    let digits: String = amount.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect();
    let integer_part = digits.split('.').next().unwrap_or("");

    if integer_part.is_empty() {
        "0".to_string()
    } else {
        integer_part.to_string()
    }
}

/// The date part passes through the parser's `MM.DD.YYYY` string unchanged.
pub fn date_filename_part(date: &str) -> String {
    if date == UNKNOWN {
        "UnknownDate".to_string()
    } else {
        date.to_string()
    }
}

/// Base name for a fully parsed receipt: `{org}_${amount}_{date}`.
pub fn success_base_name(fields: &ReceiptFields) -> String {
    format!(
        "{}_${}_{}",
        org_filename_part(&fields.recipient_org),
        amount_filename_part(&fields.amount),
        date_filename_part(&fields.date)
    )
}

/// Base name for a receipt with missing fields:
/// `FAILED_{yyyymmddHHMMSS}_{original stem}`.
pub fn failed_base_name(original: &Path, now: DateTime<Local>) -> String {
    format!("FAILED_{}_{}", now.format("%Y%m%d%H%M%S"), file_stem(original))
}

/// Base name for a receipt that errored:
/// `ERROR_{yyyymmddHHMMSS}_{original stem}`.
pub fn error_base_name(original: &Path, now: DateTime<Local>) -> String {
    format!("ERROR_{}_{}", now.format("%Y%m%d%H%M%S"), file_stem(original))
}

/// First free `{base}.pdf`, `{base}_1.pdf`, `{base}_2.pdf`, ... in `dir`.
///
/// The probe is not atomic against concurrent writers; the pipeline is
/// single-threaded and owns the output tree for the run.
pub fn unique_pdf_path(dir: &Path, base: &str) -> PathBuf {
    let mut candidate = dir.join(format!("{}.pdf", base));
    let mut counter = 1u32;

    while candidate.exists() {
        candidate = dir.join(format!("{}_{}.pdf", base, counter));
        counter += 1;
    }

    candidate
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(org: &str, amount: &str, date: &str) -> ReceiptFields {
        ReceiptFields {
            recipient_org: org.to_string(),
            amount: amount.to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_org_strips_forbidden_characters() {
        assert_eq!(org_filename_part(r#"Cats <&> Dogs: "Shelter"?"#), "Cats & Dogs Shelter");
        assert_eq!(org_filename_part("A\\B/C|D*E"), "ABCDE");
    }

    #[test]
    fn test_org_strips_control_characters() {
        assert_eq!(org_filename_part("Red\x00 Cross\x1f"), "Red Cross");
    }

    #[test]
    fn test_org_de_camel_cases() {
        assert_eq!(org_filename_part("SomeCharityFoundation"), "Some Charity Foundation");
        // Already-spaced names stay as they are.
        assert_eq!(org_filename_part("Red Cross"), "Red Cross");
    }

    #[test]
    fn test_org_collapses_whitespace() {
        assert_eq!(org_filename_part("  Red   Cross \t Intl "), "Red Cross Intl");
    }

    #[test]
    fn test_org_truncates_to_fifty_and_trims() {
        let long = "A".repeat(49) + " " + &"B".repeat(30);
        let part = org_filename_part(&long);
        assert_eq!(part.chars().count(), 49);
        assert!(!part.ends_with(' '));
    }

    #[test]
    fn test_org_sentinel() {
        assert_eq!(org_filename_part(UNKNOWN), "UnknownOrg");
    }

    #[test]
    fn test_amount_strips_and_drops_cents() {
        assert_eq!(amount_filename_part("1,234.56"), "1234");
        assert_eq!(amount_filename_part("$125.50"), "125");
        assert_eq!(amount_filename_part("50"), "50");
    }

    #[test]
    fn test_amount_empty_after_strip_is_zero() {
        assert_eq!(amount_filename_part("n/a"), "0");
        assert_eq!(amount_filename_part(".99"), "0");
        assert_eq!(amount_filename_part(""), "0");
    }

    #[test]
    fn test_amount_sentinel() {
        assert_eq!(amount_filename_part(UNKNOWN), "UnknownAmount");
    }

    #[test]
    fn test_date_passthrough_and_sentinel() {
        assert_eq!(date_filename_part("03.22.2023"), "03.22.2023");
        assert_eq!(date_filename_part(UNKNOWN), "UnknownDate");
    }

    #[test]
    fn test_success_base_name() {
        let base = success_base_name(&fields("Red Cross", "125.50", "03.22.2023"));
        assert_eq!(base, "Red Cross_$125_03.22.2023");
    }

    #[test]
    fn test_failed_and_error_base_names() {
        let now = Local::now();
        let stamp = now.format("%Y%m%d%H%M%S").to_string();
        let original = Path::new("/tmp/scan 001.jpeg");

        assert_eq!(failed_base_name(original, now), format!("FAILED_{}_scan 001", stamp));
        assert_eq!(error_base_name(original, now), format!("ERROR_{}_scan 001", stamp));
    }

    #[test]
    fn test_unique_pdf_path_probes_exhaustively() {
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(unique_pdf_path(dir.path(), "base"), dir.path().join("base.pdf"));

        std::fs::write(dir.path().join("base.pdf"), b"x").unwrap();
        assert_eq!(unique_pdf_path(dir.path(), "base"), dir.path().join("base_1.pdf"));

        for k in 1..4 {
            std::fs::write(dir.path().join(format!("base_{}.pdf", k)), b"x").unwrap();
        }
        assert_eq!(unique_pdf_path(dir.path(), "base"), dir.path().join("base_4.pdf"));
    }
}
