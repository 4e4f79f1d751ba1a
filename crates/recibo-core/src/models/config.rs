//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// OpenAI parsing configuration.
    pub parser: ParserConfig,

    /// Default folder layout.
    pub folders: FolderConfig,

    /// OCR model configuration for scanned images.
    pub models: ModelConfig,
}

impl Default for ReciboConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            folders: FolderConfig::default(),
            models: ModelConfig::default(),
        }
    }
}

/// OpenAI field-parser configuration.
///
/// The API key itself never lives here; it is read from the `OPENAI_API_KEY`
/// environment variable (optionally via a `.env` file) at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Chat model used for field extraction.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Default folders used when the CLI flags do not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FolderConfig {
    /// Where receipts are picked up when no explicit inputs are given.
    pub input_folder: PathBuf,

    /// Root of the output tree (successes at the root, `failed_receipts/`
    /// and `error_receipts/` beneath it).
    pub output_folder: PathBuf,

    /// Where the run ledger `receipt_log.csv` is written.
    pub log_folder: PathBuf,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            input_folder: PathBuf::from("input_receipts"),
            output_folder: PathBuf::from("output_receipts"),
            log_folder: PathBuf::from("logs"),
        }
    }
}

/// OCR model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// Path of the run ledger under the configured log folder.
    pub fn ledger_path(&self) -> PathBuf {
        self.folders.log_folder.join("receipt_log.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = ReciboConfig::default();
        config.parser.model = "gpt-4o-mini".to_string();
        config.save(&path).unwrap();

        let loaded = ReciboConfig::from_file(&path).unwrap();
        assert_eq!(loaded.parser.model, "gpt-4o-mini");
        assert_eq!(loaded.folders.log_folder, PathBuf::from("logs"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"parser": {"model": "gpt-4o"}}"#).unwrap();

        let loaded = ReciboConfig::from_file(&path).unwrap();
        assert_eq!(loaded.parser.model, "gpt-4o");
        assert_eq!(loaded.parser.timeout_secs, 60);
        assert_eq!(loaded.models.detection_model, "det.onnx");
    }

    #[test]
    fn test_ledger_path() {
        let config = ReciboConfig::default();
        assert_eq!(config.ledger_path(), PathBuf::from("logs/receipt_log.csv"));
    }
}
