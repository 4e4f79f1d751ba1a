//! Text extraction from receipt files (PDF or image).
//!
//! PDFs go through `pdf-extract`, fenced with `catch_unwind` because the
//! crate can panic on malformed fonts. Images go through the OCR engine,
//! which is loaded lazily on the first image of the run.

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::models::config::ModelConfig;
use crate::ocr::OcrEngine;

/// Image extensions accepted as receipt scans.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "bmp", "tiff"];

/// True for every extension the pipeline accepts (`.pdf` plus images).
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_lowercase();
    ext == "pdf" || IMAGE_EXTENSIONS.contains(&ext.as_str())
}

/// Source of raw text for the pipeline. Implemented by [`DocumentExtractor`]
/// in production and by stubs in tests.
pub trait TextExtractor {
    /// Extract the raw text of one input file.
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Default extractor: embedded PDF text plus OCR for images.
pub struct DocumentExtractor {
    model_config: ModelConfig,
    // Built on the first image; a load failure is reported per file and
    // retried on the next image.
    ocr: Mutex<Option<OcrEngine>>,
}

impl DocumentExtractor {
    pub fn new(model_config: ModelConfig) -> Self {
        Self {
            model_config,
            ocr: Mutex::new(None),
        }
    }

    fn extract_pdf(&self, path: &Path) -> Result<String, ExtractError> {
        let bytes = std::fs::read(path).map_err(|_| ExtractError::Unreadable(path.to_path_buf()))?;

        // pdf-extract (via its font handling) can panic on certain glyphs.
        let text = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&bytes)
        })) {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(ExtractError::Pdf(e.to_string())),
            Err(_) => {
                warn!("PDF extraction panicked for {}", path.display());
                return Err(ExtractError::Pdf(
                    "extractor panicked - likely malformed fonts".to_string(),
                ));
            }
        };

        debug!("Extracted {} chars of embedded text from {}", text.len(), path.display());
        Ok(text)
    }

    fn extract_image(&self, path: &Path) -> Result<String, ExtractError> {
        let image = image::open(path)?;

        let mut guard = self.ocr.lock().expect("OCR engine lock poisoned");
        if guard.is_none() {
            *guard = Some(OcrEngine::from_config(&self.model_config)?);
        }

        let engine = guard.as_ref().expect("engine just initialized");
        engine.extract_text(&image)
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExtractError> {
        if !path.exists() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }
        // Surfaces permission problems before any real work happens.
        File::open(path).map_err(|_| ExtractError::Unreadable(path.to_path_buf()))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => self.extract_pdf(path),
            e if IMAGE_EXTENSIONS.contains(&e) => self.extract_image(path),
            _ => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                Err(ExtractError::UnsupportedFormat(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_extension() {
        assert!(is_supported_extension("pdf"));
        assert!(is_supported_extension("PDF"));
        assert!(is_supported_extension("jpeg"));
        assert!(is_supported_extension("tiff"));
        assert!(!is_supported_extension("docx"));
        assert!(!is_supported_extension("txt"));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let extractor = DocumentExtractor::new(ModelConfig::default());
        let err = extractor
            .extract_text(Path::new("/nonexistent/receipt.pdf"))
            .unwrap_err();
        assert_eq!(err.to_string(), "File not found: /nonexistent/receipt.pdf");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        let extractor = DocumentExtractor::new(ModelConfig::default());
        let err = extractor.extract_text(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported file type: notes.txt. Only PDF and common image formats are supported."
        );
    }

    #[test]
    fn test_image_without_models_is_ocr_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        // 1x1 white PNG.
        let img = image::RgbImage::from_pixel(1, 1, image::Rgb([255, 255, 255]));
        img.save(&path).unwrap();

        let config = ModelConfig {
            model_dir: dir.path().join("no-models"),
            ..ModelConfig::default()
        };
        let extractor = DocumentExtractor::new(config);
        let err = extractor.extract_text(&path).unwrap_err();
        assert!(err.to_string().starts_with("OCR failed: model file not found"));
    }
}
