//! OCR engine wrapper for scanned receipt images.
//!
//! Backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime). Models
//! are loaded from a directory on disk; a missing model set surfaces as a
//! per-file extraction error, never a crash.

use std::path::Path;
use std::time::Instant;

use image::DynamicImage;
use tracing::{debug, info};

use crate::error::ExtractError;
use crate::models::config::ModelConfig;

/// OCR engine that turns a receipt image into plain text.
pub struct OcrEngine {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OcrEngine {
    /// Load detection/recognition models and the dictionary from `config`.
    pub fn from_config(config: &ModelConfig) -> Result<Self, ExtractError> {
        let det_path = config.model_dir.join(&config.detection_model);
        let rec_path = config.model_dir.join(&config.recognition_model);
        let dict_path = config.model_dir.join(&config.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(ExtractError::Ocr(format!(
                    "model file not found: {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| ExtractError::Ocr(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded OCR engine from {}", config.model_dir.display());

        Ok(Self { engine })
    }

    /// Run OCR and join the recognized regions into one text block in
    /// rough reading order (top-to-bottom rows, left-to-right within a row).
    pub fn extract_text(&self, image: &DynamicImage) -> Result<String, ExtractError> {
        let start = Instant::now();

        let results = self
            .engine
            .run_from_image(image)
            .map_err(|e| ExtractError::Ocr(format!("pure-onnx-ocr: {}", e)))?;

        let mut regions: Vec<(f64, f64, String)> = results
            .iter()
            .map(|r| {
                let (x, y) = top_left(&r.bounding_box);
                (x, y, r.text.replace("[UNK]", " "))
            })
            .collect();

        regions.sort_by(|a, b| {
            let row_a = (a.1 / 20.0) as i64;
            let row_b = (b.1 / 20.0) as i64;
            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        let text = regions
            .iter()
            .map(|(_, _, t)| t.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        debug!(
            "OCR recognized {} regions in {}ms",
            regions.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Top-left corner of a detected region's polygon.
fn top_left(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f64, f64) {
    polygon
        .exterior()
        .coords()
        .next()
        .map(|c| (c.x, c.y))
        .unwrap_or((0.0, 0.0))
}
