//! Image fragment source backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::config::OcrConfig;

use super::{FragmentSource, TextFragment};

/// OCR engine handle, loaded once by the host and shared by every extraction.
pub struct OcrImageSource {
    engine: Mutex<pure_onnx_ocr::engine::OcrEngine>,
    config: OcrConfig,
}

impl OcrImageSource {
    /// Load the detection and recognition models named in `config`.
    pub fn from_config(config: OcrConfig) -> Result<Self, ExtractionError> {
        let model_dir = config.model_dir.as_path();
        let det_path = model_dir.join(&config.detection_model);
        let rec_path = model_dir.join(&config.recognition_model);
        let dict_path = model_dir.join(&config.dictionary);

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| ExtractionError::Ocr(format!("failed to load models: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self {
            engine: Mutex::new(engine),
            config,
        })
    }

    /// Check whether the configured model files exist.
    pub fn models_present(config: &OcrConfig) -> bool {
        let model_dir: &Path = config.model_dir.as_path();
        model_dir.join(&config.detection_model).exists()
            && model_dir.join(&config.recognition_model).exists()
    }
}

impl FragmentSource for OcrImageSource {
    fn name(&self) -> &str {
        "pure-onnx-ocr"
    }

    fn fragments(&self, input: &Path) -> Result<Vec<TextFragment>, ExtractionError> {
        let start = Instant::now();

        let image = image::open(input).map_err(|e| ExtractionError::SourceUnavailable {
            path: input.to_path_buf(),
            reason: e.to_string(),
        })?;
        let (width, height) = image.dimensions();

        info!("Processing image {}: {}x{}", input.display(), width, height);

        let engine = self
            .engine
            .lock()
            .map_err(|_| ExtractionError::Ocr("OCR engine lock poisoned".to_string()))?;

        let results = engine
            .run_from_image(&image)
            .map_err(|e| ExtractionError::Ocr(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        // Engine order is kept as the reading order.
        let fragments: Vec<TextFragment> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                TextFragment::new(text.trim(), polygon_to_bbox(&r.bounding_box))
                    .with_confidence(r.confidence)
            })
            .collect();

        info!(
            "OCR complete: {} fragments in {}ms",
            fragments.len(),
            start.elapsed().as_millis()
        );

        Ok(fragments)
    }
}

/// Convert a `Polygon<f64>` to the flat `[x1, y1, ..., x4, y4]` layout.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}
