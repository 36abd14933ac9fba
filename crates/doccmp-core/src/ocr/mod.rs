//! OCR fragment sources.
//!
//! The OCR engine itself is an external collaborator: everything downstream
//! only sees the ordered [`TextFragment`] sequence a [`FragmentSource`]
//! produces for one document image.

mod json;
#[cfg(feature = "ocr")]
mod pure_engine;

pub use json::JsonFragmentSource;
#[cfg(feature = "ocr")]
pub use pure_engine::OcrImageSource;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExtractionError;

/// A recognized text span with its quadrilateral bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Recognized text, kept verbatim.
    pub text: String,

    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognition confidence score (0.0 - 1.0), when the source reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl TextFragment {
    /// Create a fragment from text and a flat quadrilateral.
    pub fn new(text: impl Into<String>, bbox: [f32; 8]) -> Self {
        Self {
            text: text.into(),
            bbox,
            confidence: None,
        }
    }

    /// Create a fragment from an axis-aligned rectangle.
    pub fn from_rect(text: impl Into<String>, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(text, [x0, y0, x1, y0, x1, y1, x0, y1])
    }

    /// Set the recognition confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Get the center point of the bounding box.
    pub fn center(&self) -> (f32, f32) {
        let x = (self.bbox[0] + self.bbox[2] + self.bbox[4] + self.bbox[6]) / 4.0;
        let y = (self.bbox[1] + self.bbox[3] + self.bbox[5] + self.bbox[7]) / 4.0;
        (x, y)
    }

    /// Get the width of the bounding box.
    pub fn width(&self) -> f32 {
        let dx = self.bbox[2] - self.bbox[0];
        let dy = self.bbox[3] - self.bbox[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the height of the bounding box.
    pub fn height(&self) -> f32 {
        let dx = self.bbox[6] - self.bbox[0];
        let dy = self.bbox[7] - self.bbox[1];
        (dx * dx + dy * dy).sqrt()
    }

    /// Get the axis-aligned bounding rectangle as (min_x, min_y, max_x, max_y).
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Supplies the ordered fragment sequence for one document.
///
/// Implementations must return the same sequence for identical input and
/// must be shareable across threads, since both documents of a comparison
/// may be extracted concurrently.
pub trait FragmentSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produce fragments for the document at `input`.
    fn fragments(&self, input: &Path) -> Result<Vec<TextFragment>, ExtractionError>;
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Source that picks a backend from the input's file extension.
///
/// `.json` files are read as OCR dumps; image files go through the OCR
/// engine when one is attached.
pub struct AutoSource {
    json: JsonFragmentSource,
    #[cfg(feature = "ocr")]
    engine: Option<OcrImageSource>,
}

impl AutoSource {
    /// Create a source that only understands OCR dumps.
    pub fn new() -> Self {
        Self {
            json: JsonFragmentSource::new(),
            #[cfg(feature = "ocr")]
            engine: None,
        }
    }

    /// Attach an OCR engine for image inputs.
    #[cfg(feature = "ocr")]
    pub fn with_engine(mut self, engine: OcrImageSource) -> Self {
        self.engine = Some(engine);
        self
    }

    fn image_fragments(&self, input: &Path) -> Result<Vec<TextFragment>, ExtractionError> {
        #[cfg(feature = "ocr")]
        {
            if let Some(ref engine) = self.engine {
                return engine.fragments(input);
            }
        }

        Err(ExtractionError::UnsupportedInput(format!(
            "{} is an image but no OCR engine is available",
            input.display()
        )))
    }
}

impl Default for AutoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentSource for AutoSource {
    fn name(&self) -> &str {
        "auto"
    }

    fn fragments(&self, input: &Path) -> Result<Vec<TextFragment>, ExtractionError> {
        let extension = input
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        debug!("Dispatching {} by extension {:?}", input.display(), extension);

        match extension.as_str() {
            "json" => self.json.fragments(input),
            ext if IMAGE_EXTENSIONS.contains(&ext) => self.image_fragments(input),
            _ => Err(ExtractionError::UnsupportedInput(format!(
                "unsupported file format: {}",
                input.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_geometry() {
        let fragment = TextFragment::from_rect("Name of Work", 10.0, 20.0, 110.0, 40.0);

        assert_eq!(fragment.center(), (60.0, 30.0));
        assert_eq!(fragment.width(), 100.0);
        assert_eq!(fragment.height(), 20.0);
        assert_eq!(fragment.rect(), (10.0, 20.0, 110.0, 40.0));
    }

    #[test]
    fn test_auto_source_rejects_unknown_extension() {
        let source = AutoSource::new();
        let err = source.fragments(Path::new("scan.docx")).unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedInput(_)));
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn test_auto_source_without_engine_rejects_images() {
        let source = AutoSource::new();
        let err = source.fragments(Path::new("scan.PNG")).unwrap_err();
        assert!(err.to_string().contains("no OCR engine"));
    }
}
