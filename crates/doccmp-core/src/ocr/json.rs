//! Fragment source reading OCR dumps from JSON files.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ExtractionError;

use super::{FragmentSource, TextFragment};

/// One PaddleOCR line: `[[[x, y], ...], [text, confidence]]`.
#[derive(Debug, Deserialize)]
struct PaddleLine(Vec<[f32; 2]>, (String, f32));

/// Accepted dump layouts.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OcrDump {
    /// Native layout: `[{"text": ..., "bbox": [...]}]`.
    Fragments(Vec<TextFragment>),
    /// Flat list of PaddleOCR lines.
    Paddle(Vec<PaddleLine>),
    /// PaddleOCR page-wrapped output; a page without text is `null`.
    PaddlePages(Vec<Option<Vec<PaddleLine>>>),
}

impl PaddleLine {
    fn into_fragment(self) -> TextFragment {
        let PaddleLine(points, (text, confidence)) = self;
        let mut bbox = [0.0f32; 8];
        for (i, point) in points.iter().take(4).enumerate() {
            bbox[i * 2] = point[0];
            bbox[i * 2 + 1] = point[1];
        }
        TextFragment::new(text, bbox).with_confidence(confidence)
    }
}

impl OcrDump {
    fn into_fragments(self) -> Vec<TextFragment> {
        let fragments: Vec<TextFragment> = match self {
            OcrDump::Fragments(fragments) => fragments,
            OcrDump::Paddle(lines) => lines.into_iter().map(PaddleLine::into_fragment).collect(),
            // Only the first page is compared.
            OcrDump::PaddlePages(pages) => pages
                .into_iter()
                .next()
                .flatten()
                .unwrap_or_default()
                .into_iter()
                .map(PaddleLine::into_fragment)
                .collect(),
        };

        fragments
            .into_iter()
            .map(|mut f| {
                f.text = f.text.trim().to_string();
                f
            })
            .collect()
    }
}

/// Reads fragments from an OCR dump written by an external OCR run.
#[derive(Debug, Clone, Default)]
pub struct JsonFragmentSource;

impl JsonFragmentSource {
    /// Create a new JSON source.
    pub fn new() -> Self {
        Self
    }

    /// Parse fragments from an in-memory dump.
    pub fn parse(&self, content: &str, origin: &Path) -> Result<Vec<TextFragment>, ExtractionError> {
        let dump: OcrDump =
            serde_json::from_str(content).map_err(|e| ExtractionError::InvalidFragments {
                path: origin.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(dump.into_fragments())
    }
}

impl FragmentSource for JsonFragmentSource {
    fn name(&self) -> &str {
        "json"
    }

    fn fragments(&self, input: &Path) -> Result<Vec<TextFragment>, ExtractionError> {
        let content =
            std::fs::read_to_string(input).map_err(|e| ExtractionError::SourceUnavailable {
                path: input.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("Read {} bytes of OCR output from {}", content.len(), input.display());

        let fragments = self.parse(&content, input)?;

        info!("Loaded {} fragments from {}", fragments.len(), input.display());

        Ok(fragments)
    }
}
