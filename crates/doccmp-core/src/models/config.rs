//! Configuration structures for the comparison pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compare::MissingValuePolicy;
use crate::error::{ConfigError, Result};
use crate::fields::{DEFAULT_LABEL_THRESHOLD, Metric, ValueStrategy};

use super::catalog::FieldCatalog;

/// Main configuration for doccmp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoccmpConfig {
    /// Label matching configuration.
    pub matching: MatchingConfig,

    /// Value comparison configuration.
    pub comparison: ComparisonConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Field lists per document classification.
    pub catalog: FieldCatalog,
}

/// Label matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// A label must score strictly above this (0 - 100).
    pub label_threshold: f64,

    /// Metric used to score labels.
    pub metric: Metric,

    /// How the value is located once a label is found.
    pub value_strategy: ValueStrategy,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            label_threshold: DEFAULT_LABEL_THRESHOLD,
            metric: Metric::Indel,
            value_strategy: ValueStrategy::NextFragment,
        }
    }
}

/// Value comparison configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Metric used to score value pairs.
    pub metric: Metric,

    /// Treatment of fields that were not found.
    pub missing_values: MissingValuePolicy,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` tokens in recognized text instead of replacing them with spaces.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "en_rec.onnx".to_string(),
            dictionary: "en_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

impl DoccmpConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let threshold = self.matching.label_threshold;
        if !(0.0..=100.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "matching.label_threshold must be within 0-100, got {}",
                threshold
            )));
        }
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.ocr.model_dir.join(model_name)
    }
}
