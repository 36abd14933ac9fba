//! Comparison report data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comparison of one field across both documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldComparison {
    /// Normalized field name.
    pub field: String,

    /// Value from the first document (`"N/A"` when not found).
    pub doc1: String,

    /// Value from the second document (`"N/A"` when not found).
    pub doc2: String,

    /// Similarity (0 - 100), or `None` when the field was left unscored.
    pub score: Option<f64>,
}

/// Result of comparing two documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Per-field results in request order.
    pub fields: Vec<FieldComparison>,

    /// Mean of the scored fields, rounded to two decimals.
    pub match_percentage: f64,

    /// Number of fields that contributed to the mean.
    pub scored_fields: usize,

    /// When the report was handed out, set by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl ComparisonReport {
    /// Record when the report was produced.
    pub fn stamped(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Look up a field's result.
    pub fn get(&self, field: &str) -> Option<&FieldComparison> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Fields whose score is below `threshold`, including unscored ones.
    pub fn mismatches(&self, threshold: f64) -> Vec<&FieldComparison> {
        self.fields
            .iter()
            .filter(|f| f.score.is_none_or(|s| s < threshold))
            .collect()
    }
}
