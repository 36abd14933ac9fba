//! Field-by-field document comparison.

mod report;

pub use report::{ComparisonReport, FieldComparison};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::fields::{FieldValueMap, Metric, NOT_FOUND};
use crate::models::config::ComparisonConfig;

/// How fields whose label was not found take part in scoring.
///
/// Under [`Literal`](Self::Literal) every field is scored and averaged, so two
/// documents that both lack a field agree on it. [`Exclude`](Self::Exclude)
/// reports such fields unscored instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValuePolicy {
    /// Render not-found values as `"N/A"` and score them like any string.
    #[default]
    Literal,
    /// Leave a field unscored when either side is not found.
    Exclude,
}

/// Scores two documents' extracted values against each other.
#[derive(Debug, Clone, Default)]
pub struct DocumentComparator {
    metric: Metric,
    missing_values: MissingValuePolicy,
}

impl DocumentComparator {
    /// Create a comparator with the default metric and policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a comparator from configuration.
    pub fn from_config(config: &ComparisonConfig) -> Self {
        Self::new()
            .with_metric(config.metric)
            .with_missing_values(config.missing_values)
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_missing_values(mut self, policy: MissingValuePolicy) -> Self {
        self.missing_values = policy;
        self
    }

    /// Compare `doc1` against `doc2`.
    ///
    /// The fields of `doc1` drive the comparison. A field missing from `doc2`
    /// counts as an empty value. The report depends only on the two maps; it
    /// carries no timestamp until [`ComparisonReport::stamped`] is called.
    pub fn compare(&self, doc1: &FieldValueMap, doc2: &FieldValueMap) -> ComparisonReport {
        let fields: Vec<FieldComparison> = doc1
            .iter()
            .map(|(field, value1)| {
                let value2 = match doc2.get(field) {
                    Some(value) => value,
                    None => Some(""),
                };
                let score = self.score(value1, value2);

                debug!("{:?}: {:?} vs {:?} -> {:?}", field, value1, value2, score);

                FieldComparison {
                    field: field.to_string(),
                    doc1: value1.unwrap_or(NOT_FOUND).to_string(),
                    doc2: value2.unwrap_or(NOT_FOUND).to_string(),
                    score,
                }
            })
            .collect();

        let scores: Vec<f64> = fields.iter().filter_map(|f| f.score).collect();
        let match_percentage = mean_rounded(&scores);

        info!(
            "Compared {} fields ({} scored): {:.2}% match",
            fields.len(),
            scores.len(),
            match_percentage
        );

        ComparisonReport {
            fields,
            match_percentage,
            scored_fields: scores.len(),
            generated_at: None,
        }
    }

    fn score(&self, value1: Option<&str>, value2: Option<&str>) -> Option<f64> {
        let (value1, value2) = match self.missing_values {
            MissingValuePolicy::Literal => {
                (value1.unwrap_or(NOT_FOUND), value2.unwrap_or(NOT_FOUND))
            }
            MissingValuePolicy::Exclude => (value1?, value2?),
        };

        if value1.is_empty() || value2.is_empty() {
            return Some(0.0);
        }

        Some(self.metric.ratio(&value1.to_lowercase(), &value2.to_lowercase()))
    }
}

/// Compare two documents with the default comparator.
pub fn compare_field_maps(doc1: &FieldValueMap, doc2: &FieldValueMap) -> ComparisonReport {
    DocumentComparator::new().compare(doc1, doc2)
}

/// Arithmetic mean rounded to two decimals, `0` for no scores.
fn mean_rounded(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    (mean * 100.0).round() / 100.0
}
