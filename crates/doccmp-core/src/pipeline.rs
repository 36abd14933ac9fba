//! Source -> extractor -> comparator orchestration.

use std::path::Path;
use std::time::Instant;

use chrono::Utc;
use tracing::info;

use crate::compare::{ComparisonReport, DocumentComparator};
use crate::error::Result;
use crate::fields::{FieldExtractor, FieldMatcher, FieldRequest, FieldValueMap};
use crate::models::config::DoccmpConfig;
use crate::ocr::FragmentSource;

/// Compares documents using an injected fragment source.
///
/// The pipeline owns no OCR state of its own; the source is created by the
/// host and reused for every document.
pub struct ComparisonPipeline {
    source: Box<dyn FragmentSource>,
    extractor: FieldExtractor,
    comparator: DocumentComparator,
}

impl ComparisonPipeline {
    /// Create a pipeline with matcher and comparator settings from `config`.
    pub fn new(source: Box<dyn FragmentSource>, config: &DoccmpConfig) -> Self {
        Self {
            source,
            extractor: FieldExtractor::with_matcher(FieldMatcher::from_config(&config.matching)),
            comparator: DocumentComparator::from_config(&config.comparison),
        }
    }

    /// Replace the extractor, e.g. to use a custom value locator.
    pub fn with_extractor(mut self, extractor: FieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn comparator(&self) -> &DocumentComparator {
        &self.comparator
    }

    /// Extract the requested fields of one document.
    ///
    /// Fails without producing any values when the source cannot supply the
    /// document's fragments.
    pub fn extract(&self, input: &Path, request: &FieldRequest) -> Result<FieldValueMap> {
        let start = Instant::now();
        let fragments = self.source.fragments(input)?;
        let values = self.extractor.extract(&fragments, request);

        info!(
            "Extracted {} via {} in {}ms",
            input.display(),
            self.source.name(),
            start.elapsed().as_millis()
        );

        Ok(values)
    }

    /// Extract both documents sequentially and compare them. The returned
    /// report is stamped with the current time.
    pub fn compare(
        &self,
        doc1: &Path,
        doc2: &Path,
        request: &FieldRequest,
    ) -> Result<ComparisonReport> {
        let values1 = self.extract(doc1, request)?;
        let values2 = self.extract(doc2, request)?;
        Ok(self.comparator.compare(&values1, &values2).stamped(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DoccmpError, ExtractionError};
    use crate::ocr::TextFragment;
    use std::collections::HashMap;
    use std::path::PathBuf;

    struct FixedSource {
        pages: HashMap<PathBuf, Vec<TextFragment>>,
    }

    impl FragmentSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        fn fragments(&self, input: &Path) -> std::result::Result<Vec<TextFragment>, ExtractionError> {
            self.pages
                .get(input)
                .cloned()
                .ok_or_else(|| ExtractionError::SourceUnavailable {
                    path: input.to_path_buf(),
                    reason: "not found".to_string(),
                })
        }
    }

    fn page(texts: &[&str]) -> Vec<TextFragment> {
        texts
            .iter()
            .map(|t| TextFragment::from_rect(*t, 0.0, 0.0, 10.0, 10.0))
            .collect()
    }

    fn pipeline() -> ComparisonPipeline {
        let mut pages = HashMap::new();
        pages.insert(
            PathBuf::from("a"),
            page(&["Name of Work", "Bridge Phase 2", "Est. Value", "Rs. 4,50,000"]),
        );
        pages.insert(
            PathBuf::from("b"),
            page(&["Name of Work", "Bridge Phase 2", "Est Value", "Rs. 4,50,000/-"]),
        );
        ComparisonPipeline::new(Box::new(FixedSource { pages }), &DoccmpConfig::default())
    }

    #[test]
    fn test_compare_documents() {
        let request = FieldRequest::parse("Name of Work, Est. Value").unwrap();
        let report = pipeline()
            .compare(Path::new("a"), Path::new("b"), &request)
            .unwrap();

        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.get("name of work").unwrap().score, Some(100.0));

        let value = report.get("est. value").unwrap();
        assert_eq!(value.doc2, "Rs. 4,50,000/-");
        assert!(value.score.unwrap() > 90.0);
        assert!(report.match_percentage > 95.0);
        assert!(report.generated_at.is_some());
    }

    #[test]
    fn test_source_failure_propagates() {
        let request = FieldRequest::parse("Name of Work").unwrap();
        let err = pipeline()
            .compare(Path::new("a"), Path::new("missing"), &request)
            .unwrap_err();

        assert!(matches!(
            err,
            DoccmpError::Extraction(ExtractionError::SourceUnavailable { .. })
        ));
    }
}
