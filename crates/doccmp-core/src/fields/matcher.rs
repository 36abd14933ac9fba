//! Fuzzy label matching over an OCR fragment sequence.

use std::fmt;

use tracing::{debug, trace};

use crate::models::config::MatchingConfig;
use crate::ocr::TextFragment;

use super::locator::{NextFragment, ValueLocator};
use super::similarity::Metric;

/// Default label threshold; a label must score strictly above it.
pub const DEFAULT_LABEL_THRESHOLD: f64 = 80.0;

/// The fragment judged to be a field's label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMatch {
    /// Index of the label fragment.
    pub index: usize,
    /// Partial-ratio score of the label (0 - 100).
    pub score: f64,
}

/// Finds a field's label fragment and infers its value.
pub struct FieldMatcher {
    threshold: f64,
    metric: Metric,
    locator: Box<dyn ValueLocator>,
}

impl FieldMatcher {
    /// Create a matcher with the default threshold, metric and next-fragment locator.
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_LABEL_THRESHOLD,
            metric: Metric::default(),
            locator: Box::new(NextFragment),
        }
    }

    /// Build a matcher from configuration.
    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new()
            .with_threshold(config.label_threshold)
            .with_metric(config.metric)
            .with_boxed_locator(config.value_strategy.locator())
    }

    /// Set the label threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the similarity metric.
    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    /// Set the value locator.
    pub fn with_locator(self, locator: impl ValueLocator + 'static) -> Self {
        self.with_boxed_locator(Box::new(locator))
    }

    fn with_boxed_locator(mut self, locator: Box<dyn ValueLocator>) -> Self {
        self.locator = locator;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Find the best label for `field_name`.
    ///
    /// Scores every fragment's lower-cased text against the name. The highest
    /// score wins, the earliest fragment wins ties, and nothing qualifies
    /// unless it scores strictly above the threshold.
    pub fn find_label(&self, fragments: &[TextFragment], field_name: &str) -> Option<LabelMatch> {
        let mut best: Option<LabelMatch> = None;

        for (index, fragment) in fragments.iter().enumerate() {
            let score = self
                .metric
                .partial_ratio(field_name, &fragment.text.to_lowercase());

            trace!("{:?} vs {:?}: {:.2}", field_name, fragment.text, score);

            if score <= self.threshold {
                continue;
            }

            match best {
                Some(current) if score <= current.score => {}
                _ => best = Some(LabelMatch { index, score }),
            }
        }

        best
    }

    /// Find the value for `field_name`, or `None` when it is not on the page.
    pub fn match_field(&self, fragments: &[TextFragment], field_name: &str) -> Option<String> {
        let label = self.find_label(fragments, field_name)?;
        let value = self.locator.locate(fragments, label.index);

        debug!(
            "Field {:?}: label {:?} at {} (score {:.2}) -> {:?}",
            field_name, fragments[label.index].text, label.index, label.score, value
        );

        value
    }
}

impl Default for FieldMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMatcher")
            .field("threshold", &self.threshold)
            .field("metric", &self.metric)
            .finish_non_exhaustive()
    }
}

/// Match one field with the default matcher.
pub fn match_field(fragments: &[TextFragment], field_name: &str) -> Option<String> {
    FieldMatcher::new().match_field(fragments, field_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::locator::SameRowRight;
    use proptest::prelude::*;

    fn fragment(text: &str) -> TextFragment {
        TextFragment::from_rect(text, 0.0, 0.0, 10.0, 10.0)
    }

    #[test]
    fn test_label_followed_by_value() {
        let fragments = vec![
            fragment("Name of Work"),
            fragment("Bridge Construction Phase 2"),
        ];

        let label = FieldMatcher::new().find_label(&fragments, "name of work").unwrap();
        assert_eq!(label.index, 0);
        assert_eq!(label.score, 100.0);
        assert_eq!(
            match_field(&fragments, "name of work"),
            Some("Bridge Construction Phase 2".to_string())
        );
    }

    #[test]
    fn test_no_label_above_threshold() {
        let fragments = vec![fragment("Total")];
        assert_eq!(match_field(&fragments, "est. value"), None);
    }

    #[test]
    fn test_empty_fragments() {
        assert_eq!(match_field(&[], "name of work"), None);
        assert_eq!(FieldMatcher::new().find_label(&[], ""), None);
    }

    #[test]
    fn test_label_at_last_index() {
        let fragments = vec![fragment("Bridge Phase 2"), fragment("Name of Work")];
        assert_eq!(match_field(&fragments, "name of work"), None);
    }

    #[test]
    fn test_first_seen_wins_ties() {
        let fragments = vec![
            fragment("Est. Value"),
            fragment("first"),
            fragment("EST. VALUE"),
            fragment("second"),
        ];
        assert_eq!(match_field(&fragments, "est. value"), Some("first".to_string()));
    }

    #[test]
    fn test_higher_score_replaces_earlier_label() {
        let fragments = vec![
            fragment("Name of Wrk"),
            fragment("draft"),
            fragment("Name of Work"),
            fragment("Bridge Phase 2"),
        ];
        assert_eq!(match_field(&fragments, "name of work"), Some("Bridge Phase 2".to_string()));
    }

    #[test]
    fn test_threshold_is_strict() {
        let fragments = vec![fragment("Name of Work"), fragment("value")];
        let matcher = FieldMatcher::new().with_threshold(100.0);
        assert_eq!(matcher.match_field(&fragments, "name of work"), None);
        let matcher = FieldMatcher::new().with_threshold(99.9);
        assert_eq!(matcher.match_field(&fragments, "name of work"), Some("value".to_string()));
    }

    #[test]
    fn test_value_text_is_verbatim() {
        let fragments = vec![fragment("NAME OF WORK"), fragment("  Bridge  ")];
        assert_eq!(match_field(&fragments, "name of work"), Some("  Bridge  ".to_string()));
    }

    #[test]
    fn test_custom_locator() {
        let fragments = vec![
            TextFragment::from_rect("Name of Work", 0.0, 0.0, 100.0, 20.0),
            TextFragment::from_rect("Est. Value", 0.0, 40.0, 100.0, 60.0),
            TextFragment::from_rect("Bridge Phase 2", 150.0, 2.0, 300.0, 18.0),
        ];

        let matcher = FieldMatcher::new().with_locator(SameRowRight);
        assert_eq!(
            matcher.match_field(&fragments, "name of work"),
            Some("Bridge Phase 2".to_string())
        );
    }

    proptest! {
        #[test]
        fn prop_match_is_deterministic(
            texts in proptest::collection::vec("[a-zA-Z .]{0,12}", 0..8),
            field in "[a-z .]{1,10}",
        ) {
            let fragments: Vec<TextFragment> = texts.iter().map(|t| fragment(t)).collect();
            let matcher = FieldMatcher::new();
            prop_assert_eq!(
                matcher.match_field(&fragments, &field),
                matcher.match_field(&fragments, &field)
            );
        }

        #[test]
        fn prop_unmatched_field_is_absent(
            texts in proptest::collection::vec("[0-9]{1,8}", 0..8),
        ) {
            let fragments: Vec<TextFragment> = texts.iter().map(|t| fragment(t)).collect();
            prop_assert_eq!(match_field(&fragments, "name of work"), None);
        }
    }
}
