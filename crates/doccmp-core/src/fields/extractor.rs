//! Per-document field extraction.

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::ocr::TextFragment;

use super::NOT_FOUND;
use super::matcher::FieldMatcher;
use super::request::FieldRequest;

/// Extracted values for one document, keyed by normalized field name.
///
/// Keys keep the order in which they were first requested. A value of `None`
/// means the field's label was not found; it renders as [`NOT_FOUND`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValueMap {
    entries: Vec<(String, Option<String>)>,
}

impl FieldValueMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, replacing any earlier value for the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Look up a field. The outer `None` means the field was never requested.
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_deref())
    }

    /// Look up a field rendered for display (`"N/A"` when not found).
    pub fn rendered(&self, name: &str) -> Option<&str> {
        self.get(name).map(|v| v.unwrap_or(NOT_FOUND))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field names in request order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Number of fields whose label was found.
    pub fn found_count(&self) -> usize {
        self.entries.iter().filter(|(_, v)| v.is_some()).count()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for FieldValueMap {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut map = FieldValueMap::new();
        for (name, value) in iter {
            map.insert(name, value);
        }
        map
    }
}

impl Serialize for FieldValueMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value.as_deref().unwrap_or(NOT_FOUND))?;
        }
        map.end()
    }
}

/// Runs the matcher over every requested field of one document.
#[derive(Debug, Default)]
pub struct FieldExtractor {
    matcher: FieldMatcher,
}

impl FieldExtractor {
    /// Create an extractor with the default matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor around a configured matcher.
    pub fn with_matcher(matcher: FieldMatcher) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &FieldMatcher {
        &self.matcher
    }

    /// Extract every requested field.
    ///
    /// Each field is matched independently against the same fragments, so one
    /// fragment may serve as label or value for several fields. Names are not
    /// re-checked here; a [`FieldRequest`] can only hold non-empty names.
    pub fn extract(&self, fragments: &[TextFragment], request: &FieldRequest) -> FieldValueMap {
        let mut values = FieldValueMap::new();

        for name in request.iter() {
            values.insert(name, self.matcher.match_field(fragments, name));
        }

        info!(
            "Extracted {}/{} fields from {} fragments",
            values.found_count(),
            values.len(),
            fragments.len()
        );
        debug!("Extracted values: {:?}", values);

        values
    }

    /// Parse a comma-separated request and extract it.
    pub fn extract_str(
        &self,
        fragments: &[TextFragment],
        request: &str,
    ) -> Result<FieldValueMap, ConfigError> {
        let request = FieldRequest::parse(request)?;
        Ok(self.extract(fragments, &request))
    }
}

/// Extract fields with the default extractor.
pub fn extract_fields(
    fragments: &[TextFragment],
    request: &str,
) -> Result<FieldValueMap, ConfigError> {
    FieldExtractor::new().extract_str(fragments, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fragments(texts: &[&str]) -> Vec<TextFragment> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let y = i as f32 * 30.0;
                TextFragment::from_rect(*t, 0.0, y, 200.0, y + 20.0)
            })
            .collect()
    }

    #[test]
    fn test_extract_technical_sanction() {
        let page = fragments(&[
            "Technical Sanction",
            "Name of Work",
            "Bridge Construction Phase 2",
            "Est. Value",
            "Rs. 4,50,000",
        ]);

        let values = extract_fields(&page, "Name of Work, Est. Value").unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values.get("name of work"), Some(Some("Bridge Construction Phase 2")));
        assert_eq!(values.get("est. value"), Some(Some("Rs. 4,50,000")));
    }

    #[test]
    fn test_missing_field_renders_not_found() {
        let page = fragments(&["Total"]);
        let values = extract_fields(&page, "est. value").unwrap();

        assert_eq!(values.get("est. value"), Some(None));
        assert_eq!(values.rendered("est. value"), Some(NOT_FOUND));
        assert_eq!(values.rendered("name of work"), None);
    }

    #[test]
    fn test_every_requested_field_present_once() {
        let values = extract_fields(&[], "A, b, a ,C").unwrap();
        let names: Vec<&str> = values.names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fragment_reused_across_fields() {
        let page = fragments(&["Work Name", "Name of Work", "Bridge"]);
        let values = extract_fields(&page, "name of work, name").unwrap();

        assert_eq!(values.get("name of work"), Some(Some("Bridge")));
        // "name" matches "Work Name" first, whose next fragment is the other label
        assert_eq!(values.get("name"), Some(Some("Name of Work")));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = extract_fields(&[], "name of work,").unwrap_err();
        assert_eq!(err, ConfigError::EmptyFieldName { position: 1 });
    }

    #[test]
    fn test_serializes_sentinel() {
        let values: FieldValueMap = vec![
            ("name of work", Some("Bridge".to_string())),
            ("est. value", None),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"{"name of work":"Bridge","est. value":"N/A"}"#);
    }
}
