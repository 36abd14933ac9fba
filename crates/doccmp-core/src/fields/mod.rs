//! Field extraction: fuzzy label matching and positional value inference.

mod extractor;
pub mod locator;
mod matcher;
mod request;
pub mod similarity;

pub use extractor::{FieldExtractor, FieldValueMap, extract_fields};
pub use locator::{NextFragment, SameRowRight, ValueLocator, ValueStrategy};
pub use matcher::{DEFAULT_LABEL_THRESHOLD, FieldMatcher, LabelMatch, match_field};
pub use request::{FieldRequest, normalize_field_name};
pub use similarity::Metric;

/// Rendered form of a field whose label was not found.
pub const NOT_FOUND: &str = "N/A";
