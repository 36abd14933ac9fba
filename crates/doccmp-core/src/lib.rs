//! Core library for scanned document comparison.
//!
//! This crate provides:
//! - OCR fragment sources (JSON dumps, optional pure-Rust OCR engine)
//! - Fuzzy label matching and positional value inference
//! - Per-document field extraction driven by a field catalog
//! - Field-by-field document comparison with an aggregate match percentage

pub mod compare;
pub mod error;
pub mod fields;
pub mod models;
pub mod ocr;
pub mod pipeline;

pub use compare::{ComparisonReport, DocumentComparator, FieldComparison, compare_field_maps};
pub use error::{ConfigError, DoccmpError, ExtractionError, Result};
pub use fields::{
    FieldExtractor, FieldMatcher, FieldRequest, FieldValueMap, LabelMatch, Metric, NOT_FOUND,
    ValueLocator, extract_fields, match_field,
};
pub use models::catalog::{CatalogEntry, FieldCatalog};
pub use models::config::DoccmpConfig;
pub use ocr::{AutoSource, FragmentSource, JsonFragmentSource, TextFragment};
pub use pipeline::ComparisonPipeline;
