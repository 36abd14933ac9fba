//! Error types for the doccmp-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the doccmp library.
#[derive(Error, Debug)]
pub enum DoccmpError {
    /// Configuration or field catalog error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fragment extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to configuration and field requests.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No field list is mapped for the requested classification.
    #[error("unsupported document type: ({stage}, {category}, {doc_type})")]
    UnsupportedDocumentType {
        stage: String,
        category: String,
        doc_type: String,
    },

    /// A comma-separated field request produced an empty field name.
    #[error("empty field name at position {position} in field request")]
    EmptyFieldName { position: usize },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while obtaining fragments for a document.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The input could not be read at all.
    #[error("fragment source unavailable for {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// The input kind is not handled by the configured source.
    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// The input was read but does not contain a valid fragment sequence.
    #[error("invalid fragments in {path}: {reason}")]
    InvalidFragments { path: PathBuf, reason: String },

    /// The OCR engine failed.
    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// Result type for the doccmp library.
pub type Result<T> = std::result::Result<T, DoccmpError>;
