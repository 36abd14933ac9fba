//! Field catalog: which fields to extract for each kind of document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::fields::FieldRequest;

/// One catalog entry, keyed by the caller's classification triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Workflow stage, e.g. "Technical Sanction".
    pub stage: String,
    /// Document type category, e.g. "For Migration".
    pub category: String,
    /// Document type label, e.g. "Technical Sanction copy".
    pub doc_type: String,
    /// Comma-separated field list.
    pub fields: String,
}

impl CatalogEntry {
    pub fn new(
        stage: impl Into<String>,
        category: impl Into<String>,
        doc_type: impl Into<String>,
        fields: impl Into<String>,
    ) -> Self {
        Self {
            stage: stage.into(),
            category: category.into(),
            doc_type: doc_type.into(),
            fields: fields.into(),
        }
    }

    fn matches(&self, stage: &str, category: &str, doc_type: &str) -> bool {
        self.stage.trim() == stage.trim()
            && self.category.trim() == category.trim()
            && self.doc_type.trim() == doc_type.trim()
    }
}

/// Mapping from `(stage, category, doc_type)` to a field list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self {
            entries: vec![CatalogEntry::new(
                "Technical Sanction",
                "For Migration",
                "Technical Sanction copy",
                "Name of Work, Est. Value",
            )],
        }
    }
}

impl FieldCatalog {
    /// Create an empty catalog.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Add an entry. A later entry for the same triple replaces the earlier one.
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.entries
            .retain(|e| !e.matches(&entry.stage, &entry.category, &entry.doc_type));
        self.entries.push(entry);
        self
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Look up the raw field list for a classification.
    pub fn lookup(&self, stage: &str, category: &str, doc_type: &str) -> Result<&str, ConfigError> {
        let entry = self
            .entries
            .iter()
            .find(|e| e.matches(stage, category, doc_type))
            .filter(|e| !e.fields.trim().is_empty())
            .ok_or_else(|| ConfigError::UnsupportedDocumentType {
                stage: stage.to_string(),
                category: category.to_string(),
                doc_type: doc_type.to_string(),
            })?;

        debug!("Catalog hit for ({}, {}, {}): {}", stage, category, doc_type, entry.fields);

        Ok(&entry.fields)
    }

    /// Look up and parse the field request for a classification.
    pub fn request_for(
        &self,
        stage: &str,
        category: &str,
        doc_type: &str,
    ) -> Result<FieldRequest, ConfigError> {
        FieldRequest::parse(self.lookup(stage, category, doc_type)?)
    }
}
