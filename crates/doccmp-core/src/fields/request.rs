//! Parsing of comma-separated field requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ordered list of normalized field names to extract.
///
/// Names are trimmed and lower-cased. Duplicates are kept here; they collapse
/// in the resulting [`FieldValueMap`](super::FieldValueMap). Every way of
/// building a request, deserialization included, rejects empty names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct FieldRequest {
    names: Vec<String>,
}

impl FieldRequest {
    /// Parse a request such as `"Name of Work, Est. Value"`.
    pub fn parse(request: &str) -> Result<Self, ConfigError> {
        Self::from_names(request.split(','))
    }

    fn from_names<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names = raw
            .into_iter()
            .enumerate()
            .map(|(position, raw)| {
                let name = normalize_field_name(raw.as_ref());
                if name.is_empty() {
                    Err(ConfigError::EmptyFieldName { position })
                } else {
                    Ok(name)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { names })
    }

    /// Requested names in order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl TryFrom<Vec<String>> for FieldRequest {
    type Error = ConfigError;

    fn try_from(names: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_names(names)
    }
}

impl From<FieldRequest> for Vec<String> {
    fn from(request: FieldRequest) -> Self {
        request.names
    }
}

impl FromStr for FieldRequest {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}

/// Trim and lower-case a field name.
pub fn normalize_field_name(name: &str) -> String {
    name.trim().to_lowercase()
}
