//! Validation outcome types

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Which schema fields a validation run visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    /// Every schema field; absent required fields are errors
    #[default]
    Full,
    /// Only schema fields present in the record
    Partial,
}

/// Messages per field, in schema order. Each field's messages are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataErrors {
    entries: Vec<(String, Vec<String>)>,
}

impl DataErrors {
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, messages)| (name.as_str(), messages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a field's messages; fields with no messages are not stored.
    pub(crate) fn push(&mut self, field: &str, messages: Vec<String>) {
        if !messages.is_empty() {
            self.entries.push((field.to_string(), messages));
        }
    }
}

impl Serialize for DataErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, messages) in &self.entries {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Every violation found in a record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Field-scoped messages
    pub data_errors: DataErrors,
    /// All messages, including those not tied to a field
    pub messages: Vec<String>,
}

/// Result of validating one record.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Normalized record, ordered by schema declaration
    Valid { body: Map<String, Value> },
    /// The record violated the schema
    Invalid(ValidationReport),
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Validation::Valid { .. })
    }

    pub fn body(&self) -> Option<&Map<String, Value>> {
        match self {
            Validation::Valid { body } => Some(body),
            Validation::Invalid(_) => None,
        }
    }

    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Validation::Valid { .. } => None,
            Validation::Invalid(report) => Some(report),
        }
    }

    /// Converts into a `Result`, mostly for `?` at call sites.
    pub fn into_result(self) -> Result<Map<String, Value>, ValidationReport> {
        match self {
            Validation::Valid { body } => Ok(body),
            Validation::Invalid(report) => Err(report),
        }
    }

    /// The JSON shape returned to callers.
    pub fn to_json(&self) -> Value {
        // Serialization of these types cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for Validation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Validation::Valid { body } => {
                let mut s = serializer.serialize_struct("Validation", 2)?;
                s.serialize_field("ok", &true)?;
                s.serialize_field("body", body)?;
                s.end()
            }
            Validation::Invalid(report) => {
                let mut s = serializer.serialize_struct("Validation", 3)?;
                s.serialize_field("ok", &false)?;
                s.serialize_field("dataErrors", &report.data_errors)?;
                s.serialize_field("messages", &report.messages)?;
                s.end()
            }
        }
    }
}
