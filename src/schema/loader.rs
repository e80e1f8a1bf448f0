//! Schema loader for JSON schema documents
//!
//! Document shape (field order is declaration order):
//!
//! ```json
//! {
//!   "fields": {
//!     "userPhone": {
//!       "alias": "Telefono",
//!       "type": "string",
//!       "required": false,
//!       "defaultValue": null,
//!       "maxLength": 15,
//!       "nameFieldDatabase": "telefono",
//!       "validate": "phone"
//!     }
//!   }
//! }
//! ```
//!
//! Custom rules cannot be written in JSON. `"validate"` names a rule that was
//! registered on the loader beforehand; unknown names fail the load.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::rules::SharedRule;
use super::types::{FieldSpec, FieldType, SchemaMap};
use crate::observability::{log_event_with_fields, Event};

#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(deserialize_with = "every_entry")]
    fields: Vec<(String, Value)>,
}

/// Reads an object as its raw entry list, repeated keys included.
fn every_entry<'de, D>(deserializer: D) -> Result<Vec<(String, Value)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct EntriesVisitor;

    impl<'de> Visitor<'de> for EntriesVisitor {
        type Value = Vec<(String, Value)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object of field definitions")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, Value>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FieldDocument {
    alias: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default, deserialize_with = "present")]
    default_value: Option<Value>,
    max_length: Option<usize>,
    name_field_database: Option<String>,
    #[serde(default)]
    not_included: bool,
    validate: Option<String>,
}

/// Keeps an explicit `null` apart from an absent key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Builds schema maps from JSON documents, resolving named custom rules.
#[derive(Default)]
pub struct SchemaLoader {
    rules: HashMap<String, SharedRule>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `rule` available to documents under `name`.
    pub fn register_rule(&mut self, name: impl Into<String>, rule: SharedRule) {
        self.rules.insert(name.into(), rule);
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Loads a schema document from disk.
    pub fn load_file(&self, path: &Path) -> SchemaResult<SchemaMap> {
        let source = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(&source, format!("Failed to read file: {}", e))
        })?;
        self.load_str(&source, &content)
    }

    /// Loads a schema document from a string; `source` names it in errors.
    ///
    /// A field declared twice fails with `MODELSCHEMA_DUPLICATE_FIELD`.
    pub fn load_str(&self, source: &str, content: &str) -> SchemaResult<SchemaMap> {
        let document: SchemaDocument = serde_json::from_str(content).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                SchemaError::malformed_schema(source, format!("Invalid JSON: {}", e))
            } else {
                SchemaError::malformed_schema(source, e.to_string())
            }
        })?;
        self.build(source, document)
    }

    /// Builds a schema map from an already parsed document.
    ///
    /// A parsed `Value` has already merged repeated keys; use `load_str` or
    /// `load_file` to have them reported.
    pub fn load_value(&self, source: &str, document: Value) -> SchemaResult<SchemaMap> {
        let document: SchemaDocument = serde_json::from_value(document)
            .map_err(|e| SchemaError::malformed_schema(source, e.to_string()))?;
        self.build(source, document)
    }

    fn build(&self, source: &str, document: SchemaDocument) -> SchemaResult<SchemaMap> {
        let mut builder = SchemaMap::builder();
        for (name, raw) in document.fields {
            let field: FieldDocument = serde_json::from_value(raw)
                .map_err(|e| SchemaError::invalid_field(&name, e.to_string()))?;
            let spec = self.field_spec(&name, field)?;
            builder = builder.field(name, spec);
        }

        let schema = builder.build()?;

        let count = schema.len().to_string();
        log_event_with_fields(Event::SchemaLoaded, &[("source", source), ("fields", &count)]);

        Ok(schema)
    }

    fn field_spec(&self, name: &str, field: FieldDocument) -> SchemaResult<FieldSpec> {
        let mut spec = FieldSpec::new(field.alias, field.field_type).required(field.required);

        if let Some(default) = field.default_value {
            spec = spec.default_value(default);
        }
        if let Some(max) = field.max_length {
            spec = spec.max_length(max);
        }
        if let Some(column) = field.name_field_database {
            spec = spec.column(column);
        }
        if field.not_included {
            spec = spec.not_included();
        }
        if let Some(rule_name) = field.validate {
            let rule = self
                .rules
                .get(&rule_name)
                .ok_or_else(|| SchemaError::unknown_rule(name, &rule_name))?;
            spec = spec.with_rule(rule.clone());
        }

        Ok(spec)
    }
}
