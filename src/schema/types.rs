//! Schema type definitions
//!
//! Supported field types:
//! - string: UTF-8 string
//! - boolean: true/false
//! - number: any JSON number
//! - object: JSON object or array
//! - function: callable; never matched by a JSON value

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::rules::{self, DisplayFormatter, FieldRule, RuleDebug, RuleOutcome, SharedRule};

/// Expected runtime type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Boolean,
    Number,
    Object,
    Function,
}

impl FieldType {
    /// Returns the type name used in schema documents
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Boolean => "boolean",
            FieldType::Number => "number",
            FieldType::Object => "object",
            FieldType::Function => "function",
        }
    }

    /// Whether `value` has this runtime type.
    ///
    /// Arrays count as objects. NaN never counts as a number.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::String, Value::String(_)) => true,
            (FieldType::Boolean, Value::Bool(_)) => true,
            (FieldType::Number, Value::Number(n)) => !n.as_f64().map_or(false, f64::is_nan),
            (FieldType::Object, Value::Object(_) | Value::Array(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Definition of one logical field.
#[derive(Clone)]
pub struct FieldSpec {
    alias: String,
    field_type: FieldType,
    required: bool,
    default_value: Option<Value>,
    max_length: Option<usize>,
    column: Option<String>,
    not_included: bool,
    rule: Option<SharedRule>,
    formatter: Option<DisplayFormatter>,
}

impl FieldSpec {
    /// Create an optional field with the given display alias and type.
    pub fn new(alias: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            alias: alias.into(),
            field_type,
            required: false,
            default_value: None,
            max_length: None,
            column: None,
            not_included: false,
            rule: None,
            formatter: None,
        }
    }

    /// Create a required string field
    pub fn required_string(alias: impl Into<String>) -> Self {
        Self::new(alias, FieldType::String).required(true)
    }

    /// Create an optional string field
    pub fn optional_string(alias: impl Into<String>) -> Self {
        Self::new(alias, FieldType::String)
    }

    /// Create a required number field
    pub fn required_number(alias: impl Into<String>) -> Self {
        Self::new(alias, FieldType::Number).required(true)
    }

    /// Create a required boolean field
    pub fn required_boolean(alias: impl Into<String>) -> Self {
        Self::new(alias, FieldType::Boolean).required(true)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Value substituted when the field is optional and absent.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Physical column name used when building UPDATE fragments.
    pub fn column(mut self, name: impl Into<String>) -> Self {
        self.column = Some(name.into());
        self
    }

    /// Keep the field out of the normalized body even when valid.
    pub fn not_included(mut self) -> Self {
        self.not_included = true;
        self
    }

    /// Attach a synchronous custom rule.
    pub fn validate<F>(self, check: F) -> Self
    where
        F: Fn(&Value) -> RuleOutcome + Send + Sync + 'static,
    {
        self.with_rule(rules::rule(check))
    }

    /// Attach an asynchronous custom rule.
    pub fn validate_async<F, Fut>(self, check: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = RuleOutcome> + Send + 'static,
    {
        self.with_rule(rules::async_rule(check))
    }

    /// Attach an already shared rule.
    pub fn with_rule(mut self, rule: SharedRule) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Formatter used to render this field's value in change messages.
    pub fn display_with<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn default(&self) -> Option<&Value> {
        self.default_value.as_ref()
    }

    pub fn max_len(&self) -> Option<usize> {
        self.max_length
    }

    pub fn column_name(&self) -> Option<&str> {
        self.column.as_deref()
    }

    pub fn is_included(&self) -> bool {
        !self.not_included
    }

    pub fn rule(&self) -> Option<&dyn FieldRule> {
        self.rule.as_deref()
    }

    pub fn formatter(&self) -> Option<&DisplayFormatter> {
        self.formatter.as_ref()
    }

    /// Checks the definition itself (not a record).
    fn validate_structure(&self, name: &str) -> SchemaResult<()> {
        if self.alias.trim().is_empty() {
            return Err(SchemaError::invalid_field(name, "alias must not be empty"));
        }

        if self.max_length.is_some() && self.field_type != FieldType::String {
            return Err(SchemaError::invalid_field(
                name,
                format!("maxLength only applies to string fields, not {}", self.field_type),
            ));
        }

        if matches!(&self.column, Some(c) if c.trim().is_empty()) {
            return Err(SchemaError::invalid_field(name, "column name must not be empty"));
        }

        Ok(())
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("alias", &self.alias)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("default_value", &self.default_value)
            .field("max_length", &self.max_length)
            .field("column", &self.column)
            .field("not_included", &self.not_included)
            .field("rule", &RuleDebug(&self.rule))
            .field("formatter", &self.formatter.as_ref().map(|_| "<formatter>"))
            .finish()
    }
}

/// Ordered, immutable mapping from logical field name to its definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    fields: Vec<(String, FieldSpec)>,
    index: HashMap<String, usize>,
}

impl SchemaMap {
    /// Start building a schema map.
    pub fn builder() -> SchemaMapBuilder {
        SchemaMapBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// Every logical field name, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Display alias for `name`, falling back to the name itself.
    pub fn alias_or_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).map_or(name, FieldSpec::alias)
    }
}

/// Collects field definitions and checks them all at `build` time.
#[derive(Debug, Default)]
pub struct SchemaMapBuilder {
    fields: Vec<(String, FieldSpec)>,
}

impl SchemaMapBuilder {
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((name.into(), spec));
        self
    }

    /// Builds the map, failing on the first malformed definition.
    pub fn build(self) -> SchemaResult<SchemaMap> {
        let mut index = HashMap::with_capacity(self.fields.len());

        for (i, (name, spec)) in self.fields.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::invalid_field(name, "field name must not be empty"));
            }
            spec.validate_structure(name)?;
            if index.insert(name.clone(), i).is_some() {
                return Err(SchemaError::duplicate_field(name));
            }
        }

        Ok(SchemaMap {
            fields: self.fields,
            index,
        })
    }
}
