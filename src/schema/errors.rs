//! Schema construction error types
//!
//! Error codes:
//! - MODELSCHEMA_INVALID_FIELD (REJECT)
//! - MODELSCHEMA_DUPLICATE_FIELD (REJECT)
//! - MODELSCHEMA_UNKNOWN_RULE (REJECT)
//! - MODELSCHEMA_MALFORMED_SCHEMA (REJECT)
//!
//! These errors are raised while a schema map is being built or loaded.
//! Record validation never produces them: violations found in a record are
//! returned as data in a `ValidationReport`.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// A field definition lacks required metadata or is inconsistent
    InvalidField,
    /// The same logical field name was declared twice
    DuplicateField,
    /// A schema file names a custom rule nobody registered
    UnknownRule,
    /// A schema file could not be read or parsed
    MalformedSchema,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidField => "MODELSCHEMA_INVALID_FIELD",
            SchemaErrorCode::DuplicateField => "MODELSCHEMA_DUPLICATE_FIELD",
            SchemaErrorCode::UnknownRule => "MODELSCHEMA_UNKNOWN_RULE",
            SchemaErrorCode::MalformedSchema => "MODELSCHEMA_MALFORMED_SCHEMA",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Logical field name if applicable
    field: Option<String>,
}

impl SchemaError {
    /// Create an invalid field error
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::InvalidField,
            message: format!("Field '{}' is invalid: {}", field, reason.into()),
            field: Some(field),
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::DuplicateField,
            message: format!("Field '{}' is declared more than once", field),
            field: Some(field),
        }
    }

    /// Create an unknown rule error
    pub fn unknown_rule(field: impl Into<String>, rule: &str) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::UnknownRule,
            message: format!("Field '{}' references unregistered rule '{}'", field, rule),
            field: Some(field),
        }
    }

    /// Create an error for a malformed schema document
    pub fn malformed_schema(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::MalformedSchema,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            field: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
