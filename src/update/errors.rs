//! # Update Errors
//!
//! Error types for UPDATE fragment synthesis. Only strict mode raises them;
//! lenient mode never fails.

use thiserror::Error;

/// Result type for fragment operations
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Where in the statement an offending key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Set,
    Where,
}

impl std::fmt::Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Clause::Set => write!(f, "SET"),
            Clause::Where => write!(f, "WHERE"),
        }
    }
}

/// Fragment synthesis errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    /// Key is not in the schema or has no physical column
    #[error("Field '{field}' in {clause} clause has no column mapping")]
    UnmappedField { field: String, clause: Clause },

    /// Nothing to assign
    #[error("Update record has no fields")]
    EmptyAssignment,

    /// Nothing to filter on
    #[error("Where clause has no conditions")]
    EmptyCondition,
}

impl UpdateError {
    /// Stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            UpdateError::UnmappedField { .. } => "MODELSCHEMA_UNMAPPED_FIELD",
            UpdateError::EmptyAssignment => "MODELSCHEMA_EMPTY_ASSIGNMENT",
            UpdateError::EmptyCondition => "MODELSCHEMA_EMPTY_CONDITION",
        }
    }
}
