//! Schema-driven validation for modelschema
//!
//! A schema map is immutable configuration: an ordered set of logical fields,
//! each with a display alias, an expected type and optional constraints.
//! Entity schemas are plain data fed to a `SchemaValidator`.
//!
//! # Design Principles
//!
//! - Violations are data, never errors
//! - Every violation is reported, not just the first
//! - Absent, `null` and empty-string values are distinct
//! - Output records follow schema declaration order

mod diff;
mod errors;
mod loader;
mod messages;
mod record;
mod result;
mod rules;
mod types;
mod validator;

pub use diff::differences;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use messages::{type_display_name, UNDEFINED_VALUES};
pub use record::{Record, Slot};
pub use result::{DataErrors, Validation, ValidationMode, ValidationReport};
pub use rules::{async_rule, rule, AsyncRule, DisplayFormatter, FieldRule, RuleOutcome, SharedRule, SyncRule};
pub use types::{FieldSpec, FieldType, SchemaMap, SchemaMapBuilder};
pub use validator::SchemaValidator;
