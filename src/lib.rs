//! modelschema - schema-driven record validation and normalization
//!
//! Validates input records against a declarative field schema, collecting
//! every violation, and synthesizes the SET/WHERE fragments of parameterized
//! UPDATE statements from the same schema.

pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
pub mod update;
