//! CLI module for modelschema
//!
//! Provides command-line interface for:
//! - validate: Validate a record against a schema document
//! - update: Build UPDATE fragments for a partial record
//! - fields: List a schema's field names

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{fields, run, run_command, update, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_object, read_request, write_error, write_json};
