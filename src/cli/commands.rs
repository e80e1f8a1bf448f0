//! CLI command implementations
//!
//! Each command loads the schema document (and the optional config), reads
//! its input from stdin and writes exactly one JSON value to stdout. Schemas
//! loaded here have no custom rules registered, so documents used with the
//! CLI must not reference any (`demos/user_schema_plain.json` is one that
//! loads).

use std::path::Path;

use serde_json::{json, Map, Value};

use crate::config::ValidatorConfig;
use crate::schema::{Record, SchemaLoader, SchemaValidator, ValidationMode};
use crate::update::WhereClause;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{parse_object, read_request, write_json};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate {
            schema,
            partial,
            config,
        } => validate(&schema, partial, config.as_deref()),
        Command::Update {
            schema,
            conditions,
            operator,
            config,
        } => update(&schema, &conditions, &operator, config.as_deref()),
        Command::Fields { schema } => fields(&schema),
    }
}

/// Validate the record on stdin and print the result
pub fn validate(schema_path: &Path, partial: bool, config_path: Option<&Path>) -> CliResult<()> {
    let validator = build_validator(schema_path, config_path)?;
    let mode = if partial {
        ValidationMode::Partial
    } else {
        ValidationMode::Full
    };

    let input = read_request()?;
    let output = validate_input(&validator, input, mode)?;
    write_json(&output)
}

/// Print the UPDATE fragments for the record on stdin
pub fn update(
    schema_path: &Path,
    conditions: &str,
    operator: &str,
    config_path: Option<&Path>,
) -> CliResult<()> {
    let validator = build_validator(schema_path, config_path)?;
    let input = read_request()?;
    let output = update_input(&validator, &input, conditions, operator)?;
    write_json(&output)
}

/// Print the schema's field names
pub fn fields(schema_path: &Path) -> CliResult<()> {
    let schema = SchemaLoader::new().load_file(schema_path)?;
    write_json(&json!(schema.field_names()))
}

fn build_validator(schema_path: &Path, config_path: Option<&Path>) -> CliResult<SchemaValidator> {
    let config = match config_path {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };
    let schema = SchemaLoader::new().load_file(schema_path)?;
    Ok(SchemaValidator::with_config(schema, config))
}

/// Runs one validation to completion on a current-thread runtime.
fn validate_input(
    validator: &SchemaValidator,
    input: Map<String, Value>,
    mode: ValidationMode,
) -> CliResult<Value> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;

    let mut record = Record::from(input);
    let result = runtime.block_on(validator.validate(&mut record, mode));
    Ok(result.to_json())
}

fn update_input(
    validator: &SchemaValidator,
    record: &Map<String, Value>,
    conditions: &str,
    operator: &str,
) -> CliResult<Value> {
    let clause = WhereClause::new(parse_object(conditions, "Where")?).with_operator(operator);
    let fragments = validator.build_update_fragments(record, &clause)?;
    Ok(serde_json::to_value(fragments)?)
}
