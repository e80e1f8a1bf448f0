//! JSON I/O handling for CLI
//!
//! - Input: single JSON object via stdin
//! - Output: single JSON value via stdout
//! - UTF-8 only

use std::io::{self, Read, Write};

use serde_json::{Map, Value};

use super::errors::{CliError, CliResult};

/// Read one JSON object from stdin
pub fn read_request() -> CliResult<Map<String, Value>> {
    let mut input = String::new();
    io::stdin().lock().read_to_string(&mut input)?;
    parse_object(&input, "Input")
}

/// Parses `text` as a JSON object; `what` names it in errors.
pub fn parse_object(text: &str, what: &str) -> CliResult<Map<String, Value>> {
    if text.trim().is_empty() {
        return Err(CliError::input_error(format!("{} is empty", what)));
    }

    match serde_json::from_str(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::input_error(format!("{} must be a JSON object", what))),
    }
}

/// Write a JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_json(&serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    }))
}
