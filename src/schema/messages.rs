//! User-facing message table
//!
//! All validation messages are produced here so the wording stays in one
//! place. Messages are Spanish, matching the aliases schemas are written with.

use super::types::FieldType;

/// Global message emitted when an input record carries undefined entries.
pub const UNDEFINED_VALUES: &str = "No se permiten valores indefinidos";

/// Display name of a field type inside messages.
pub fn type_display_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "texto",
        FieldType::Boolean => "verdadero o falso",
        FieldType::Number => "númerico",
        FieldType::Object => "objeto",
        FieldType::Function => "función",
    }
}

/// `"{alias} debe ser de tipo {type}"`
pub fn type_mismatch(alias: &str, field_type: FieldType) -> String {
    format!("{} debe ser de tipo {}", alias, type_display_name(field_type))
}

/// `"{alias} es requerido"`
pub fn required(alias: &str) -> String {
    format!("{} es requerido", alias)
}

/// `"{alias} puede contener hasta {max} caracteres"`
pub fn max_length(alias: &str, max: usize) -> String {
    format!("{} puede contener hasta {} caracteres", alias, max)
}

/// `"{alias}: {message}"` for a failing custom rule.
pub fn rule_failed(alias: &str, message: &str) -> String {
    format!("{}: {}", alias, message)
}
