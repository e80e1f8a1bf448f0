//! Change detection between a stored record and an update
//!
//! Produces one `"{alias}: {new value}"` line per changed field, suitable for
//! audit trails. Only keys present in the stored record are compared.

use serde_json::Value;

use super::types::SchemaMap;

/// Lists the fields of `before` whose value differs in `after`.
///
/// Keys are visited in sorted order. Nested objects and arrays are compared
/// recursively and reported under their parent key. The result holds no
/// duplicates.
pub fn differences(schema: &SchemaMap, before: &Value, after: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect(schema, before, after, &mut out);
    out
}

fn collect(schema: &SchemaMap, before: &Value, after: &Value, out: &mut Vec<String>) {
    let Some(mut keys) = keys_of(before) else {
        return;
    };
    if keys_of(after).is_none() {
        return;
    }
    keys.sort();

    for key in keys {
        let old = lookup(before, &key);
        let new = lookup(after, &key);
        let line = || format!("{}: {}", schema.alias_or_name(&key), shown(schema, &key, new));

        if let (Some(Value::Array(a)), Some(Value::Array(b))) = (old, new) {
            if a.len() != b.len() {
                push_unique(out, line());
            }
        }

        match new {
            Some(nested @ (Value::Object(_) | Value::Array(_))) if !is_empty_container(nested) => {
                let mut inner = Vec::new();
                if let Some(old) = old {
                    collect(schema, old, nested, &mut inner);
                }
                if !inner.is_empty() {
                    push_unique(out, line());
                }
            }
            _ => {
                if let (Some(old), Some(new)) = (old, new) {
                    if old != new {
                        push_unique(out, line());
                    }
                }
            }
        }
    }
}

/// Keys of an object, or indices of an array; `None` for anything else.
fn keys_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Object(map) => Some(map.keys().cloned().collect()),
        Value::Array(items) => Some((0..items.len()).map(|i| i.to_string()).collect()),
        _ => None,
    }
}

fn lookup<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Renders the new value, through the field's formatter when it has one.
fn shown(schema: &SchemaMap, key: &str, value: Option<&Value>) -> String {
    let Some(value) = value else {
        return "undefined".to_string();
    };

    if let Some(format) = schema.get(key).and_then(|spec| spec.formatter()) {
        return format(value);
    }

    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_unique(out: &mut Vec<String>, line: String) {
    if !out.contains(&line) {
        out.push(line);
    }
}
