//! Schema validator for input records
//!
//! Validation semantics, per visited field in schema order:
//! - Strings are trimmed in place
//! - Optional absent fields receive their default value
//! - Present values must match the declared type (`null` is exempt)
//! - Required fields must not be absent, empty strings or `null`
//! - Strings must respect `max_length`
//! - Custom rules run on present, non-null values and may rewrite them
//!
//! Every violation is collected; nothing short-circuits. Accumulators live in
//! the call, so one validator may serve any number of concurrent calls.

use std::sync::Arc;

use serde_json::{Map, Value};

use super::diff;
use super::messages;
use super::record::{Record, Slot};
use super::result::{DataErrors, Validation, ValidationMode, ValidationReport};
use super::rules::RuleOutcome;
use super::types::{FieldSpec, SchemaMap};
use crate::config::ValidatorConfig;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::update::{UpdateBuilder, UpdateFragments, UpdateResult, WhereClause};

/// Validates and normalizes records against one schema map.
///
/// The schema is immutable once the validator exists; cloning the validator
/// shares it.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    schema: Arc<SchemaMap>,
    config: ValidatorConfig,
}

impl SchemaValidator {
    /// Creates a validator with the default configuration. The process-wide
    /// log threshold is left as it is.
    pub fn new(schema: SchemaMap) -> Self {
        Self {
            schema: Arc::new(schema),
            config: ValidatorConfig::default(),
        }
    }

    /// Creates a validator and applies `config`, including its log threshold.
    pub fn with_config(schema: SchemaMap, config: ValidatorConfig) -> Self {
        config.apply();
        Self {
            schema: Arc::new(schema),
            config,
        }
    }

    pub fn schema(&self) -> &SchemaMap {
        &self.schema
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validates `record` and returns either the normalized body or every
    /// violation found.
    ///
    /// String values in `record` are trimmed in place, and values rewritten by
    /// a custom rule are written back, so the caller observes both.
    pub async fn validate(&self, record: &mut Record, mode: ValidationMode) -> Validation {
        let mut collected: Vec<String> = Vec::new();
        let mut data_errors = DataErrors::default();
        let mut body = Map::new();

        if record.has_undefined() {
            push_unique(&mut collected, messages::UNDEFINED_VALUES.to_string());
        }

        for (name, spec) in self.schema.iter() {
            if mode == ValidationMode::Partial && !record.contains_key(name) {
                continue;
            }

            let (value, field_messages) = check_field(name, spec, record, mode).await;

            for message in &field_messages {
                push_unique(&mut collected, message.clone());
            }
            data_errors.push(name, field_messages);

            if spec.is_included() {
                if let Some(value) = value {
                    body.insert(name.to_string(), value);
                }
            }
        }

        if collected.is_empty() {
            if Logger::enabled(Event::ValidationPassed.severity()) {
                let fields = body.len().to_string();
                log_event_with_fields(Event::ValidationPassed, &[("fields", &fields)]);
            }
            Validation::Valid { body }
        } else {
            if Logger::enabled(Event::ValidationFailed.severity()) {
                let count = collected.len().to_string();
                log_event_with_fields(Event::ValidationFailed, &[("messages", &count)]);
            }
            Validation::Invalid(ValidationReport {
                data_errors,
                messages: collected,
            })
        }
    }

    /// Builds the SET and WHERE fragments of a parameterized UPDATE for
    /// `record`, mapping logical names to physical columns.
    pub fn build_update_fragments(
        &self,
        record: &Map<String, Value>,
        clause: &WhereClause,
    ) -> UpdateResult<UpdateFragments> {
        UpdateBuilder::new(&self.schema, self.config.fragment_mode).build(record, clause)
    }

    /// Human-readable differences between a stored record and an update.
    pub fn differences(&self, before: &Value, after: &Value) -> Vec<String> {
        diff::differences(&self.schema, before, after)
    }

    /// Every logical field name, in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.schema.field_names()
    }
}

/// Runs every check for one field. Returns the field's final value (if any)
/// and its unique messages in emission order.
async fn check_field(
    name: &str,
    spec: &FieldSpec,
    record: &mut Record,
    mode: ValidationMode,
) -> (Option<Value>, Vec<String>) {
    let mut field_messages = Vec::new();
    let present = record.contains_key(name);

    if let Some(Slot::Value(Value::String(s))) = record.slot_mut(name) {
        let trimmed = s.trim();
        if trimmed.len() != s.len() {
            *s = trimmed.to_string();
        }
    }

    let mut current = record.get(name).cloned();

    if !present && !spec.is_required() {
        if let Some(default) = spec.default() {
            current = Some(default.clone());
        }
    }

    // Undefined entries are present but match no type
    if present && !matches!(current, Some(Value::Null)) {
        let type_ok = current
            .as_ref()
            .map_or(false, |v| spec.field_type().matches(v));
        if !type_ok {
            push_unique(
                &mut field_messages,
                messages::type_mismatch(spec.alias(), spec.field_type()),
            );
        }
    }

    if spec.is_required() {
        let missing = !present && mode == ValidationMode::Full;
        let empty = present && matches!(&current, Some(Value::String(s)) if s.is_empty());
        let null = present && matches!(current, Some(Value::Null));
        if missing || empty || null {
            push_unique(&mut field_messages, messages::required(spec.alias()));
        }
    }

    if let (true, Some(Value::String(s)), Some(max)) = (present, &current, spec.max_len()) {
        if s.chars().count() > max {
            push_unique(&mut field_messages, messages::max_length(spec.alias(), max));
        }
    }

    let outcome = match (spec.rule(), current.as_ref()) {
        (Some(rule), Some(value)) if present && !value.is_null() => Some(rule.check(value).await),
        _ => None,
    };

    match outcome {
        Some(RuleOutcome::Invalid(message)) => {
            push_unique(
                &mut field_messages,
                messages::rule_failed(spec.alias(), &message),
            );
        }
        Some(RuleOutcome::Replace(replacement)) => {
            if let Some(slot) = record.slot_mut(name) {
                *slot = Slot::Value(replacement.clone());
            }
            current = Some(replacement);
        }
        Some(RuleOutcome::Valid) | None => {}
    }

    (current, field_messages)
}

/// Appends `message` unless it is already recorded; first occurrence wins.
fn push_unique(messages: &mut Vec<String>, message: String) {
    if !messages.contains(&message) {
        messages.push(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::FieldType;
    use serde_json::json;

    fn user_schema() -> SchemaMap {
        SchemaMap::builder()
            .field("userId", FieldSpec::new("Usuario ID", FieldType::Number))
            .field("userLogin", FieldSpec::required_string("Login"))
            .field("userAge", FieldSpec::required_number("Edad"))
            .field("userPassword", FieldSpec::required_string("Contraseña"))
            .field("userNames", FieldSpec::required_string("Nombres"))
            .field("userLastnames", FieldSpec::required_string("Apellidos"))
            .field("userEmail", FieldSpec::required_string("Email"))
            .field("userRut", FieldSpec::required_string("Rut").max_length(12))
            .field(
                "userPhone",
                FieldSpec::optional_string("Telefono")
                    .default_value(Value::Null)
                    .validate(|v| match v.as_str() {
                        Some(s) if s.chars().count() == 1 => {
                            RuleOutcome::invalid("debe contener más de 1 caracter")
                        }
                        _ => RuleOutcome::Valid,
                    }),
            )
            .field(
                "userActive",
                FieldSpec::required_boolean("Estado de usuario").default_value(false),
            )
            .build()
            .unwrap()
    }

    fn full_user() -> Record {
        Record::try_from(json!({
            "userNames": "  Camilo ",
            "userLastnames": "Bello",
            "userLogin": "camilo.bello",
            "userAge": 30,
            "userPassword": "cbello1992",
            "userEmail": "camilo.bello92@gmail.com",
            "userRut": "18.135.346-5",
            "userActive": true
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_valid_record_ordered_by_schema() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = full_user();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        let body = result.body().expect("record should be valid");

        let keys: Vec<&str> = body.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "userLogin",
                "userAge",
                "userPassword",
                "userNames",
                "userLastnames",
                "userEmail",
                "userRut",
                "userPhone",
                "userActive"
            ]
        );
        assert_eq!(body["userNames"], json!("Camilo"));
        assert_eq!(body["userPhone"], Value::Null);
    }

    #[tokio::test]
    async fn test_trimming_is_visible_to_caller() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = full_user();

        validator.validate(&mut record, ValidationMode::Full).await;
        assert_eq!(record.get("userNames"), Some(&json!("Camilo")));
    }

    #[tokio::test]
    async fn test_boolean_given_as_string() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userActive": "true"})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        let report = result.report().unwrap();
        assert_eq!(
            report.messages,
            vec!["Estado de usuario debe ser de tipo verdadero o falso"]
        );
        assert_eq!(report.data_errors.fields().collect::<Vec<_>>(), vec!["userActive"]);
    }

    #[tokio::test]
    async fn test_required_absent_null_and_empty_match() {
        let validator = SchemaValidator::new(user_schema());

        let base = full_user();
        let mut omitted: Record = base
            .keys()
            .filter(|k| *k != "userLogin")
            .map(|k| (k.to_string(), base.slot(k).unwrap().clone()))
            .collect();
        let mut empty = full_user();
        empty.insert("userLogin", "   ");
        let mut null = full_user();
        null.insert("userLogin", Value::Null);

        for record in [&mut omitted, &mut empty, &mut null] {
            let result = validator.validate(record, ValidationMode::Full).await;
            let report = result.report().unwrap();
            assert_eq!(report.messages, vec!["Login es requerido"]);
            assert_eq!(
                report.data_errors.get("userLogin").unwrap(),
                &["Login es requerido".to_string()]
            );
        }
    }

    #[tokio::test]
    async fn test_type_and_required_both_kept() {
        let schema = SchemaMap::builder()
            .field("tags", FieldSpec::new("Etiquetas", FieldType::Object).required(true))
            .build()
            .unwrap();
        let validator = SchemaValidator::new(schema);
        let mut record = Record::try_from(json!({"tags": ""})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        assert_eq!(
            result.report().unwrap().messages,
            vec!["Etiquetas debe ser de tipo objeto", "Etiquetas es requerido"]
        );
    }

    #[tokio::test]
    async fn test_max_length_counts_trimmed_chars() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userRut": "  18.135.346-5  "})).unwrap();
        assert!(validator
            .validate(&mut record, ValidationMode::Partial)
            .await
            .is_ok());

        let mut record = Record::try_from(json!({"userRut": "18.135.346-5-9"})).unwrap();
        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        assert_eq!(
            result.report().unwrap().messages,
            vec!["Rut puede contener hasta 12 caracteres"]
        );
    }

    #[tokio::test]
    async fn test_custom_rule_failure() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userPhone": "5"})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        assert_eq!(
            result.report().unwrap().messages,
            vec!["Telefono: debe contener más de 1 caracter"]
        );
    }

    #[tokio::test]
    async fn test_custom_rule_not_run_on_null() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userPhone": null})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        assert_eq!(result.body().unwrap()["userPhone"], Value::Null);
    }

    #[tokio::test]
    async fn test_custom_rule_replacement() {
        let schema = SchemaMap::builder()
            .field(
                "email",
                FieldSpec::required_string("Email")
                    .validate(|v| RuleOutcome::replace(v.as_str().unwrap_or("").to_lowercase())),
            )
            .build()
            .unwrap();
        let validator = SchemaValidator::new(schema);
        let mut record = Record::try_from(json!({"email": " Camilo@Mail.CL "})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        assert_eq!(result.body().unwrap()["email"], json!("camilo@mail.cl"));
        assert_eq!(record.get("email"), Some(&json!("camilo@mail.cl")));
    }

    #[tokio::test]
    async fn test_async_rule_is_awaited() {
        let schema = SchemaMap::builder()
            .field(
                "login",
                FieldSpec::required_string("Login").validate_async(|v: Value| async move {
                    tokio::task::yield_now().await;
                    if v == json!("admin") {
                        RuleOutcome::invalid("no disponible")
                    } else {
                        RuleOutcome::Valid
                    }
                }),
            )
            .build()
            .unwrap();
        let validator = SchemaValidator::new(schema);
        let mut record = Record::try_from(json!({"login": "admin"})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        assert_eq!(result.report().unwrap().messages, vec!["Login: no disponible"]);
    }

    #[tokio::test]
    async fn test_duplicate_messages_collapsed_globally() {
        let schema = SchemaMap::builder()
            .field("login", FieldSpec::required_string("Login"))
            .field("username", FieldSpec::required_string("Login"))
            .build()
            .unwrap();
        let validator = SchemaValidator::new(schema);
        let mut record = Record::new();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        let report = result.report().unwrap();
        assert_eq!(report.messages, vec!["Login es requerido"]);
        assert_eq!(report.data_errors.fields().collect::<Vec<_>>(), vec!["login", "username"]);
        assert_eq!(report.data_errors.get("username").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_undefined_values_rejected_globally() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::new();
        record.insert("userLogin", "camilo");
        record.insert_undefined("extra");

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        let report = result.report().unwrap();
        assert_eq!(report.messages, vec![messages::UNDEFINED_VALUES]);
        assert!(report.data_errors.is_empty());
    }

    #[tokio::test]
    async fn test_partial_skips_absent_required() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userLogin": "camilo"})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        let body = result.body().unwrap();
        assert_eq!(body.len(), 1);
        assert_eq!(body["userLogin"], json!("camilo"));
    }

    #[tokio::test]
    async fn test_not_included_field_left_out() {
        let schema = SchemaMap::builder()
            .field("password", FieldSpec::required_string("Contraseña").not_included())
            .field("login", FieldSpec::required_string("Login"))
            .build()
            .unwrap();
        let validator = SchemaValidator::new(schema);
        let mut record = Record::try_from(json!({"password": "secret", "login": "cb"})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Full).await;
        let body = result.body().unwrap();
        assert!(!body.contains_key("password"));
        assert_eq!(body["login"], json!("cb"));
    }

    #[tokio::test]
    async fn test_unknown_keys_dropped_from_body() {
        let validator = SchemaValidator::new(user_schema());
        let mut record = Record::try_from(json!({"userLogin": "cb", "hacker": true})).unwrap();

        let result = validator.validate(&mut record, ValidationMode::Partial).await;
        assert!(!result.body().unwrap().contains_key("hacker"));
    }

    #[tokio::test]
    async fn test_accumulators_do_not_leak_between_calls() {
        let validator = SchemaValidator::new(user_schema());

        let mut bad = Record::try_from(json!({"userActive": "no"})).unwrap();
        assert!(!validator.validate(&mut bad, ValidationMode::Partial).await.is_ok());

        let mut good = full_user();
        assert!(validator.validate(&mut good, ValidationMode::Full).await.is_ok());
    }
}
