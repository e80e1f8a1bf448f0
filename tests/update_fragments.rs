//! UPDATE Fragment and Change Detection Tests
//!
//! - Where placeholders come first, record placeholders continue after them
//! - Logical names are always replaced by physical columns
//! - Strict mode refuses unmapped keys and empty clauses
//! - Differences are reported by alias, once per field

use modelschema::config::ValidatorConfig;
use modelschema::schema::{rule, RuleOutcome, SchemaLoader, SchemaValidator};
use modelschema::update::{Clause, FragmentMode, UpdateError, WhereClause};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

// =============================================================================
// Helper Functions
// =============================================================================

fn user_document() -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join("user_schema.json");
    std::fs::read_to_string(path).unwrap()
}

fn validator(config: ValidatorConfig) -> SchemaValidator {
    let mut loader = SchemaLoader::new();
    loader.register_rule("phone", rule(|_| RuleOutcome::Valid));
    let schema = loader.load_str("user_schema.json", &user_document()).unwrap();
    SchemaValidator::with_config(schema, config)
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

// =============================================================================
// Placeholder Numbering Tests
// =============================================================================

/// Single condition, two assignments.
#[test]
fn test_set_continues_after_where() {
    let v = validator(ValidatorConfig::default());
    let record = object(json!({"userNames": "Pablo", "userActive": false}));
    let clause = WhereClause::new(object(json!({"userId": 7})));

    let fragments = v.build_update_fragments(&record, &clause).unwrap();

    assert_eq!(fragments.set_fields, " nombres = $2,  activo = $3");
    assert_eq!(fragments.where_fields, " WHERE  id_usuario = $1 RETURNING *");
    assert_eq!(
        fragments.statement("usuarios"),
        "UPDATE usuarios SET nombres = $2,  activo = $3 WHERE  id_usuario = $1 RETURNING *"
    );
}

/// Several conditions are joined with AND and numbered first.
#[test]
fn test_multiple_conditions() {
    let v = validator(ValidatorConfig::default());
    let record = object(json!({"userEmail": "pablo@mail.cl"}));
    let clause = WhereClause::new(object(json!({"userId": 7, "userLogin": "pablo"})));

    let fragments = v.build_update_fragments(&record, &clause).unwrap();

    assert_eq!(fragments.where_fields, " WHERE  id_usuario = $1 AND  login = $2 RETURNING *");
    assert_eq!(fragments.set_fields, " correo = $3");
}

/// The operator is placed between each column and its placeholder.
#[test]
fn test_custom_operator() {
    let v = validator(ValidatorConfig::default());
    let record = object(json!({"userActive": true}));
    let clause = WhereClause::new(object(json!({"userAge": 18}))).with_operator(">=");

    let fragments = v.build_update_fragments(&record, &clause).unwrap();
    assert_eq!(fragments.where_fields, " WHERE  edad >= $1 RETURNING *");
    assert_eq!(fragments.set_fields, " activo = $2");
}

/// Logical names never leak into the fragments.
#[test]
fn test_only_physical_columns_emitted() {
    let v = validator(ValidatorConfig::default());
    let record = object(json!({
        "userLogin": "pablo",
        "userNames": "Pablo",
        "userLastnames": "Soto",
        "userRut": "11.111.111-1"
    }));
    let clause = WhereClause::new(object(json!({"userId": 3})));

    let fragments = v.build_update_fragments(&record, &clause).unwrap();
    let statement = fragments.statement("usuarios");

    for logical in ["userLogin", "userNames", "userLastnames", "userRut", "userId"] {
        assert!(!statement.contains(logical), "{} leaked", logical);
    }
    assert!(statement.contains("$5"));
    assert!(!statement.contains("$6"));
}

// =============================================================================
// Unmapped Key Tests
// =============================================================================

/// Lenient mode skips unknown keys without renumbering the where clause.
#[test]
fn test_lenient_skips_unknown_keys() {
    let v = validator(ValidatorConfig::default());
    let record = object(json!({"nickname": "pb", "userNames": "Pablo"}));
    let clause = WhereClause::new(object(json!({"session": "x", "userId": 1})));

    let fragments = v.build_update_fragments(&record, &clause).unwrap();

    assert_eq!(fragments.where_fields, " WHERE  AND  id_usuario = $2 RETURNING *");
    assert_eq!(fragments.set_fields, " nombres = $3");
}

/// Strict mode names the offending key and clause.
#[test]
fn test_strict_rejects_unknown_keys() {
    let v = validator(ValidatorConfig::strict());
    let record = object(json!({"userNames": "Pablo", "nickname": "pb"}));
    let clause = WhereClause::new(object(json!({"userId": 1})));

    let err = v.build_update_fragments(&record, &clause).unwrap_err();
    assert_eq!(
        err,
        UpdateError::UnmappedField {
            field: "nickname".to_string(),
            clause: Clause::Set,
        }
    );
    assert_eq!(err.code(), "MODELSCHEMA_UNMAPPED_FIELD");
}

/// Strict mode refuses empty records and empty conditions.
#[test]
fn test_strict_rejects_empty_clauses() {
    let v = validator(ValidatorConfig::strict());
    assert_eq!(v.config().fragment_mode, FragmentMode::Strict);

    let empty = Map::new();
    let clause = WhereClause::new(object(json!({"userId": 1})));
    assert_eq!(
        v.build_update_fragments(&empty, &clause).unwrap_err(),
        UpdateError::EmptyAssignment
    );

    let record = object(json!({"userNames": "Pablo"}));
    let clause = WhereClause::new(Map::new());
    assert_eq!(
        v.build_update_fragments(&record, &clause).unwrap_err(),
        UpdateError::EmptyCondition
    );
}

/// A where clause deserializes from its JSON form with `=` as default.
#[test]
fn test_where_clause_from_json() {
    let clause: WhereClause = serde_json::from_value(json!({"where": {"userId": 1}})).unwrap();
    assert_eq!(clause.operator(), "=");
    assert_eq!(clause.conditions().len(), 1);
}

// =============================================================================
// Change Detection Tests
// =============================================================================

/// Changed fields are listed by alias, in sorted key order.
#[test]
fn test_differences_by_alias() {
    let v = validator(ValidatorConfig::default());
    let before = json!({"userNames": "Camilo", "userEmail": "a@mail.cl", "userAge": 30});
    let after = json!({"userNames": "Pablo", "userEmail": "a@mail.cl", "userAge": 31});

    assert_eq!(v.differences(&before, &after), vec!["Edad: 31", "Nombres: Pablo"]);
}

/// Identical records have no differences.
#[test]
fn test_no_differences() {
    let v = validator(ValidatorConfig::default());
    let before = json!({"userNames": "Camilo", "userActive": true});
    assert!(v.differences(&before, &before).is_empty());
}

/// Field names come back in declaration order.
#[test]
fn test_field_names_in_declaration_order() {
    let v = validator(ValidatorConfig::default());
    assert_eq!(
        v.field_names(),
        vec![
            "userId",
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
}
