//! Log Threshold Tests
//!
//! - A validator built with a configuration applies its log threshold
//! - Events below the threshold are suppressed
//! - The threshold is process-wide; the last configuration applied wins
//!
//! Kept in its own test binary so no other test moves the threshold meanwhile.

use modelschema::config::ValidatorConfig;
use modelschema::observability::{Event, Logger, Severity};
use modelschema::schema::{FieldSpec, SchemaMap, SchemaValidator};

fn schema() -> SchemaMap {
    SchemaMap::builder()
        .field("userLogin", FieldSpec::required_string("Login"))
        .build()
        .unwrap()
}

/// Building a validator applies its configured threshold.
#[test]
fn test_with_config_applies_log_level() {
    let config = ValidatorConfig {
        log_level: Severity::Error,
        ..ValidatorConfig::default()
    };
    let _quiet = SchemaValidator::with_config(schema(), config);

    assert_eq!(Logger::min_severity(), Severity::Error);
    assert!(!Logger::enabled(Severity::Warn));
    assert!(!Logger::enabled(Event::UnmappedFieldSkipped.severity()));
    assert!(Logger::enabled(Severity::Error));

    // Plain construction leaves the threshold alone
    let _plain = SchemaValidator::new(schema());
    assert_eq!(Logger::min_severity(), Severity::Error);

    let _verbose = SchemaValidator::with_config(
        schema(),
        ValidatorConfig {
            log_level: Severity::Trace,
            ..ValidatorConfig::default()
        },
    );
    assert!(Logger::enabled(Event::ValidationPassed.severity()));

    ValidatorConfig::default().apply();
    assert!(!Logger::enabled(Severity::Trace));
    assert!(Logger::enabled(Severity::Warn));
}
