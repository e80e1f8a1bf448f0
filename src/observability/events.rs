//! Observable events
//!
//! Events are explicit and typed. Each one maps to a stable string that
//! appears in the `event` key of a log line.

use std::fmt;

use super::logger::Severity;

/// Observable events in modelschema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Setup
    /// Configuration file loaded
    ConfigLoaded,
    /// Schema document loaded into a schema map
    SchemaLoaded,

    // Validation
    /// Record passed validation
    ValidationPassed,
    /// Record failed validation
    ValidationFailed,

    // Update fragments
    /// SET/WHERE fragments produced
    FragmentsBuilt,
    /// Key without a physical column left out of a fragment
    UnmappedFieldSkipped,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::ValidationPassed => "VALIDATION_PASSED",
            Event::ValidationFailed => "VALIDATION_FAILED",
            Event::FragmentsBuilt => "FRAGMENTS_BUILT",
            Event::UnmappedFieldSkipped => "UNMAPPED_FIELD_SKIPPED",
        }
    }

    /// Severity an event is logged with by default.
    pub fn severity(&self) -> Severity {
        match self {
            Event::ConfigLoaded | Event::SchemaLoaded => Severity::Info,
            Event::ValidationPassed | Event::ValidationFailed | Event::FragmentsBuilt => {
                Severity::Trace
            }
            Event::UnmappedFieldSkipped => Severity::Warn,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::SchemaLoaded.as_str(), "SCHEMA_LOADED");
        assert_eq!(Event::UnmappedFieldSkipped.to_string(), "UNMAPPED_FIELD_SKIPPED");
    }

    #[test]
    fn test_validation_outcomes_are_trace() {
        assert_eq!(Event::ValidationPassed.severity(), Severity::Trace);
        assert_eq!(Event::ValidationFailed.severity(), Severity::Trace);
        assert_eq!(Event::UnmappedFieldSkipped.severity(), Severity::Warn);
    }
}
