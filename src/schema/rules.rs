//! Custom per-field rules
//!
//! A rule receives the field's current value and either accepts it, rejects it
//! with a message, or accepts it while supplying a replacement value. Rules may
//! be synchronous closures or closures returning a future; the validator awaits
//! both the same way.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;

/// Result of running a custom rule against a value.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleOutcome {
    /// The value is acceptable as is
    Valid,
    /// The value is rejected; the message is prefixed with the field alias
    Invalid(String),
    /// The value is acceptable and must be replaced by the given one
    Replace(Value),
}

impl RuleOutcome {
    /// Reject with a message.
    pub fn invalid(message: impl Into<String>) -> Self {
        RuleOutcome::Invalid(message.into())
    }

    /// Accept and rewrite the value.
    pub fn replace(value: impl Into<Value>) -> Self {
        RuleOutcome::Replace(value.into())
    }

    /// Returns true unless the outcome is a rejection.
    pub fn is_ok(&self) -> bool {
        !matches!(self, RuleOutcome::Invalid(_))
    }
}

/// A custom validation capability attached to a field.
pub trait FieldRule: Send + Sync {
    /// Checks `value`, possibly asynchronously.
    fn check<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, RuleOutcome>;
}

/// Shared handle to a rule; schemas are cloned cheaply through it.
pub type SharedRule = Arc<dyn FieldRule>;

/// Formats a field value for change messages.
pub type DisplayFormatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Adapter for plain closures.
pub struct SyncRule<F>(F);

impl<F> SyncRule<F>
where
    F: Fn(&Value) -> RuleOutcome + Send + Sync,
{
    pub fn new(check: F) -> Self {
        Self(check)
    }
}

impl<F> FieldRule for SyncRule<F>
where
    F: Fn(&Value) -> RuleOutcome + Send + Sync,
{
    fn check<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, RuleOutcome> {
        future::ready((self.0)(value)).boxed()
    }
}

/// Adapter for closures returning a future. The closure gets an owned copy of
/// the value so the future does not borrow the record.
pub struct AsyncRule<F>(F);

impl<F, Fut> AsyncRule<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = RuleOutcome> + Send + 'static,
{
    pub fn new(check: F) -> Self {
        Self(check)
    }
}

impl<F, Fut> FieldRule for AsyncRule<F>
where
    F: Fn(Value) -> Fut + Send + Sync,
    Fut: Future<Output = RuleOutcome> + Send + 'static,
{
    fn check<'a>(&'a self, value: &'a Value) -> BoxFuture<'a, RuleOutcome> {
        (self.0)(value.clone()).boxed()
    }
}

/// Wraps a closure as a shared rule.
pub fn rule<F>(check: F) -> SharedRule
where
    F: Fn(&Value) -> RuleOutcome + Send + Sync + 'static,
{
    Arc::new(SyncRule::new(check))
}

/// Wraps an async closure as a shared rule.
pub fn async_rule<F, Fut>(check: F) -> SharedRule
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RuleOutcome> + Send + 'static,
{
    Arc::new(AsyncRule::new(check))
}

pub(crate) struct RuleDebug<'a>(pub(crate) &'a Option<SharedRule>);

impl fmt::Debug for RuleDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => write!(f, "Some(<rule>)"),
            None => write!(f, "None"),
        }
    }
}
