//! Input records
//!
//! A record maps keys to JSON values. Besides absent keys and `null`, a key
//! may also be explicitly *undefined*: present, but carrying no value. The
//! validator rejects such records, so the distinction has to survive until
//! validation runs.

use serde_json::{Map, Value};

/// One entry of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// Key present without a value
    Undefined,
    /// Key present with a value (which may be `null`)
    Value(Value),
}

impl Slot {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Slot::Undefined => None,
            Slot::Value(v) => Some(v),
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Slot::Undefined)
    }
}

/// Ordered record submitted for validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    entries: Vec<(String, Slot)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a value, keeping the key's original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.put(key.into(), Slot::Value(value.into()));
    }

    /// Mark a key as present but undefined.
    pub fn insert_undefined(&mut self, key: impl Into<String>) {
        self.put(key.into(), Slot::Undefined);
    }

    fn put(&mut self, key: String, slot: Slot) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = slot,
            None => self.entries.push((key, slot)),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn slot(&self, key: &str) -> Option<&Slot> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    pub(crate) fn slot_mut(&mut self, key: &str) -> Option<&mut Slot> {
        self.entries.iter_mut().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    /// Value for `key`; `None` when absent or undefined.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.slot(key).and_then(Slot::as_value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn has_undefined(&self) -> bool {
        self.entries.iter().any(|(_, s)| s.is_undefined())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Defined entries as a JSON object, in record order.
    pub fn to_map(&self) -> Map<String, Value> {
        self.entries
            .iter()
            .filter_map(|(k, s)| s.as_value().map(|v| (k.clone(), v.clone())))
            .collect()
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Slot::Value(v))).collect(),
        }
    }
}

impl TryFrom<Value> for Record {
    type Error = Value;

    /// Only JSON objects convert; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => Err(other),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Slot)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Slot)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, slot) in iter {
            record.put(k.into(), slot);
        }
        record
    }
}
