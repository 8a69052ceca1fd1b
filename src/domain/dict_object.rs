//! Attribute-style access to JSON payloads returned by forges.

use crate::utils::error::{Result, SyncError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::ops::Index;

/// A string-keyed map whose nested maps are themselves `DictObject`s.
///
/// Key access and attribute-style access (`attr`) read the same entries, so a
/// nested object reached either way is the very same value.
///
/// ```
/// use isshub_sync::DictObject;
///
/// let obj = DictObject::from_json(r#"{"a": 1, "b": {"c": "x"}}"#).unwrap();
/// assert_eq!(obj["a"].as_i64(), Some(1));
/// assert_eq!(obj.attr("b").unwrap().as_object().unwrap()["c"].as_str(), Some("x"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DictObject {
    entries: BTreeMap<String, Entry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    Object(DictObject),
    Value(Value),
}

impl Entry {
    fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Entry::Object(DictObject::from_map(map)),
            other => Entry::Value(other),
        }
    }

    pub fn as_object(&self) -> Option<&DictObject> {
        match self {
            Entry::Object(obj) => Some(obj),
            Entry::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Object(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    pub fn to_value(&self) -> Value {
        match self {
            Entry::Object(obj) => obj.to_value(),
            Entry::Value(value) => value.clone(),
        }
    }
}

impl DictObject {
    pub fn new() -> Self {
        Self::default()
    }

    fn from_map(map: serde_json::Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(key, value)| (key, Entry::from_value(value)))
                .collect(),
        }
    }

    /// Converts a JSON object, recursively. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(SyncError::NotAnObject {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn attr(&self, key: &str) -> Result<&Entry> {
        self.entries.get(key).ok_or_else(|| SyncError::MissingKey {
            key: key.to_string(),
        })
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(key.into(), Entry::from_value(value.into()));
    }

    pub fn set_object(&mut self, key: impl Into<String>, value: DictObject) {
        self.entries.insert(key.into(), Entry::Object(value));
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.to_value()))
                .collect(),
        )
    }
}

impl Index<&str> for DictObject {
    type Output = Entry;

    fn index(&self, key: &str) -> &Entry {
        match self.entries.get(key) {
            Some(entry) => entry,
            None => panic!("no entry found for key {key:?}"),
        }
    }
}

impl PartialEq<Value> for DictObject {
    fn eq(&self, other: &Value) -> bool {
        self.to_value() == *other
    }
}

impl TryFrom<Value> for DictObject {
    type Error = SyncError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
