// ============================================================
// CUSTOM ATTRIBUTES
// ============================================================
// Arbitrary key -> list-of-values properties attached to an entity

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Custom attributes of one entity. Values keep their structure
/// (strings, numbers, arrays, objects) so copying never re-encodes them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, Vec<Value>>);

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values stored under `key`, empty if the key is absent
    pub fn values(&self, key: &str) -> &[Value] {
        self.0.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any value under `key` reads as `expected`
    pub fn matches(&self, key: &str, expected: &str) -> bool {
        self.values(key)
            .iter()
            .filter_map(value_as_text)
            .any(|text| text == expected)
    }

    pub fn add(&mut self, key: &str, value: Value) {
        self.0.entry(key.to_string()).or_default().push(value);
    }

    /// Replace every value under `key` with a single one
    pub fn set(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), vec![value]);
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<Value>> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Value>)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Value>)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Scalar attribute value as text; structured values have no text form.
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(if *b { "1".to_string() } else { String::new() }),
        _ => None,
    }
}
