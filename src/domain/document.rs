// SPDX-License-Identifier: MIT OR Apache-2.0

//! The in-memory representation of a persisted settings document.
//!
//! This module provides the `Document` type, a newtype wrapper around an ordered
//! map from top-level keys to JSON-shaped values. Keeping the map ordered makes
//! every encode of the same document byte-for-byte identical, which in turn keeps
//! file diffs and backup comparisons stable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// The full key-value mapping held by a settings file.
///
/// A `Document` is always a flat map at the top level; nesting lives inside the
/// values, which are arbitrary JSON-shaped trees. The type serializes
/// transparently as the underlying map, so a JSON rendering of an empty
/// document is exactly `{}`.
///
/// # Examples
///
/// ```
/// use appsave::domain::document::Document;
/// use serde_json::json;
///
/// let mut doc = Document::new();
/// doc.insert("theme", json!("dark"));
/// doc.insert("volume", json!(70));
///
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.get("theme"), Some(&json!("dark")));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Creates a new, empty document.
    pub fn new() -> Self {
        Document(BTreeMap::new())
    }

    /// Returns a reference to the value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Inserts a value under `key`, returning the previous value if one existed.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Removes the value stored under `key`, returning it if it existed.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns `true` if the document holds a value under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns an iterator over the top-level keys, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Returns an iterator over key-value pairs, in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the document holds no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Removes every key from the document.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Consumes the document and returns the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }

    /// Renders the document as a `serde_json::Value::Object`.
    ///
    /// This is the shape schema validation walks over.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Document(map)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
