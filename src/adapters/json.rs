// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON document codec adapter.
//!
//! This module provides the codec for JSON settings files. JSON is the default
//! format and the only one that is always compiled in, since documents are
//! JSON-shaped to begin with.

use crate::domain::{Document, DocumentFormat, Result, StoreError};
use crate::ports::DocumentCodec;

/// Codec for JSON settings documents.
///
/// Documents are written pretty-printed with two-space indentation so the
/// backing file stays readable and diffable.
///
/// # Examples
///
/// ```rust
/// use appsave::adapters::JsonCodec;
/// use appsave::ports::DocumentCodec;
/// use appsave::domain::Document;
/// use serde_json::json;
///
/// let codec = JsonCodec::new();
/// let mut doc = Document::new();
/// doc.insert("theme", json!("dark"));
///
/// let text = codec.encode(&doc).unwrap();
/// assert_eq!(codec.decode(&text).unwrap(), doc);
/// ```
#[derive(Debug, Clone)]
pub struct JsonCodec;

impl JsonCodec {
    /// Creates a new JSON codec.
    pub fn new() -> Self {
        JsonCodec
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCodec for JsonCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Json
    }

    fn encode(&self, document: &Document) -> Result<String> {
        serde_json::to_string_pretty(document)
            .map_err(|e| StoreError::serialize(DocumentFormat::Json, e))
    }

    fn decode(&self, text: &str) -> Result<Document> {
        serde_json::from_str(text).map_err(|e| StoreError::parse(DocumentFormat::Json, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_empty_document() {
        let codec = JsonCodec::new();
        let text = codec.encode(&Document::new()).unwrap();
        assert_eq!(text, "{}");
    }

    #[test]
    fn test_encode_is_pretty_printed() {
        let codec = JsonCodec::new();
        let mut doc = Document::new();
        doc.insert("name", json!("Rhyan"));
        let text = codec.encode(&doc).unwrap();
        assert_eq!(text, "{\n  \"name\": \"Rhyan\"\n}");
    }

    #[test]
    fn test_decode_nested_values() {
        let codec = JsonCodec::new();
        let doc = codec
            .decode(r#"{"profile": {"city": "Lisbon", "tags": ["a", "b"]}}"#)
            .unwrap();
        assert_eq!(doc.get("profile"), Some(&json!({"city": "Lisbon", "tags": ["a", "b"]})));
    }

    #[test]
    fn test_round_trip_preserves_document() {
        let codec = JsonCodec::new();
        let mut doc = Document::new();
        doc.insert("b", json!([1, 2.5, null, true]));
        doc.insert("a", json!({"nested": {"deep": "value"}}));
        let text = codec.encode(&doc).unwrap();
        assert_eq!(codec.decode(&text).unwrap(), doc);
    }

    #[test]
    fn test_decode_keeps_float_precision() {
        let codec = JsonCodec::new();
        let doc = codec.decode(r#"{"threshold": -20734679.423991334}"#).unwrap();
        assert_eq!(doc.get("threshold"), Some(&json!(-20734679.423991334)));
        assert!(codec.encode(&doc).unwrap().contains("-20734679.423991334"));
    }

    #[test]
    fn test_decode_rejects_malformed_text() {
        let codec = JsonCodec::new();
        let err = codec.decode("{\"name\": ").unwrap_err();
        assert!(matches!(err, StoreError::Parse { format: DocumentFormat::Json, .. }));
    }

    #[test]
    fn test_decode_rejects_top_level_array() {
        let codec = JsonCodec::new();
        assert!(codec.decode("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_decode_rejects_empty_text() {
        let codec = JsonCodec::new();
        assert!(codec.decode("").is_err());
    }

    #[test]
    fn test_format() {
        assert_eq!(JsonCodec::new().format(), DocumentFormat::Json);
    }
}
