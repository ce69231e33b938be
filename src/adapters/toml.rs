// SPDX-License-Identifier: MIT OR Apache-2.0

//! TOML document codec adapter.
//!
//! This module provides the codec for TOML settings files. It is gated behind
//! the `toml` feature flag.

use crate::domain::{Document, DocumentFormat, Result, StoreError};
use crate::ports::DocumentCodec;

/// Codec for TOML settings documents.
///
/// TOML cannot express every JSON shape: there is no null, and integers are
/// limited to the `i64` range. Encoding a document that uses either reports a
/// [`StoreError::Serialize`] instead of silently dropping or rewriting the
/// value, so the caller learns the document does not fit the chosen format.
///
/// # Examples
///
/// ```rust
/// use appsave::adapters::TomlCodec;
/// use appsave::ports::DocumentCodec;
/// use appsave::domain::Document;
/// use serde_json::json;
///
/// let codec = TomlCodec::new();
/// let mut doc = Document::new();
/// doc.insert("name", json!("Rhyan"));
///
/// let text = codec.encode(&doc).unwrap();
/// assert_eq!(text, "name = \"Rhyan\"\n");
/// ```
#[derive(Debug, Clone)]
pub struct TomlCodec;

impl TomlCodec {
    /// Creates a new TOML codec.
    pub fn new() -> Self {
        TomlCodec
    }
}

impl Default for TomlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCodec for TomlCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Toml
    }

    fn encode(&self, document: &Document) -> Result<String> {
        toml::to_string_pretty(document)
            .map_err(|e| StoreError::serialize(DocumentFormat::Toml, e))
    }

    fn decode(&self, text: &str) -> Result<Document> {
        toml::from_str(text).map_err(|e| StoreError::parse(DocumentFormat::Toml, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_simple_document() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        doc.insert("volume", json!(70));
        assert_eq!(codec.encode(&doc).unwrap(), "volume = 70\n");
    }

    #[test]
    fn test_encode_empty_document() {
        let codec = TomlCodec::new();
        let text = codec.encode(&Document::new()).unwrap();
        assert_eq!(codec.decode(&text).unwrap(), Document::new());
    }

    #[test]
    fn test_nested_object_becomes_table() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        doc.insert("profile", json!({"city": "Lisbon"}));
        let text = codec.encode(&doc).unwrap();
        assert!(text.contains("[profile]"));
        assert_eq!(codec.decode(&text).unwrap(), doc);
    }

    #[test]
    fn test_scalar_after_table_key_still_encodes() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        // "alpha" sorts before "zeta", so a naive writer would emit the
        // table first and corrupt the document.
        doc.insert("alpha", json!({"inner": 1}));
        doc.insert("zeta", json!(5));
        let text = codec.encode(&doc).unwrap();
        assert_eq!(codec.decode(&text).unwrap(), doc);
    }

    #[test]
    fn test_round_trip_preserves_numbers() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        doc.insert("count", json!(42));
        doc.insert("ratio", json!(2.5));
        let back = codec.decode(&codec.encode(&doc).unwrap()).unwrap();
        assert_eq!(back.get("count"), Some(&json!(42)));
        assert_eq!(back.get("ratio"), Some(&json!(2.5)));
    }

    #[test]
    fn test_null_value_is_a_serialize_error() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        doc.insert("nothing", json!(null));
        let err = codec.encode(&doc).unwrap_err();
        assert!(matches!(err, StoreError::Serialize { format: DocumentFormat::Toml, .. }));
    }

    #[test]
    fn test_integer_beyond_i64_is_a_serialize_error() {
        let codec = TomlCodec::new();
        let mut doc = Document::new();
        doc.insert("huge", json!(u64::MAX));
        assert!(codec.encode(&doc).is_err());
    }

    #[test]
    fn test_decode_rejects_malformed_text() {
        let codec = TomlCodec::new();
        let err = codec.decode("volume = ").unwrap_err();
        assert!(matches!(err, StoreError::Parse { format: DocumentFormat::Toml, .. }));
    }

    #[test]
    fn test_format() {
        assert_eq!(TomlCodec::new().format(), DocumentFormat::Toml);
    }
}
