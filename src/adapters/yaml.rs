// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML document codec adapter.
//!
//! This module provides the codec for YAML settings files. It is gated behind
//! the `yaml` feature flag.

use crate::domain::{Document, DocumentFormat, Result, StoreError};
use crate::ports::DocumentCodec;

/// Codec for YAML settings documents.
///
/// Values survive the trip through YAML unchanged: strings that look like
/// numbers or booleans are quoted on encode, and YAML 1.2 scalar rules apply
/// on decode. Documents with non-string mapping keys are rejected as parse
/// errors rather than coerced.
///
/// # Examples
///
/// ```rust
/// use appsave::adapters::YamlCodec;
/// use appsave::ports::DocumentCodec;
/// use appsave::domain::Document;
/// use serde_json::json;
///
/// let codec = YamlCodec::new();
/// let mut doc = Document::new();
/// doc.insert("volume", json!(70));
///
/// let text = codec.encode(&doc).unwrap();
/// assert_eq!(codec.decode(&text).unwrap(), doc);
/// ```
#[derive(Debug, Clone)]
pub struct YamlCodec;

impl YamlCodec {
    /// Creates a new YAML codec.
    pub fn new() -> Self {
        YamlCodec
    }
}

impl Default for YamlCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCodec for YamlCodec {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Yaml
    }

    fn encode(&self, document: &Document) -> Result<String> {
        serde_yaml::to_string(document)
            .map_err(|e| StoreError::serialize(DocumentFormat::Yaml, e))
    }

    fn decode(&self, text: &str) -> Result<Document> {
        serde_yaml::from_str(text).map_err(|e| StoreError::parse(DocumentFormat::Yaml, e))
    }
}
