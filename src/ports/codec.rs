// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document codec trait definition.
//!
//! This module defines the `DocumentCodec` trait, which provides an interface for
//! serializing and parsing settings documents in different formats (JSON, YAML, TOML).

use crate::domain::{Document, DocumentFormat, Result};

/// A trait for encoding and decoding settings documents.
///
/// This trait defines the interface for implementing codecs that can turn a
/// [`Document`] into the text stored on disk and back. One codec exists per
/// [`DocumentFormat`]; the store picks the codec matching its configured format.
///
/// # Round Trips
///
/// For every document a codec can encode, decoding the encoded text must yield
/// an equal document. Codecs for formats that cannot represent every JSON shape
/// (TOML has no null) report the gap as an encoding error rather than dropping
/// values silently.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a store can be shared across threads.
///
/// # Examples
///
/// ```rust
/// use appsave::ports::DocumentCodec;
/// use appsave::domain::{Document, DocumentFormat, Result};
///
/// struct MyCodec;
///
/// impl DocumentCodec for MyCodec {
///     fn format(&self) -> DocumentFormat {
///         DocumentFormat::Json
///     }
///
///     fn encode(&self, document: &Document) -> Result<String> {
///         Ok(serde_json::to_string(document).unwrap())
///     }
///
///     fn decode(&self, text: &str) -> Result<Document> {
///         Ok(serde_json::from_str(text).unwrap())
///     }
/// }
/// ```
pub trait DocumentCodec: Send + Sync {
    /// Returns the format this codec reads and writes.
    fn format(&self) -> DocumentFormat;

    /// Encodes a document into the text representation stored on disk.
    ///
    /// # Arguments
    ///
    /// * `document` - The document to encode
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The encoded document text
    /// * `Err(StoreError::Serialize)` - The document holds a value this format cannot express
    fn encode(&self, document: &Document) -> Result<String>;

    /// Parses document text read from disk.
    ///
    /// # Arguments
    ///
    /// * `text` - The raw file content
    ///
    /// # Returns
    ///
    /// * `Ok(Document)` - The parsed document
    /// * `Err(StoreError::Parse)` - The text is not a valid document in this format
    fn decode(&self, text: &str) -> Result<Document>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StoreError;
    use serde_json::json;

    // Test implementation of DocumentCodec for testing purposes
    struct TestCodec;

    impl DocumentCodec for TestCodec {
        fn format(&self) -> DocumentFormat {
            DocumentFormat::Json
        }

        fn encode(&self, document: &Document) -> Result<String> {
            serde_json::to_string(document)
                .map_err(|e| StoreError::serialize(DocumentFormat::Json, e))
        }

        fn decode(&self, text: &str) -> Result<Document> {
            serde_json::from_str(text).map_err(|e| StoreError::parse(DocumentFormat::Json, e))
        }
    }

    #[test]
    fn test_codec_format() {
        let codec = TestCodec;
        assert_eq!(codec.format(), DocumentFormat::Json);
    }

    #[test]
    fn test_codec_round_trip() {
        let codec = TestCodec;
        let mut doc = Document::new();
        doc.insert("key", json!("value"));
        let text = codec.encode(&doc).unwrap();
        let back = codec.decode(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_codec_decode_failure() {
        let codec = TestCodec;
        let err = codec.decode("not a document").unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
    }

    #[test]
    fn test_codec_is_object_safe() {
        let codec: Box<dyn DocumentCodec> = Box::new(TestCodec);
        assert_eq!(codec.format(), DocumentFormat::Json);
    }

    #[test]
    fn test_codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn DocumentCodec>>();
    }
}
