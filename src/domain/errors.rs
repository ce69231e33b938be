// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the settings store.
//!
//! This module defines the error types that can occur when persisting, validating,
//! or encrypting settings. All errors use `thiserror` for proper error handling
//! and conversion.

use crate::domain::format::DocumentFormat;
use crate::domain::schema::SchemaViolation;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for settings store operations.
///
/// This enum represents all possible errors that can occur when reading, writing,
/// validating, or encrypting settings documents. It is marked as `#[non_exhaustive]`
/// to allow for future additions without breaking backwards compatibility.
///
/// # Examples
///
/// ```
/// use appsave::domain::errors::StoreError;
///
/// fn load_key(key: &str) -> Result<(), StoreError> {
///     if key.len() != 32 {
///         return Err(StoreError::InvalidKeyLength { length: key.len() });
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// The requested document format is not recognized or was compiled out.
    #[error("Unsupported document format: {format}")]
    UnsupportedFormat {
        /// The format name that was requested
        format: String,
    },

    /// The document path is not absolute.
    #[error("Document path must be absolute: {}", path.display())]
    RelativePath {
        /// The rejected path
        path: PathBuf,
    },

    /// The encryption key does not have the length required by AES-256.
    #[error("Encryption key must be exactly 32 bytes, got {length}")]
    InvalidKeyLength {
        /// The length of the rejected key, in bytes
        length: usize,
    },

    /// An encryption operation was requested but no key has been configured.
    #[error("No encryption key has been configured")]
    MissingEncryptionKey,

    /// The document failed validation against the configured schema.
    #[error("Schema validation failed with {} violation(s)", violations.len())]
    ValidationFailed {
        /// Every violation discovered during validation
        violations: Vec<SchemaViolation>,
    },

    /// The supplied schema itself is malformed and could not be compiled.
    #[error("Invalid schema: {message}")]
    InvalidSchema {
        /// A description of what is wrong with the schema
        message: String,
    },

    /// Failed to parse the persisted document.
    #[error("Failed to parse {format} document: {message}")]
    Parse {
        /// The format the document was expected to be in
        format: DocumentFormat,
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to encode a document for persistence.
    #[error("Failed to encode {format} document: {message}")]
    Serialize {
        /// The format the document was being encoded into
        format: DocumentFormat,
        /// The error message
        message: String,
        /// The underlying encoding error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to convert a stored value to the requested type.
    #[error("Failed to convert value for key '{key}' to type {target_type}: {source}")]
    TypeConversion {
        /// The key whose value was being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An encryption or decryption operation failed.
    #[error("Encryption error: {message}")]
    Crypto {
        /// A description of the failure
        message: String,
    },

    /// No backup snapshot exists for the requested timestamp.
    #[error("No backup found for timestamp: {timestamp}")]
    BackupNotFound {
        /// The timestamp that was requested
        timestamp: String,
    },

    /// An I/O error occurred while reading or writing the document.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Creates a `Parse` error from a format and an underlying decoder error.
    pub fn parse(
        format: DocumentFormat,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Parse {
            format,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `Serialize` error from a format and an underlying encoder error.
    pub fn serialize(
        format: DocumentFormat,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        StoreError::Serialize {
            format,
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a `Crypto` error with the given message.
    pub fn crypto(message: impl Into<String>) -> Self {
        StoreError::Crypto {
            message: message.into(),
        }
    }
}

/// A specialized Result type for settings store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
