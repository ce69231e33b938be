// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document format enumeration for the settings store.
//!
//! This module provides the `DocumentFormat` type, which names the text encodings
//! a settings document can be persisted in. The format decides which codec adapter
//! serializes and parses the backing file, and which file extension is used for
//! default paths and backup snapshots.

use crate::domain::errors::{Result, StoreError};
use std::fmt;
use std::str::FromStr;

/// The text encoding used for the persisted settings document.
///
/// All three variants are always present so that format values can be named,
/// compared, and displayed regardless of which codecs were compiled in. Asking
/// the store to actually use a format whose codec was compiled out fails with
/// [`StoreError::UnsupportedFormat`].
///
/// # Examples
///
/// ```
/// use appsave::domain::format::DocumentFormat;
///
/// let format = DocumentFormat::Json;
/// assert_eq!(format.extension(), "json");
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// JSON, the default format.
    Json,
    /// YAML 1.2 as understood by `serde_yaml`.
    Yaml,
    /// TOML 1.0 as understood by the `toml` crate.
    Toml,
}

impl DocumentFormat {
    /// Returns the canonical file extension for this format, without the dot.
    ///
    /// # Examples
    ///
    /// ```
    /// use appsave::domain::format::DocumentFormat;
    ///
    /// assert_eq!(DocumentFormat::Json.extension(), "json");
    /// assert_eq!(DocumentFormat::Yaml.extension(), "yaml");
    /// assert_eq!(DocumentFormat::Toml.extension(), "toml");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Json => "json",
            DocumentFormat::Yaml => "yaml",
            DocumentFormat::Toml => "toml",
        }
    }

    /// Returns the lowercase name of this format.
    pub fn as_str(&self) -> &'static str {
        self.extension()
    }
}

impl Default for DocumentFormat {
    fn default() -> Self {
        DocumentFormat::Json
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = StoreError;

    /// Parses a format name, accepting `yml` as an alias for YAML.
    ///
    /// # Examples
    ///
    /// ```
    /// use appsave::domain::format::DocumentFormat;
    ///
    /// let format: DocumentFormat = "YAML".parse().unwrap();
    /// assert_eq!(format, DocumentFormat::Yaml);
    /// assert!("ini".parse::<DocumentFormat>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(DocumentFormat::Json),
            "yaml" | "yml" => Ok(DocumentFormat::Yaml),
            "toml" => Ok(DocumentFormat::Toml),
            _ => Err(StoreError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}
