// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing codec, backup, and encryption implementations.
//!
//! This module contains concrete implementations of the traits defined in the
//! ports layer, plus the filesystem-facing helpers the store delegates to. Each
//! codec adapter implements the `DocumentCodec` trait for one document format.

pub mod backup;
#[cfg(feature = "crypto")]
pub mod crypto;
pub mod json;
#[cfg(feature = "toml")]
pub mod toml;
#[cfg(feature = "yaml")]
pub mod yaml;

use crate::domain::{DocumentFormat, Result, StoreError};
use crate::ports::DocumentCodec;

// Re-export adapters based on feature flags
pub use backup::BackupManager;
#[cfg(feature = "crypto")]
pub use crypto::ValueCipher;
pub use json::JsonCodec;
// `self::` keeps the module from shadow-colliding with the toml crate.
#[cfg(feature = "toml")]
pub use self::toml::TomlCodec;
#[cfg(feature = "yaml")]
pub use yaml::YamlCodec;

/// Returns the codec for a format, if its adapter was compiled in.
///
/// # Errors
///
/// Returns [`StoreError::UnsupportedFormat`] when the format's feature flag
/// was disabled at build time.
///
/// # Examples
///
/// ```
/// use appsave::adapters::codec_for;
/// use appsave::domain::DocumentFormat;
///
/// let codec = codec_for(DocumentFormat::Json).unwrap();
/// assert_eq!(codec.format(), DocumentFormat::Json);
/// ```
pub fn codec_for(format: DocumentFormat) -> Result<Box<dyn DocumentCodec>> {
    match format {
        DocumentFormat::Json => Ok(Box::new(JsonCodec::new())),
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => Ok(Box::new(YamlCodec::new())),
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => Ok(Box::new(TomlCodec::new())),
        #[allow(unreachable_patterns)]
        other => Err(StoreError::UnsupportedFormat {
            format: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codec_for_json() {
        assert_eq!(codec_for(DocumentFormat::Json).unwrap().format(), DocumentFormat::Json);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_codec_for_yaml() {
        assert_eq!(codec_for(DocumentFormat::Yaml).unwrap().format(), DocumentFormat::Yaml);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_codec_for_toml() {
        assert_eq!(codec_for(DocumentFormat::Toml).unwrap().format(), DocumentFormat::Toml);
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn test_codec_for_disabled_format() {
        let result = codec_for(DocumentFormat::Yaml);
        assert!(matches!(result, Err(StoreError::UnsupportedFormat { .. })));
    }
}
