// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single-file settings store for desktop applications.
//!
//! This crate persists application settings as a flat key-value document in a
//! single JSON, YAML, or TOML file. Writes can be gated by a schema, individual
//! values can be encrypted into opaque tokens, the whole file can be captured
//! as a timestamped backup, and callers can observe changes to individual keys.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: Core types and business logic (`Document`, `DocumentFormat`,
//!   `CompiledSchema`, `ChangeNotifier`, errors)
//! - **Ports**: Trait definitions that define interfaces (`DocumentCodec`)
//! - **Adapters**: Implementations for specific formats and facilities (JSON, YAML,
//!   TOML codecs, backups, encryption)
//! - **Service**: The `SettingsStore` facade that orchestrates everything
//!
//! # Features
//!
//! - **Single File**: One document file is the source of truth; every read
//!   consults it and every write rewrites it atomically
//! - **Schema Validation**: Mutations are validated against a compiled schema
//!   and rejected before they touch the disk
//! - **Value Encryption**: Individual values can be masked into hex tokens
//!   with AES-256-CBC and a caller-provided key
//! - **Timestamped Backups**: The file can be snapshotted into a sibling
//!   `appBackup` directory and restored by timestamp
//! - **Change Observers**: Callbacks fire per key after successful writes
//! - **Crash Safety**: A corrupt or missing file reads as an empty document
//!   instead of failing the caller
//!
//! # Feature Flags
//!
//! - `yaml`: Enable the YAML document format (default)
//! - `toml`: Enable the TOML document format (default)
//! - `crypto`: Enable AES-256-CBC value masking (default)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use appsave::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> appsave::domain::Result<()> {
//! let mut store = SettingsStore::new("/tmp/myapp/settings.json", DocumentFormat::Json)?;
//!
//! store.set_schema(&json!({
//!     "type": "object",
//!     "properties": {
//!         "name": { "type": "string" },
//!         "age": { "type": "integer", "minimum": 0 }
//!     }
//! }))?;
//!
//! store.set("name", json!("Rhyan"))?;
//! store.set("age", json!(30))?;
//!
//! let snapshot = store.backup()?;
//! println!("backed up to {}", snapshot.display());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ChangeCallback, Document, DocumentFormat, Result, SchemaViolation, StoreError,
    };
    pub use crate::ports::DocumentCodec;
    pub use crate::service::{SettingsStore, SettingsStoreBuilder};

    pub use crate::adapters::{BackupManager, JsonCodec};

    // Re-export adapters based on feature flags
    #[cfg(feature = "crypto")]
    pub use crate::adapters::ValueCipher;
    #[cfg(feature = "toml")]
    pub use crate::adapters::TomlCodec;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlCodec;
}
