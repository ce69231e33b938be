// SPDX-License-Identifier: MIT OR Apache-2.0

//! The settings store facade.
//!
//! This module provides `SettingsStore`, the service that ties the codec,
//! schema, backup, encryption, and observer pieces together behind a small
//! key-value API. The store owns a single document file: every accessor
//! re-reads it and every mutation rewrites it, so the file on disk is always
//! the source of truth and several stores pointed at the same path see each
//! other's writes.

use crate::adapters::{codec_for, BackupManager};
#[cfg(feature = "crypto")]
use crate::adapters::ValueCipher;
use crate::domain::{
    ChangeCallback, ChangeNotifier, CompiledSchema, Document, DocumentFormat, Result,
    SchemaViolation, StoreError,
};
use crate::ports::DocumentCodec;
use directories::BaseDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the settings file used when no path is given.
const DEFAULT_FILE_STEM: &str = "appConfig";

/// A schema-validated, observable, single-file settings store.
///
/// The store persists a flat key-value document in JSON, YAML, or TOML. Writes
/// go through an optional compiled schema; a write that would make the document
/// invalid is aborted before anything touches the disk. Reads never fail the
/// caller: an unreadable or corrupt file behaves like an empty document, and
/// the next successful write replaces it.
///
/// # Examples
///
/// ```rust,no_run
/// use appsave::prelude::*;
/// use serde_json::json;
///
/// # fn main() -> appsave::domain::Result<()> {
/// let mut store = SettingsStore::new("/tmp/myapp/settings.json", DocumentFormat::Json)?;
///
/// store.set("theme", json!("dark"))?;
/// store.set("profile", json!({"name": "Rhyan", "city": "Lisbon"}))?;
///
/// assert_eq!(store.get("theme"), Some(json!("dark")));
/// # Ok(())
/// # }
/// ```
pub struct SettingsStore {
    /// Absolute path of the live document file.
    path: PathBuf,
    /// Format the document is persisted in.
    format: DocumentFormat,
    /// Codec matching `format`.
    codec: Box<dyn DocumentCodec>,
    /// Compiled schema gating writes, if one was installed.
    schema: Option<CompiledSchema>,
    /// Cipher for value masking, if a key was installed.
    #[cfg(feature = "crypto")]
    cipher: Option<ValueCipher>,
    /// Per-key change observers.
    notifier: ChangeNotifier,
}

impl SettingsStore {
    /// Creates a store backed by the given file.
    ///
    /// The path must be absolute. If the file does not exist yet, it is
    /// created immediately holding an empty document, along with any missing
    /// parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RelativePath`] for relative paths and
    /// [`StoreError::UnsupportedFormat`] when the format's codec was
    /// compiled out.
    pub fn new(path: impl Into<PathBuf>, format: DocumentFormat) -> Result<Self> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(StoreError::RelativePath { path });
        }
        let codec = codec_for(format)?;
        let store = SettingsStore {
            path,
            format,
            codec,
            schema: None,
            #[cfg(feature = "crypto")]
            cipher: None,
            notifier: ChangeNotifier::new(),
        };
        store.ensure_file()?;
        Ok(store)
    }

    /// Creates a store at `appConfig.<ext>` in the user's home directory.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use appsave::prelude::*;
    ///
    /// let store = SettingsStore::with_default_path(DocumentFormat::Json).unwrap();
    /// println!("settings live at {}", store.path().display());
    /// ```
    pub fn with_default_path(format: DocumentFormat) -> Result<Self> {
        let dirs = BaseDirs::new().ok_or_else(|| {
            StoreError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "could not determine a home directory",
            ))
        })?;
        let path = dirs
            .home_dir()
            .join(format!("{}.{}", DEFAULT_FILE_STEM, format.extension()));
        Self::new(path, format)
    }

    /// Creates a new settings store builder.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use appsave::prelude::*;
    /// use serde_json::json;
    ///
    /// # fn main() -> appsave::domain::Result<()> {
    /// let store = SettingsStore::builder()
    ///     .path("/tmp/myapp/settings.json")
    ///     .schema(json!({"type": "object"}))
    ///     .build()?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn builder() -> SettingsStoreBuilder {
        SettingsStoreBuilder::new()
    }

    /// Returns the path of the live document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the format the document is persisted in.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Moves the store to a different file.
    ///
    /// The new path must be absolute. If no file exists there yet, one is
    /// created holding an empty document. The previous file is left in place.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(StoreError::RelativePath { path });
        }
        self.path = path;
        tracing::debug!(path = %self.path.display(), "document path changed");
        self.ensure_file()
    }

    /// Installs the encryption key used by [`mask`](Self::mask) and
    /// [`unmask`](Self::unmask).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKeyLength`] unless the key is exactly
    /// 32 bytes long.
    #[cfg(feature = "crypto")]
    pub fn set_encryption_key(&mut self, key: &str) -> Result<()> {
        self.cipher = Some(ValueCipher::new(key)?);
        Ok(())
    }

    /// Compiles and installs a schema; subsequent writes are validated against it.
    ///
    /// The document already on disk is not re-checked here. Use
    /// [`validate`](Self::validate) to inspect it explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSchema`] when the schema cannot be compiled.
    pub fn set_schema(&mut self, schema: &Value) -> Result<()> {
        self.schema = Some(CompiledSchema::compile(schema)?);
        tracing::debug!("schema installed");
        Ok(())
    }

    /// Removes the installed schema; writes are no longer validated.
    pub fn clear_schema(&mut self) {
        self.schema = None;
    }

    /// Writes a value under `key`, replacing any existing value.
    ///
    /// The value may be anything serializable to JSON. After a successful
    /// write, observers registered for `key` are notified with the new value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ValidationFailed`] when a schema is installed and
    /// the resulting document would violate it; in that case the file is left
    /// untouched.
    pub fn set(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = to_json_value(value)?;
        self.apply(key, value, false)
    }

    /// Writes a value under `key`, shallow-merging objects.
    ///
    /// When both the existing and the incoming value are objects, the incoming
    /// object's entries are laid over the existing ones and the rest are kept.
    /// Any other combination replaces the value, exactly like
    /// [`set`](Self::set). The merge is one level deep; nested objects are
    /// replaced wholesale.
    pub fn merge(&mut self, key: &str, value: impl Serialize) -> Result<()> {
        let value = to_json_value(value)?;
        self.apply(key, value, true)
    }

    /// Returns the value stored under `key`, if any.
    ///
    /// An unreadable or corrupt file yields `None` for every key.
    pub fn get(&self, key: &str) -> Option<Value> {
        let mut document = self.read_document_lossy();
        document.remove(key)
    }

    /// Returns the value stored under `key`, or `default` when absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Returns the value stored under `key`, deserialized into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TypeConversion`] when a value exists but does not
    /// deserialize into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|e| {
                StoreError::TypeConversion {
                    key: key.to_string(),
                    target_type: std::any::type_name::<T>().to_string(),
                    source: Box::new(e),
                }
            }),
        }
    }

    /// Removes `key` from the document.
    ///
    /// Returns `true` if the key existed. When it does not, nothing is
    /// written and observers are not involved either way: deletions never
    /// notify.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        let mut document = self.read_document_lossy();
        if document.remove(key).is_none() {
            return Ok(false);
        }
        self.check_schema(&document)?;
        self.write_document(&document)?;
        tracing::debug!(key = %key, "key deleted");
        Ok(true)
    }

    /// Replaces the document with an empty one.
    ///
    /// Like every write, clearing is validated first, so a schema with
    /// required keys rejects it.
    pub fn clear(&mut self) -> Result<()> {
        let document = Document::new();
        self.check_schema(&document)?;
        self.write_document(&document)?;
        tracing::debug!("document cleared");
        Ok(())
    }

    /// Returns `true` if the document holds a value under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.read_document_lossy().contains_key(key)
    }

    /// Returns every top-level key, in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.read_document_lossy().keys().cloned().collect()
    }

    /// Reads the full persisted document.
    ///
    /// A missing file yields an empty document. Unlike the key accessors,
    /// this surfaces a corrupt file as [`StoreError::Parse`] instead of
    /// pretending it is empty, which makes it the right call for diagnostics.
    pub fn document(&self) -> Result<Document> {
        match fs::read_to_string(&self.path) {
            Ok(text) => self.codec.decode(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Document::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validates the persisted document against the installed schema.
    ///
    /// Returns every violation found; an empty vector means the document is
    /// valid. Without an installed schema every document is valid.
    pub fn validate(&self) -> Result<Vec<SchemaViolation>> {
        let document = self.document()?;
        Ok(match &self.schema {
            Some(schema) => schema.validate(&document),
            None => Vec::new(),
        })
    }

    /// Encrypts a value into an opaque hex token.
    ///
    /// The token is an ordinary string; storing it under a key is up to the
    /// caller. See [`ValueCipher`] for the token layout.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingEncryptionKey`] when no key was installed.
    #[cfg(feature = "crypto")]
    pub fn mask(&self, value: impl Serialize) -> Result<String> {
        let cipher = self.cipher.as_ref().ok_or(StoreError::MissingEncryptionKey)?;
        let value = to_json_value(value)?;
        cipher.mask(&value)
    }

    /// Decrypts a token produced by [`mask`](Self::mask).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingEncryptionKey`] when no key was installed,
    /// and [`StoreError::Crypto`] for malformed tokens or a wrong key.
    #[cfg(feature = "crypto")]
    pub fn unmask(&self, token: &str) -> Result<Value> {
        let cipher = self.cipher.as_ref().ok_or(StoreError::MissingEncryptionKey)?;
        cipher.unmask(token)
    }

    /// Copies the live file into a timestamped snapshot.
    ///
    /// Snapshots land in an `appBackup` directory next to the live file.
    /// Returns the path of the snapshot that was written.
    pub fn backup(&self) -> Result<PathBuf> {
        self.backup_manager().backup()
    }

    /// Restores the snapshot taken at `timestamp` over the live file.
    ///
    /// The timestamp is the `MM-DD-YYYY-HH-MM-SS` portion of the snapshot
    /// name, as returned by [`backups`](Self::backups).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::BackupNotFound`] when no snapshot exists for the
    /// timestamp.
    pub fn restore(&self, timestamp: &str) -> Result<()> {
        self.backup_manager().restore(timestamp)
    }

    /// Lists the timestamps of every snapshot taken for this file.
    pub fn backups(&self) -> Result<Vec<String>> {
        self.backup_manager().list()
    }

    /// Registers a callback invoked after every successful `set` or `merge`
    /// of `key`, with the value that was written.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use appsave::prelude::*;
    /// use serde_json::json;
    /// use std::sync::Arc;
    ///
    /// # fn main() -> appsave::domain::Result<()> {
    /// let mut store = SettingsStore::new("/tmp/myapp/settings.json", DocumentFormat::Json)?;
    /// store.on_change("theme", Arc::new(|value| {
    ///     println!("theme is now {}", value);
    /// }));
    /// store.set("theme", json!("dark"))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn on_change(&mut self, key: impl Into<String>, callback: ChangeCallback) {
        self.notifier.subscribe(key, callback);
    }

    /// The backup manager for the current path, built fresh so it tracks
    /// `set_path`.
    fn backup_manager(&self) -> BackupManager {
        BackupManager::new(self.path.clone(), self.format.extension())
    }

    /// Reads, mutates, validates, persists, then notifies.
    fn apply(&mut self, key: &str, value: Value, merge: bool) -> Result<()> {
        let mut document = self.read_document_lossy();

        let new_value = if merge {
            match (document.get(key), value) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    let mut merged = existing.clone();
                    for (k, v) in incoming {
                        merged.insert(k, v);
                    }
                    Value::Object(merged)
                }
                (_, value) => value,
            }
        } else {
            value
        };

        document.insert(key, new_value.clone());
        self.check_schema(&document)?;
        self.write_document(&document)?;
        tracing::debug!(key = %key, "value written");
        self.notifier.notify(key, &new_value);
        Ok(())
    }

    /// Validates a candidate document when a schema is installed.
    fn check_schema(&self, document: &Document) -> Result<()> {
        if let Some(schema) = &self.schema {
            let violations = schema.validate(document);
            if !violations.is_empty() {
                tracing::debug!(count = violations.len(), "write rejected by schema");
                return Err(StoreError::ValidationFailed { violations });
            }
        }
        Ok(())
    }

    /// Reads the document, treating anything unreadable as empty.
    fn read_document_lossy(&self) -> Document {
        match self.document() {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "unreadable document; treating it as empty"
                );
                Document::new()
            }
        }
    }

    /// Encodes and persists a document.
    fn write_document(&self, document: &Document) -> Result<()> {
        let text = self.codec.encode(document)?;
        self.write_text(&text)
    }

    /// Writes the file through a staging file and a rename, so a crash
    /// mid-write cannot truncate the live document.
    fn write_text(&self, text: &str) -> Result<()> {
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, text)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Materializes an empty document unless the file already exists.
    fn ensure_file(&self) -> Result<()> {
        if self.path.is_file() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        tracing::debug!(path = %self.path.display(), "materializing empty document");
        self.write_document(&Document::new())
    }
}

impl fmt::Debug for SettingsStore {
    // The boxed codec and the observer callbacks have no Debug form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("path", &self.path)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// Converts any serializable value into the JSON shape documents hold.
fn to_json_value(value: impl Serialize) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::serialize(DocumentFormat::Json, e))
}

/// Builder for constructing a `SettingsStore`.
///
/// This builder provides a fluent interface for configuring the path, format,
/// schema, and encryption key in one go.
///
/// # Examples
///
/// ```rust,no_run
/// use appsave::prelude::*;
/// use serde_json::json;
///
/// # fn main() -> appsave::domain::Result<()> {
/// let store = SettingsStoreBuilder::new()
///     .path("/tmp/myapp/settings.yaml")
///     .format(DocumentFormat::Yaml)
///     .schema(json!({"type": "object"}))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct SettingsStoreBuilder {
    path: Option<PathBuf>,
    format: DocumentFormat,
    #[cfg(feature = "crypto")]
    encryption_key: Option<String>,
    schema: Option<Value>,
}

impl SettingsStoreBuilder {
    /// Creates a new builder with the JSON format and the default path.
    pub fn new() -> Self {
        SettingsStoreBuilder {
            path: None,
            format: DocumentFormat::Json,
            #[cfg(feature = "crypto")]
            encryption_key: None,
            schema: None,
        }
    }

    /// Sets the document file path. Must be absolute.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the document format. Defaults to JSON.
    pub fn format(mut self, format: DocumentFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the encryption key installed on the built store.
    #[cfg(feature = "crypto")]
    pub fn encryption_key(mut self, key: impl Into<String>) -> Self {
        self.encryption_key = Some(key.into());
        self
    }

    /// Sets the schema installed on the built store.
    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Builds the settings store.
    ///
    /// Without an explicit path, the store lands at `appConfig.<ext>` in the
    /// user's home directory.
    pub fn build(self) -> Result<SettingsStore> {
        let mut store = match self.path {
            Some(path) => SettingsStore::new(path, self.format)?,
            None => SettingsStore::with_default_path(self.format)?,
        };
        #[cfg(feature = "crypto")]
        if let Some(key) = self.encryption_key {
            store.set_encryption_key(&key)?;
        }
        if let Some(schema) = self.schema {
            store.set_schema(&schema)?;
        }
        Ok(store)
    }
}

impl Default for SettingsStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
