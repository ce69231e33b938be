// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module contains the core domain types and logic for the settings store.
//! It is independent of any external concerns and defines the fundamental concepts
//! used throughout the library: the document, its format, the schema rules that
//! gate writes, the observer registry, and the error taxonomy.

pub mod document;
pub mod errors;
pub mod format;
pub mod notifier;
pub mod schema;

// Re-export commonly used types
pub use document::Document;
pub use errors::{Result, StoreError};
pub use format::DocumentFormat;
pub use notifier::{ChangeCallback, ChangeNotifier};
pub use schema::{CompiledSchema, SchemaViolation};
