// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the settings store facade.
//!
//! This module contains the `SettingsStore` service, which provides the main
//! interface for reading, writing, validating, encrypting, and backing up
//! settings documents.

pub mod store;

// Re-export commonly used types
pub use store::{SettingsStore, SettingsStoreBuilder};
