// SPDX-License-Identifier: MIT OR Apache-2.0

//! Basic usage example for the settings store.
//!
//! This example demonstrates:
//! - Creating a store backed by a JSON file
//! - Installing a schema and watching a write get rejected
//! - Observing changes to a key
//! - Masking a value with an encryption key
//! - Taking and listing timestamped backups
//!
//! To run this example:
//! ```bash
//! cargo run --example basic_usage
//! ```

use appsave::prelude::*;
use serde_json::json;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt::init();

    println!("=== Settings Store: Basic Usage ===\n");

    let path = std::env::temp_dir().join("appsave-demo").join("settings.json");
    let mut store = SettingsStore::new(&path, DocumentFormat::Json)?;
    println!("Settings file: {}\n", store.path().display());

    // Example 1: Plain writes and reads
    println!("--- Example 1: Writing and Reading Values ---");
    store.set("name", json!("Rhyan"))?;
    store.set("profile", json!({"city": "Lisbon", "theme": "dark"}))?;
    println!("✓ name = {:?}", store.get("name"));
    println!("✓ keys = {:?}", store.keys());

    // Example 2: Schema validation
    println!("\n--- Example 2: Schema Validation ---");
    store.set_schema(&json!({
        "type": "object",
        "properties": {
            "age": { "type": "integer", "minimum": 0 }
        }
    }))?;
    store.set("age", json!(30))?;
    println!("✓ age = 30 accepted");

    match store.set("age", json!(-5)) {
        Err(StoreError::ValidationFailed { violations }) => {
            println!("✗ age = -5 rejected:");
            for violation in violations {
                println!("    {}", violation);
            }
        }
        other => println!("unexpected result: {:?}", other.is_ok()),
    }

    // Example 3: Observing a key
    println!("\n--- Example 3: Change Observers ---");
    store.on_change("theme", Arc::new(|value| {
        println!("  observer: theme changed to {}", value);
    }));
    store.set("theme", json!("solarized"))?;
    store.set("unrelated", json!(1))?;
    println!("✓ only the observed key fired the callback");

    // Example 4: Masking a value
    println!("\n--- Example 4: Value Encryption ---");
    store.set_encryption_key("0123456789abcdef0123456789abcdef")?;
    let token = store.mask(json!({"user": "ana", "password": "hunter2"}))?;
    store.set("credentials", json!(token))?;
    println!("✓ stored token: {}...", &token[..24.min(token.len())]);

    let stored = store.get("credentials").unwrap_or(json!(""));
    let recovered = store.unmask(stored.as_str().unwrap_or_default())?;
    println!("✓ recovered: {}", recovered);

    // Example 5: Backups
    println!("\n--- Example 5: Timestamped Backups ---");
    let snapshot = store.backup()?;
    println!("✓ snapshot written to {}", snapshot.display());
    for timestamp in store.backups()? {
        println!("  available: {}", timestamp);
    }

    println!("\n=== Example Complete ===");
    println!("\nTip: Open {} to see the persisted document.", store.path().display());

    Ok(())
}
