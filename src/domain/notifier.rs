// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-key change observers.
//!
//! This module provides the `ChangeNotifier` type, a registry of callbacks keyed
//! by document key. The store fires the callbacks for a key after a successful
//! write through `set` or `merge`; deletions and clears do not notify.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Type alias for change notification callbacks.
///
/// The callback receives the new value that was written under the observed key.
pub type ChangeCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// A registry of per-key change observers.
///
/// Observers are invoked in subscription order. A panicking observer is
/// isolated: the panic is caught and logged, and the remaining observers for
/// the key still run.
///
/// # Examples
///
/// ```
/// use appsave::domain::notifier::ChangeNotifier;
/// use serde_json::json;
/// use std::sync::{Arc, Mutex};
///
/// let mut notifier = ChangeNotifier::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// notifier.subscribe("theme", Arc::new(move |value| {
///     sink.lock().unwrap().push(value.clone());
/// }));
///
/// notifier.notify("theme", &json!("dark"));
/// notifier.notify("volume", &json!(70));
///
/// assert_eq!(*seen.lock().unwrap(), vec![json!("dark")]);
/// ```
#[derive(Default)]
pub struct ChangeNotifier {
    observers: HashMap<String, Vec<ChangeCallback>>,
}

impl ChangeNotifier {
    /// Creates a new notifier with no observers.
    pub fn new() -> Self {
        ChangeNotifier {
            observers: HashMap::new(),
        }
    }

    /// Registers a callback for changes to `key`.
    ///
    /// Multiple callbacks may observe the same key; they are invoked in the
    /// order they were registered.
    pub fn subscribe(&mut self, key: impl Into<String>, callback: ChangeCallback) {
        self.observers.entry(key.into()).or_default().push(callback);
    }

    /// Invokes every observer registered for `key` with the new value.
    ///
    /// Observers for other keys are not invoked. A panic inside one observer
    /// is caught and logged so the remaining observers still run.
    pub fn notify(&self, key: &str, value: &Value) {
        let Some(callbacks) = self.observers.get(key) else {
            return;
        };
        tracing::debug!(key = %key, observers = callbacks.len(), "notifying observers");
        for callback in callbacks {
            if catch_unwind(AssertUnwindSafe(|| callback(value))).is_err() {
                tracing::warn!(key = %key, "observer panicked; continuing with remaining observers");
            }
        }
    }

    /// Returns the number of observers registered for `key`.
    pub fn observer_count(&self, key: &str) -> usize {
        self.observers.get(key).map(Vec::len).unwrap_or(0)
    }
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut counts: Vec<(&String, usize)> = self
            .observers
            .iter()
            .map(|(key, callbacks)| (key, callbacks.len()))
            .collect();
        counts.sort();
        f.debug_struct("ChangeNotifier")
            .field("observers", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    #[test]
    fn test_notify_invokes_matching_observer() {
        let mut notifier = ChangeNotifier::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        notifier.subscribe("name", Arc::new(move |value: &Value| {
            sink.lock().unwrap().push(value.clone());
        }));

        notifier.notify("name", &json!("Rhyan"));
        assert_eq!(*seen.lock().unwrap(), vec![json!("Rhyan")]);
    }

    #[test]
    fn test_notify_skips_other_keys() {
        let mut notifier = ChangeNotifier::new();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();

        notifier.subscribe("name", Arc::new(move |_: &Value| {
            *counter.lock().unwrap() += 1;
        }));

        notifier.notify("age", &json!(30));
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_observers_run_in_subscription_order() {
        let mut notifier = ChangeNotifier::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let sink = order.clone();
            notifier.subscribe("key", Arc::new(move |_: &Value| {
                sink.lock().unwrap().push(label);
            }));
        }

        notifier.notify("key", &json!(1));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_panicking_observer_does_not_stop_others() {
        let mut notifier = ChangeNotifier::new();
        let reached = Arc::new(Mutex::new(false));
        let sink = reached.clone();

        notifier.subscribe("key", Arc::new(|_: &Value| {
            panic!("observer failure");
        }));
        notifier.subscribe("key", Arc::new(move |_: &Value| {
            *sink.lock().unwrap() = true;
        }));

        notifier.notify("key", &json!(true));
        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn test_observer_count() {
        let mut notifier = ChangeNotifier::new();
        assert_eq!(notifier.observer_count("key"), 0);
        notifier.subscribe("key", Arc::new(|_: &Value| {}));
        notifier.subscribe("key", Arc::new(|_: &Value| {}));
        assert_eq!(notifier.observer_count("key"), 2);
        assert_eq!(notifier.observer_count("other"), 0);
    }

    #[test]
    fn test_notify_with_no_observers_is_noop() {
        let notifier = ChangeNotifier::new();
        notifier.notify("anything", &json!(null));
    }

    #[test]
    fn test_notifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ChangeNotifier>();
    }

    #[test]
    fn test_debug_lists_counts() {
        let mut notifier = ChangeNotifier::new();
        notifier.subscribe("a", Arc::new(|_: &Value| {}));
        let rendered = format!("{:?}", notifier);
        assert!(rendered.contains("ChangeNotifier"));
        assert!(rendered.contains('a'));
    }
}
