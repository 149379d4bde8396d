//! Validation error bag bound into every view.
//!
//! When a view is constructed without an `errors` entry in its data, the
//! engine asks its [`ErrorBagProvider`] for the session's error bag and binds
//! it; without a session (or without stored errors) an empty [`MessageBag`]
//! is bound instead, so templates can always read `errors`.
//!
//! In a template the bag serializes as:
//!
//! ```json
//! { "messages": { "email": ["The email field is required."] } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field-keyed validation messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBag {
    /// Messages grouped by field, in insertion order per field
    pub messages: BTreeMap<String, Vec<String>>,
}

impl MessageBag {
    /// Create an empty message bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message for `key`. Duplicate messages for the same key are ignored.
    pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) -> &mut Self {
        let message = message.into();
        let entry = self.messages.entry(key.into()).or_default();
        if !entry.contains(&message) {
            entry.push(message);
        }
        self
    }

    /// Whether any message exists for `key`.
    pub fn has(&self, key: &str) -> bool {
        self.messages.get(key).is_some_and(|messages| !messages.is_empty())
    }

    /// First message for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.messages.get(key).and_then(|messages| messages.first()).map(String::as_str)
    }

    /// All messages for `key`.
    pub fn get(&self, key: &str) -> &[String] {
        self.messages.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total number of messages across all keys.
    pub fn len(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bag as template data, in its serialized shape.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }
}

/// Supplies the error bag of the current session, if there is one.
pub trait ErrorBagProvider: Send + Sync {
    /// Returns the session's stored errors, or `None` when no session is
    /// active or it holds no errors.
    fn errors(&self) -> Option<MessageBag>;
}

/// Provider for hosts without sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl ErrorBagProvider for NoSession {
    fn errors(&self) -> Option<MessageBag> {
        None
    }
}

/// Provider that always returns the same bag; useful for flashing errors in tests.
#[derive(Debug, Clone, Default)]
pub struct FlashedErrors(pub MessageBag);

impl ErrorBagProvider for FlashedErrors {
    fn errors(&self) -> Option<MessageBag> {
        Some(self.0.clone())
    }
}
