//! Data shared with every view.
//!
//! Shared entries are merged underneath each view's own data at render time:
//! on a key collision the view's value wins. Entries can be added or
//! replaced with [`SharedData::share`] but never removed.

use dashmap::DashMap;

use crate::view::{Data, DataValue};

/// Process-wide key/value registry merged into every view's data.
#[derive(Debug, Default)]
pub struct SharedData {
    entries: DashMap<String, DataValue>,
}

impl SharedData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shares `value` under `key` with all views; replaces an earlier value.
    pub fn share(&self, key: impl Into<String>, value: impl Into<DataValue>) {
        let key = key.into();
        tracing::debug!("Sharing view data '{}'", key);
        self.entries.insert(key, value.into());
    }

    /// The value shared under `key`.
    pub fn get(&self, key: &str) -> Option<DataValue> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// A point-in-time copy of every shared entry.
    pub fn snapshot(&self) -> Data {
        self.entries.iter().map(|entry| (entry.key().clone(), entry.value().clone())).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
