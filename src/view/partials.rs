//! Named partial views registered on a parent view.

use super::View;
use super::data::Data;

/// A partial to register in bulk: the view name plus the data bound to it.
#[derive(Debug, Clone, Default)]
pub struct PartialSpec {
    /// View name or `"name: <alias>"` reference
    pub view: String,
    pub data: Data,
}

impl PartialSpec {
    pub fn new(view: impl Into<String>, data: Data) -> Self {
        Self {
            view: view.into(),
            data,
        }
    }
}

/// Ordered mapping from partial key to an already constructed view.
///
/// Keys keep their first registration position; registering an existing key
/// replaces the view in place.
#[derive(Debug, Clone, Default)]
pub struct PartialSet {
    entries: Vec<(String, View)>,
}

impl PartialSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `view` under `key`, returning the view it replaced.
    pub fn insert(&mut self, key: impl Into<String>, view: View) -> Option<View> {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, view)),
            None => {
                self.entries.push((key, view));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&View> {
        self.entries.iter().find(|(existing, _)| existing == key).map(|(_, view)| view)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Partial keys in render order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &View)> {
        self.entries.iter().map(|(key, view)| (key.as_str(), view))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
