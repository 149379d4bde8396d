//! Process-wide cache of raw template file contents.
//!
//! [`ContentCache`] maps a resolved file path to the text read from it. The
//! first [`load`](ContentCache::load) of a path reads the file; every later
//! load of the same path is served from memory.
//!
//! # Cache Invalidation
//!
//! There is none. Entries are never evicted, expire, or get refreshed, and
//! there is no size bound. The engine assumes the view corpus is small and
//! fixed for the lifetime of the process: an edited template file is only
//! picked up by a new process (or a new `ContentCache`).
//!
//! # Concurrency
//!
//! Entries live in a [`DashMap`], so the single write per key is atomic. Two
//! workers missing on the same path at the same time may both read the file;
//! the first insert wins and both return that text.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::Result;
use crate::utils::read_text_file;

/// Append-only store of template file contents keyed by path.
#[derive(Debug, Default)]
pub struct ContentCache {
    /// Map from resolved path to raw file text
    entries: DashMap<PathBuf, Arc<str>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ContentCache {
    /// Create a new empty content cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the text of `path`, reading the file only on the first call.
    ///
    /// # Errors
    /// Returns [`ViewError::IoFailure`](crate::core::ViewError::IoFailure) if
    /// the file has to be read and cannot be. Failed reads are not cached.
    pub fn load(&self, path: &Path) -> Result<Arc<str>> {
        if let Some(text) = self.entries.get(path) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("Content cache hit: {}", path.display());
            return Ok(Arc::clone(text.value()));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let text: Arc<str> = read_text_file(path)?.into();
        tracing::debug!("Content cache miss: {} ({} bytes)", path.display(), text.len());

        let stored = self.entries.entry(path.to_path_buf()).or_insert(text);
        Ok(Arc::clone(stored.value()))
    }

    /// Whether `path` has already been loaded.
    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics as `(hits, misses)`
    pub fn stats(&self) -> (usize, usize) {
        (self.hits.load(Ordering::Relaxed), self.misses.load(Ordering::Relaxed))
    }

    /// Calculate hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let (hits, misses) = self.stats();
        let total = hits + misses;
        if total == 0 {
            0.0
        } else {
            (hits as f64 / total as f64) * 100.0
        }
    }
}
