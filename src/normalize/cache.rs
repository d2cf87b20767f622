//! Run-scoped memoization for normalized names.
//!
//! One [`NormalizationCache`] is created per match run and passed by reference into
//! [`Normalizer::normalize_cached`](super::Normalizer::normalize_cached). Nothing here
//! is process-wide.

use std::sync::atomic::{AtomicU64, Ordering};

use moka::sync::Cache;

use crate::constants::DEFAULT_NORMALIZE_CACHE_CAPACITY;

/// Raw text → normalized text cache with hit/miss counters.
pub struct NormalizationCache {
    entries: Cache<String, String>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl NormalizationCache {
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_NORMALIZE_CACHE_CAPACITY)
    }

    #[inline]
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the cached value for `raw` or computes and stores it.
    pub fn get_or_insert_with<F>(&self, raw: &str, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        if let Some(hit) = self.entries.get(raw) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit;
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute();
        self.entries.insert(raw.to_string(), value.clone());
        value
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.entry_count() == 0
    }

    #[inline]
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl Default for NormalizationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NormalizationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NormalizationCache")
            .field("entries", &self.entries.entry_count())
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
