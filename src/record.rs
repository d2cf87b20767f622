//! Immutable name records shared across workers.

use serde::Serialize;

use crate::blocking::{BlockingKey, blocking_key};
use crate::normalize::{NormalizationCache, Normalizer};

/// A single name as it enters the engine.
///
/// Created once per input row and never mutated; workers share records through
/// `Arc<NameRecord>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameRecord {
    pub id: String,
    pub raw_text: String,
    pub normalized_text: String,
    pub blocking_key: BlockingKey,
}

impl NameRecord {
    pub fn new(id: impl Into<String>, raw_text: impl Into<String>, normalizer: &Normalizer) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalizer.normalize(&raw_text);
        Self::from_parts(id.into(), raw_text, normalized_text)
    }

    /// Builds a record using a run-scoped normalization cache.
    pub fn with_cache(
        id: impl Into<String>,
        raw_text: impl Into<String>,
        normalizer: &Normalizer,
        cache: &NormalizationCache,
    ) -> Self {
        let raw_text = raw_text.into();
        let normalized_text = normalizer.normalize_cached(&raw_text, cache);
        Self::from_parts(id.into(), raw_text, normalized_text)
    }

    fn from_parts(id: String, raw_text: String, normalized_text: String) -> Self {
        let blocking_key = blocking_key(&normalized_text);
        Self {
            id,
            raw_text,
            normalized_text,
            blocking_key,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized_text.is_empty()
    }
}
