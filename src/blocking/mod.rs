//! Blocking: partition both sides by a cheap first-character key so only same-key
//! pairs are compared.
//!
//! Blocking is a performance optimization. For any pair that shares a key, the
//! comparison is identical with blocking on or off; pairs whose keys differ only
//! because of normalization noise (`"The Acme"` vs `"Acme"` after a stop-word
//! change, transliteration, leading digits) are never compared. That recall loss
//! is accepted.


use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;

use crate::record::NameRecord;

/// Leading words skipped before taking the key character.
pub const FILLER_WORDS: &[&str] = &["the", "a", "an"];

/// Key shared by every name that starts with a digit.
pub const DIGIT_KEY: char = '#';
/// Key shared by names starting with anything else (including empty names).
pub const OTHER_KEY: char = '~';

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BlockingKey(char);

impl BlockingKey {
    pub fn as_char(&self) -> char {
        self.0
    }

    pub fn is_digit_bucket(&self) -> bool {
        self.0 == DIGIT_KEY
    }

    pub fn is_other_bucket(&self) -> bool {
        self.0 == OTHER_KEY
    }
}

impl std::fmt::Display for BlockingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the blocking key for a name (raw or normalized).
pub fn blocking_key(name: &str) -> BlockingKey {
    let tokens: Vec<&str> = name.split_whitespace().collect();

    let mut start = 0;
    while start + 1 < tokens.len()
        && FILLER_WORDS
            .iter()
            .any(|filler| tokens[start].eq_ignore_ascii_case(filler))
    {
        start += 1;
    }

    let first = tokens
        .get(start)
        .and_then(|t| t.chars().next())
        .and_then(|c| c.to_lowercase().next());

    match first {
        Some(c) if c.is_numeric() => BlockingKey(DIGIT_KEY),
        Some(c) if c.is_alphanumeric() => BlockingKey(c),
        _ => BlockingKey(OTHER_KEY),
    }
}

/// Realized vs. naïve comparison counts for one query/reference pairing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlockingStats {
    pub naive_comparisons: u64,
    pub realized_comparisons: u64,
    pub shared_keys: usize,
    pub query_only_keys: usize,
    pub reference_only_keys: usize,
}

impl BlockingStats {
    /// Fraction of the naïve cross product that blocking avoided.
    pub fn reduction_ratio(&self) -> f64 {
        if self.naive_comparisons == 0 {
            return 0.0;
        }
        1.0 - self.realized_comparisons as f64 / self.naive_comparisons as f64
    }
}

/// Reference-side index: key → records in insertion order.
#[derive(Debug, Clone)]
pub struct BlockingIndex {
    blocks: BTreeMap<BlockingKey, Vec<Arc<NameRecord>>>,
    all: Vec<Arc<NameRecord>>,
    enabled: bool,
}

impl BlockingIndex {
    pub fn build(references: &[Arc<NameRecord>], enabled: bool) -> Self {
        let mut blocks: BTreeMap<BlockingKey, Vec<Arc<NameRecord>>> = BTreeMap::new();
        for record in references {
            blocks
                .entry(record.blocking_key)
                .or_default()
                .push(Arc::clone(record));
        }
        Self {
            blocks,
            all: references.to_vec(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Candidates a query must be compared against. A key with no reference
    /// records yields an empty slice.
    pub fn candidates_for(&self, query: &NameRecord) -> &[Arc<NameRecord>] {
        if !self.enabled {
            return &self.all;
        }
        self.blocks
            .get(&query.blocking_key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn plan(&self, queries: &[Arc<NameRecord>]) -> BlockingStats {
        let naive = queries.len() as u64 * self.all.len() as u64;

        if !self.enabled {
            return BlockingStats {
                naive_comparisons: naive,
                realized_comparisons: naive,
                shared_keys: self.blocks.len(),
                query_only_keys: 0,
                reference_only_keys: 0,
            };
        }

        let mut query_counts: BTreeMap<BlockingKey, u64> = BTreeMap::new();
        for query in queries {
            *query_counts.entry(query.blocking_key).or_default() += 1;
        }

        let realized = query_counts
            .iter()
            .map(|(key, n)| n * self.blocks.get(key).map_or(0, |b| b.len() as u64))
            .sum();

        let query_keys: BTreeSet<_> = query_counts.keys().copied().collect();
        let reference_keys: BTreeSet<_> = self.blocks.keys().copied().collect();

        BlockingStats {
            naive_comparisons: naive,
            realized_comparisons: realized,
            shared_keys: query_keys.intersection(&reference_keys).count(),
            query_only_keys: query_keys.difference(&reference_keys).count(),
            reference_only_keys: reference_keys.difference(&query_keys).count(),
        }
    }
}
