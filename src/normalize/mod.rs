//! Deterministic name canonicalization.
//!
//! Pipeline, applied until a fixpoint is reached:
//!
//! 1. trim + lowercase
//! 2. longest-match-first abbreviation expansion ([`AbbreviationDictionary`])
//! 3. strip everything except alphanumerics, spaces and hyphens
//! 4. drop stop-words (exact token match)
//! 5. collapse whitespace
//!
//! Normalization is pure and never fails: empty or missing input yields `""`.

pub mod cache;
pub mod config;
pub mod dictionary;
pub mod error;


use std::collections::HashSet;

use crate::constants::MAX_NORMALIZE_PASSES;

pub use cache::NormalizationCache;
pub use config::{DEFAULT_STOP_WORDS, NormalizerConfig, parse_abbreviations};
pub use dictionary::{AbbreviationDictionary, DEFAULT_ABBREVIATIONS, token_core};
pub use error::NormalizeError;

#[derive(Debug, Clone)]
pub struct Normalizer {
    dictionary: AbbreviationDictionary,
    stop_words: HashSet<String>,
}

impl Normalizer {
    pub fn new<I, S>(dictionary: AbbreviationDictionary, stop_words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stop_words = stop_words
            .into_iter()
            .map(|w| strip_token(&w.as_ref().trim().to_lowercase()))
            .filter(|w| !w.is_empty())
            .collect();
        Self {
            dictionary,
            stop_words,
        }
    }

    /// Builds the built-in dictionary extended with the configured additions.
    pub fn from_config(config: &NormalizerConfig) -> Result<Self, NormalizeError> {
        let dictionary = AbbreviationDictionary::new(DEFAULT_ABBREVIATIONS.iter().copied())?
            .extended(config.extra_abbreviations.iter().cloned())?;
        Ok(Self::new(dictionary, &config.stop_words))
    }

    pub fn dictionary(&self) -> &AbbreviationDictionary {
        &self.dictionary
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    pub fn normalize(&self, raw: &str) -> String {
        let mut current = self.pass(raw);
        for _ in 1..MAX_NORMALIZE_PASSES {
            let next = self.pass(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    /// Missing cells normalize to the empty string.
    pub fn normalize_opt(&self, raw: Option<&str>) -> String {
        raw.map(|r| self.normalize(r)).unwrap_or_default()
    }

    /// Same as [`normalize`](Self::normalize), memoized in a run-scoped cache.
    pub fn normalize_cached(&self, raw: &str, cache: &NormalizationCache) -> String {
        cache.get_or_insert_with(raw, || self.normalize(raw))
    }

    fn pass(&self, input: &str) -> String {
        let lowered = input.trim().to_lowercase();
        if lowered.is_empty() {
            return String::new();
        }

        let tokens: Vec<&str> = lowered.split_whitespace().collect();
        let expanded = self.dictionary.expand(&tokens);

        expanded
            .iter()
            .map(|t| strip_token(t))
            .filter(|t| !t.is_empty() && !self.stop_words.contains(t))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AbbreviationDictionary::default(), DEFAULT_STOP_WORDS)
    }
}

fn strip_token(token: &str) -> String {
    token
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}
