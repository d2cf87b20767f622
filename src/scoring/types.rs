use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ScoringError;

/// A named lexical similarity signal. Each yields a 0–100 subscore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Normalized Levenshtein ratio.
    EditRatio,
    /// Jaro-Winkler similarity.
    JaroWinkler,
    /// `|∩| / avg(|tokens|)` over token sets.
    TokenSet,
    /// 100 when the first tokens are identical.
    FirstToken,
    /// Best edit ratio of the shorter string over windows of the longer.
    PartialRatio,
    /// Token-set overlap of Soundex codes.
    Phonetic,
    /// 100 when both strings are identical.
    Exact,
    /// 100 when the shorter token sequence occurs contiguously in the longer.
    Phrase,
    /// 100 when each token of the shorter name prefixes the aligned token of the longer.
    Prefix,
}

impl Algorithm {
    pub const ALL: [Algorithm; 9] = [
        Algorithm::EditRatio,
        Algorithm::JaroWinkler,
        Algorithm::TokenSet,
        Algorithm::FirstToken,
        Algorithm::PartialRatio,
        Algorithm::Phonetic,
        Algorithm::Exact,
        Algorithm::Phrase,
        Algorithm::Prefix,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::EditRatio => "edit_ratio",
            Algorithm::JaroWinkler => "jaro_winkler",
            Algorithm::TokenSet => "token_set",
            Algorithm::FirstToken => "first_token",
            Algorithm::PartialRatio => "partial_ratio",
            Algorithm::Phonetic => "phonetic",
            Algorithm::Exact => "exact",
            Algorithm::Phrase => "phrase",
            Algorithm::Prefix => "prefix",
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.as_str() == needle)
            .ok_or(ScoringError::UnknownAlgorithm {
                name: s.to_string(),
            })
    }
}

/// Subscores and their weighted composite for one comparison.
///
/// Produced once per pair and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreVector {
    lexical_subscores: BTreeMap<Algorithm, f64>,
    composite_lexical: f64,
    anomalies: Vec<Algorithm>,
}

impl ScoreVector {
    pub(crate) fn new(
        lexical_subscores: BTreeMap<Algorithm, f64>,
        composite_lexical: f64,
        anomalies: Vec<Algorithm>,
    ) -> Self {
        Self {
            lexical_subscores,
            composite_lexical,
            anomalies,
        }
    }

    /// A vector with no subscores, used for synthetic candidates.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new(), 0.0, Vec::new())
    }

    pub fn composite(&self) -> f64 {
        self.composite_lexical
    }

    pub fn subscores(&self) -> &BTreeMap<Algorithm, f64> {
        &self.lexical_subscores
    }

    pub fn subscore(&self, algorithm: Algorithm) -> Option<f64> {
        self.lexical_subscores.get(&algorithm).copied()
    }

    /// Algorithms that degraded to 0 on this pair.
    pub fn anomalies(&self) -> &[Algorithm] {
        &self.anomalies
    }
}
