use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::record::NameRecord;

use super::algorithms;
use super::error::ScoringError;
use super::types::{Algorithm, ScoreVector};
use super::weights::ScoringWeights;

/// Weighted multi-algorithm lexical scorer (tier 1).
#[derive(Debug, Clone)]
pub struct LexicalScorer {
    weights: ScoringWeights,
    // Active weights rescaled to sum exactly to 1 so the composite is convex.
    normalized: Vec<(Algorithm, f64)>,
}

impl LexicalScorer {
    /// Validates the weights (fail fast) and builds a scorer.
    pub fn new(weights: ScoringWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self::from_validated(weights))
    }

    fn from_validated(weights: ScoringWeights) -> Self {
        let sum = weights.sum();
        let normalized = weights.active().map(|(a, w)| (a, w / sum)).collect();
        Self {
            weights,
            normalized,
        }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, a: &str, b: &str) -> ScoreVector {
        self.score_inner(a, b, None)
    }

    /// Scores two records' normalized text, logging anomalies with their ids.
    pub fn score_records(&self, query: &NameRecord, candidate: &NameRecord) -> ScoreVector {
        self.score_inner(
            &query.normalized_text,
            &candidate.normalized_text,
            Some((&query.id, &candidate.id)),
        )
    }

    fn score_inner(&self, a: &str, b: &str, ids: Option<(&str, &str)>) -> ScoreVector {
        let mut subscores = BTreeMap::new();
        let mut anomalies = Vec::new();
        let mut composite = 0.0;

        for &(algorithm, weight) in &self.normalized {
            let subscore = match algorithms::compute(algorithm, a, b) {
                Ok(score) => score.clamp(0.0, 100.0),
                Err(e) => {
                    let (query_id, candidate_id) = ids.unwrap_or_default();
                    if matches!(e, ScoringError::EmptyInput { .. }) {
                        debug!(%algorithm, query_id, candidate_id, stage = "lexical", "Empty input, subscore set to 0");
                    } else {
                        warn!(%algorithm, query_id, candidate_id, stage = "lexical", error = %e, "Scoring anomaly, subscore set to 0");
                    }
                    anomalies.push(algorithm);
                    0.0
                }
            };
            composite += weight * subscore;
            subscores.insert(algorithm, subscore);
        }

        ScoreVector::new(subscores, composite.clamp(0.0, 100.0), anomalies)
    }
}

impl Default for LexicalScorer {
    fn default() -> Self {
        Self::from_validated(ScoringWeights::default())
    }
}
