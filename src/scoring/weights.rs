use std::collections::BTreeMap;

use serde::Serialize;

use super::error::ScoringError;
use super::types::Algorithm;
use crate::constants::{WEIGHT_SUM_SLACK, WEIGHT_SUM_TOLERANCE};

/// Default weighting across the five core signals; boost signals start at zero.
pub const DEFAULT_WEIGHTS: &[(Algorithm, f64)] = &[
    (Algorithm::EditRatio, 0.25),
    (Algorithm::JaroWinkler, 0.20),
    (Algorithm::TokenSet, 0.25),
    (Algorithm::FirstToken, 0.10),
    (Algorithm::PartialRatio, 0.20),
];

/// Per-algorithm weights for the composite lexical score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringWeights {
    weights: BTreeMap<Algorithm, f64>,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.iter().copied().collect(),
        }
    }
}

impl ScoringWeights {
    pub fn new(weights: BTreeMap<Algorithm, f64>) -> Self {
        Self { weights }
    }

    pub fn from_pairs<I: IntoIterator<Item = (Algorithm, f64)>>(pairs: I) -> Self {
        Self {
            weights: pairs.into_iter().collect(),
        }
    }

    /// Parses `edit_ratio=0.25,jaro_winkler=0.2,...`.
    pub fn parse(input: &str) -> Result<Self, ScoringError> {
        let mut weights = BTreeMap::new();
        for entry in input.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) =
                entry
                    .split_once('=')
                    .ok_or_else(|| ScoringError::InvalidWeights {
                        reason: format!("expected 'algorithm=weight', got '{entry}'"),
                    })?;
            let algorithm: Algorithm = name.parse()?;
            let weight: f64 = value
                .trim()
                .parse()
                .map_err(|_| ScoringError::InvalidWeights {
                    reason: format!("weight for {algorithm} is not a number: '{value}'"),
                })?;
            weights.insert(algorithm, weight);
        }
        Ok(Self { weights })
    }

    pub fn get(&self, algorithm: Algorithm) -> f64 {
        self.weights.get(&algorithm).copied().unwrap_or(0.0)
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Algorithms with a strictly positive weight, in stable order.
    pub fn active(&self) -> impl Iterator<Item = (Algorithm, f64)> + '_ {
        self.weights
            .iter()
            .filter(|(_, w)| **w > 0.0)
            .map(|(a, w)| (*a, *w))
    }

    /// Weights must be finite, non-negative and sum to 1 within tolerance.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for (algorithm, weight) in &self.weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ScoringError::InvalidWeights {
                    reason: format!("weight for {algorithm} must be finite and >= 0, got {weight}"),
                });
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE + WEIGHT_SUM_SLACK {
            return Err(ScoringError::InvalidWeights {
                reason: format!(
                    "weights must sum to 1 ± {WEIGHT_SUM_TOLERANCE}, got {sum:.4}"
                ),
            });
        }
        Ok(())
    }
}
