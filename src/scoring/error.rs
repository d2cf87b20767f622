use thiserror::Error;

use super::types::Algorithm;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    /// A single algorithm could not produce a meaningful subscore. Recoverable:
    /// the subscore degrades to 0.
    #[error("scoring anomaly in {algorithm}: {reason}")]
    Anomaly { algorithm: Algorithm, reason: String },

    /// One side of the comparison was empty. Recoverable like [`Self::Anomaly`].
    #[error("empty input to {algorithm}")]
    EmptyInput { algorithm: Algorithm },

    #[error("invalid scoring weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("unknown scoring algorithm '{name}'")]
    UnknownAlgorithm { name: String },
}

impl ScoringError {
    /// Returns `true` for per-pair errors that degrade a subscore instead of failing.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScoringError::Anomaly { .. } | ScoringError::EmptyInput { .. }
        )
    }

    pub(crate) fn anomaly(algorithm: Algorithm, reason: impl Into<String>) -> Self {
        ScoringError::Anomaly {
            algorithm,
            reason: reason.into(),
        }
    }
}
