use thiserror::Error;

/// Failures at the semantic judge boundary.
///
/// None of these abort a run: the cascade catches them per pair and degrades
/// the pair to the last tier that produced a score.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum JudgeError {
    /// The call did not complete within the configured per-call timeout.
    #[error("judge call timed out after {elapsed_ms} ms")]
    Timeout { elapsed_ms: u64 },

    /// The response could not be parsed into a verdict, or its confidence was out of range.
    #[error("malformed judge response: {reason}")]
    Malformed { reason: String },

    /// The provider reported rate limiting or exhausted quota.
    #[error("judge quota exceeded: {reason}")]
    Quota { reason: String },

    /// Network or upstream server failure.
    #[error("judge transport error: {reason}")]
    Transport { reason: String },

    /// The provider refused the request (4xx other than 429).
    #[error("judge rejected request with status {status}: {reason}")]
    Rejected { status: u16, reason: String },

    /// The judge could not be constructed from configuration.
    #[error("judge not configured: {reason}")]
    NotConfigured { reason: String },

    /// The run was cancelled before the call was submitted.
    #[error("judge call cancelled")]
    Cancelled,
}

impl JudgeError {
    /// Whether another attempt may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            JudgeError::Timeout { .. } | JudgeError::Transport { .. } | JudgeError::Quota { .. }
        )
    }

    /// Short stable label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JudgeError::Timeout { .. } => "timeout",
            JudgeError::Malformed { .. } => "malformed",
            JudgeError::Quota { .. } => "quota",
            JudgeError::Transport { .. } => "transport",
            JudgeError::Rejected { .. } => "rejected",
            JudgeError::NotConfigured { .. } => "not_configured",
            JudgeError::Cancelled => "cancelled",
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        JudgeError::Malformed {
            reason: reason.into(),
        }
    }
}

/// Result alias for judge operations.
pub type JudgeResult<T> = Result<T, JudgeError>;
