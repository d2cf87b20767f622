use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::{JudgeError, JudgeResult};
use crate::constants::SCORE_SCALE;

/// Wire payload sent to a judge.
///
/// `name_a`/`name_b` are the names as written in the source data; the
/// normalized forms ride along as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeRequest {
    pub name_a: String,
    pub name_b: String,
    /// Composite lexical score, 0–100.
    pub lexical_hint: f64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub normalized_a: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub normalized_b: String,
}

impl JudgeRequest {
    pub fn new(name_a: impl Into<String>, name_b: impl Into<String>, lexical_hint: f64) -> Self {
        Self {
            name_a: name_a.into(),
            name_b: name_b.into(),
            lexical_hint,
            normalized_a: String::new(),
            normalized_b: String::new(),
        }
    }

    pub fn with_normalized(
        mut self,
        normalized_a: impl Into<String>,
        normalized_b: impl Into<String>,
    ) -> Self {
        self.normalized_a = normalized_a.into();
        self.normalized_b = normalized_b.into();
        self
    }
}

/// A judge's answer: probability that both names denote the same entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    /// In `[0, 1]`.
    pub confidence: f64,
    #[serde(default)]
    pub rationale: String,
}

impl JudgeVerdict {
    pub fn new(confidence: f64, rationale: impl Into<String>) -> Self {
        Self {
            confidence,
            rationale: rationale.into(),
        }
    }

    /// Rejects NaN and confidences outside `[0, 1]`.
    pub fn validated(self) -> JudgeResult<Self> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(JudgeError::malformed(format!(
                "confidence {} outside [0, 1]",
                self.confidence
            )));
        }
        Ok(self)
    }

    /// Confidence on the 0–100 score scale.
    #[inline]
    pub fn score(&self) -> f64 {
        self.confidence * SCORE_SCALE
    }
}

/// Parses a verdict from a response body.
///
/// Accepts a bare JSON object or free text that embeds one (chat models tend to
/// wrap their answer in prose or code fences).
pub fn parse_verdict(body: &str) -> JudgeResult<JudgeVerdict> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(JudgeError::malformed("empty response"));
    }

    let verdict = match serde_json::from_str::<JudgeVerdict>(trimmed) {
        Ok(v) => v,
        Err(direct) => {
            let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) else {
                return Err(JudgeError::malformed(direct.to_string()));
            };
            if end <= start {
                return Err(JudgeError::malformed(direct.to_string()));
            }
            serde_json::from_str::<JudgeVerdict>(&trimmed[start..=end])
                .map_err(|e| JudgeError::malformed(e.to_string()))?
        }
    };

    verdict.validated()
}

#[async_trait]
/// A remote (or simulated) classifier that decides whether two names match.
///
/// Implementations own their protocol and prompt; the engine only sees this
/// contract. Timeouts, retries and concurrency limits are applied by
/// [`JudgeGate`](super::JudgeGate), not by implementations.
pub trait SemanticJudge: Send + Sync {
    /// Identifier used in logs.
    fn name(&self) -> &str;

    /// Judges one pair of names.
    async fn judge(&self, request: &JudgeRequest) -> JudgeResult<JudgeVerdict>;
}
