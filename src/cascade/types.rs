use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::record::NameRecord;
use crate::scoring::ScoreVector;

/// Highest tier a pair reached. Cost increases Lexical → Semantic → Verified;
/// `Unresolved` marks pairs cut off by cancellation before escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Lexical,
    Semantic,
    Verified,
    Unresolved,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Lexical, Tier::Semantic, Tier::Verified, Tier::Unresolved];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Lexical => "LEXICAL",
            Tier::Semantic => "SEMANTIC",
            Tier::Verified => "VERIFIED",
            Tier::Unresolved => "UNRESOLVED",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Tier::Lexical => 0,
            Tier::Semantic => 1,
            Tier::Verified => 2,
            Tier::Unresolved => 3,
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
    None,
}

impl ConfidenceLabel {
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLabel::High => "HIGH",
            ConfidenceLabel::Medium => "MEDIUM",
            ConfidenceLabel::Low => "LOW",
            ConfidenceLabel::None => "NONE",
        }
    }
}

impl std::fmt::Display for ConfidenceLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfidenceLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Ok(Self::High),
            "MEDIUM" => Ok(Self::Medium),
            "LOW" => Ok(Self::Low),
            "NONE" | "NO_MATCH" => Ok(Self::None),
            _ => Err(format!("unknown confidence label: {s}")),
        }
    }
}

/// Terminal verdict for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accept,
    Reject,
    /// Inconclusive; surfaced for human review, never silently dropped.
    Review,
}

impl Decision {
    pub(crate) fn index(&self) -> usize {
        match self {
            Decision::Accept => 0,
            Decision::Reject => 1,
            Decision::Review => 2,
        }
    }
}

/// States of the cascade state machine, recorded in [`MatchCandidate::path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeState {
    Init,
    LexicalScored,
    FastAccept,
    FastReject,
    EscalateSemantic,
    SemanticScored,
    EscalateVerify,
    VerifiedScored,
    Accept,
    Reject,
    Review,
    /// A judge call failed and the pair fell back to a cheaper tier.
    Degraded,
    /// The run was cancelled before the next judge call was submitted.
    Cancelled,
}

/// One query/candidate evaluation, enriched as it moves through the cascade.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub query: Arc<NameRecord>,
    /// `None` for the synthetic No-Match candidate.
    pub candidate: Option<Arc<NameRecord>>,
    pub scores: ScoreVector,
    /// Judge confidence rescaled to 0–100.
    pub semantic_score: Option<f64>,
    pub verify_score: Option<f64>,
    pub final_score: f64,
    pub tier_reached: Tier,
    pub confidence_label: ConfidenceLabel,
    pub decision: Decision,
    pub degraded: bool,
    pub rationale: Option<String>,
    pub path: Vec<CascadeState>,
    /// 1-based rank within its [`MatchResult`](crate::ranking::MatchResult); 0 until ranked.
    pub rank: usize,
}

impl MatchCandidate {
    /// The placeholder returned when nothing clears the minimum score.
    pub fn no_match(query: Arc<NameRecord>) -> Self {
        Self {
            query,
            candidate: None,
            scores: ScoreVector::empty(),
            semantic_score: None,
            verify_score: None,
            final_score: 0.0,
            tier_reached: Tier::Lexical,
            confidence_label: ConfidenceLabel::None,
            decision: Decision::Reject,
            degraded: false,
            rationale: None,
            path: vec![CascadeState::Init],
            rank: 0,
        }
    }

    pub fn is_no_match(&self) -> bool {
        self.candidate.is_none()
    }

    pub fn candidate_id(&self) -> Option<&str> {
        self.candidate.as_deref().map(|c| c.id.as_str())
    }

    pub fn composite_lexical(&self) -> f64 {
        self.scores.composite()
    }
}
