//! Namecascade library crate (used by the CLI binary and integration tests).
//!
//! Matches entity names from a query dataset against a reference dataset.
//! Cheap lexical scoring settles most pairs; only ambiguous pairs escalate to
//! a semantic judge and, optionally, a second verifier.
//!
//! # Public API Surface
//!
//! ## Core Types (Stable)
//! - [`Config`], [`ConfigError`] - Engine configuration
//! - [`MatchEngine`], [`RunReport`] - Batch runs with cancellation
//! - [`Dataset`], [`InputError`] - Query and reference inputs
//! - [`MatchResult`], [`FlatRow`] - Ranked output
//!
//! ## Pipeline Stages
//! - [`Normalizer`], [`NormalizationCache`] - Canonical name forms
//! - [`BlockingIndex`], [`blocking_key`] - Candidate pruning
//! - [`LexicalScorer`], [`ScoringWeights`] - Weighted multi-algorithm score
//! - [`DecisionCascade`], [`MatchCandidate`] - Tiered accept/reject/review
//! - [`Ranker`] - Top-N selection
//!
//! ## Semantic Judges
//! - [`SemanticJudge`] - Trait implemented by every judge
//! - [`HttpJudge`], [`GenaiJudge`] - Remote judges
//! - [`JudgeGate`] - Concurrency cap, timeout and retries around a judge
//!
//! ## Statistics
//! - [`RunStatistics`], [`StatsSnapshot`] - Per-run counters and cost
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod blocking;
pub mod cascade;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod judge;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod record;
pub mod scoring;
pub mod stats;

pub use blocking::{BlockingIndex, BlockingKey, BlockingStats, blocking_key};
pub use cascade::{
    CascadeConfig, CascadeContext, CascadeState, ConfidenceLabel, ConfidenceThresholds, Decision,
    DecisionCascade, MatchCandidate, Tier, TierBlendWeights,
};
pub use config::{ColumnConfig, Config, ConfigError, ConfigResult};
pub use constants::NO_MATCH_ID;
pub use dataset::{Dataset, InputError, InputResult, InputRow};
#[cfg(any(test, feature = "mock"))]
pub use judge::{MockJudge, MockResponse};
pub use judge::{
    GenaiJudge, HttpJudge, JudgeConfig, JudgeError, JudgeGate, JudgeProvider, JudgeRequest,
    JudgeResult, JudgeSet, JudgeVerdict, SemanticJudge, build_judges,
};
pub use normalize::{NormalizationCache, NormalizeError, Normalizer, NormalizerConfig};
pub use pipeline::{EngineResult, MatchEngine, MatchError, RunReport};
pub use ranking::{FlatRank, FlatRow, MatchResult, Ranker};
pub use record::NameRecord;
pub use scoring::{Algorithm, LexicalScorer, ScoreVector, ScoringError, ScoringWeights};
pub use stats::{DecisionCounts, RunStatistics, StatsSnapshot, TierCounts};
