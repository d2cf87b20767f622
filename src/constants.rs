//! Cross-cutting, shared constants.
//!
//! Scores throughout the crate live on a 0–100 scale. Judge confidences arrive on
//! 0–1 and are rescaled with [`SCORE_SCALE`] at the cascade boundary.

pub const SCORE_SCALE: f64 = 100.0;

/// Tolerance used when checking that a weight set sums to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Float rounding slack so a sum of exactly `1 ± WEIGHT_SUM_TOLERANCE` passes.
pub const WEIGHT_SUM_SLACK: f64 = 1e-9;

pub const DEFAULT_FAST_ACCEPT_THRESHOLD: f64 = 90.0;
pub const DEFAULT_FAST_REJECT_THRESHOLD: f64 = 50.0;
pub const DEFAULT_FINAL_ACCEPT_THRESHOLD: f64 = 75.0;
pub const DEFAULT_TIER1_ACCEPT_THRESHOLD: f64 = 85.0;
pub const DEFAULT_TIER1_ACCEPT_FLOOR: f64 = 85.0;
pub const DEFAULT_SEMANTIC_REJECT_THRESHOLD: f64 = 20.0;
pub const DEFAULT_MIN_SCORE_THRESHOLD: f64 = 60.0;

pub const DEFAULT_CONFIDENCE_HIGH: f64 = 90.0;
pub const DEFAULT_CONFIDENCE_MEDIUM: f64 = 75.0;
pub const DEFAULT_CONFIDENCE_LOW: f64 = 60.0;

pub const DEFAULT_BLEND_LEXICAL: f64 = 0.3;
pub const DEFAULT_BLEND_SEMANTIC: f64 = 0.4;
pub const DEFAULT_BLEND_VERIFY: f64 = 0.3;

pub const DEFAULT_TOP_N_MATCHES: usize = 3;
pub const DEFAULT_MAX_WORKERS: usize = 8;

pub const DEFAULT_JUDGE_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_JUDGE_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_JUDGE_MAX_RETRIES: u32 = 2;
pub const DEFAULT_JUDGE_RETRY_BACKOFF_MS: u64 = 250;

/// Identifier written to the flat table for the synthetic No-Match candidate.
pub const NO_MATCH_ID: &str = "NO_MATCH";

/// Upper bound on normalization passes before a fixpoint is assumed.
pub const MAX_NORMALIZE_PASSES: usize = 4;

/// Default capacity of the run-scoped normalization cache.
pub const DEFAULT_NORMALIZE_CACHE_CAPACITY: u64 = 100_000;
