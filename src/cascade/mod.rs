//! Tiered decision cascade.
//!
//! ```text
//! INIT → LEXICAL_SCORED ─┬─ ≥ fast_accept ──────────────→ FAST_ACCEPT   (LEXICAL)
//!                        ├─ < fast_reject ──────────────→ FAST_REJECT   (LEXICAL)
//!                        └─ otherwise → ESCALATE_SEMANTIC → SEMANTIC_SCORED
//!                               ├─ judge < semantic_reject ─→ REJECT    (SEMANTIC)
//!                               ├─ blend ≥ final_accept ────→ ACCEPT    (SEMANTIC)
//!                               ├─ no verifier ─────────────→ REVIEW    (SEMANTIC)
//!                               └─ ESCALATE_VERIFY → VERIFIED_SCORED → ACCEPT | REVIEW
//! ```
//!
//! Judge failures add a `DEGRADED` marker and fall back to the last tier that
//! produced a score. Pairs whose judge call was never submitted because the run
//! was cancelled end `UNRESOLVED`.

pub mod config;
pub mod engine;
pub mod types;


pub use config::{CascadeConfig, ConfidenceThresholds, TierBlendWeights};
pub use engine::{CascadeContext, DecisionCascade};
pub use types::{CascadeState, ConfidenceLabel, Decision, MatchCandidate, Tier};
