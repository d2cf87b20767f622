//! Tier 1: lexical scoring.
//!
//! [`LexicalScorer`] runs every algorithm with a non-zero weight over two normalized
//! names and combines the 0–100 subscores into a convex composite. Weights come from
//! configuration and are validated up front; a failure inside one algorithm only
//! zeroes that subscore.
//!
//! Exact/phrase/prefix boosts from search-engine style matchers are expressed as
//! ordinary weighted subscores ([`Algorithm::Exact`], [`Algorithm::Phrase`],
//! [`Algorithm::Prefix`]) rather than a separate code path.

pub mod algorithms;
pub mod error;
pub mod scorer;
pub mod types;
pub mod weights;

#[cfg(test)]
mod tests;

pub use algorithms::soundex;
pub use error::ScoringError;
pub use scorer::LexicalScorer;
pub use types::{Algorithm, ScoreVector};
pub use weights::{DEFAULT_WEIGHTS, ScoringWeights};
