//! Semantic judge adapter.
//!
//! The cascade only depends on the [`SemanticJudge`] contract. Concrete judges
//! ([`HttpJudge`], [`GenaiJudge`], and [`MockJudge`] for tests) are chosen at
//! configuration time by [`build_judges`]. Every call goes through a
//! [`JudgeGate`], which bounds concurrency and applies the timeout and retry policy.

pub mod config;
pub mod error;
pub mod factory;
pub mod gate;
pub mod http;
pub mod llm;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod types;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_JUDGE_MODEL, JudgeConfig, JudgeProvider};
pub use error::{JudgeError, JudgeResult};
pub use factory::{JudgeSet, build_judges};
pub use gate::JudgeGate;
pub use http::HttpJudge;
pub use llm::GenaiJudge;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockJudge, MockResponse};
pub use types::{JudgeRequest, JudgeVerdict, SemanticJudge, parse_verdict};
