//! Match engine: wires normalization, blocking, scoring, the cascade and
//! ranking into one cancellable run.

pub mod engine;
pub mod error;

#[cfg(test)]
mod tests;

pub use engine::{MatchEngine, RunReport};
pub use error::{EngineResult, MatchError};
