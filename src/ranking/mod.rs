//! Match aggregation, ranking and flat-table output.

pub mod flat;
pub mod ranker;
pub mod types;


pub use flat::{FlatRank, FlatRow};
pub use ranker::Ranker;
pub use types::MatchResult;
