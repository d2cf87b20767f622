use std::cmp::Ordering;
use std::sync::Arc;

use super::types::MatchResult;
use crate::cascade::{Decision, MatchCandidate};
use crate::constants::DEFAULT_MIN_SCORE_THRESHOLD;
use crate::record::NameRecord;

/// Filters, orders and truncates a query's candidates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranker {
    min_score: f64,
}

impl Ranker {
    pub fn new(min_score: f64) -> Self {
        Self { min_score }
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Builds the ranked result for one query.
    ///
    /// Drops explicit rejects and anything below the minimum score. If nothing
    /// survives, the result holds exactly one synthetic No-Match candidate.
    /// Ties keep their input order.
    pub fn rank(
        &self,
        query: Arc<NameRecord>,
        candidates: Vec<MatchCandidate>,
        top_n: usize,
    ) -> MatchResult {
        let mut kept: Vec<MatchCandidate> = candidates
            .into_iter()
            .filter(|c| c.decision != Decision::Reject && c.final_score >= self.min_score)
            .collect();

        if kept.is_empty() {
            let mut no_match = MatchCandidate::no_match(Arc::clone(&query));
            no_match.rank = 1;
            return MatchResult::new(query.id.clone(), vec![no_match], false);
        }

        // `sort_by` is stable.
        kept.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(Ordering::Equal)
        });
        kept.truncate(top_n.max(1));
        for (i, candidate) in kept.iter_mut().enumerate() {
            candidate.rank = i + 1;
        }

        MatchResult::new(query.id.clone(), kept, true)
    }
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SCORE_THRESHOLD)
    }
}
