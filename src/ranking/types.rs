use crate::cascade::MatchCandidate;

/// Ranked candidates for one query. Immutable once emitted.
#[derive(Debug, Clone)]
pub struct MatchResult {
    query_id: String,
    ranked_candidates: Vec<MatchCandidate>,
    resolved: bool,
}

impl MatchResult {
    pub(crate) fn new(
        query_id: String,
        ranked_candidates: Vec<MatchCandidate>,
        resolved: bool,
    ) -> Self {
        Self {
            query_id,
            ranked_candidates,
            resolved,
        }
    }

    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    /// Never empty: holds the No-Match placeholder when nothing qualified.
    pub fn ranked_candidates(&self) -> &[MatchCandidate] {
        &self.ranked_candidates
    }

    /// `false` when the only entry is the No-Match placeholder.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn best(&self) -> Option<&MatchCandidate> {
        self.ranked_candidates.first().filter(|c| !c.is_no_match())
    }
}
