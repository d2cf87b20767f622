//! Run-scoped statistics and audit counters.
//!
//! One [`RunStatistics`] lives for the duration of a run and is shared by every
//! worker. All counters are independent atomics, so a [`StatsSnapshot`] taken
//! mid-run is eventually consistent rather than a point-in-time cut.


use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::blocking::BlockingStats;
use crate::cascade::{Decision, Tier};

/// Atomic counters for one run.
#[derive(Debug)]
pub struct RunStatistics {
    run_id: String,
    started_at: DateTime<Utc>,
    cost_per_call: f64,

    queries: AtomicU64,
    total_pairs: AtomicU64,
    naive_comparisons: AtomicU64,
    realized_comparisons: AtomicU64,
    tier_counts: [AtomicU64; 4],
    decision_counts: [AtomicU64; 3],
    degraded_pairs: AtomicU64,
    scoring_anomalies: AtomicU64,
    cancelled_pairs: AtomicU64,
    api_calls: AtomicU64,
    api_errors: AtomicU64,
    api_retries: AtomicU64,
    api_timeouts: AtomicU64,
    total_latency_us: AtomicU64,
}

// Relaxed throughout: counters are independent and snapshots tolerate skew.
impl RunStatistics {
    pub fn new(cost_per_call: f64) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            cost_per_call,
            queries: AtomicU64::new(0),
            total_pairs: AtomicU64::new(0),
            naive_comparisons: AtomicU64::new(0),
            realized_comparisons: AtomicU64::new(0),
            tier_counts: Default::default(),
            decision_counts: Default::default(),
            degraded_pairs: AtomicU64::new(0),
            scoring_anomalies: AtomicU64::new(0),
            cancelled_pairs: AtomicU64::new(0),
            api_calls: AtomicU64::new(0),
            api_errors: AtomicU64::new(0),
            api_retries: AtomicU64::new(0),
            api_timeouts: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn record_blocking(&self, plan: &BlockingStats) {
        self.naive_comparisons
            .fetch_add(plan.naive_comparisons, Ordering::Relaxed);
        self.realized_comparisons
            .fetch_add(plan.realized_comparisons, Ordering::Relaxed);
    }

    pub fn record_query(&self) {
        self.queries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_scoring_anomalies(&self, count: usize) {
        if count > 0 {
            self.scoring_anomalies
                .fetch_add(count as u64, Ordering::Relaxed);
        }
    }

    /// Records a pair's terminal state.
    pub fn record_outcome(&self, tier: Tier, decision: Decision, degraded: bool) {
        self.total_pairs.fetch_add(1, Ordering::Relaxed);
        self.tier_counts[tier.index()].fetch_add(1, Ordering::Relaxed);
        self.decision_counts[decision.index()].fetch_add(1, Ordering::Relaxed);
        if degraded {
            self.degraded_pairs.fetch_add(1, Ordering::Relaxed);
        }
        if tier == Tier::Unresolved {
            self.cancelled_pairs.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records one judge attempt and how long it took.
    pub fn record_api_call(&self, latency: Duration) {
        self.api_calls.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_api_retry(&self) {
        self.api_retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_api_timeout(&self) {
        self.api_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a pair whose judge call ultimately failed.
    pub fn record_api_error(&self) {
        self.api_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total_pairs(&self) -> u64 {
        self.total_pairs.load(Ordering::Relaxed)
    }

    pub fn api_calls(&self) -> u64 {
        self.api_calls.load(Ordering::Relaxed)
    }

    pub fn api_errors(&self) -> u64 {
        self.api_errors.load(Ordering::Relaxed)
    }

    pub fn tier_count(&self, tier: Tier) -> u64 {
        self.tier_counts[tier.index()].load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let load = |c: &AtomicU64| c.load(Ordering::Relaxed);
        let api_calls = load(&self.api_calls);
        let total_latency_us = load(&self.total_latency_us);

        StatsSnapshot {
            run_id: self.run_id.clone(),
            started_at: self.started_at.to_rfc3339(),
            queries: load(&self.queries),
            total_pairs: load(&self.total_pairs),
            naive_comparisons: load(&self.naive_comparisons),
            realized_comparisons: load(&self.realized_comparisons),
            tier_counts: TierCounts {
                lexical: self.tier_count(Tier::Lexical),
                semantic: self.tier_count(Tier::Semantic),
                verified: self.tier_count(Tier::Verified),
                unresolved: self.tier_count(Tier::Unresolved),
            },
            decision_counts: DecisionCounts {
                accept: load(&self.decision_counts[Decision::Accept.index()]),
                reject: load(&self.decision_counts[Decision::Reject.index()]),
                review: load(&self.decision_counts[Decision::Review.index()]),
            },
            degraded_pairs: load(&self.degraded_pairs),
            scoring_anomalies: load(&self.scoring_anomalies),
            cancelled_pairs: load(&self.cancelled_pairs),
            api_calls,
            api_errors: load(&self.api_errors),
            api_retries: load(&self.api_retries),
            api_timeouts: load(&self.api_timeouts),
            total_latency_ms: total_latency_us as f64 / 1_000.0,
            mean_latency_ms: if api_calls == 0 {
                0.0
            } else {
                total_latency_us as f64 / 1_000.0 / api_calls as f64
            },
            estimated_cost: api_calls as f64 * self.cost_per_call,
        }
    }
}

impl Default for RunStatistics {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierCounts {
    pub lexical: u64,
    pub semantic: u64,
    pub verified: u64,
    pub unresolved: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DecisionCounts {
    pub accept: u64,
    pub reject: u64,
    pub review: u64,
}

/// Serializable view of [`RunStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub run_id: String,
    /// RFC 3339.
    pub started_at: String,
    pub queries: u64,
    pub total_pairs: u64,
    pub naive_comparisons: u64,
    pub realized_comparisons: u64,
    pub tier_counts: TierCounts,
    pub decision_counts: DecisionCounts,
    pub degraded_pairs: u64,
    pub scoring_anomalies: u64,
    pub cancelled_pairs: u64,
    /// Every judge attempt, retries included.
    pub api_calls: u64,
    /// Pairs whose judge call failed after all retries.
    pub api_errors: u64,
    pub api_retries: u64,
    pub api_timeouts: u64,
    pub total_latency_ms: f64,
    pub mean_latency_ms: f64,
    pub estimated_cost: f64,
}

impl StatsSnapshot {
    /// Share of pairs that needed no judge call.
    pub fn lexical_resolution_rate(&self) -> f64 {
        if self.total_pairs == 0 {
            return 0.0;
        }
        self.tier_counts.lexical as f64 / self.total_pairs as f64
    }
}
