//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use namecascade::{Config, Dataset, JudgeConfig, MatchEngine, MatchResult, SemanticJudge};

/// Judge settings that fail fast: short timeout, no retries.
pub fn fast_judge_config() -> JudgeConfig {
    JudgeConfig {
        timeout: Duration::from_millis(40),
        max_retries: 0,
        retry_backoff: Duration::from_millis(1),
        ..Default::default()
    }
}

pub fn config_with_fast_judge() -> Config {
    Config {
        judge: fast_judge_config(),
        ..Default::default()
    }
}

pub fn engine(config: Config, judge: Option<Arc<dyn SemanticJudge>>) -> MatchEngine {
    MatchEngine::new(config, judge, None).expect("engine should build")
}

pub fn dataset(label: &str, pairs: &[(&str, &str)]) -> Dataset {
    Dataset::from_pairs(label, pairs.iter().copied())
}

pub fn result_for<'a>(results: &'a [MatchResult], query_id: &str) -> &'a MatchResult {
    results
        .iter()
        .find(|r| r.query_id() == query_id)
        .unwrap_or_else(|| panic!("no result for {query_id}"))
}

const FIRST: &[&str] = &[
    "Acme", "Apex", "Atlas", "Beacon", "Birch", "Cobalt", "Crescent", "Delta", "Ember", "Falcon",
];
const SECOND: &[&str] = &[
    "Holdings", "Corp", "Group", "Labs", "Systems", "Partners", "Foods", "Works",
];

/// Deterministic synthetic company names spread over a handful of blocking keys.
pub fn synthetic_names(prefix: &str, count: usize, offset: usize) -> Vec<(String, String)> {
    (0..count)
        .map(|i| {
            let n = i + offset;
            let first = FIRST[n % FIRST.len()];
            let second = SECOND[(n / FIRST.len()) % SECOND.len()];
            (format!("{prefix}{i}"), format!("{first} {second} {}", n % 7))
        })
        .collect()
}
