use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::*;
use crate::config::{Config, ConfigError};
use crate::dataset::Dataset;
use crate::judge::MockJudge;
use crate::scoring::{Algorithm, ScoringWeights};

fn references() -> Dataset {
    Dataset::from_pairs(
        "refs",
        [
            ("r1", "Acme Corporation"),
            ("r2", "Johns Hopkins Medical Center"),
            ("r3", "Zeta Holdings"),
        ],
    )
}

#[test]
fn test_new_rejects_invalid_weights() {
    let config = Config {
        scoring_weights: ScoringWeights::from_pairs([(Algorithm::EditRatio, 0.5)]),
        ..Default::default()
    };
    let err = MatchEngine::new(config, None, None).unwrap_err();
    assert!(matches!(err, MatchError::Config(ConfigError::Scoring(_))));
}

#[test]
fn test_new_rejects_unordered_thresholds() {
    let mut config = Config::default();
    config.cascade.fast_reject_threshold = 95.0;
    let err = MatchEngine::new(config, None, None).unwrap_err();
    assert!(matches!(
        err,
        MatchError::Config(ConfigError::InvalidThresholds { .. })
    ));
}

#[tokio::test]
async fn test_run_with_empty_inputs() {
    let engine = MatchEngine::new(Config::default(), None, None).unwrap();
    let report = engine
        .run(
            &Dataset::new("q", Vec::new()),
            &Dataset::new("r", Vec::new()),
            CancellationToken::new(),
        )
        .await;

    assert!(report.results.is_empty());
    assert_eq!(report.statistics.total_pairs, 0);
    assert!(!report.cancelled);
}

#[tokio::test]
async fn test_run_preserves_input_order() {
    let config = Config {
        max_workers: 3,
        ..Default::default()
    };
    let engine = MatchEngine::new(config, Some(Arc::new(MockJudge::new(0.9))), None).unwrap();
    let queries = Dataset::from_pairs(
        "queries",
        (0..20).map(|i| (format!("q{i}"), format!("Acme Corp {i}"))),
    );

    let report = engine
        .run(&queries, &references(), CancellationToken::new())
        .await;

    let ids: Vec<&str> = report.results.iter().map(|r| r.query_id()).collect();
    let expected: Vec<String> = (0..20).map(|i| format!("q{i}")).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(report.statistics.queries, 20);
    assert_eq!(report.skipped_queries, 0);
}

#[tokio::test]
async fn test_run_cancelled_up_front_submits_nothing() {
    let engine = MatchEngine::new(Config::default(), None, None).unwrap();
    let queries = Dataset::from_pairs("queries", [("q1", "Acme Corp"), ("q2", "Zeta")]);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = engine.run(&queries, &references(), cancel).await;

    assert!(report.cancelled);
    assert!(report.results.is_empty());
    assert_eq!(report.skipped_queries, 2);
}

#[tokio::test]
async fn test_each_run_gets_fresh_statistics() {
    let engine = MatchEngine::new(Config::default(), None, None).unwrap();
    let queries = Dataset::from_pairs("queries", [("q1", "Acme Corp")]);

    let first = engine
        .run(&queries, &references(), CancellationToken::new())
        .await;
    let second = engine
        .run(&queries, &references(), CancellationToken::new())
        .await;

    assert_eq!(first.statistics.total_pairs, second.statistics.total_pairs);
    assert_ne!(first.statistics.run_id, second.statistics.run_id);
}
