use super::*;
use crate::judge::JudgeProvider;
use crate::scoring::Algorithm;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

const ALL_VARS: &[&str] = &[
    "NAMECASCADE_SCORING_WEIGHTS",
    "NAMECASCADE_MIN_SCORE_THRESHOLD",
    "NAMECASCADE_TOP_N_MATCHES",
    "NAMECASCADE_MAX_WORKERS",
    "NAMECASCADE_BLOCKING_ENABLED",
    "NAMECASCADE_QUERY_ID_COLUMN",
    "NAMECASCADE_QUERY_NAME_COLUMN",
    "NAMECASCADE_REFERENCE_ID_COLUMN",
    "NAMECASCADE_REFERENCE_NAME_COLUMN",
    "NAMECASCADE_QUERY_PATH",
    "NAMECASCADE_REFERENCE_PATH",
    "NAMECASCADE_FAST_ACCEPT_THRESHOLD",
    "NAMECASCADE_FAST_REJECT_THRESHOLD",
    "NAMECASCADE_FINAL_ACCEPT_THRESHOLD",
    "NAMECASCADE_TIER1_ACCEPT_THRESHOLD",
    "NAMECASCADE_TIER1_ACCEPT_FLOOR",
    "NAMECASCADE_SEMANTIC_REJECT_THRESHOLD",
    "NAMECASCADE_CONFIDENCE_HIGH",
    "NAMECASCADE_CONFIDENCE_MEDIUM",
    "NAMECASCADE_CONFIDENCE_LOW",
    "NAMECASCADE_BLEND_WEIGHTS",
    "NAMECASCADE_JUDGE_PROVIDER",
    "NAMECASCADE_JUDGE_ENDPOINT",
    "NAMECASCADE_JUDGE_API_KEY",
    "NAMECASCADE_JUDGE_MODEL",
    "NAMECASCADE_VERIFY_PROVIDER",
    "NAMECASCADE_VERIFY_ENDPOINT",
    "NAMECASCADE_VERIFY_MODEL",
    "NAMECASCADE_JUDGE_MAX_CONCURRENCY",
    "NAMECASCADE_JUDGE_TIMEOUT_MS",
    "NAMECASCADE_JUDGE_MAX_RETRIES",
    "NAMECASCADE_JUDGE_RETRY_BACKOFF_MS",
    "NAMECASCADE_JUDGE_COST_PER_CALL",
    "NAMECASCADE_STOP_WORDS",
    "NAMECASCADE_ABBREVIATIONS",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_namecascade_env();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_namecascade_env();
    result
}

fn clear_namecascade_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.min_score_threshold, 60.0);
    assert_eq!(config.top_n_matches, 3);
    assert_eq!(config.max_workers, 8);
    assert!(config.blocking_enabled);
    assert_eq!(config.cascade.fast_accept_threshold, 90.0);
    assert_eq!(config.cascade.fast_reject_threshold, 50.0);
    assert_eq!(config.cascade.final_accept_threshold, 75.0);
    assert_eq!(config.judge.provider, JudgeProvider::Disabled);
    assert_eq!(config.columns.query_name, "name");
    assert!(config.query_path.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    let config = with_env_vars(&[], || Config::from_env().expect("defaults parse"));

    assert_eq!(config.top_n_matches, 3);
    assert_eq!(config.scoring_weights, ScoringWeights::default());
    assert_eq!(config.cascade, crate::cascade::CascadeConfig::default());
    assert_eq!(config.judge, crate::judge::JudgeConfig::default());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("NAMECASCADE_SCORING_WEIGHTS", "edit_ratio=0.5,token_set=0.5"),
            ("NAMECASCADE_MIN_SCORE_THRESHOLD", "55.5"),
            ("NAMECASCADE_TOP_N_MATCHES", "5"),
            ("NAMECASCADE_MAX_WORKERS", "2"),
            ("NAMECASCADE_BLOCKING_ENABLED", "false"),
            ("NAMECASCADE_QUERY_NAME_COLUMN", "org_name"),
            ("NAMECASCADE_FAST_ACCEPT_THRESHOLD", "92"),
            ("NAMECASCADE_BLEND_WEIGHTS", "lexical=0.5,semantic=0.5,verify=0"),
            ("NAMECASCADE_JUDGE_PROVIDER", "http"),
            ("NAMECASCADE_JUDGE_ENDPOINT", "http://judge.local/v1/match"),
            ("NAMECASCADE_JUDGE_TIMEOUT_MS", "1500"),
            ("NAMECASCADE_JUDGE_MAX_RETRIES", "4"),
            ("NAMECASCADE_JUDGE_COST_PER_CALL", "0.001"),
            ("NAMECASCADE_STOP_WORDS", "the,group"),
        ],
        || Config::from_env().expect("overrides parse"),
    );

    assert_eq!(config.scoring_weights.get(Algorithm::EditRatio), 0.5);
    assert_eq!(config.scoring_weights.get(Algorithm::JaroWinkler), 0.0);
    assert_eq!(config.min_score_threshold, 55.5);
    assert_eq!(config.top_n_matches, 5);
    assert_eq!(config.max_workers, 2);
    assert!(!config.blocking_enabled);
    assert_eq!(config.columns.query_name, "org_name");
    assert_eq!(config.columns.reference_name, "name");
    assert_eq!(config.cascade.fast_accept_threshold, 92.0);
    assert_eq!(config.cascade.blend.semantic, 0.5);
    assert_eq!(config.judge.provider, JudgeProvider::Http);
    assert_eq!(
        config.judge.endpoint.as_deref(),
        Some("http://judge.local/v1/match")
    );
    assert_eq!(config.judge.timeout, Duration::from_millis(1500));
    assert_eq!(config.judge.max_retries, 4);
    assert_eq!(config.judge.cost_per_call, 0.001);
    assert_eq!(config.normalizer.stop_words, vec!["the", "group"]);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_verifier_inherits_primary_judge_settings() {
    let config = with_env_vars(
        &[
            ("NAMECASCADE_JUDGE_PROVIDER", "http"),
            ("NAMECASCADE_JUDGE_ENDPOINT", "http://judge.local/v1/match"),
            ("NAMECASCADE_JUDGE_MODEL", "judge-model"),
            ("NAMECASCADE_VERIFY_PROVIDER", "http"),
        ],
        || Config::from_env().expect("verifier settings parse"),
    );
    assert_eq!(
        config.judge.verify_endpoint.as_deref(),
        Some("http://judge.local/v1/match")
    );
    assert_eq!(config.judge.verify_model, "judge-model");
    assert!(config.validate().is_ok());

    let config = with_env_vars(
        &[
            ("NAMECASCADE_JUDGE_ENDPOINT", "http://judge.local/v1/match"),
            ("NAMECASCADE_VERIFY_ENDPOINT", "http://verify.local/v1/match"),
            ("NAMECASCADE_VERIFY_MODEL", "verify-model"),
        ],
        || Config::from_env().expect("verifier overrides parse"),
    );
    assert_eq!(
        config.judge.verify_endpoint.as_deref(),
        Some("http://verify.local/v1/match")
    );
    assert_eq!(config.judge.verify_model, "verify-model");
}

#[test]
#[serial]
fn test_from_env_rejects_unparseable_values() {
    let result = with_env_vars(&[("NAMECASCADE_TOP_N_MATCHES", "three")], Config::from_env);
    assert!(matches!(
        result,
        Err(ConfigError::InvalidValue {
            name: "NAMECASCADE_TOP_N_MATCHES",
            ..
        })
    ));

    let result = with_env_vars(&[("NAMECASCADE_FAST_ACCEPT_THRESHOLD", "NaN")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

    let result = with_env_vars(&[("NAMECASCADE_BLOCKING_ENABLED", "maybe")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

    let result = with_env_vars(&[("NAMECASCADE_JUDGE_PROVIDER", "grpc")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

    let result = with_env_vars(&[("NAMECASCADE_SCORING_WEIGHTS", "cosine=1")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::Scoring(_))));

    let result = with_env_vars(&[("NAMECASCADE_ABBREVIATIONS", "broken")], Config::from_env);
    assert!(matches!(result, Err(ConfigError::Normalization(_))));
}

#[test]
fn test_validate_weights_must_sum_to_one() {
    let config = Config {
        scoring_weights: ScoringWeights::from_pairs([
            (Algorithm::EditRatio, 0.6),
            (Algorithm::TokenSet, 0.6),
        ]),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Scoring(_))));
}

#[test]
fn test_validate_thresholds() {
    let mut config = Config::default();
    config.cascade.fast_reject_threshold = 90.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));

    let config = Config {
        min_score_threshold: 101.0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));
}

#[test]
fn test_validate_threshold_ordering() {
    let mut config = Config::default();
    config.cascade.final_accept_threshold = 95.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));

    let mut config = Config::default();
    config.cascade.final_accept_threshold = 40.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.cascade.tier1_accept_floor = 10.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidThresholds { .. })
    ));

    let config = Config {
        min_score_threshold: 99.0,
        ..Default::default()
    };
    match config.validate() {
        Err(ConfigError::InvalidThresholds { reason }) => {
            assert!(reason.contains("confidence.low"), "{reason}");
        }
        other => panic!("expected InvalidThresholds, got {other:?}"),
    }

    let mut config = Config::default();
    config.cascade.final_accept_threshold = 50.0;
    config.cascade.tier1_accept_floor = 90.0;
    config.min_score_threshold = 60.0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_zero_values() {
    let config = Config {
        top_n_matches: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue {
            name: "top_n_matches"
        })
    ));

    let config = Config {
        max_workers: 0,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ZeroValue { name: "max_workers" })
    ));
}

#[test]
fn test_validate_judge() {
    let mut config = Config::default();
    config.judge.provider = JudgeProvider::Http;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidJudge { .. })
    ));
}

#[test]
fn test_validate_recursive_abbreviation() {
    let mut config = Config::default();
    config.normalizer.extra_abbreviations = vec![("widg".into(), "widg corp".into())];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Normalization(_))
    ));
}

#[test]
fn test_validate_input_paths() {
    let config = Config {
        query_path: Some(PathBuf::from("/nonexistent/queries.jsonl")),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));

    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        reference_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));

    let file = tempfile::NamedTempFile::new().unwrap();
    let config = Config {
        query_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
