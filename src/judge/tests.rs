use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;

use super::*;
use crate::stats::RunStatistics;

fn fast_config() -> JudgeConfig {
    JudgeConfig {
        timeout: Duration::from_millis(50),
        max_retries: 1,
        retry_backoff: Duration::from_millis(1),
        ..Default::default()
    }
}

fn request() -> JudgeRequest {
    JudgeRequest::new("johns hopkins hospital", "johns hopkins medical center", 70.6)
}

#[test]
fn test_request_wire_shape() {
    let bare = serde_json::to_value(request()).unwrap();
    assert_eq!(bare["name_a"], "johns hopkins hospital");
    assert!(bare.get("normalized_a").is_none());

    let with_context = JudgeRequest::new("Johns Hopkins Hosp.", "JOHNS HOPKINS MEDICAL CTR", 70.6)
        .with_normalized("johns hopkins hospital", "johns hopkins medical center");
    let value = serde_json::to_value(&with_context).unwrap();
    assert_eq!(value["name_a"], "Johns Hopkins Hosp.");
    assert_eq!(value["normalized_b"], "johns hopkins medical center");

    let parsed: JudgeRequest =
        serde_json::from_str(r#"{"name_a": "a", "name_b": "b", "lexical_hint": 50}"#).unwrap();
    assert!(parsed.normalized_a.is_empty());
}

#[test]
fn test_parse_bare_verdict() {
    let verdict = parse_verdict(r#"{"confidence": 0.82, "rationale": "same hospital"}"#).unwrap();
    assert_eq!(verdict.confidence, 0.82);
    assert_eq!(verdict.rationale, "same hospital");
    assert!((verdict.score() - 82.0).abs() < 1e-9);
}

#[test]
fn test_parse_verdict_embedded_in_prose() {
    let body = "Sure!\n```json\n{\"confidence\": 0.1, \"rationale\": \"different\"}\n```";
    let verdict = parse_verdict(body).unwrap();
    assert_eq!(verdict.confidence, 0.1);
}

#[test]
fn test_parse_verdict_rationale_optional() {
    let verdict = parse_verdict(r#"{"confidence": 1}"#).unwrap();
    assert_eq!(verdict.confidence, 1.0);
    assert!(verdict.rationale.is_empty());
}

#[test]
fn test_parse_verdict_rejects_bad_bodies() {
    for body in [
        "",
        "   ",
        "yes they match",
        r#"{"rationale": "no confidence"}"#,
        r#"{"confidence": 1.5}"#,
        r#"{"confidence": -0.1}"#,
        "} backwards {",
    ] {
        assert!(
            matches!(parse_verdict(body), Err(JudgeError::Malformed { .. })),
            "{body:?} should be malformed"
        );
    }
}

#[test]
fn test_transient_classification() {
    assert!(JudgeError::Timeout { elapsed_ms: 1 }.is_transient());
    assert!(JudgeError::Quota { reason: "x".into() }.is_transient());
    assert!(JudgeError::Transport { reason: "x".into() }.is_transient());
    assert!(!JudgeError::malformed("x").is_transient());
    assert!(!JudgeError::Cancelled.is_transient());
    assert!(
        !JudgeError::Rejected {
            status: 400,
            reason: "x".into()
        }
        .is_transient()
    );
}

#[tokio::test]
async fn test_gate_returns_verdict() {
    let judge = Arc::new(MockJudge::new(0.9));
    let gate = JudgeGate::new(judge.clone(), &fast_config());
    let stats = RunStatistics::default();

    let verdict = gate
        .call(&request(), &CancellationToken::new(), &stats)
        .await
        .unwrap();

    assert_eq!(verdict.confidence, 0.9);
    assert_eq!(judge.calls(), 1);
    assert_eq!(stats.api_calls(), 1);
    assert_eq!(judge.requests()[0], request());
}

#[tokio::test]
async fn test_gate_times_out_and_retries() {
    let judge = Arc::new(MockJudge::hanging());
    let gate = JudgeGate::new(judge.clone(), &fast_config());
    let stats = RunStatistics::default();

    let err = gate
        .call(&request(), &CancellationToken::new(), &stats)
        .await
        .unwrap_err();

    assert!(matches!(err, JudgeError::Timeout { .. }));
    assert_eq!(judge.calls(), 2);
    let snapshot = stats.snapshot();
    assert_eq!(snapshot.api_calls, 2);
    assert_eq!(snapshot.api_retries, 1);
    assert_eq!(snapshot.api_timeouts, 2);
}

#[tokio::test]
async fn test_gate_retries_transient_then_succeeds() {
    let judge = Arc::new(MockJudge::new(0.7).with_script([MockResponse::Fail(
        JudgeError::Transport {
            reason: "connection reset".into(),
        },
    )]));
    let gate = JudgeGate::new(judge.clone(), &fast_config());
    let stats = RunStatistics::default();

    let verdict = gate
        .call(&request(), &CancellationToken::new(), &stats)
        .await
        .unwrap();

    assert_eq!(verdict.confidence, 0.7);
    assert_eq!(judge.calls(), 2);
    assert_eq!(stats.snapshot().api_retries, 1);
}

#[tokio::test]
async fn test_gate_does_not_retry_malformed() {
    let judge = Arc::new(MockJudge::new(1.5));
    let gate = JudgeGate::new(judge.clone(), &fast_config());
    let stats = RunStatistics::default();

    let err = gate
        .call(&request(), &CancellationToken::new(), &stats)
        .await
        .unwrap_err();

    assert!(matches!(err, JudgeError::Malformed { .. }));
    assert_eq!(judge.calls(), 1);
    assert_eq!(stats.snapshot().api_retries, 0);
}

#[tokio::test]
async fn test_gate_honours_cancellation_before_submit() {
    let judge = Arc::new(MockJudge::new(0.9));
    let gate = JudgeGate::new(judge.clone(), &fast_config());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = gate
        .call(&request(), &cancel, &RunStatistics::default())
        .await
        .unwrap_err();

    assert_eq!(err, JudgeError::Cancelled);
    assert_eq!(judge.calls(), 0);
}

#[tokio::test]
async fn test_gate_bounds_concurrency() {
    let judge = Arc::new(MockJudge::new(0.5).with_delay(Duration::from_millis(40)));
    let config = JudgeConfig {
        max_concurrency: 2,
        timeout: Duration::from_secs(5),
        ..Default::default()
    };
    let gate = JudgeGate::new(judge.clone(), &config);
    let stats = RunStatistics::default();
    let cancel = CancellationToken::new();
    let req = request();

    let started = Instant::now();
    let results = join_all((0..6).map(|_| gate.call(&req, &cancel, &stats))).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(judge.calls(), 6);
    // Six calls through two permits need at least three rounds.
    assert!(started.elapsed() >= Duration::from_millis(110));
    assert_eq!(gate.available_permits(), 2);
}

#[tokio::test]
async fn test_mock_pair_override_is_order_insensitive() {
    let judge = MockJudge::new(0.5).with_pair("b", "a", MockResponse::Confidence(0.05));

    let forward = judge.judge(&JudgeRequest::new("a", "b", 60.0)).await.unwrap();
    let reverse = judge.judge(&JudgeRequest::new("b", "a", 60.0)).await.unwrap();
    let other = judge.judge(&JudgeRequest::new("a", "c", 60.0)).await.unwrap();

    assert_eq!(forward.confidence, 0.05);
    assert_eq!(reverse.confidence, 0.05);
    assert_eq!(other.confidence, 0.5);
}

#[test]
fn test_provider_parsing() {
    assert_eq!("http".parse::<JudgeProvider>(), Ok(JudgeProvider::Http));
    assert_eq!(" GenAI ".parse::<JudgeProvider>(), Ok(JudgeProvider::Genai));
    assert_eq!("none".parse::<JudgeProvider>(), Ok(JudgeProvider::Disabled));
    assert!("grpc".parse::<JudgeProvider>().is_err());
}

#[test]
fn test_judge_config_validation() {
    assert!(JudgeConfig::default().validate().is_ok());

    let http_without_endpoint = JudgeConfig {
        provider: JudgeProvider::Http,
        ..Default::default()
    };
    assert!(http_without_endpoint.validate().is_err());

    let verifier_without_judge = JudgeConfig {
        verify_provider: JudgeProvider::Genai,
        ..Default::default()
    };
    assert!(verifier_without_judge.validate().is_err());

    let zero_concurrency = JudgeConfig {
        max_concurrency: 0,
        ..Default::default()
    };
    assert!(zero_concurrency.validate().is_err());

    let verifier_without_endpoint = JudgeConfig {
        provider: JudgeProvider::Http,
        endpoint: Some("http://judge.local/score".into()),
        verify_provider: JudgeProvider::Http,
        ..Default::default()
    };
    assert!(verifier_without_endpoint.validate().is_err());
}

#[test]
fn test_debug_hides_api_key() {
    let config = JudgeConfig {
        api_key: Some("sk-secret".into()),
        ..Default::default()
    };
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("sk-secret"));
    assert!(rendered.contains("JudgeConfig"));
}

#[test]
fn test_factory_builds_configured_judges() {
    let none = build_judges(&JudgeConfig::default()).unwrap();
    assert!(none.judge.is_none());
    assert!(none.verifier.is_none());

    let config = JudgeConfig {
        provider: JudgeProvider::Http,
        endpoint: Some("http://judge.local/score".into()),
        verify_provider: JudgeProvider::Genai,
        verify_model: "verifier-model".into(),
        ..Default::default()
    };
    let set = build_judges(&config).unwrap();
    assert_eq!(
        set.judge.as_ref().map(|j| j.name().to_string()),
        Some("http:http://judge.local/score".to_string())
    );
    assert_eq!(
        set.verifier.as_ref().map(|j| j.name().to_string()),
        Some("genai:verifier-model".to_string())
    );
}
