use super::*;
use crate::normalize::Normalizer;

fn composite(a: &str, b: &str) -> f64 {
    let normalizer = Normalizer::default();
    LexicalScorer::default()
        .score(&normalizer.normalize(a), &normalizer.normalize(b))
        .composite()
}

#[test]
fn test_identical_names_score_100() {
    let scores = LexicalScorer::default().score("acme corporation", "acme corporation");
    assert!((scores.composite() - 100.0).abs() < 1e-9);
    for (_, subscore) in scores.subscores() {
        assert!((subscore - 100.0).abs() < 1e-9);
    }
    assert!(scores.anomalies().is_empty());
}

#[test]
fn test_acme_variants_clear_fast_accept_band() {
    assert!(composite("Acme Corporation", "ACME CORP") >= 90.0);
}

#[test]
fn test_johns_hopkins_is_mid_band() {
    let score = composite("Johns Hopkins Hospital", "Johns Hopkins Medical Center");
    assert!(score > 50.0 && score < 90.0, "got {score}");
}

#[test]
fn test_unrelated_names_score_low() {
    assert!(composite("Acme Corp", "Zeta Holdings") < 50.0);
}

#[test]
fn test_only_weighted_algorithms_run() {
    let scores = LexicalScorer::default().score("acme", "acme co");
    assert_eq!(scores.subscores().len(), DEFAULT_WEIGHTS.len());
    assert!(scores.subscore(Algorithm::Phonetic).is_none());
    assert!(scores.subscore(Algorithm::EditRatio).is_some());
}

#[test]
fn test_token_set_overlap() {
    let weights = ScoringWeights::from_pairs([(Algorithm::TokenSet, 1.0)]);
    let scorer = LexicalScorer::new(weights).expect("valid weights");
    // 2 shared tokens / avg(3, 4) = 2 / 3.5
    let score = scorer
        .score("johns hopkins hospital", "johns hopkins medical center")
        .composite();
    assert!((score - 2.0 / 3.5 * 100.0).abs() < 1e-9);
}

#[test]
fn test_first_token_is_binary() {
    let weights = ScoringWeights::from_pairs([(Algorithm::FirstToken, 1.0)]);
    let scorer = LexicalScorer::new(weights).expect("valid weights");
    assert_eq!(scorer.score("acme widgets", "acme gadgets").composite(), 100.0);
    assert_eq!(scorer.score("acme widgets", "widgets acme").composite(), 0.0);
}

#[test]
fn test_partial_ratio_finds_substring() {
    let weights = ScoringWeights::from_pairs([(Algorithm::PartialRatio, 1.0)]);
    let scorer = LexicalScorer::new(weights).expect("valid weights");
    let score = scorer.score("hopkins", "johns hopkins hospital").composite();
    assert!((score - 100.0).abs() < 1e-9);
}

#[test]
fn test_boost_subscores() {
    let weights = ScoringWeights::from_pairs([
        (Algorithm::Exact, 0.4),
        (Algorithm::Phrase, 0.3),
        (Algorithm::Prefix, 0.3),
    ]);
    let scorer = LexicalScorer::new(weights).expect("valid weights");

    let same = scorer.score("acme corporation", "acme corporation");
    assert_eq!(same.composite(), 100.0);

    let phrase = scorer.score("hopkins medical", "johns hopkins medical center");
    assert_eq!(phrase.subscore(Algorithm::Exact), Some(0.0));
    assert_eq!(phrase.subscore(Algorithm::Phrase), Some(100.0));
    assert_eq!(phrase.subscore(Algorithm::Prefix), Some(0.0));

    let prefix = scorer.score("int bus mach", "international business machines");
    assert_eq!(prefix.subscore(Algorithm::Prefix), Some(100.0));
    assert_eq!(prefix.subscore(Algorithm::Phrase), Some(0.0));
}

#[test]
fn test_phonetic_subscore() {
    let weights = ScoringWeights::from_pairs([(Algorithm::Phonetic, 1.0)]);
    let scorer = LexicalScorer::new(weights).expect("valid weights");
    assert_eq!(scorer.score("smith robert", "smyth rupert").composite(), 100.0);
    assert_eq!(scorer.score("smith", "jones").composite(), 0.0);
}

#[test]
fn test_soundex_codes() {
    assert_eq!(soundex("robert"), "R163");
    assert_eq!(soundex("rupert"), "R163");
    assert_eq!(soundex("ashcraft"), "A261");
    assert_eq!(soundex("tymczak"), "T522");
    assert_eq!(soundex("pfister"), "P236");
    assert_eq!(soundex("lee"), "L000");
    assert_eq!(soundex("3m"), "3m");
}

#[test]
fn test_empty_input_degrades_to_zero() {
    let scores = LexicalScorer::default().score("", "acme");
    assert_eq!(scores.composite(), 0.0);
    assert_eq!(scores.anomalies().len(), DEFAULT_WEIGHTS.len());
    assert!(scores.subscores().values().all(|s| *s == 0.0));
}

fn weight_maps() -> Vec<ScoringWeights> {
    let mut maps = vec![
        ScoringWeights::default(),
        ScoringWeights::from_pairs(Algorithm::ALL.map(|a| (a, 1.0 / 9.0))),
        ScoringWeights::from_pairs([
            (Algorithm::EditRatio, 0.51),
            (Algorithm::JaroWinkler, 0.5),
        ]),
        ScoringWeights::from_pairs([
            (Algorithm::Exact, 0.2),
            (Algorithm::Phrase, 0.3),
            (Algorithm::Prefix, 0.25),
            (Algorithm::Phonetic, 0.25),
            (Algorithm::FirstToken, 0.01),
        ]),
    ];
    maps.extend(Algorithm::ALL.map(|a| ScoringWeights::from_pairs([(a, 1.0)])));
    maps
}

#[test]
fn test_composite_stays_in_range() {
    let names = [
        "",
        "a",
        "acme corporation",
        "acme",
        "corporation acme",
        "acme acme acme",
        "zz top",
        "international business machines",
        "international business machines corporation of america",
        "ünïcödé holdings",
        "日本 電気",
        "3m company",
        "a b c d e f g",
        "- -",
    ];
    for weights in weight_maps() {
        let scorer = LexicalScorer::new(weights.clone()).expect("weights within tolerance");
        for a in names {
            for b in names {
                let scores = scorer.score(a, b);
                let composite = scores.composite();
                assert!(
                    (0.0..=100.0).contains(&composite),
                    "{weights:?}: {a:?} vs {b:?} -> {composite}"
                );
                for (algorithm, subscore) in scores.subscores() {
                    assert!(
                        (0.0..=100.0).contains(subscore),
                        "{algorithm}: {a:?} vs {b:?} -> {subscore}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_weights_within_tolerance_are_accepted() {
    let weights = ScoringWeights::from_pairs([
        (Algorithm::EditRatio, 0.5),
        (Algorithm::JaroWinkler, 0.505),
    ]);
    let scorer = LexicalScorer::new(weights).expect("within tolerance");
    // Rescaled internally, so identical names still land exactly on 100.
    assert!((scorer.score("acme", "acme").composite() - 100.0).abs() < 1e-9);

    for (edit, jaro) in [(0.51, 0.5), (0.5, 0.49)] {
        let edge = ScoringWeights::from_pairs([
            (Algorithm::EditRatio, edit),
            (Algorithm::JaroWinkler, jaro),
        ]);
        assert!(edge.validate().is_ok(), "sum {}", edit + jaro);
    }
    let over = ScoringWeights::from_pairs([
        (Algorithm::EditRatio, 0.52),
        (Algorithm::JaroWinkler, 0.5),
    ]);
    assert!(over.validate().is_err());
}

#[test]
fn test_weights_must_sum_to_one() {
    let weights = ScoringWeights::from_pairs([
        (Algorithm::EditRatio, 0.5),
        (Algorithm::JaroWinkler, 0.3),
    ]);
    let err = LexicalScorer::new(weights).unwrap_err();
    assert!(matches!(err, ScoringError::InvalidWeights { .. }));
}

#[test]
fn test_negative_weight_rejected() {
    let weights = ScoringWeights::from_pairs([
        (Algorithm::EditRatio, 1.2),
        (Algorithm::JaroWinkler, -0.2),
    ]);
    assert!(matches!(
        weights.validate(),
        Err(ScoringError::InvalidWeights { .. })
    ));
}

#[test]
fn test_parse_weights() {
    let weights = ScoringWeights::parse("edit_ratio=0.6, jaro_winkler = 0.4").expect("parse");
    assert_eq!(weights.get(Algorithm::EditRatio), 0.6);
    assert_eq!(weights.get(Algorithm::JaroWinkler), 0.4);
    assert_eq!(weights.get(Algorithm::TokenSet), 0.0);
    assert!(weights.validate().is_ok());

    assert!(matches!(
        ScoringWeights::parse("levenshtein=1.0"),
        Err(ScoringError::UnknownAlgorithm { .. })
    ));
    assert!(matches!(
        ScoringWeights::parse("edit_ratio"),
        Err(ScoringError::InvalidWeights { .. })
    ));
    assert!(matches!(
        ScoringWeights::parse("edit_ratio=abc"),
        Err(ScoringError::InvalidWeights { .. })
    ));
}

#[test]
fn test_algorithm_round_trips_through_str() {
    for algorithm in Algorithm::ALL {
        assert_eq!(algorithm.as_str().parse::<Algorithm>().unwrap(), algorithm);
    }
}

#[test]
fn test_error_recoverability() {
    assert!(
        ScoringError::EmptyInput {
            algorithm: Algorithm::Exact
        }
        .is_recoverable()
    );
    assert!(
        !ScoringError::InvalidWeights {
            reason: "x".into()
        }
        .is_recoverable()
    );
}
