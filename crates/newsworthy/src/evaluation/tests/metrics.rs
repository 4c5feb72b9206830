use super::common::*;
use crate::evaluation::metrics::*;
use crate::providers::{ProviderError, Token, ZeroShotResult};

#[test]
fn fact_density_guards_empty_documents() {
    assert_eq!(fact_density(0, 0), 0.0);
    assert_eq!(fact_density(3, 0), 3.0);
    assert!((fact_density(2, 50) - 2.0 / 51.0).abs() < 1e-12);
}

#[test]
fn analytical_depth_counts_connective_roles_and_caps() {
    let mut doc = document(4, 0, 1);
    doc.tokens[0].dep = "because".to_string();
    doc.tokens[1].dep = "however".to_string();
    doc.tokens[2].dep = "nsubj".to_string();
    assert!((analytical_depth(&doc) - 0.2).abs() < 1e-12);

    let mut dense = document(0, 0, 1);
    dense.tokens = (0..15)
        .map(|_| Token {
            text: "therefore".to_string(),
            is_punct: false,
            dep: "therefore".to_string(),
        })
        .collect();
    assert_eq!(analytical_depth(&dense), 1.0);
}

#[test]
fn readability_rewards_short_sentences() {
    // 10 words per sentence hits the baseline exactly
    assert_eq!(readability(&document(20, 0, 2)), 1.0);
    // 25 words per sentence
    assert!((readability(&document(50, 0, 2)) - 0.5).abs() < 1e-12);
    // shorter sentences than the baseline score above 1
    assert!(readability(&document(4, 0, 2)) > 1.0);
    // the penalty term saturates at 1.0
    assert_eq!(readability(&document(100, 0, 1)), 0.0);
}

#[test]
fn readability_treats_missing_sentences_as_one() {
    assert_eq!(readability(&document(0, 0, 0)), readability(&document(0, 0, 1)));
}

#[test]
fn readability_ignores_punctuation_tokens() {
    let mut doc = document(20, 0, 1);
    for token in doc.tokens.iter_mut().take(10) {
        token.is_punct = true;
    }
    assert_eq!(readability(&doc), 1.0);
}

#[test]
fn novelty_weights_labels_by_identity() {
    let result = novelty_result(0.6, 0.1, 0.2, 0.1);
    let novelty = novelty_from(&result).expect("all labels present");
    assert!((novelty - (0.7 * 0.6 + 0.3 * 0.2)).abs() < 1e-12);
}

#[test]
fn novelty_rejects_results_missing_a_label() {
    let result = ZeroShotResult {
        labels: vec!["breaking news".to_string(), "opinion".to_string()],
        scores: vec![0.7, 0.3],
    };
    match novelty_from(&result) {
        Err(ProviderError::MissingLabel(label)) => assert_eq!(label, "analysis"),
        other => panic!("expected missing label, got {other:?}"),
    }
}

#[test]
fn truncation_respects_char_boundaries() {
    let accented = "é".repeat(600);
    let excerpt = truncate_chars(&accented, SENTIMENT_CHAR_LIMIT);
    assert_eq!(excerpt.chars().count(), 512);

    assert_eq!(truncate_chars("short", SENTIMENT_CHAR_LIMIT), "short");
}

#[test]
fn metrics_from_parts_counts_every_entity_span() {
    let mut doc = document(9, 3, 1);
    doc.entities.push(doc.entities[0].clone());

    let metrics = metrics_from_parts(&doc, 0.4, 0.5, -0.2);
    assert_eq!(metrics.named_entities_count, 4);
    assert!((metrics.fact_density_score - 0.4).abs() < 1e-12);
    assert_eq!(metrics.sentiment_score, -0.2);
}
