use std::sync::Arc;

use nbc::{
    ClassifierConfig, NaiveBayes, NbcError, PriorNormalization, SharedTokenizer, Snapshot,
    STATE_KEYS,
};
use serde_json::{json, Value};

fn spam_classifier() -> NaiveBayes {
    let mut classifier = NaiveBayes::default();
    classifier
        .learn("spam words here", "spam")
        .learn("more spam text", "spam")
        .learn("hello friend", "ham");
    classifier
}

#[test]
fn spam_scenario_matches_hand_computed_scores() {
    let classifier = spam_classifier();
    assert_eq!(classifier.total_documents(), 3);
    assert_eq!(classifier.vocabulary_size(), 7);
    assert_eq!(classifier.word_count("spam"), Some(6));
    assert_eq!(classifier.word_frequency("spam", "spam"), Some(2));

    let ranking = classifier.probabilities("spam spam spam");
    assert_eq!(ranking[0].category, "spam");
    let expected_spam = (2.0f64 / 3.0).ln() + 3.0 * (3.0f64 / 13.0).ln();
    let expected_ham = (1.0f64 / 3.0).ln() + 3.0 * (1.0f64 / 9.0).ln();
    assert!((ranking[0].probability - expected_spam).abs() < 1e-12);
    assert!((ranking[1].probability - expected_ham).abs() < 1e-12);
    assert_eq!(classifier.categorize("hello friend"), Some("ham"));
}

#[test]
fn json_round_trip_preserves_rankings_and_training_continues() {
    let classifier = spam_classifier();
    let json = classifier.to_json(true).expect("serialize");
    let mut restored = NaiveBayes::from_json(&json).expect("deserialize");

    for text in ["spam", "hello", "unseen words", ""] {
        assert_eq!(restored.probabilities(text), classifier.probabilities(text));
    }

    let mut original = classifier;
    original.learn("spam again", "spam");
    restored.learn("spam again", "spam");
    assert_eq!(
        restored.probabilities("spam hello"),
        original.probabilities("spam hello")
    );
}

#[test]
fn every_state_key_is_required() {
    let exported: Value =
        serde_json::from_str(&spam_classifier().to_json(false).expect("serialize"))
            .expect("valid JSON");
    for key in STATE_KEYS.iter().filter(|key| **key != "options") {
        let mut snapshot = exported.clone();
        snapshot
            .as_object_mut()
            .expect("object")
            .remove(*key);
        let err = Snapshot::from_value(snapshot).expect_err("missing key must fail");
        assert!(
            matches!(err, NbcError::MissingField { field } if field == *key),
            "unexpected error for {key}: {err}"
        );
    }
}

#[test]
fn custom_tokenizer_survives_import() {
    let chars: SharedTokenizer =
        Arc::new(|text: &str| text.chars().map(String::from).collect::<Vec<_>>());
    let mut classifier =
        NaiveBayes::with_tokenizer(ClassifierConfig::default(), Arc::clone(&chars))
            .expect("classifier");
    classifier.learn("aab", "x").learn("cc", "y");
    assert_eq!(classifier.vocabulary_size(), 3);

    let snapshot = classifier.export();
    let restored = NaiveBayes::import_with_tokenizer(snapshot, chars).expect("import");
    assert_eq!(restored.categorize("ca"), classifier.categorize("ca"));
    assert_eq!(restored.probabilities("abc"), classifier.probabilities("abc"));
}

#[test]
fn vocabulary_limit_prior_requires_a_limit() {
    let err = ClassifierConfig::builder()
        .prior_normalization(PriorNormalization::VocabularyLimit)
        .build()
        .expect_err("limit of zero");
    assert!(matches!(err, NbcError::InvalidConfig(_)));

    let snapshot = json!({
        "categories": ["a"],
        "docCount": {"a": 1},
        "totalDocuments": 1,
        "vocabulary": ["x"],
        "wordCount": {"a": 1},
        "wordFrequencyCount": {"a": {"x": 1}},
        "options": {"vocabularyLimit": 4, "priorNormalization": "vocabularyLimit"}
    });
    let classifier = NaiveBayes::import(Snapshot::from_value(snapshot).expect("snapshot"))
        .expect("import");
    let prior = classifier.prior("a").expect("registered");
    assert!((prior - 0.25).abs() < 1e-12);
}
