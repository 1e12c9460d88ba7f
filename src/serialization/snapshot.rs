//! Plain-data snapshots of classifier state and their JSON encoding.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::info;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::classifier::{NaiveBayes, SharedTokenizer};
use crate::config::ClassifierConfig;
use crate::error::{NbcError, Result};
use crate::state::{CategoryCounts, ClassifierState};

/// Fields every snapshot must carry, in the order they are checked on import.
pub const STATE_KEYS: [&str; 7] = [
    "categories",
    "docCount",
    "totalDocuments",
    "vocabulary",
    "wordCount",
    "wordFrequencyCount",
    "options",
];

/// Serializable copy of a classifier's state.
///
/// Maps are ordered and the vocabulary is sorted, so exporting the same model always yields the
/// same JSON. `categories` stays in registration order. Deserializing goes through the same
/// field validation as [`Snapshot::from_value`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawSnapshot")]
pub struct Snapshot {
    /// Category labels in registration order.
    pub categories: Vec<String>,
    /// Documents learned per category.
    pub doc_count: BTreeMap<String, u64>,
    /// Total documents learned.
    pub total_documents: u64,
    /// Distinct tokens observed across all categories, sorted.
    pub vocabulary: Vec<String>,
    /// Number of entries in `vocabulary`.
    pub vocabulary_size: usize,
    /// Token occurrences per category.
    pub word_count: BTreeMap<String, u64>,
    /// Per-category token occurrence tables.
    pub word_frequency_count: BTreeMap<String, BTreeMap<String, u64>>,
    /// Configuration the classifier was built with.
    pub options: ClassifierConfig,
}

/// Either a plain list or an object whose keys are the entries (`{"token": true}`).
///
/// Object keys are kept in document order; for `categories` that order is the registration
/// order used to break ties.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Entries {
    List(Vec<String>),
    Keys(Map<String, Value>),
}

impl Entries {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::List(items) => items,
            Self::Keys(map) => map.into_iter().map(|(key, _)| key).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    categories: Option<Entries>,
    doc_count: Option<BTreeMap<String, u64>>,
    total_documents: Option<u64>,
    vocabulary: Option<Entries>,
    word_count: Option<BTreeMap<String, u64>>,
    word_frequency_count: Option<BTreeMap<String, BTreeMap<String, u64>>>,
    options: Option<Value>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T> {
    value.ok_or(NbcError::MissingField { field })
}

impl TryFrom<RawSnapshot> for Snapshot {
    type Error = NbcError;

    fn try_from(raw: RawSnapshot) -> Result<Self> {
        let categories = require(raw.categories, "categories")?.into_vec();
        let doc_count = require(raw.doc_count, "docCount")?;
        let total_documents = require(raw.total_documents, "totalDocuments")?;
        let vocabulary: Vec<String> = require(raw.vocabulary, "vocabulary")?
            .into_vec()
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let word_count = require(raw.word_count, "wordCount")?;
        let word_frequency_count = require(raw.word_frequency_count, "wordFrequencyCount")?;
        let options = ClassifierConfig::from_options(raw.options.as_ref())?;
        Ok(Self {
            categories,
            doc_count,
            total_documents,
            vocabulary_size: vocabulary.len(),
            vocabulary,
            word_count,
            word_frequency_count,
            options,
        })
    }
}

impl Snapshot {
    /// Captures the state and configuration of `classifier`.
    #[must_use]
    pub fn capture(classifier: &NaiveBayes) -> Self {
        let state = classifier.state();
        let mut doc_count = BTreeMap::new();
        let mut word_count = BTreeMap::new();
        let mut word_frequency_count = BTreeMap::new();
        for (name, counts) in state.iter() {
            doc_count.insert(name.to_owned(), counts.documents);
            word_count.insert(name.to_owned(), counts.tokens);
            let table: BTreeMap<String, u64> = counts
                .frequencies
                .iter()
                .map(|(token, &count)| (token.clone(), count))
                .collect();
            word_frequency_count.insert(name.to_owned(), table);
        }
        let mut vocabulary: Vec<String> = state.vocabulary().iter().cloned().collect();
        vocabulary.sort_unstable();
        Self {
            categories: state.categories().to_vec(),
            doc_count,
            total_documents: state.total_documents(),
            vocabulary_size: vocabulary.len(),
            vocabulary,
            word_count,
            word_frequency_count,
            options: classifier.config().clone(),
        }
    }

    /// Validates a parsed JSON document, failing on the first missing state field.
    ///
    /// A field explicitly set to `null` counts as missing. An absent `options` entry falls
    /// back to the default configuration; `vocabularySize` is derived and ignored if present.
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_value(value)?;
        Self::try_from(raw)
    }

    /// Parses and validates a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(|err| {
            NbcError::Serialization(format!("snapshot is not valid JSON: {err}"))
        })?;
        Self::from_value(value)
    }

    /// Encodes the snapshot as JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    fn into_state(self) -> ClassifierState {
        let Self {
            categories,
            doc_count,
            total_documents,
            vocabulary,
            word_count,
            mut word_frequency_count,
            ..
        } = self;
        let categories = categories
            .into_iter()
            .map(|name| {
                let counts = CategoryCounts {
                    documents: doc_count.get(&name).copied().unwrap_or(0),
                    tokens: word_count.get(&name).copied().unwrap_or(0),
                    frequencies: word_frequency_count
                        .remove(&name)
                        .map(|table| table.into_iter().collect())
                        .unwrap_or_default(),
                };
                (name, counts)
            })
            .collect();
        let vocabulary: FxHashSet<String> = vocabulary.into_iter().collect();
        ClassifierState::from_parts(categories, vocabulary, total_documents)
    }
}

impl NaiveBayes {
    /// Exports the complete model state as a [`Snapshot`].
    #[must_use]
    pub fn export(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Builds a classifier from a snapshot, using the built-in tokenizer.
    ///
    /// The snapshot is trusted: counters are copied as-is without recomputation.
    pub fn import(snapshot: Snapshot) -> Result<Self> {
        let cfg = snapshot.options.clone();
        Self::from_state(cfg, None, snapshot.into_state())
    }

    /// Builds a classifier from a snapshot and attaches a custom tokenizer.
    pub fn import_with_tokenizer(snapshot: Snapshot, tokenizer: SharedTokenizer) -> Result<Self> {
        let cfg = snapshot.options.clone();
        Self::from_state(cfg, Some(tokenizer), snapshot.into_state())
    }

    /// Serialises the model state to JSON.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        self.export().to_json(pretty)
    }

    /// Restores a classifier from JSON produced by [`NaiveBayes::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        Self::import(Snapshot::from_json_str(json)?)
    }

    /// Writes the model state to `path` as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        save_classifier(self, path, pretty)
    }
}

/// Persists `classifier` to `path` as a JSON snapshot.
pub fn save_classifier<P: AsRef<Path>>(
    classifier: &NaiveBayes,
    path: P,
    pretty: bool,
) -> Result<()> {
    let path = path.as_ref();
    let json = classifier.to_json(pretty)?;
    fs::write(path, json).map_err(|err| NbcError::io(err, Some(path.to_path_buf())))?;
    info!(
        "saved classifier with {} documents and {} tokens to {}",
        classifier.total_documents(),
        classifier.vocabulary_size(),
        path.display()
    );
    Ok(())
}

/// Reads and validates a JSON snapshot from `path`.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Snapshot> {
    let path = path.as_ref();
    let data =
        fs::read_to_string(path).map_err(|err| NbcError::io(err, Some(path.to_path_buf())))?;
    Snapshot::from_json_str(&data)
}

/// Loads a classifier saved with [`save_classifier`].
pub fn load_classifier<P: AsRef<Path>>(path: P) -> Result<NaiveBayes> {
    let path = path.as_ref();
    let classifier = NaiveBayes::import(load_snapshot(path)?)?;
    info!(
        "loaded classifier with {} documents across {} categories from {}",
        classifier.total_documents(),
        classifier.categories().len(),
        path.display()
    );
    Ok(classifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn trained() -> NaiveBayes {
        let cfg = ClassifierConfig::builder().vocabulary_limit(50).build().unwrap();
        let mut classifier = NaiveBayes::new(cfg).unwrap();
        classifier
            .learn("spam words here", "spam")
            .learn("more spam text", "spam")
            .learn("hello friend", "ham")
            .learn("你好 朋友", "ham")
            .learn("", "empty");
        classifier
    }

    #[test]
    fn export_contains_every_state_key() {
        let value = serde_json::to_value(trained().export()).unwrap();
        for key in STATE_KEYS {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["vocabularySize"], json!(11));
        assert_eq!(value["categories"], json!(["spam", "ham", "empty"]));
        assert_eq!(value["options"]["vocabularyLimit"], json!(50));
    }

    #[test]
    fn round_trip_preserves_predictions() {
        let original = trained();
        let restored = NaiveBayes::from_json(&original.to_json(false).unwrap()).unwrap();
        assert_eq!(restored.state(), original.state());
        assert_eq!(restored.config(), original.config());
        for text in ["spam spam", "hello 朋友", "", "unknown tokens only", "text here friend"] {
            assert_eq!(restored.probabilities(text), original.probabilities(text));
            assert_eq!(restored.categorize(text), original.categorize(text));
        }
    }

    #[test]
    fn export_is_deterministic() {
        let model = trained();
        assert_eq!(model.to_json(true).unwrap(), model.to_json(true).unwrap());
    }

    #[test]
    fn each_missing_field_is_named() {
        let full = serde_json::to_value(trained().export()).unwrap();
        for key in STATE_KEYS.iter().filter(|key| **key != "options") {
            let mut partial = full.clone();
            partial.as_object_mut().unwrap().remove(*key);
            let err = Snapshot::from_value(partial).expect_err("import should fail");
            assert!(
                matches!(err, NbcError::MissingField { field } if field == *key),
                "unexpected error for {key}: {err}"
            );
        }
    }

    #[test]
    fn null_fields_count_as_missing() {
        let mut value = serde_json::to_value(trained().export()).unwrap();
        value["wordCount"] = Value::Null;
        assert!(matches!(
            Snapshot::from_value(value),
            Err(NbcError::MissingField { field: "wordCount" })
        ));
    }

    #[test]
    fn missing_options_fall_back_to_defaults() {
        let mut value = serde_json::to_value(trained().export()).unwrap();
        value.as_object_mut().unwrap().remove("options");
        let snapshot = Snapshot::from_value(value).unwrap();
        assert_eq!(snapshot.options, ClassifierConfig::default());
    }

    #[test]
    fn non_object_options_are_rejected() {
        let mut value = serde_json::to_value(trained().export()).unwrap();
        value["options"] = json!([1, 2, 3]);
        assert!(matches!(
            Snapshot::from_value(value),
            Err(NbcError::InvalidConfig(_))
        ));
    }

    #[test]
    fn legacy_object_shapes_are_accepted() {
        let value = json!({
            "categories": { "normal": true, "abusive": true },
            "docCount": { "normal": 1, "abusive": 1 },
            "totalDocuments": 2,
            "vocabulary": { "hello": true, "idiot": true },
            "vocabularySize": 2,
            "wordCount": { "normal": 1, "abusive": 1 },
            "wordFrequencyCount": { "normal": { "hello": 1 }, "abusive": { "idiot": 1 } },
            "options": {}
        });
        let classifier = NaiveBayes::import(Snapshot::from_value(value).unwrap()).unwrap();
        assert_eq!(classifier.vocabulary_size(), 2);
        assert_eq!(classifier.categorize("you idiot"), Some("abusive"));
        assert_eq!(classifier.categorize("hello there"), Some("normal"));
        assert_eq!(classifier.categories(), ["normal", "abusive"]);
    }

    #[test]
    fn legacy_category_object_keeps_registration_order_for_ties() {
        let json = r#"{
            "categories": { "zeta": true, "alpha": true },
            "docCount": { "zeta": 1, "alpha": 1 },
            "totalDocuments": 2,
            "vocabulary": { "same": true },
            "wordCount": { "zeta": 1, "alpha": 1 },
            "wordFrequencyCount": { "zeta": { "same": 1 }, "alpha": { "same": 1 } }
        }"#;
        let classifier = NaiveBayes::from_json(json).unwrap();
        assert_eq!(classifier.categories(), ["zeta", "alpha"]);
        assert_eq!(classifier.categorize("same"), Some("zeta"));

        let value: Value = serde_json::from_str(json).unwrap();
        let from_value = NaiveBayes::import(Snapshot::from_value(value).unwrap()).unwrap();
        assert_eq!(from_value.categories(), ["zeta", "alpha"]);
        assert_eq!(from_value.categorize("same"), Some("zeta"));
    }

    #[test]
    fn invalid_json_is_a_serialization_error() {
        assert!(matches!(
            Snapshot::from_json_str("{not json"),
            Err(NbcError::Serialization(_))
        ));
    }

    #[test]
    fn deserialize_applies_field_validation() {
        let err = serde_json::from_str::<Snapshot>(r#"{"categories": []}"#)
            .expect_err("partial snapshot must fail");
        assert!(err.to_string().contains("docCount"));
    }

    #[test]
    fn import_with_tokenizer_uses_custom_tokenizer() {
        let snapshot = trained().export();
        let tokenizer: SharedTokenizer = std::sync::Arc::new(|text: &str| {
            text.split('|').map(str::to_owned).collect::<Vec<_>>()
        });
        let mut classifier = NaiveBayes::import_with_tokenizer(snapshot, tokenizer).unwrap();
        classifier.learn("a b|c", "ham");
        assert!(classifier.contains_token("a b"));
    }

    #[test]
    fn save_and_load_round_trip_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("classifier.json");
        let original = trained();
        original.save(&path, true).unwrap();
        let restored = load_classifier(&path).unwrap();
        assert_eq!(restored.state(), original.state());
    }

    #[test]
    fn loading_missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match load_snapshot(&path) {
            Err(NbcError::Io { path: Some(reported), .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
