//! Integration tests for saving and loading trained classifiers

use serde_json::Value;
use spam_rs::{train, Dataset, Document, PipelineConfig, SpamError, TrainedClassifier};
use std::path::Path;
use tempfile::TempDir;

fn trained() -> TrainedClassifier {
    let dataset = Dataset::new(vec![
        Document::ham("let's meet for lunch"),
        Document::ham("see you tomorrow"),
        Document::ham("thanks for the update"),
        Document::ham("call me when free"),
        Document::ham("running late, be there soon"),
        Document::spam("win free money now"),
        Document::spam("claim your prize now"),
        Document::spam("free cash winner click"),
        Document::spam("urgent: claim reward now"),
        Document::spam("you won a free cruise, call now"),
    ]);
    let config = PipelineConfig {
        english_stopwords: true,
        ..PipelineConfig::default()
    };
    train(&dataset, &config).unwrap()
}

fn rewrite(path: &Path, edit: impl FnOnce(&mut Value)) {
    let mut json: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    edit(&mut json);
    std::fs::write(path, serde_json::to_string(&json).unwrap()).unwrap();
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    let classifier = trained();

    classifier.save(&path).unwrap();
    let loaded = TrainedClassifier::load(&path).unwrap();

    assert_eq!(loaded.config(), classifier.config());
    assert_eq!(loaded.vocabulary(), classifier.vocabulary());
    assert_eq!(loaded.accuracy(), classifier.accuracy());

    for text in [
        "win a free prize now",
        "see you for lunch tomorrow",
        "URGENT!!! claim your cash",
        "",
    ] {
        assert_eq!(loaded.predict(text).unwrap(), classifier.predict(text).unwrap());
    }
}

#[test]
fn test_save_replaces_existing_file_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "stale").unwrap();

    trained().save(&path).unwrap();

    assert!(TrainedClassifier::load(&path).is_ok());
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_failed_save_removes_temporary_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    std::fs::create_dir(&path).unwrap();

    assert!(matches!(trained().save(&path), Err(SpamError::Io(_))));

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("model.json")]);
}

#[test]
fn test_load_rejects_tampered_priors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    trained().save(&path).unwrap();

    rewrite(&path, |json| {
        json["model"]["priors"] = serde_json::json!([0.7, 0.7]);
    });

    assert!(matches!(TrainedClassifier::load(&path), Err(SpamError::State(_))));
}

#[test]
fn test_load_rejects_vocabulary_mismatch() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    trained().save(&path).unwrap();

    rewrite(&path, |json| {
        json["vocabulary"].as_array_mut().unwrap().pop();
    });

    assert!(matches!(TrainedClassifier::load(&path), Err(SpamError::State(_))));
}

#[test]
fn test_load_rejects_unknown_format_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    trained().save(&path).unwrap();

    rewrite(&path, |json| {
        json["format_version"] = serde_json::json!(99);
    });

    assert!(matches!(TrainedClassifier::load(&path), Err(SpamError::State(_))));
}

#[test]
fn test_load_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("model.json");
    trained().save(&path).unwrap();

    rewrite(&path, |json| {
        json["config"]["alpha"] = serde_json::json!(-1.0);
    });

    assert!(matches!(
        TrainedClassifier::load(&path),
        Err(SpamError::Validation(_))
    ));
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();

    assert!(matches!(
        TrainedClassifier::load(dir.path().join("missing.json")),
        Err(SpamError::Io(_))
    ));
}

#[test]
fn test_into_parts() {
    let classifier = trained();
    let accuracy = classifier.accuracy();
    let fingerprint = classifier.vocabulary().fingerprint().to_string();

    let (model, vocabulary, acc) = classifier.into_parts();

    assert_eq!(acc, accuracy);
    assert_eq!(model.vocabulary_fingerprint(), fingerprint);
    assert_eq!(vocabulary.fingerprint(), fingerprint);
    assert_eq!(model.vocabulary_size(), vocabulary.len());
}
