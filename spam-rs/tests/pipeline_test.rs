//! End-to-end tests for training, prediction and evaluation

use spam_rs::classifier::NaiveBayesClassifier;
use spam_rs::evaluation::{evaluate, split, stratified_split};
use spam_rs::text::{Preprocessor, Vectorizer};
use spam_rs::{predict, train, Dataset, Document, Label, PipelineConfig, SpamError};
use std::collections::HashSet;

fn scenario_dataset() -> Dataset {
    Dataset::new(vec![
        Document::ham("let's meet for lunch"),
        Document::ham("see you tomorrow"),
        Document::ham("thanks for the update"),
        Document::ham("call me when free"),
        Document::spam("win free money now"),
        Document::spam("claim your prize now"),
        Document::spam("free cash winner click"),
        Document::spam("urgent: claim reward now"),
    ])
}

fn scenario_config() -> PipelineConfig {
    PipelineConfig {
        alpha: 1.0,
        split_ratio: 0.5,
        seed: 42,
        ..PipelineConfig::default()
    }
}

fn larger_dataset() -> Dataset {
    let ham = [
        "are we still on for dinner tonight",
        "can you send me the report before the meeting",
        "happy birthday hope you have a great day",
        "running late be there in ten minutes",
        "did you finish the homework for tomorrow",
        "mum says dinner is ready come home",
        "thanks for picking up the kids today",
        "the meeting moved to room four",
        "see you at the gym later",
        "please call me back when you get this",
        "lunch at the usual place tomorrow",
        "i left my keys at your place",
    ];
    let spam = [
        "congratulations you won a free cruise call now",
        "claim your cash prize today text win to 80086",
        "urgent your account has been selected for a reward",
        "free entry to win a brand new phone reply now",
        "you have won a guaranteed cash award claim now",
        "exclusive offer get free ringtones text stop to end",
        "winner you have been selected for a free holiday",
        "final notice claim your free gift card today",
        "cheap loans approved instantly call free now",
        "your mobile number has won a prize claim today",
        "win a free laptop text win now",
        "urgent prize waiting call now to claim",
    ];

    ham.iter()
        .map(|t| Document::ham(*t))
        .chain(spam.iter().map(|t| Document::spam(*t)))
        .collect()
}

#[test]
fn test_scenario_predictions() {
    let classifier = train(&scenario_dataset(), &scenario_config()).unwrap();

    assert_eq!(classifier.predict("win free prize now").unwrap(), Label::Spam);
    assert_eq!(classifier.predict("let's grab lunch tomorrow").unwrap(), Label::Ham);
}

#[test]
fn test_scenario_predictions_hold_for_any_seed() {
    for seed in 0..25 {
        let config = PipelineConfig {
            seed,
            ..scenario_config()
        };
        let classifier = train(&scenario_dataset(), &config).unwrap();

        assert_eq!(classifier.predict("win free prize now").unwrap(), Label::Spam);
        assert_eq!(classifier.predict("let's grab lunch tomorrow").unwrap(), Label::Ham);
    }
}

#[test]
fn test_single_class_dataset_is_data_error() {
    let dataset = Dataset::new(vec![
        Document::ham("see you tomorrow"),
        Document::ham("thanks for the update"),
        Document::ham("call me when free"),
    ]);

    let result = train(&dataset, &PipelineConfig::default());
    assert!(matches!(result, Err(SpamError::Data(_))));
}

#[test]
fn test_split_with_invalid_ratio_is_data_error() {
    let result = split(&scenario_dataset(), 1.5, 1);
    assert!(matches!(result, Err(SpamError::Data(_))));
}

#[test]
fn test_model_with_foreign_vocabulary_is_state_error() {
    let first = train(&scenario_dataset(), &scenario_config()).unwrap();
    let second = train(&larger_dataset(), &PipelineConfig::default()).unwrap();

    let foreign = second.vectorize("win free prize now");
    assert!(matches!(first.model().predict(&foreign), Err(SpamError::State(_))));

    let result = predict(
        "win free prize now",
        first.model(),
        second.vocabulary(),
        first.preprocessor(),
    );
    assert!(matches!(result, Err(SpamError::State(_))));
}

#[test]
fn test_free_predict_matches_bundle() {
    let classifier = train(&larger_dataset(), &PipelineConfig::default()).unwrap();

    for text in ["claim your free prize now", "see you at dinner", ""] {
        let direct = predict(
            text,
            classifier.model(),
            classifier.vocabulary(),
            classifier.preprocessor(),
        )
        .unwrap();
        assert_eq!(direct, classifier.predict(text).unwrap());
    }
}

#[test]
fn test_training_is_deterministic() {
    let dataset = larger_dataset();
    let config = PipelineConfig::default();

    let first = train(&dataset, &config).unwrap();
    let second = train(&dataset, &config).unwrap();

    assert_eq!(first.accuracy(), second.accuracy());
    assert_eq!(first.vocabulary().terms(), second.vocabulary().terms());
    assert_eq!(first.model(), second.model());
}

#[test]
fn test_accuracy_is_in_unit_interval() {
    let classifier = train(&larger_dataset(), &PipelineConfig::default()).unwrap();

    assert!((0.0..=1.0).contains(&classifier.accuracy()));
}

#[test]
fn test_vocabulary_only_sees_training_split() {
    let dataset = larger_dataset();
    let config = PipelineConfig::default();
    let classifier = train(&dataset, &config).unwrap();

    let split = stratified_split(&dataset.deduplicate(), config.split_ratio, config.seed).unwrap();
    let pre = Preprocessor::new(&config).unwrap();
    let train_terms: HashSet<String> = split
        .train
        .iter()
        .flat_map(|d| pre.preprocess(d.text()))
        .collect();
    let test_only: Vec<String> = split
        .test
        .iter()
        .flat_map(|d| pre.preprocess(d.text()))
        .filter(|t| !train_terms.contains(t))
        .collect();

    assert!(!test_only.is_empty());
    for term in &test_only {
        assert!(!classifier.vocabulary().contains(term), "leaked term {}", term);
    }
}

#[test]
fn test_reported_accuracy_matches_held_out_evaluation() {
    let dataset = larger_dataset();
    let config = PipelineConfig::default();
    let classifier = train(&dataset, &config).unwrap();

    let split = stratified_split(&dataset.deduplicate(), config.split_ratio, config.seed).unwrap();
    let accuracy = evaluate(
        classifier.model(),
        classifier.vocabulary(),
        classifier.preprocessor(),
        &split.test,
    )
    .unwrap();

    assert_eq!(accuracy, classifier.accuracy());
}

#[test]
fn test_duplicates_do_not_change_training() {
    let dataset = larger_dataset();
    let mut with_duplicates = dataset.clone();
    for document in dataset.iter().take(5) {
        with_duplicates.push(document.clone());
    }

    let config = PipelineConfig::default();
    let clean = train(&dataset, &config).unwrap();
    let noisy = train(&with_duplicates, &config).unwrap();

    assert_eq!(clean.model(), noisy.model());
    assert_eq!(clean.accuracy(), noisy.accuracy());
}

#[test]
fn test_priors_and_likelihoods_are_sane() {
    let classifier = train(&larger_dataset(), &PipelineConfig::default()).unwrap();
    let model = classifier.model();

    assert!((model.prior(Label::Ham) + model.prior(Label::Spam) - 1.0).abs() < 1e-12);
    for id in 0..classifier.vocabulary().len() {
        for label in Label::ALL {
            assert!(model.log_likelihood(id, label).unwrap().is_finite());
        }
    }
}

#[test]
fn test_invalid_config_is_validation_error() {
    let config = PipelineConfig {
        alpha: 0.0,
        ..PipelineConfig::default()
    };
    assert!(matches!(
        train(&larger_dataset(), &config),
        Err(SpamError::Validation(_))
    ));

    let config = PipelineConfig {
        ngram_range: (2, 1),
        ..PipelineConfig::default()
    };
    assert!(matches!(
        train(&larger_dataset(), &config),
        Err(SpamError::Validation(_))
    ));
}

#[test]
fn test_refit_produces_independent_models() {
    let classifier = train(&larger_dataset(), &PipelineConfig::default()).unwrap();
    let snapshot = classifier.model().clone();

    // Fit a second model on the same vectors with a different alpha
    let pre = classifier.preprocessor();
    let vectorizer = Vectorizer::new(classifier.vocabulary());
    let samples: Vec<_> = larger_dataset()
        .iter()
        .map(|d| (vectorizer.transform(&pre.preprocess(d.text())), d.label()))
        .collect();
    let other = NaiveBayesClassifier::new(0.1)
        .unwrap()
        .fit(&samples, classifier.vocabulary().len())
        .unwrap();

    assert_ne!(&other, classifier.model());
    assert_eq!(classifier.model(), &snapshot);
}

#[test]
fn test_larger_dataset_classifies_obvious_messages() {
    let classifier = train(&larger_dataset(), &PipelineConfig::default()).unwrap();

    assert_eq!(
        classifier.predict("claim your free cash prize now").unwrap(),
        Label::Spam
    );
    assert_eq!(
        classifier.predict("are we still meeting for dinner tonight").unwrap(),
        Label::Ham
    );
}
