//! One-shot training and single-message inference

use tracing::info;

use crate::classifier::{Model, NaiveBayesClassifier, TrainedClassifier};
use crate::config::PipelineConfig;
use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamError};
use crate::evaluation::{evaluate, split, stratified_split};
use crate::text::{Preprocessor, Vectorizer, Vocabulary, VocabularyBuilder};

/// Train a classifier and measure it on a held-out split
///
/// Duplicate (text, label) pairs are removed first. The vocabulary and the
/// model only ever see the training side of the split.
pub fn train(dataset: &Dataset, config: &PipelineConfig) -> Result<TrainedClassifier> {
    config.validate()?;

    let dataset = dataset.deduplicate();
    info!(
        "Training on {} unique messages ({} ham, {} spam)",
        dataset.len(),
        dataset.count(Label::Ham),
        dataset.count(Label::Spam)
    );

    for label in Label::ALL {
        if dataset.count(label) == 0 {
            return Err(SpamError::data(format!(
                "dataset contains no {:?} messages",
                label
            )));
        }
    }

    let split = if config.stratify {
        stratified_split(&dataset, config.split_ratio, config.seed)?
    } else {
        split(&dataset, config.split_ratio, config.seed)?
    };

    let preprocessor = Preprocessor::new(config)?;
    let texts: Vec<&str> = split.train.iter().map(|d| d.text()).collect();
    let train_terms = preprocessor.preprocess_all(&texts);

    let vocabulary = VocabularyBuilder::new(config.min_df, config.max_df_ratio).fit(&train_terms)?;

    let vectors = Vectorizer::new(&vocabulary).transform_all(&train_terms);
    let samples: Vec<_> = vectors
        .into_iter()
        .zip(split.train.iter().map(|d| d.label()))
        .collect();

    let model = NaiveBayesClassifier::new(config.alpha)?.fit(&samples, vocabulary.len())?;
    let accuracy = evaluate(&model, &vocabulary, &preprocessor, &split.test)?;

    info!("Model accuracy: {:.2}", accuracy);

    Ok(TrainedClassifier::new(
        config.clone(),
        preprocessor,
        vocabulary,
        model,
        accuracy,
    ))
}

/// Classify a single message
///
/// `preprocessor` must be the one the vocabulary was built with, normally
/// [`TrainedClassifier::preprocessor`]. Terms produced under other settings
/// silently miss the vocabulary.
pub fn predict(
    text: &str,
    model: &Model,
    vocabulary: &Vocabulary,
    preprocessor: &Preprocessor,
) -> Result<Label> {
    if model.vocabulary_fingerprint() != vocabulary.fingerprint() {
        return Err(SpamError::state("model was not fit against this vocabulary"));
    }

    let terms = preprocessor.preprocess(text);
    model.predict(&Vectorizer::new(vocabulary).transform(&terms))
}
