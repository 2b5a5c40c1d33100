//! Multinomial Naive Bayes
//!
//! [`NaiveBayesClassifier`] only holds hyper-parameters. Fitting produces a
//! fresh, read-only [`Model`]; nothing ever updates a model in place, so a
//! model keeps behaving the same no matter how many fits happen afterwards.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::Label;
use crate::error::{Result, SpamError};
use crate::text::{FeatureVector, Vocabulary};

const PRIOR_TOLERANCE: f64 = 1e-9;

/// Fitted class priors and smoothed per-term log likelihoods
///
/// Deserializing a model runs the same parameter checks as loading a bundle,
/// so a `Model` value always holds a usable distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModel", into = "RawModel")]
pub struct Model {
    /// P(class), indexed by [`Label::index`]
    priors: [f64; 2],
    /// ln P(term | class) for every term id, indexed by [`Label::index`]
    log_likelihood: Vec<[f64; 2]>,
    alpha: f64,
    vocabulary_size: usize,
    vocabulary: String,
}

impl Model {
    pub fn prior(&self, label: Label) -> f64 {
        self.priors[label.index()]
    }

    /// ln P(term | class), `None` for ids outside the vocabulary
    pub fn log_likelihood(&self, id: usize, label: Label) -> Option<f64> {
        self.log_likelihood.get(id).map(|row| row[label.index()])
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }

    /// Fingerprint of the vocabulary this model was fit against
    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary
    }

    /// Unnormalised log posterior of each class
    pub fn joint_log_likelihood(&self, vector: &FeatureVector) -> Result<[f64; 2]> {
        if vector.vocabulary_fingerprint() != self.vocabulary {
            return Err(SpamError::state(
                "feature vector was built against a different vocabulary than the model",
            ));
        }

        let mut scores = self.priors.map(f64::ln);
        for (id, count) in vector.iter() {
            let row = self.log_likelihood.get(id).ok_or_else(|| {
                SpamError::state(format!(
                    "term id {} is outside the model vocabulary ({} terms)",
                    id, self.vocabulary_size
                ))
            })?;
            let count = f64::from(count);
            scores[0] += count * row[0];
            scores[1] += count * row[1];
        }

        Ok(scores)
    }

    /// Most probable class; ties go to Ham
    pub fn predict(&self, vector: &FeatureVector) -> Result<Label> {
        let [ham, spam] = self.joint_log_likelihood(vector)?;
        Ok(if spam > ham { Label::Spam } else { Label::Ham })
    }

    /// Posterior probability of Spam
    pub fn predict_proba(&self, vector: &FeatureVector) -> Result<f64> {
        let [ham, spam] = self.joint_log_likelihood(vector)?;
        let max = ham.max(spam);
        let ham = (ham - max).exp();
        let spam = (spam - max).exp();
        Ok(spam / (ham + spam))
    }

    /// Check a model that did not come straight out of `fit`
    pub(crate) fn validate(&self, vocabulary: &Vocabulary) -> Result<()> {
        if self.vocabulary != vocabulary.fingerprint() {
            return Err(SpamError::state("model does not belong to this vocabulary"));
        }
        if self.vocabulary_size != vocabulary.len() {
            return Err(SpamError::state(format!(
                "model covers {} terms but the vocabulary has {}",
                self.vocabulary_size,
                vocabulary.len()
            )));
        }

        self.check_parameters()
    }

    fn check_parameters(&self) -> Result<()> {
        if self.vocabulary_size == 0 || self.log_likelihood.len() != self.vocabulary_size {
            return Err(SpamError::state(format!(
                "model holds {} likelihood rows for {} terms",
                self.log_likelihood.len(),
                self.vocabulary_size
            )));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamError::state("model smoothing constant is not positive"));
        }
        if self.priors.iter().any(|p| !(p.is_finite() && *p > 0.0))
            || (self.priors[0] + self.priors[1] - 1.0).abs() > PRIOR_TOLERANCE
        {
            return Err(SpamError::state("model class priors are not a distribution"));
        }
        if self
            .log_likelihood
            .iter()
            .flatten()
            .any(|l| !(l.is_finite() && *l <= 0.0))
        {
            return Err(SpamError::state("model holds an invalid log likelihood"));
        }

        Ok(())
    }
}

/// Unchecked serialized form of [`Model`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RawModel {
    priors: [f64; 2],
    log_likelihood: Vec<[f64; 2]>,
    alpha: f64,
    vocabulary_size: usize,
    vocabulary: String,
}

impl TryFrom<RawModel> for Model {
    type Error = SpamError;

    fn try_from(raw: RawModel) -> Result<Self> {
        let model = Model {
            priors: raw.priors,
            log_likelihood: raw.log_likelihood,
            alpha: raw.alpha,
            vocabulary_size: raw.vocabulary_size,
            vocabulary: raw.vocabulary,
        };
        model.check_parameters()?;
        Ok(model)
    }
}

impl From<Model> for RawModel {
    fn from(model: Model) -> Self {
        Self {
            priors: model.priors,
            log_likelihood: model.log_likelihood,
            alpha: model.alpha,
            vocabulary_size: model.vocabulary_size,
            vocabulary: model.vocabulary,
        }
    }
}

/// Additively smoothed multinomial Naive Bayes trainer
#[derive(Debug, Clone)]
pub struct NaiveBayesClassifier {
    alpha: f64,
}

impl NaiveBayesClassifier {
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(SpamError::validation(format!(
                "alpha must be a positive number, got {}",
                alpha
            )));
        }
        Ok(Self { alpha })
    }

    /// Fit priors and likelihoods on labelled vectors
    ///
    /// All vectors must come from the same vocabulary of `vocabulary_size`
    /// terms, and both classes must be present.
    pub fn fit(&self, samples: &[(FeatureVector, Label)], vocabulary_size: usize) -> Result<Model> {
        let Some((first, _)) = samples.first() else {
            return Err(SpamError::data("cannot fit a model on zero documents"));
        };
        if vocabulary_size == 0 {
            return Err(SpamError::data("cannot fit a model on an empty vocabulary"));
        }
        let vocabulary = first.vocabulary_fingerprint().to_string();

        let mut doc_counts = [0usize; 2];
        let mut term_counts = vec![[0.0f64; 2]; vocabulary_size];
        let mut class_totals = [0.0f64; 2];

        for (vector, label) in samples {
            if vector.vocabulary_fingerprint() != vocabulary {
                return Err(SpamError::state(
                    "training vectors were built against different vocabularies",
                ));
            }

            let c = label.index();
            doc_counts[c] += 1;
            for (id, count) in vector.iter() {
                let row = term_counts.get_mut(id).ok_or_else(|| {
                    SpamError::state(format!(
                        "term id {} is outside a vocabulary of {} terms",
                        id, vocabulary_size
                    ))
                })?;
                row[c] += f64::from(count);
                class_totals[c] += f64::from(count);
            }
        }

        for label in Label::ALL {
            if doc_counts[label.index()] == 0 {
                return Err(SpamError::data(format!(
                    "training data has no {:?} documents",
                    label
                )));
            }
        }

        let total_docs = samples.len() as f64;
        let priors = doc_counts.map(|n| n as f64 / total_docs);

        let v = vocabulary_size as f64;
        let denominators = class_totals.map(|total| self.alpha * v + total);
        let log_likelihood = term_counts
            .iter()
            .map(|row| {
                [
                    ((self.alpha + row[0]) / denominators[0]).ln(),
                    ((self.alpha + row[1]) / denominators[1]).ln(),
                ]
            })
            .collect();

        debug!(
            "Class term totals: ham={}, spam={}",
            class_totals[0], class_totals[1]
        );
        info!(
            "Fitted Naive Bayes on {} documents ({} ham, {} spam), alpha={}",
            samples.len(),
            doc_counts[0],
            doc_counts[1],
            self.alpha
        );

        Ok(Model {
            priors,
            log_likelihood,
            alpha: self.alpha,
            vocabulary_size,
            vocabulary,
        })
    }

    /// Classify one vector with a fitted model
    pub fn predict(&self, vector: &FeatureVector, model: &Model) -> Result<Label> {
        model.predict(vector)
    }
}

impl Default for NaiveBayesClassifier {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}
