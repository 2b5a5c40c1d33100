//! Held-out scoring

use serde::Serialize;
use std::fmt;
use tracing::info;

use crate::classifier::Model;
use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamError};
use crate::text::{Preprocessor, Vectorizer, Vocabulary};

/// Confusion counts with Spam as the positive class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl EvaluationReport {
    /// Tally (actual, predicted) label pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Label, Label)>,
    {
        let mut report = Self::default();
        for (actual, predicted) in pairs {
            match (actual, predicted) {
                (Label::Spam, Label::Spam) => report.true_positives += 1,
                (Label::Ham, Label::Spam) => report.false_positives += 1,
                (Label::Ham, Label::Ham) => report.true_negatives += 1,
                (Label::Spam, Label::Ham) => report.false_negatives += 1,
            }
        }
        report
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }

    pub fn correct(&self) -> usize {
        self.true_positives + self.true_negatives
    }

    /// Share of correct predictions, 0 when nothing was scored
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy:  {:.4} ({}/{})", self.accuracy(), self.correct(), self.total())?;
        writeln!(f, "Precision: {:.4}", self.precision())?;
        writeln!(f, "Recall:    {:.4}", self.recall())?;
        writeln!(f, "F1:        {:.4}", self.f1())?;
        write!(
            f,
            "Confusion: TP={} FP={} TN={} FN={}",
            self.true_positives, self.false_positives, self.true_negatives, self.false_negatives
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Score `model` on labelled test documents
pub fn evaluate_report(
    model: &Model,
    vocabulary: &Vocabulary,
    preprocessor: &Preprocessor,
    test: &Dataset,
) -> Result<EvaluationReport> {
    if test.is_empty() {
        return Err(SpamError::data("cannot evaluate on an empty test set"));
    }

    let texts: Vec<&str> = test.iter().map(|d| d.text()).collect();
    let vectors = Vectorizer::new(vocabulary).transform_all(&preprocessor.preprocess_all(&texts));

    let mut pairs = Vec::with_capacity(test.len());
    for (document, vector) in test.iter().zip(&vectors) {
        pairs.push((document.label(), model.predict(vector)?));
    }

    let report = EvaluationReport::from_pairs(pairs);
    info!(
        "Evaluated {} held-out documents, accuracy {:.4}",
        report.total(),
        report.accuracy()
    );

    Ok(report)
}

/// Accuracy of `model` on labelled test documents, in [0, 1]
pub fn evaluate(
    model: &Model,
    vocabulary: &Vocabulary,
    preprocessor: &Preprocessor,
    test: &Dataset,
) -> Result<f64> {
    Ok(evaluate_report(model, vocabulary, preprocessor, test)?.accuracy())
}
