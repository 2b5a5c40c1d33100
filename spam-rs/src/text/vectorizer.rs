//! Sparse bag-of-words vectors

use rayon::prelude::*;
use std::collections::BTreeMap;

use super::vocabulary::Vocabulary;

/// Term counts of one document over a fixed vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    counts: BTreeMap<usize, u32>,
    vocabulary: String,
}

impl FeatureVector {
    /// Count of term `id` (zero when absent)
    pub fn get(&self, id: usize) -> u32 {
        self.counts.get(&id).copied().unwrap_or(0)
    }

    /// Non-zero (id, count) pairs in ascending id order
    pub fn iter(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }

    /// Number of distinct in-vocabulary terms
    pub fn nnz(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    /// Fingerprint of the vocabulary this vector was built against
    pub fn vocabulary_fingerprint(&self) -> &str {
        &self.vocabulary
    }
}

/// Maps term sequences onto a vocabulary
///
/// Read-only over the vocabulary: unknown terms are dropped, never added.
#[derive(Debug, Clone, Copy)]
pub struct Vectorizer<'a> {
    vocabulary: &'a Vocabulary,
}

impl<'a> Vectorizer<'a> {
    pub fn new(vocabulary: &'a Vocabulary) -> Self {
        Self { vocabulary }
    }

    pub fn transform<S: AsRef<str>>(&self, terms: &[S]) -> FeatureVector {
        let mut counts = BTreeMap::new();
        for term in terms {
            if let Some(id) = self.vocabulary.id(term.as_ref()) {
                *counts.entry(id).or_insert(0u32) += 1;
            }
        }

        FeatureVector {
            counts,
            vocabulary: self.vocabulary.fingerprint().to_string(),
        }
    }

    /// Vectorize many documents in parallel, preserving input order
    pub fn transform_all(&self, documents: &[Vec<String>]) -> Vec<FeatureVector> {
        documents.par_iter().map(|terms| self.transform(terms)).collect()
    }
}

/// Vectorize one term sequence against `vocabulary`
pub fn transform<S: AsRef<str>>(terms: &[S], vocabulary: &Vocabulary) -> FeatureVector {
    Vectorizer::new(vocabulary).transform(terms)
}
