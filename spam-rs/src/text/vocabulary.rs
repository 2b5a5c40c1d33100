//! Vocabulary construction
//!
//! A [`Vocabulary`] is the fixed term to id table every feature vector and
//! model is expressed against. It is built once from the training documents
//! and never grows afterwards.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::error::{Result, SpamError};

/// Ordered term to id mapping
///
/// Ids follow lexicographic term order, so the same surviving terms always
/// get the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    fingerprint: String,
}

impl Vocabulary {
    /// Build from a strictly increasing term list
    fn from_sorted(terms: Vec<String>) -> Result<Self> {
        if terms.is_empty() {
            return Err(SpamError::data("vocabulary is empty"));
        }
        if terms.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SpamError::state("vocabulary terms are not sorted and unique"));
        }

        let index = terms
            .iter()
            .enumerate()
            .map(|(id, term)| (term.clone(), id))
            .collect();
        let fingerprint = Self::compute_fingerprint(&terms);

        Ok(Self {
            terms,
            index,
            fingerprint,
        })
    }

    fn compute_fingerprint(terms: &[String]) -> String {
        let mut hasher = Sha256::new();
        for term in terms {
            hasher.update((term.len() as u64).to_le_bytes());
            hasher.update(term.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Id of `term`, if it survived filtering
    pub fn id(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn term(&self, id: usize) -> Option<&str> {
        self.terms.get(id).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.index.contains_key(term)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// SHA-256 over the ordered term list, hex encoded
    ///
    /// Feature vectors and models carry this value so that mixing artefacts
    /// from different vocabularies is detected.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = SpamError;

    fn try_from(terms: Vec<String>) -> Result<Self> {
        Self::from_sorted(terms)
    }
}

impl From<Vocabulary> for Vec<String> {
    fn from(vocabulary: Vocabulary) -> Self {
        vocabulary.terms
    }
}

/// Document-frequency filtered vocabulary builder
#[derive(Debug, Clone)]
pub struct VocabularyBuilder {
    min_df: usize,
    max_df_ratio: f64,
}

impl VocabularyBuilder {
    pub fn new(min_df: usize, max_df_ratio: f64) -> Self {
        Self {
            min_df,
            max_df_ratio,
        }
    }

    /// Fit a vocabulary on training term sequences
    ///
    /// Terms found in fewer than `min_df` documents, or in more than
    /// `max_df_ratio` of all documents, are left out.
    pub fn fit(&self, documents: &[Vec<String>]) -> Result<Vocabulary> {
        if documents.is_empty() {
            return Err(SpamError::data("cannot build a vocabulary from zero documents"));
        }

        let df = document_frequencies(documents);
        let n_docs = documents.len() as f64;

        let mut terms: Vec<String> = df
            .iter()
            .filter(|(_, count)| **count >= self.min_df)
            .filter(|(_, count)| **count as f64 / n_docs <= self.max_df_ratio)
            .map(|(term, _)| (*term).to_string())
            .collect();
        terms.sort_unstable();

        debug!(
            "Document frequency pruning kept {} of {} distinct terms",
            terms.len(),
            df.len()
        );

        if terms.is_empty() {
            return Err(SpamError::data(format!(
                "no terms left after pruning (min_df={}, max_df_ratio={})",
                self.min_df, self.max_df_ratio
            )));
        }

        let vocabulary = Vocabulary::from_sorted(terms)?;
        info!(
            "Built vocabulary of {} terms from {} documents",
            vocabulary.len(),
            documents.len()
        );

        Ok(vocabulary)
    }
}

impl Default for VocabularyBuilder {
    fn default() -> Self {
        Self::new(1, 0.95)
    }
}

/// Number of documents each term occurs in
///
/// Each worker counts its own share of documents; the partial tables are then
/// merged pairwise.
fn document_frequencies(documents: &[Vec<String>]) -> HashMap<&str, usize> {
    documents
        .par_iter()
        .fold(HashMap::new, |mut acc: HashMap<&str, usize>, terms| {
            let unique: HashSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *acc.entry(term).or_insert(0) += 1;
            }
            acc
        })
        .reduce(HashMap::new, |mut merged, partial| {
            for (term, count) in partial {
                *merged.entry(term).or_insert(0) += count;
            }
            merged
        })
}
