//! Text normalization
//!
//! Turns raw message text into the ordered list of terms (unigrams and
//! n-grams) the rest of the pipeline counts.

use rayon::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use tracing::warn;

use super::stopwords;
use crate::config::PipelineConfig;
use crate::error::{Result, SpamError};

/// Text to term sequence converter
#[derive(Debug, Clone)]
pub struct Preprocessor {
    apostrophes: Regex,
    punctuation: Regex,
    stopwords: HashSet<String>,
    min_token_len: usize,
    ngram_range: (usize, usize),
}

impl Preprocessor {
    /// Build a preprocessor from the pipeline settings
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let (min_n, max_n) = config.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SpamError::validation(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        let apostrophes =
            Regex::new(r"['’]").map_err(|e| SpamError::validation(e.to_string()))?;
        let punctuation =
            Regex::new(r"[^\p{L}\p{N}\s]+").map_err(|e| SpamError::validation(e.to_string()))?;

        let mut pre = Self {
            apostrophes,
            punctuation,
            stopwords: HashSet::new(),
            min_token_len: config.min_token_len.max(1),
            ngram_range: config.ngram_range,
        };

        let mut stop = HashSet::new();
        for word in &config.stopwords {
            match pre.normalize(word).as_slice() {
                [token] => {
                    stop.insert(token.to_string());
                }
                [] => {}
                _ => warn!("Ignoring stopword '{}': it is not a single token", word),
            }
        }
        if config.english_stopwords {
            stop.extend(stopwords::english());
        }
        pre.stopwords = stop;

        Ok(pre)
    }

    /// Lowercase, join contractions and split on everything else
    fn normalize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let joined = self.apostrophes.replace_all(&lowered, "");
        let cleaned = self.punctuation.replace_all(&joined, " ");

        cleaned.split_whitespace().map(str::to_string).collect()
    }

    /// Lowercased, punctuation-free tokens with stopwords removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .into_iter()
            .filter(|t| t.chars().count() >= self.min_token_len)
            .filter(|t| !self.stopwords.contains(t))
            .collect()
    }

    /// Terms for one document: every n-gram size in range, smallest first
    pub fn preprocess(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n..=max_n {
            if n == 1 {
                terms.extend(tokens.iter().cloned());
            } else {
                terms.extend(tokens.windows(n).map(|w| w.join(" ")));
            }
        }

        terms
    }

    /// Preprocess many documents in parallel, preserving input order
    pub fn preprocess_all<S>(&self, texts: &[S]) -> Vec<Vec<String>>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|t| self.preprocess(t.as_ref())).collect()
    }
}

/// One-shot preprocessing of a single text
pub fn preprocess(text: &str, config: &PipelineConfig) -> Result<Vec<String>> {
    Ok(Preprocessor::new(config)?.preprocess(text))
}
