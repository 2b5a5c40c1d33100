use crate::error::{Result, SpamError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Training pipeline settings
///
/// The preprocessing part of this config travels with a trained model, since
/// inference text has to be turned into terms exactly the way training text was.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum number of training documents a term must appear in
    pub min_df: usize,
    /// Terms appearing in a larger share of training documents are dropped
    pub max_df_ratio: f64,
    /// Inclusive (min, max) n-gram sizes
    pub ngram_range: (usize, usize),
    /// Additive smoothing constant
    pub alpha: f64,
    /// Share of the dataset used for training
    pub split_ratio: f64,
    pub seed: u64,
    /// Extra stopwords, matched after lowercasing
    pub stopwords: BTreeSet<String>,
    /// Merge the built-in English stopword list into `stopwords`
    pub english_stopwords: bool,
    /// Tokens shorter than this (in chars) are discarded
    pub min_token_len: usize,
    /// Partition each class separately when splitting
    pub stratify: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_df: 1,
            max_df_ratio: 0.95,
            ngram_range: (1, 2),
            alpha: 1.0,
            split_ratio: 0.8,
            seed: 42,
            stopwords: BTreeSet::new(),
            english_stopwords: false,
            min_token_len: 2,
            stratify: true,
        }
    }
}

impl PipelineConfig {
    /// Check every setting, reporting the first malformed one
    pub fn validate(&self) -> Result<()> {
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(SpamError::validation(format!(
                "alpha must be a positive number, got {}",
                self.alpha
            )));
        }

        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 {
            return Err(SpamError::validation("ngram_range must start at 1 or above"));
        }
        if min_n > max_n {
            return Err(SpamError::validation(format!(
                "ngram_range min ({}) is greater than max ({})",
                min_n, max_n
            )));
        }

        if !(self.max_df_ratio > 0.0 && self.max_df_ratio <= 1.0) {
            return Err(SpamError::validation(format!(
                "max_df_ratio must be in (0, 1], got {}",
                self.max_df_ratio
            )));
        }

        if self.min_df == 0 {
            return Err(SpamError::validation("min_df must be at least 1"));
        }

        if self.min_token_len == 0 {
            return Err(SpamError::validation("min_token_len must be at least 1"));
        }

        Ok(())
    }
}

/// Where the labelled CSV dataset lives and how its columns are named
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub path: Option<String>,
    pub label_column: String,
    pub text_column: String,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: None,
            label_column: "Category".to_string(),
            text_column: "Message".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SpamError::Config(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| SpamError::Config(e.to_string()))?;
        config.pipeline.validate()?;

        Ok(config)
    }
}
