//! Trained classifier bundle and its on-disk format
//!
//! A model is meaningless without the exact vocabulary (and preprocessing
//! settings) it was fit with, so the three are stored and loaded together as
//! one JSON document.

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::bayes::{Model, RawModel};
use crate::config::PipelineConfig;
use crate::dataset::Label;
use crate::error::{Result, SpamError};
use crate::text::{FeatureVector, Preprocessor, Vectorizer, Vocabulary};

const FORMAT_VERSION: u32 = 1;

/// Fitted model together with the vocabulary and settings it depends on
#[derive(Debug, Clone)]
pub struct TrainedClassifier {
    config: PipelineConfig,
    preprocessor: Preprocessor,
    vocabulary: Vocabulary,
    model: Model,
    accuracy: f64,
}

#[derive(Serialize, Deserialize)]
struct BundleFile {
    format_version: u32,
    config: PipelineConfig,
    vocabulary: Vocabulary,
    model: RawModel,
    accuracy: f64,
}

impl TrainedClassifier {
    pub(crate) fn new(
        config: PipelineConfig,
        preprocessor: Preprocessor,
        vocabulary: Vocabulary,
        model: Model,
        accuracy: f64,
    ) -> Self {
        Self {
            config,
            preprocessor,
            vocabulary,
            model,
            accuracy,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn preprocessor(&self) -> &Preprocessor {
        &self.preprocessor
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Held-out accuracy measured at training time
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    pub fn into_parts(self) -> (Model, Vocabulary, f64) {
        (self.model, self.vocabulary, self.accuracy)
    }

    /// Feature vector of arbitrary text against this bundle's vocabulary
    pub fn vectorize(&self, text: &str) -> FeatureVector {
        Vectorizer::new(&self.vocabulary).transform(&self.preprocessor.preprocess(text))
    }

    pub fn predict(&self, text: &str) -> Result<Label> {
        self.model.predict(&self.vectorize(text))
    }

    /// Posterior probability that `text` is spam
    pub fn spam_probability(&self, text: &str) -> Result<f64> {
        self.model.predict_proba(&self.vectorize(text))
    }

    /// Write the bundle as JSON, replacing any existing file in one step
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let tmp = tmp_path(path);

        let bundle = BundleFile {
            format_version: FORMAT_VERSION,
            config: self.config.clone(),
            vocabulary: self.vocabulary.clone(),
            model: RawModel::from(self.model.clone()),
            accuracy: self.accuracy,
        };

        let written = write_bundle(&tmp, &bundle)
            .and_then(|()| fs::rename(&tmp, path).map_err(SpamError::from));
        if let Err(e) = written {
            match fs::remove_file(&tmp) {
                Err(cleanup) if cleanup.kind() != std::io::ErrorKind::NotFound => {
                    warn!("Failed to remove {}: {}", tmp.display(), cleanup);
                }
                _ => {}
            }
            return Err(e);
        }

        info!(
            "Saved classifier ({} terms) to {}",
            self.vocabulary.len(),
            path.display()
        );
        Ok(())
    }

    /// Read a bundle written by [`TrainedClassifier::save`]
    ///
    /// The model is checked against the stored vocabulary before use; any
    /// inconsistency is a state error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let bundle: BundleFile = serde_json::from_reader(BufReader::new(file))?;

        if bundle.format_version != FORMAT_VERSION {
            return Err(SpamError::state(format!(
                "unsupported model format version {} (expected {})",
                bundle.format_version, FORMAT_VERSION
            )));
        }
        bundle.config.validate()?;
        let model = Model::try_from(bundle.model)?;
        model.validate(&bundle.vocabulary)?;
        if !(0.0..=1.0).contains(&bundle.accuracy) {
            return Err(SpamError::state(format!(
                "stored accuracy {} is outside [0, 1]",
                bundle.accuracy
            )));
        }

        let preprocessor = Preprocessor::new(&bundle.config)?;
        info!(
            "Loaded classifier ({} terms) from {}",
            bundle.vocabulary.len(),
            path.display()
        );

        Ok(Self::new(
            bundle.config,
            preprocessor,
            bundle.vocabulary,
            model,
            bundle.accuracy,
        ))
    }
}

fn write_bundle(path: &Path, bundle: &BundleFile) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, bundle)?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
