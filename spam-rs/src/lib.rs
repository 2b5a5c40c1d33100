//! spam-rs: Naive Bayes spam classifier for short messages
//!
//! Learns word-occurrence statistics from a labelled corpus and tells spam
//! from legitimate messages.
//!
//! # Pipeline
//!
//! - **Preprocessing**: lowercase, strip punctuation, drop stopwords, emit n-grams
//! - **Vocabulary**: document-frequency filtered, fit on the training split only
//! - **Vectorization**: sparse term counts over the fixed vocabulary
//! - **Classification**: multinomial Naive Bayes with additive smoothing
//! - **Evaluation**: deterministic seeded train/test split, held-out accuracy
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::config::PipelineConfig;
//! use spam_rs::dataset::DatasetLoader;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dataset = DatasetLoader::default().load("spam.csv")?;
//!     let classifier = spam_rs::train(&dataset, &PipelineConfig::default())?;
//!
//!     println!("Model accuracy: {:.2}", classifier.accuracy());
//!     println!("{}", classifier.predict("WINNER! Claim your free prize now")?);
//!
//!     classifier.save("model.json")?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`dataset`]: Labelled documents and CSV loading
//! - [`text`]: Preprocessing, vocabulary and vectorization
//! - [`classifier`]: Naive Bayes model and the persisted bundle
//! - [`evaluation`]: Train/test splitting and scoring

pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod pipeline;
pub mod text;

// Re-export commonly used types
pub use classifier::{Model, TrainedClassifier};
pub use config::{Config, PipelineConfig};
pub use dataset::{Dataset, Document, Label};
pub use error::{Result, SpamError};
pub use pipeline::{predict, train};
pub use text::Vocabulary;
