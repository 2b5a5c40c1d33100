//! Text feature extraction
//!
//! Preprocessing, vocabulary fitting and sparse count vectorization.

pub mod preprocess;
pub mod stopwords;
pub mod vectorizer;
pub mod vocabulary;

pub use preprocess::{preprocess, Preprocessor};
pub use vectorizer::{transform, FeatureVector, Vectorizer};
pub use vocabulary::{Vocabulary, VocabularyBuilder};
