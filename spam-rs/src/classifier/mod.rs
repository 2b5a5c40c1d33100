//! Spam classification
//!
//! Multinomial Naive Bayes over sparse term counts, plus the trained bundle
//! that keeps a model together with the vocabulary it was fit against.

pub mod bayes;
pub mod bundle;

pub use bayes::{Model, NaiveBayesClassifier};
pub use bundle::TrainedClassifier;
