//! Labelled message datasets
//!
//! Provides the document types and a CSV loader with explicit schema and
//! label mapping.

pub mod loader;
pub mod types;

pub use loader::{DatasetLoader, DatasetSchema, LabelMapping};
pub use types::*;
