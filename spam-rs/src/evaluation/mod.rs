//! Held-out evaluation
//!
//! Deterministic train/test splitting and accuracy scoring.

pub mod metrics;
pub mod split;

pub use metrics::{evaluate, evaluate_report, EvaluationReport};
pub use split::{split, stratified_split, Split};
