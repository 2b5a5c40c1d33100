//! Deterministic train/test partitioning

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::dataset::{Dataset, Label};
use crate::error::{Result, SpamError};

/// Train and held-out test partitions of one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
}

/// Random partition with `ratio` of the documents going to training
///
/// The partition depends only on the dataset, `ratio` and `seed`. Both sides
/// keep the dataset's original order and are never empty.
pub fn split(dataset: &Dataset, ratio: f64, seed: u64) -> Result<Split> {
    check_inputs(dataset, ratio)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..dataset.len()).collect();
    indices.shuffle(&mut rng);

    let n_train = train_size(indices.len(), ratio);
    let (train, test) = indices.split_at(n_train);

    Ok(assemble(dataset, train.to_vec(), test.to_vec()))
}

/// Like [`split`], but each class is partitioned on its own
///
/// Every class with at least two documents ends up on both sides. If that
/// still leaves the test side empty (each class has a single document) the
/// plain random partition is used instead.
pub fn stratified_split(dataset: &Dataset, ratio: f64, seed: u64) -> Result<Split> {
    check_inputs(dataset, ratio)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for label in Label::ALL {
        let mut indices: Vec<usize> = dataset
            .iter()
            .enumerate()
            .filter(|(_, d)| d.label() == label)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            continue;
        }
        indices.shuffle(&mut rng);

        let n_train = if indices.len() == 1 {
            1
        } else {
            train_size(indices.len(), ratio)
        };
        train.extend_from_slice(&indices[..n_train]);
        test.extend_from_slice(&indices[n_train..]);
    }

    if test.is_empty() {
        debug!("Stratified split left no test documents, using a plain split");
        return split(dataset, ratio, seed);
    }

    Ok(assemble(dataset, train, test))
}

fn check_inputs(dataset: &Dataset, ratio: f64) -> Result<()> {
    if !(ratio > 0.0 && ratio < 1.0) {
        return Err(SpamError::data(format!(
            "split ratio must be strictly between 0 and 1, got {}",
            ratio
        )));
    }
    if dataset.len() < 2 {
        return Err(SpamError::data(format!(
            "need at least 2 documents to split, got {}",
            dataset.len()
        )));
    }
    Ok(())
}

/// Rounded share of `n`, keeping at least one document on each side
fn train_size(n: usize, ratio: f64) -> usize {
    let n_train = (n as f64 * ratio).round() as usize;
    n_train.clamp(1, n - 1)
}

fn assemble(dataset: &Dataset, mut train: Vec<usize>, mut test: Vec<usize>) -> Split {
    train.sort_unstable();
    test.sort_unstable();

    let docs = dataset.documents();
    let split = Split {
        train: train.iter().map(|&i| docs[i].clone()).collect(),
        test: test.iter().map(|&i| docs[i].clone()).collect(),
    };

    debug!(
        "Split {} documents into {} train / {} test",
        dataset.len(),
        split.train.len(),
        split.test.len()
    );
    split
}
