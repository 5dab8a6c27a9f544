//! K-fold cross-validation driver
//!
//! Partitions the dataset with a seeded shuffle, then drives batched
//! training and evaluation per fold, accumulating (actual, predicted)
//! records for the metrics aggregation.

use crate::core::types::{Matrix, PredictionRecord, TrainingContext, FEATURE_DIM};
use crate::core::{Result, SvmError};
use crate::data::codec::one_hot_block;
use crate::data::MinMaxScaler;
use crate::model::MulticlassSvm;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::ops::Range;

/// One train/test split of row indices
#[derive(Debug, Clone)]
pub struct Fold {
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Seeded k-fold splitter
///
/// Shuffles `0..n` once with `StdRng::seed_from_u64(seed)` and cuts the
/// shuffled order into `n_splits` contiguous groups; when `n` is not a
/// multiple of `n_splits`, the first `n % n_splits` folds take one extra
/// example.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    n_splits: usize,
    seed: u64,
}

impl KFold {
    /// # Panics
    /// Panics if `n_splits` is less than 2.
    pub fn new(n_splits: usize, seed: u64) -> Self {
        assert!(n_splits >= 2, "n_splits must be at least 2");
        Self { n_splits, seed }
    }

    /// Produce all folds; every index is held out exactly once
    pub fn split(&self, n_samples: usize) -> Vec<Fold> {
        let mut indices: Vec<usize> = (0..n_samples).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);
        indices.shuffle(&mut rng);

        let fold_size = n_samples / self.n_splits;
        let remainder = n_samples % self.n_splits;

        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for i in 0..self.n_splits {
            let end = start + fold_size + usize::from(i < remainder);
            let test_indices = indices[start..end].to_vec();
            let train_indices = indices[..start]
                .iter()
                .chain(indices[end..].iter())
                .copied()
                .collect();
            folds.push(Fold {
                train_indices,
                test_indices,
            });
            start = end;
        }
        folds
    }
}

/// Index ranges of the full batches over a partition of `len` examples
///
/// A batch is used only while its end lies strictly before `len`: the tail
/// batch is always dropped, whether partial or (when `len` is an exact
/// multiple of `batch_size`) full. This mirrors the original pipeline's
/// loop condition and must not be "fixed" silently.
pub fn full_batches(len: usize, batch_size: usize) -> Vec<Range<usize>> {
    let mut batches = Vec::new();
    let mut i = 0;
    while (i + 1) * batch_size < len {
        batches.push(i * batch_size..(i + 1) * batch_size);
        i += 1;
    }
    batches
}

/// Everything a cross-validation run accumulates
#[derive(Debug, Clone)]
pub struct CrossValidationOutcome {
    /// (actual, predicted) pair per evaluated example, in encounter order
    pub records: Vec<PredictionRecord>,
    /// Training loss after every gradient step, across all folds
    pub loss_trace: Vec<f64>,
    /// Accuracy of every evaluation batch
    pub batch_accuracies: Vec<f64>,
    /// The model as it stood after the last fold
    pub model: MulticlassSvm,
}

impl CrossValidationOutcome {
    /// Mean accuracy over all evaluation batches, 0.0 when none ran
    pub fn mean_batch_accuracy(&self) -> f64 {
        if self.batch_accuracies.is_empty() {
            0.0
        } else {
            self.batch_accuracies.iter().sum::<f64>() / self.batch_accuracies.len() as f64
        }
    }
}

/// Drives the fold loop: scaling, batched training, batched evaluation
pub struct CrossValidationDriver<'a> {
    ctx: &'a TrainingContext,
}

impl<'a> CrossValidationDriver<'a> {
    pub fn new(ctx: &'a TrainingContext) -> Self {
        Self { ctx }
    }

    /// Run the full k-fold loop over encoded labels
    ///
    /// `features` holds the raw (unscaled) vectors; scaling happens here so
    /// the per-fold-fit toggle has one home.
    pub fn run(
        &self,
        features: &Matrix,
        labels: &[usize],
        num_classes: usize,
    ) -> Result<CrossValidationOutcome> {
        self.validate_inputs(features, labels, num_classes)?;

        let config = &self.ctx.config;
        let folds = KFold::new(config.folds, config.seed).split(features.rows());

        for (fi, fold) in folds.iter().enumerate() {
            if full_batches(fold.train_indices.len(), config.batch_size).is_empty() {
                return Err(SvmError::Configuration(format!(
                    "batch size {} yields no full training batches for fold {} ({} training examples)",
                    config.batch_size,
                    fi,
                    fold.train_indices.len()
                )));
            }
        }

        // Default pipeline fits the scaler on the full dataset before
        // folding; the per-fold toggle trades that leakage for a fit on
        // each fold's training rows only.
        let prescaled = if config.scale_per_fold {
            None
        } else {
            Some(MinMaxScaler::fit_transform(features))
        };

        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut model = MulticlassSvm::new(num_classes, config.batch_size, &mut rng);

        let mut records = Vec::new();
        let mut loss_trace = Vec::new();
        let mut batch_accuracies = Vec::new();
        let mut last_finite_loss = 0.0;

        for (fi, fold) in folds.iter().enumerate() {
            let per_fold_scaled;
            let scaled: &Matrix = match prescaled.as_ref() {
                Some(m) => m,
                None => {
                    let scaler = MinMaxScaler::fit(&features.select_rows(&fold.train_indices));
                    per_fold_scaled = scaler.transform(features);
                    &per_fold_scaled
                }
            };

            if config.reset_per_fold && fi > 0 {
                model.reinitialize(&mut rng);
            }

            let train_batches = full_batches(fold.train_indices.len(), config.batch_size);
            let test_batches = full_batches(fold.test_indices.len(), config.batch_size);
            info!(
                "fold {}/{}: {} training batches, {} evaluation batches",
                fi + 1,
                config.folds,
                train_batches.len(),
                test_batches.len()
            );

            for (bi, range) in train_batches.into_iter().enumerate() {
                let batch_indices = &fold.train_indices[range];
                let batch = scaled.select_rows(batch_indices);
                let batch_labels: Vec<usize> =
                    batch_indices.iter().map(|&i| labels[i]).collect();
                let targets = one_hot_block(&batch_labels, num_classes);

                let kernel = self.ctx.kernel.self_kernel(&batch);
                let loss = model.train_step(config.learning_rate, &kernel, &targets);
                if !loss.is_finite() {
                    return Err(SvmError::NumericDivergence {
                        last_loss: last_finite_loss,
                    });
                }
                last_finite_loss = loss;
                loss_trace.push(loss);

                if (bi + 1) % 25 == 0 {
                    debug!("train step #{}: loss = {loss}", bi + 1);
                }
            }

            if test_batches.is_empty() {
                debug!(
                    "fold {}: test partition of {} examples is below the batch size, skipping evaluation",
                    fi + 1,
                    fold.test_indices.len()
                );
            }

            for range in test_batches {
                let batch_indices = &fold.test_indices[range];
                let batch = scaled.select_rows(batch_indices);
                let batch_labels: Vec<usize> =
                    batch_indices.iter().map(|&i| labels[i]).collect();
                let targets = one_hot_block(&batch_labels, num_classes);

                // The evaluation batch doubles as its own prediction grid.
                let query_kernel = self.ctx.kernel.cross_kernel(&batch, &batch);
                let predicted = model.compute_predictions(&targets, &query_kernel);

                let correct = predicted
                    .iter()
                    .zip(batch_labels.iter())
                    .filter(|(p, a)| p == a)
                    .count();
                batch_accuracies.push(correct as f64 / batch_labels.len() as f64);

                records.extend(
                    batch_labels
                        .iter()
                        .zip(predicted.iter())
                        .map(|(&actual, &predicted)| PredictionRecord::new(actual, predicted)),
                );
            }
        }

        info!(
            "cross-validation done: {} records, mean batch accuracy {:.4}",
            records.len(),
            if batch_accuracies.is_empty() {
                0.0
            } else {
                batch_accuracies.iter().sum::<f64>() / batch_accuracies.len() as f64
            }
        );

        Ok(CrossValidationOutcome {
            records,
            loss_trace,
            batch_accuracies,
            model,
        })
    }

    fn validate_inputs(
        &self,
        features: &Matrix,
        labels: &[usize],
        num_classes: usize,
    ) -> Result<()> {
        if features.rows() == 0 {
            return Err(SvmError::EmptyDataset);
        }
        if features.cols() != FEATURE_DIM {
            return Err(SvmError::DataShape(format!(
                "feature matrix has {} columns, expected {}",
                features.cols(),
                FEATURE_DIM
            )));
        }
        if labels.len() != features.rows() {
            return Err(SvmError::DataShape(format!(
                "label vector length {} does not match {} feature rows",
                labels.len(),
                features.rows()
            )));
        }
        if let Some(&bad) = labels.iter().find(|&&l| l >= num_classes) {
            return Err(SvmError::DataShape(format!(
                "class id {bad} out of range for {num_classes} classes"
            )));
        }
        Ok(())
    }
}
