//! Core type definitions for the training engine

use crate::core::error::{Result, SvmError};
use crate::kernel::RbfKernel;

/// Number of embedding components per protein sequence.
pub const FEATURE_DIM: usize = 100;

/// Dense row-major matrix of f64 values
///
/// The only linear-algebra surface the engine needs: row access, row
/// selection and elementwise reads. Heavier operations (kernel matrices,
/// gradient accumulation) live with their consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a matrix from row vectors
    ///
    /// All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(SvmError::DataShape(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    n_cols
                )));
            }
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Value at (row, col)
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col]
    }

    /// Set the value at (row, col)
    ///
    /// # Panics
    /// Panics if the position is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "index out of bounds");
        self.data[row * self.cols + col] = value;
    }

    /// Borrow a single row as a slice
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// New matrix containing the given rows, in the given order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(self.row(i));
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Sum of all entries
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Flat row-major view of the data
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat row-major view of the data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Accumulated (actual, predicted) class-id pair for one evaluated example
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionRecord {
    pub actual: usize,
    pub predicted: usize,
}

impl PredictionRecord {
    pub fn new(actual: usize, predicted: usize) -> Self {
        Self { actual, predicted }
    }

    /// Whether the prediction matched the actual class
    pub fn is_correct(&self) -> bool {
        self.actual == self.predicted
    }
}

/// Configuration for a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingConfig {
    /// Kernel width constant, must be negative
    pub gamma: f64,
    /// Fixed batch width, also the width of the dual-coefficient matrix
    pub batch_size: usize,
    /// Gradient-descent step size
    pub learning_rate: f64,
    /// Number of cross-validation folds
    pub folds: usize,
    /// Seed for the fold shuffle and coefficient initialization
    pub seed: u64,
    /// Re-draw the dual coefficients at the start of every fold
    pub reset_per_fold: bool,
    /// Fit the min-max scaler on each fold's training rows instead of the
    /// full dataset
    pub scale_per_fold: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            gamma: -10.0,
            batch_size: 250,
            learning_rate: 0.01,
            folds: 10,
            seed: 7,
            reset_per_fold: true,
            scale_per_fold: false,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kernel gamma constant
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the gradient-descent learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the number of folds
    pub fn with_folds(mut self, folds: usize) -> Self {
        self.folds = folds;
        self
    }

    /// Set the shuffle/init seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Control per-fold coefficient reinitialization
    pub fn with_reset_per_fold(mut self, reset: bool) -> Self {
        self.reset_per_fold = reset;
        self
    }

    /// Control per-fold scaler fitting
    pub fn with_scale_per_fold(mut self, per_fold: bool) -> Self {
        self.scale_per_fold = per_fold;
        self
    }

    /// Configuration string used to name run artifacts, e.g. the report
    /// file `{model_string}_results.txt`
    pub fn model_string(&self) -> String {
        format!(
            "rbf_g{}_b{}_lr{}_k{}_s{}",
            self.gamma, self.batch_size, self.learning_rate, self.folds, self.seed
        )
    }

    /// Validate scalar knobs
    pub fn validate(&self) -> Result<()> {
        if self.gamma >= 0.0 {
            return Err(SvmError::InvalidParameter(format!(
                "gamma must be negative, got {}",
                self.gamma
            )));
        }
        if self.batch_size == 0 {
            return Err(SvmError::InvalidParameter(
                "batch size must be at least 1".to_string(),
            ));
        }
        if self.learning_rate <= 0.0 {
            return Err(SvmError::InvalidParameter(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.folds < 2 {
            return Err(SvmError::InvalidParameter(format!(
                "fold count must be at least 2, got {}",
                self.folds
            )));
        }
        Ok(())
    }
}

/// Validated bundle of configuration and kernel, owned by the driver and
/// passed by reference into kernel and model calls
#[derive(Debug, Clone)]
pub struct TrainingContext {
    pub config: TrainingConfig,
    pub kernel: RbfKernel,
}

impl TrainingContext {
    /// Validate the configuration and build the kernel from it
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let kernel = RbfKernel::new(config.gamma)?;
        Ok(Self { config, kernel })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_zeros() {
        let m = Matrix::zeros(2, 3);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.sum(), 0.0);
    }

    #[test]
    fn test_matrix_from_rows() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 3.0);
        assert_eq!(m.row(1), &[3.0, 4.0]);
        assert_eq!(m.sum(), 10.0);
    }

    #[test]
    fn test_matrix_from_ragged_rows() {
        let result = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(SvmError::DataShape(_))));
    }

    #[test]
    fn test_matrix_select_rows() {
        let m = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let picked = m.select_rows(&[2, 0]);
        assert_eq!(picked.rows(), 2);
        assert_eq!(picked.get(0, 0), 3.0);
        assert_eq!(picked.get(1, 0), 1.0);
    }

    #[test]
    fn test_matrix_set() {
        let mut m = Matrix::zeros(2, 2);
        m.set(1, 1, 5.0);
        assert_eq!(m.get(1, 1), 5.0);
        assert_eq!(m.sum(), 5.0);
    }

    #[test]
    #[should_panic(expected = "index out of bounds")]
    fn test_matrix_get_out_of_bounds() {
        let m = Matrix::zeros(2, 2);
        m.get(2, 0);
    }

    #[test]
    fn test_prediction_record() {
        assert!(PredictionRecord::new(3, 3).is_correct());
        assert!(!PredictionRecord::new(3, 1).is_correct());
    }

    #[test]
    fn test_config_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.gamma, -10.0);
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.learning_rate, 0.01);
        assert_eq!(config.folds, 10);
        assert_eq!(config.seed, 7);
        assert!(config.reset_per_fold);
        assert!(!config.scale_per_fold);
    }

    #[test]
    fn test_config_builder() {
        let config = TrainingConfig::new()
            .with_gamma(-5.0)
            .with_batch_size(50)
            .with_learning_rate(0.1)
            .with_folds(5)
            .with_seed(42);
        assert_eq!(config.gamma, -5.0);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.learning_rate, 0.1);
        assert_eq!(config.folds, 5);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_config_model_string() {
        let config = TrainingConfig::default();
        assert_eq!(config.model_string(), "rbf_g-10_b250_lr0.01_k10_s7");
    }

    #[test]
    fn test_config_validation() {
        assert!(TrainingConfig::default().validate().is_ok());
        assert!(TrainingConfig::new().with_gamma(1.0).validate().is_err());
        assert!(TrainingConfig::new().with_batch_size(0).validate().is_err());
        assert!(TrainingConfig::new()
            .with_learning_rate(0.0)
            .validate()
            .is_err());
        assert!(TrainingConfig::new().with_folds(1).validate().is_err());
    }

    #[test]
    fn test_context_rejects_bad_config() {
        let result = TrainingContext::new(TrainingConfig::new().with_folds(0));
        assert!(result.is_err());
    }
}
