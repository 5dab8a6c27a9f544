//! Gaussian (RBF) kernel matrices
//!
//! Entries are exp(gamma * |d|) where d is the squared Euclidean distance
//! and gamma is a negative width constant. Distances come from the
//! ||a||² + ||b||² - 2·a·b expansion; the absolute value tolerates the
//! floating-point sign noise that expansion can produce near zero.

use crate::core::types::Matrix;
use crate::core::{Result, SvmError};

/// Gaussian kernel: K(x, y) = exp(gamma * | ||x - y||² |), gamma < 0
#[derive(Debug, Clone, Copy)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    /// Create a kernel with the given negative gamma constant
    pub fn new(gamma: f64) -> Result<Self> {
        if gamma >= 0.0 {
            return Err(SvmError::InvalidParameter(format!(
                "gamma must be negative, got {gamma}"
            )));
        }
        Ok(Self { gamma })
    }

    /// Get the gamma constant
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// n×n kernel matrix of a batch against itself
    ///
    /// Symmetric by construction with unit diagonal.
    pub fn self_kernel(&self, a: &Matrix) -> Matrix {
        let n = a.rows();
        let norms = row_norms_squared(a);
        let mut k = Matrix::zeros(n, n);

        for i in 0..n {
            k.set(i, i, 1.0);
            for j in (i + 1)..n {
                let d = norms[i] + norms[j] - 2.0 * dot(a.row(i), a.row(j));
                let value = (self.gamma * d.abs()).exp();
                k.set(i, j, value);
                k.set(j, i, value);
            }
        }
        k
    }

    /// n×m kernel matrix of a batch against a query set
    pub fn cross_kernel(&self, a: &Matrix, b: &Matrix) -> Matrix {
        let n = a.rows();
        let m = b.rows();
        let a_norms = row_norms_squared(a);
        let b_norms = row_norms_squared(b);
        let mut k = Matrix::zeros(n, m);

        for i in 0..n {
            for j in 0..m {
                let d = a_norms[i] + b_norms[j] - 2.0 * dot(a.row(i), b.row(j));
                k.set(i, j, (self.gamma * d.abs()).exp());
            }
        }
        k
    }
}

fn row_norms_squared(m: &Matrix) -> Vec<f64> {
    (0..m.rows())
        .map(|i| m.row(i).iter().map(|&v| v * v).sum())
        .collect()
}

fn dot(x: &[f64], y: &[f64]) -> f64 {
    x.iter().zip(y.iter()).map(|(&a, &b)| a * b).sum()
}
