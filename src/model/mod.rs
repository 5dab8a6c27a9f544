//! Multi-class kernel SVM model
//!
//! Owns the dual-coefficient matrix, one row per class, and exposes the
//! relaxed one-vs-rest dual objective, the class-prediction rule and a
//! single gradient-descent update step. The formulation deliberately drops
//! the canonical dual's box constraints, so plain gradient descent is the
//! whole optimizer and the caller is responsible for watching the loss
//! trend for divergence.

use crate::core::types::Matrix;
use crate::core::{Result, SvmError};
use rand::Rng;

/// One-vs-rest multi-class SVM over a fixed batch width
///
/// The coefficient matrix has shape (num_classes, batch_size); every
/// training step mutates it in place. Batches narrower than `batch_size`
/// must never be submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct MulticlassSvm {
    coefficients: Matrix,
}

impl MulticlassSvm {
    /// Create a model with standard-normal random coefficients
    pub fn new<R: Rng>(num_classes: usize, batch_size: usize, rng: &mut R) -> Self {
        let mut coefficients = Matrix::zeros(num_classes, batch_size);
        fill_standard_normal(&mut coefficients, rng);
        Self { coefficients }
    }

    /// Rebuild a model from stored coefficients
    pub fn from_coefficients(coefficients: Matrix) -> Result<Self> {
        if coefficients.rows() == 0 || coefficients.cols() == 0 {
            return Err(SvmError::InvalidParameter(
                "coefficient matrix must be non-empty".to_string(),
            ));
        }
        Ok(Self { coefficients })
    }

    /// Number of classes (coefficient rows)
    pub fn num_classes(&self) -> usize {
        self.coefficients.rows()
    }

    /// Batch width (coefficient columns)
    pub fn batch_size(&self) -> usize {
        self.coefficients.cols()
    }

    /// The dual-coefficient matrix
    pub fn coefficients(&self) -> &Matrix {
        &self.coefficients
    }

    /// Re-draw all coefficients, discarding the trained state
    pub fn reinitialize<R: Rng>(&mut self, rng: &mut R) {
        fill_standard_normal(&mut self.coefficients, rng);
    }

    /// Relaxed one-vs-rest dual objective, as a scalar to minimize
    ///
    /// With coefficients B (classes × batch), kernel K (batch × batch) and
    /// one-hot targets Y (classes × batch):
    ///
    /// loss = Σ_c Σ_ij K_ij · (BᵀB)_ij · Y_ci · Y_cj − Σ B
    pub fn compute_loss(&self, kernel: &Matrix, targets: &Matrix) -> f64 {
        let n = self.batch_size();
        debug_assert_eq!(kernel.rows(), n);
        debug_assert_eq!(kernel.cols(), n);
        debug_assert_eq!(targets.rows(), self.num_classes());
        debug_assert_eq!(targets.cols(), n);

        let first_term = self.coefficients.sum();
        let mut second_term = 0.0;

        for i in 0..n {
            for j in 0..n {
                let cross = column_dot(&self.coefficients, i, j);
                let target_cross = column_dot(targets, i, j);
                if target_cross != 0.0 {
                    second_term += kernel.get(i, j) * cross * target_cross;
                }
            }
        }

        second_term - first_term
    }

    /// Predicted class id for every query example
    ///
    /// Raw scores are (Y ⊙ B) · K_q of shape (classes × queries). Each
    /// class row is centered by its mean over the queries before the
    /// per-example argmax; without the centering, rows with different dual
    /// scales are not comparable.
    pub fn compute_predictions(&self, targets: &Matrix, query_kernel: &Matrix) -> Vec<usize> {
        let n = self.batch_size();
        let classes = self.num_classes();
        let queries = query_kernel.cols();
        debug_assert_eq!(query_kernel.rows(), n);
        debug_assert_eq!(targets.rows(), classes);
        debug_assert_eq!(targets.cols(), n);

        let mut scores = Matrix::zeros(classes, queries);
        for c in 0..classes {
            for q in 0..queries {
                let mut score = 0.0;
                for j in 0..n {
                    score += targets.get(c, j) * self.coefficients.get(c, j) * query_kernel.get(j, q);
                }
                scores.set(c, q, score);
            }
        }

        let row_means: Vec<f64> = (0..classes)
            .map(|c| scores.row(c).iter().sum::<f64>() / queries as f64)
            .collect();

        (0..queries)
            .map(|q| {
                let mut best = 0;
                let mut best_score = scores.get(0, q) - row_means[0];
                for c in 1..classes {
                    let centered = scores.get(c, q) - row_means[c];
                    if centered > best_score {
                        best_score = centered;
                        best = c;
                    }
                }
                best
            })
            .collect()
    }

    /// One gradient-descent update against `compute_loss`, returning the
    /// loss evaluated after the step
    ///
    /// The gradient is the analytic derivative of the objective:
    /// ∂L/∂B_kp = −1 + 2 Σ_j K_pj · S_pj · B_kj, with S the same-label
    /// indicator S_pj = Σ_c Y_cp · Y_cj.
    pub fn train_step(&mut self, learning_rate: f64, kernel: &Matrix, targets: &Matrix) -> f64 {
        let n = self.batch_size();
        let classes = self.num_classes();
        debug_assert_eq!(kernel.rows(), n);
        debug_assert_eq!(kernel.cols(), n);
        debug_assert_eq!(targets.rows(), classes);
        debug_assert_eq!(targets.cols(), n);

        // Kernel masked by the same-label indicator; symmetric since both
        // factors are.
        let mut masked = Matrix::zeros(n, n);
        for p in 0..n {
            for j in 0..n {
                let indicator = column_dot(targets, p, j);
                if indicator != 0.0 {
                    masked.set(p, j, kernel.get(p, j) * indicator);
                }
            }
        }

        let mut gradient_row = vec![0.0; n];
        for k in 0..classes {
            for (p, slot) in gradient_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for j in 0..n {
                    acc += masked.get(p, j) * self.coefficients.get(k, j);
                }
                *slot = -1.0 + 2.0 * acc;
            }
            for (p, &gradient) in gradient_row.iter().enumerate() {
                let updated = self.coefficients.get(k, p) - learning_rate * gradient;
                self.coefficients.set(k, p, updated);
            }
        }

        self.compute_loss(kernel, targets)
    }
}

/// Dot product of columns `i` and `j` over all rows
fn column_dot(m: &Matrix, i: usize, j: usize) -> f64 {
    (0..m.rows()).map(|r| m.get(r, i) * m.get(r, j)).sum()
}

/// Fill a matrix with standard-normal draws via Box-Muller
fn fill_standard_normal<R: Rng>(m: &mut Matrix, rng: &mut R) {
    for value in m.as_mut_slice() {
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = rng.gen();
        *value = (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::codec::one_hot_block;
    use crate::kernel::RbfKernel;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (Matrix, Matrix, Matrix) {
        // 6 examples, 2 interleaved classes, well separated in feature space.
        let features = Matrix::from_rows(vec![
            vec![0.0, 0.1],
            vec![0.9, 1.0],
            vec![0.1, 0.0],
            vec![1.0, 0.9],
            vec![0.05, 0.05],
            vec![0.95, 0.95],
        ])
        .unwrap();
        let labels = vec![0, 1, 0, 1, 0, 1];
        let targets = one_hot_block(&labels, 2);
        let kernel = RbfKernel::new(-10.0).unwrap().self_kernel(&features);
        (features, targets, kernel)
    }

    #[test]
    fn test_new_model_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let model = MulticlassSvm::new(4, 50, &mut rng);
        assert_eq!(model.num_classes(), 4);
        assert_eq!(model.batch_size(), 50);
    }

    #[test]
    fn test_from_coefficients_rejects_empty() {
        assert!(MulticlassSvm::from_coefficients(Matrix::zeros(0, 5)).is_err());
        assert!(MulticlassSvm::from_coefficients(Matrix::zeros(3, 5)).is_ok());
    }

    #[test]
    fn test_reinitialize_changes_state() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut model = MulticlassSvm::new(2, 6, &mut rng);
        let before = model.coefficients().clone();
        model.reinitialize(&mut rng);
        assert_ne!(&before, model.coefficients());
        assert_eq!(model.batch_size(), 6);
    }

    #[test]
    fn test_loss_is_finite() {
        let (_, targets, kernel) = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let model = MulticlassSvm::new(2, 6, &mut rng);
        let loss = model.compute_loss(&kernel, &targets);
        assert!(loss.is_finite());
    }

    #[test]
    fn test_small_step_decreases_loss() {
        let (_, targets, kernel) = fixture();
        let mut rng = StdRng::seed_from_u64(7);
        let mut model = MulticlassSvm::new(2, 6, &mut rng);

        let before = model.compute_loss(&kernel, &targets);
        let after = model.train_step(1e-4, &kernel, &targets);
        assert!(after.is_finite());
        assert!(after < before);
    }

    #[test]
    fn test_step_matches_analytic_gradient_on_identity_kernel() {
        // With K = I, S_pp = 1 and S_pj = 0 for p != j (distinct classes per
        // column pair only when labels match; here columns 0 and 1 hold
        // different classes). Gradient reduces to -1 + 2·B_kp for the
        // same-label diagonal.
        let targets = one_hot_block(&[0, 1], 2);
        let mut kernel = Matrix::zeros(2, 2);
        kernel.set(0, 0, 1.0);
        kernel.set(1, 1, 1.0);

        let mut coefficients = Matrix::zeros(2, 2);
        coefficients.set(0, 0, 3.0);
        coefficients.set(0, 1, -2.0);
        coefficients.set(1, 0, 1.0);
        coefficients.set(1, 1, 4.0);
        let mut model = MulticlassSvm::from_coefficients(coefficients).unwrap();

        model.train_step(0.5, &kernel, &targets);

        // grad_kp = -1 + 2 * B_kp, update = B - 0.5 * grad.
        assert_eq!(model.coefficients().get(0, 0), 3.0 - 0.5 * (-1.0 + 6.0));
        assert_eq!(model.coefficients().get(0, 1), -2.0 - 0.5 * (-1.0 - 4.0));
        assert_eq!(model.coefficients().get(1, 0), 1.0 - 0.5 * (-1.0 + 2.0));
        assert_eq!(model.coefficients().get(1, 1), 4.0 - 0.5 * (-1.0 + 8.0));
    }

    #[test]
    fn test_predictions_recover_labels_on_separated_batch() {
        // Near-diagonal kernel (very negative gamma) makes each example its
        // own strongest supporter, so unit coefficients predict the label.
        let labels = vec![0usize, 1, 0, 1, 0, 1];
        let targets = one_hot_block(&labels, 2);
        let features = Matrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![5.0, 5.0],
            vec![0.2, 0.0],
            vec![5.0, 4.8],
            vec![0.0, 0.2],
            vec![4.8, 5.0],
        ])
        .unwrap();
        let kernel = RbfKernel::new(-50.0).unwrap();
        let query_kernel = kernel.cross_kernel(&features, &features);

        let mut ones = Matrix::zeros(2, 6);
        for c in 0..2 {
            for j in 0..6 {
                ones.set(c, j, 1.0);
            }
        }
        let model = MulticlassSvm::from_coefficients(ones).unwrap();

        let predicted = model.compute_predictions(&targets, &query_kernel);
        assert_eq!(predicted, labels);
    }

    #[test]
    fn test_centering_overrides_dual_scale_imbalance() {
        // Wide kernel plus uniformly inflated class-1 coefficients: the raw
        // class-1 scores dominate every query, and only the per-class mean
        // centering lets the class-0 example win its own argmax.
        let labels = vec![0usize, 1];
        let targets = one_hot_block(&labels, 2);
        let features = Matrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 1.0]]).unwrap();
        let kernel = RbfKernel::new(-0.01).unwrap();
        let query_kernel = kernel.cross_kernel(&features, &features);

        let mut coefficients = Matrix::zeros(2, 2);
        coefficients.set(0, 0, 1.0);
        coefficients.set(0, 1, 1.0);
        coefficients.set(1, 0, 100.0);
        coefficients.set(1, 1, 100.0);
        let model = MulticlassSvm::from_coefficients(coefficients).unwrap();

        let predicted = model.compute_predictions(&targets, &query_kernel);
        assert_eq!(predicted, labels);
    }
}
