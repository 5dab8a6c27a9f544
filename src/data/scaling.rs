//! Per-column min-max feature scaling
//!
//! Fit computes each column's minimum and range, transform maps values into
//! [0, 1]. The fit/transform split lets the driver choose between fitting
//! once on the full dataset (the original pipeline's behavior) or per fold
//! on the training rows only.

use crate::core::types::Matrix;

/// Fitted min-max scaling parameters, one (min, range) pair per column
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    mins: Vec<f64>,
    ranges: Vec<f64>,
}

impl MinMaxScaler {
    /// Compute per-column minima and ranges from the given rows
    pub fn fit(features: &Matrix) -> Self {
        let cols = features.cols();
        let mut mins = vec![f64::INFINITY; cols];
        let mut maxs = vec![f64::NEG_INFINITY; cols];

        for i in 0..features.rows() {
            for (c, &v) in features.row(i).iter().enumerate() {
                mins[c] = mins[c].min(v);
                maxs[c] = maxs[c].max(v);
            }
        }

        let ranges = mins
            .iter()
            .zip(maxs.iter())
            .map(|(&min, &max)| max - min)
            .collect();

        Self { mins, ranges }
    }

    /// Scale every component into [0, 1] using the fitted parameters
    ///
    /// Constant columns (zero range) map to 0.0.
    pub fn transform(&self, features: &Matrix) -> Matrix {
        let mut scaled = features.clone();
        let cols = scaled.cols();

        for i in 0..scaled.rows() {
            for c in 0..cols {
                let value = if self.ranges[c] == 0.0 {
                    0.0
                } else {
                    (features.get(i, c) - self.mins[c]) / self.ranges[c]
                };
                scaled.set(i, c, value);
            }
        }
        scaled
    }

    /// Fit on the given rows and transform them in one call
    pub fn fit_transform(features: &Matrix) -> Matrix {
        Self::fit(features).transform(features)
    }
}
