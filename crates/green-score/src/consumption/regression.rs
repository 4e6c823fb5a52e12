//! Ordinary least squares with an intercept.
//!
//! Columns are mean-centred and the design matrix is solved through
//! `nalgebra`'s SVD. Singular values under `largest * max(rows, columns) *
//! f64::EPSILON` are dropped, so rank-deficient histories (two rows,
//! constant columns, collinear metrics) resolve to the minimum-norm solution
//! while low-variance columns keep their weight.

use nalgebra::{DMatrix, DVector};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LinearRegression<const N: usize> {
    coefficients: [f64; N],
    feature_means: [f64; N],
    target_mean: f64,
}

impl<const N: usize> LinearRegression<N> {
    /// Fit `targets ~ rows`. Returns `None` when there are no rows or the
    /// lengths disagree.
    pub(crate) fn fit(rows: &[[f64; N]], targets: &[f64]) -> Option<Self> {
        if rows.is_empty() || rows.len() != targets.len() {
            return None;
        }

        let count = rows.len();
        let mut feature_means = [0.0; N];
        for row in rows {
            for (mean, value) in feature_means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut feature_means {
            *mean /= count as f64;
        }
        let target_mean = targets.iter().sum::<f64>() / count as f64;

        let design = DMatrix::from_fn(count, N, |i, j| rows[i][j] - feature_means[j]);
        let centred = DVector::from_iterator(count, targets.iter().map(|t| t - target_mean));

        let svd = design.svd(true, true);
        let cutoff = svd.singular_values.max() * count.max(N) as f64 * f64::EPSILON;
        let solution = svd.solve(&centred, cutoff).ok()?;

        let mut coefficients = [0.0; N];
        for (j, coefficient) in coefficients.iter_mut().enumerate() {
            *coefficient = solution[j];
        }

        Some(Self {
            coefficients,
            feature_means,
            target_mean,
        })
    }

    pub(crate) fn predict(&self, row: &[f64; N]) -> f64 {
        let offset: f64 = (0..N)
            .map(|j| self.coefficients[j] * (row[j] - self.feature_means[j]))
            .sum();
        self.target_mean + offset
    }

    #[cfg(test)]
    pub(crate) fn coefficients(&self) -> &[f64; N] {
        &self.coefficients
    }

    #[cfg(test)]
    pub(crate) fn intercept(&self) -> f64 {
        let shift: f64 = (0..N)
            .map(|j| self.coefficients[j] * self.feature_means[j])
            .sum();
        self.target_mean - shift
    }
}
