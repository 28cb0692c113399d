//! Polynomial feature expansion, z-score normalization and ridge least squares.
//!
//! Column 0 of every feature vector is the bias. It is never normalized and
//! never penalized, so an uninformative model falls back to the mean target
//! rather than to zero.

use crate::constants::{PIVOT_EPSILON, POLY_FEATURES, STD_EPSILON};
use crate::features::GazeFeatures;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Expanded feature vector
pub type FeatureVector = [f64; POLY_FEATURES];

/// Expand features into `[1, rx, ry, hx, hy, nx, ny, ey, rx*ry, rx^2, ry^2]`
pub fn expand_features(f: &GazeFeatures) -> FeatureVector {
    [
        1.0,
        f.rx,
        f.ry,
        f.hx,
        f.hy,
        f.nx,
        f.ny,
        f.ey,
        f.rx * f.ry,
        f.rx * f.rx,
        f.ry * f.ry,
    ]
}

/// Per-column z-score parameters; index 0 is unused
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Normalization {
    /// Column means
    pub mean: FeatureVector,
    /// Column standard deviations
    pub std: FeatureVector,
}

impl Normalization {
    /// Compute means and population standard deviations over a batch.
    ///
    /// Constant columns get a unit deviation so they normalize to zero.
    pub fn fit(rows: &[FeatureVector]) -> Self {
        let mut mean = [0.0; POLY_FEATURES];
        let mut std = [1.0; POLY_FEATURES];
        if rows.is_empty() {
            return Self { mean, std };
        }
        let n = rows.len() as f64;
        for j in 1..POLY_FEATURES {
            let m = rows.iter().map(|r| r[j]).sum::<f64>() / n;
            let variance = rows.iter().map(|r| (r[j] - m).powi(2)).sum::<f64>() / n;
            let s = variance.sqrt();
            mean[j] = m;
            std[j] = if s > STD_EPSILON { s } else { 1.0 };
        }
        Self { mean, std }
    }

    /// Normalize one row, leaving the bias untouched
    pub fn apply(&self, row: &FeatureVector) -> FeatureVector {
        let mut out = *row;
        for j in 1..POLY_FEATURES {
            out[j] = (row[j] - self.mean[j]) / self.std[j];
        }
        out
    }
}

/// Solve `(XᵀX + λD) w = Xᵀy` where `D` is the identity with `D[0][0] = 0`.
///
/// # Errors
///
/// Returns `Error::SingularRegression` when the system has no unique solution
pub fn fit_ridge(rows: &[FeatureVector], targets: &[f64], lambda: f64) -> Result<FeatureVector> {
    if rows.len() != targets.len() {
        return Err(Error::InvalidInput(format!(
            "{} rows but {} targets",
            rows.len(),
            targets.len()
        )));
    }

    let mut xtx = vec![vec![0.0; POLY_FEATURES]; POLY_FEATURES];
    let mut xty = vec![0.0; POLY_FEATURES];
    for (row, &y) in rows.iter().zip(targets) {
        for i in 0..POLY_FEATURES {
            xty[i] += row[i] * y;
            for j in 0..POLY_FEATURES {
                xtx[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, diag_row) in xtx.iter_mut().enumerate().skip(1) {
        diag_row[i] += lambda;
    }

    let solution = solve_linear_system(xtx, xty)?;
    let mut weights = [0.0; POLY_FEATURES];
    weights.copy_from_slice(&solution);
    Ok(weights)
}

/// Solve a square linear system by Gaussian elimination with partial pivoting.
///
/// # Errors
///
/// Returns `Error::SingularRegression` if a pivot vanishes, or
/// `Error::InvalidInput` if the system is not square
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(Error::InvalidInput("Linear system must be square".to_string()));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        let pivot = a[pivot_row][col];
        if !pivot.is_finite() || pivot.abs() < PIVOT_EPSILON {
            return Err(Error::SingularRegression(format!(
                "pivot {pivot:e} in column {col}"
            )));
        }
        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in (col + 1)..n {
            let factor = a[row][col] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_features_layout() {
        let f = GazeFeatures::from_array([2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let v = expand_features(&f);
        assert_eq!(v, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 6.0, 4.0, 9.0]);
    }

    #[test]
    fn test_normalization_skips_bias_and_constant_columns() {
        let rows = vec![
            expand_features(&GazeFeatures::from_array([0.0, 1.0, 0.0, 0.0, 0.5, 0.5, 0.2])),
            expand_features(&GazeFeatures::from_array([2.0, 1.0, 0.0, 0.0, 0.5, 0.5, 0.2])),
        ];
        let norm = Normalization::fit(&rows);
        assert_eq!(norm.mean[1], 1.0);
        assert_eq!(norm.std[1], 1.0);
        assert_eq!(norm.std[2], 1.0);

        let out = norm.apply(&rows[1]);
        assert_eq!(out[0], 1.0);
        assert!((out[1] - 1.0).abs() < 1e-12);
        assert_eq!(out[2], 0.0);
    }

    #[test]
    fn test_solve_requires_pivoting() {
        // Zero in the leading position forces a row swap
        let a = vec![vec![0.0, 2.0], vec![3.0, 1.0]];
        let b = vec![4.0, 5.0];
        let x = solve_linear_system(a, b).unwrap();
        assert!((x[0] - 1.0).abs() < 1e-12);
        assert!((x[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve_detects_singular_system() {
        let a = vec![vec![1.0, 2.0], vec![2.0, 4.0]];
        let b = vec![1.0, 2.0];
        assert!(matches!(
            solve_linear_system(a, b),
            Err(Error::SingularRegression(_))
        ));
    }

    #[test]
    fn test_solve_rejects_non_square() {
        let a = vec![vec![1.0, 2.0]];
        assert!(matches!(
            solve_linear_system(a, vec![1.0, 2.0]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bias_is_not_penalized() {
        // All-constant features: only the bias can explain the targets
        let rows = vec![[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]; 12];
        let targets = vec![960.0; 12];
        let w = fit_ridge(&rows, &targets, 10.0).unwrap();
        assert!((w[0] - 960.0).abs() < 1e-9);
        assert!(w[1..].iter().all(|c| c.abs() < 1e-9));
    }

    #[test]
    fn test_zero_lambda_with_constant_columns_is_singular() {
        let rows = vec![[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]; 12];
        let targets = vec![960.0; 12];
        assert!(matches!(
            fit_ridge(&rows, &targets, 0.0),
            Err(Error::SingularRegression(_))
        ));
    }
}
