//! Per-coefficient L2-penalized least squares.
//!
//! Solves the normal equations with a diagonal penalty, used by the demand
//! model to shrink changepoint slope deltas while leaving seasonal and
//! regressor coefficients unpenalized.

use crate::error::{ForecastError, Result};

/// Diagonal jitter keeping the normal equations positive definite even when
/// a column is degenerate (e.g. a zero-variance regressor).
const JITTER: f64 = 1e-8;

/// Fit `y ≈ Σ beta_j · columns[j]` minimizing
/// `‖y − X·beta‖² + Σ penalties[j]·beta_j²`.
///
/// `columns` is the design matrix in column-major form; `penalties` supplies
/// one L2 strength per column (0.0 for unpenalized terms).
pub fn ridge_fit(columns: &[Vec<f64>], y: &[f64], penalties: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    if n == 0 {
        return Err(ForecastError::EmptyData);
    }
    let k = columns.len();
    if k == 0 {
        return Ok(Vec::new());
    }
    if penalties.len() != k {
        return Err(ForecastError::DimensionMismatch {
            expected: k,
            got: penalties.len(),
        });
    }
    for col in columns {
        if col.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    // Normal equations: (X'X + diag(penalty)) beta = X'y
    let mut xtx = vec![vec![0.0; k]; k];
    let mut xty = vec![0.0; k];

    for i in 0..k {
        for j in 0..=i {
            let dot: f64 = columns[i]
                .iter()
                .zip(columns[j].iter())
                .map(|(a, b)| a * b)
                .sum();
            xtx[i][j] = dot;
            xtx[j][i] = dot;
        }
        xty[i] = columns[i].iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    }

    for i in 0..k {
        xtx[i][i] += penalties[i] + JITTER;
    }

    solve_symmetric(&xtx, &xty).ok_or_else(|| {
        ForecastError::Computation(
            "penalized least squares failed: matrix not positive definite".into(),
        )
    })
}

/// Evaluate `X·beta` for a column-major design matrix.
pub fn design_product(columns: &[Vec<f64>], beta: &[f64]) -> Vec<f64> {
    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    let mut out = vec![0.0; n];
    for (col, &b) in columns.iter().zip(beta.iter()) {
        for (o, &x) in out.iter_mut().zip(col.iter()) {
            *o += b * x;
        }
    }
    out
}

/// Solve a symmetric positive definite system via Cholesky decomposition.
fn solve_symmetric(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n {
        return None;
    }

    // A = L L'
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                if sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = vec![0.0; n];
    for i in 0..n {
        let mut sum = b[i];
        for j in 0..i {
            sum -= l[i][j] * y[j];
        }
        y[i] = sum / l[i][i];
    }

    // Backward substitution: L' x = y
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let mut sum = y[i];
        for j in (i + 1)..n {
            sum -= l[j][i] * x[j];
        }
        x[i] = sum / l[i][i];
    }

    Some(x)
}
