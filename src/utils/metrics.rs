//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Mean absolute error between actual and predicted values.
pub fn mae(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    validate(actual, predicted)?;
    let n = actual.len() as f64;
    Ok(actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n)
}

/// Fraction of points with absolute error strictly below `band`.
pub fn fraction_within(actual: &[f64], predicted: &[f64], band: f64) -> Result<f64> {
    validate(actual, predicted)?;
    let hits = actual
        .iter()
        .zip(predicted.iter())
        .filter(|(a, p)| (*a - *p).abs() < band)
        .count();
    Ok(hits as f64 / actual.len() as f64)
}

fn validate(actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || predicted.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }
    Ok(())
}
