//! Statistical utility functions.

use statrs::distribution::{ContinuousCDF, Normal};

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Calculate the standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Two-sided standard-normal quantile for a central interval of the given
/// width, e.g. `interval_z(0.95) ≈ 1.96`.
///
/// Width is clamped to (0, 1); degenerate widths fall back to the bound.
pub fn interval_z(interval_width: f64) -> f64 {
    let width = interval_width.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
    let normal = Normal::new(0.0, 1.0).unwrap();
    normal.inverse_cdf(0.5 + width / 2.0)
}
