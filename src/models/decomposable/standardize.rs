//! Per-regressor z-score standardization.

use serde::{Deserialize, Serialize};

/// Z-score parameters for one regressor, computed on the training window
/// only and reused unchanged at prediction time. Recomputing statistics on
/// prediction inputs would leak their distribution into the model, so the
/// parameters are frozen inside the fitted artifact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardizer {
    mean: f64,
    std: f64,
}

impl Standardizer {
    /// Compute mean and (population) standard deviation of training values.
    pub fn fit(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::identity();
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: variance.sqrt(),
        }
    }

    /// A pass-through transform (used for unscaled regressors such as the
    /// weekend indicator).
    pub fn identity() -> Self {
        Self { mean: 0.0, std: 0.0 }
    }

    /// `(value - mean) / std`; identity when `std == 0` so a zero-variance
    /// regressor degrades to pass-through instead of dividing by zero.
    pub fn transform(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            value
        } else {
            (value - self.mean) / self.std
        }
    }

    /// Undo [`transform`](Self::transform).
    pub fn inverse(&self, value: f64) -> f64 {
        if self.std == 0.0 {
            value
        } else {
            value * self.std + self.mean
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn std(&self) -> f64 {
        self.std
    }
}
