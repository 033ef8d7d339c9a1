//! Piecewise-linear trend with uniformly placed changepoints.
//!
//! Training time is mapped to `[0, 1]`; each changepoint contributes a hinge
//! column `max(0, t - s)` so the instantaneous slope after time `t` is the
//! base rate plus the cumulative deltas of all changepoints before `t`.
//! Past the last changepoint the basis is linear, which makes extrapolation
//! hold the final slope constant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interior fraction of the scaled training span eligible for changepoints.
/// Boundary slopes are unidentifiable, so the first and last 10% are skipped.
const INTERIOR_LOW: f64 = 0.1;
const INTERIOR_SPAN: f64 = 0.8;

/// Minimum observations per candidate changepoint when the series is short.
const OBS_PER_CHANGEPOINT: usize = 24;

/// Maps timestamps to scaled trend time for one training window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    start: DateTime<Utc>,
    span_seconds: f64,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let span_seconds = (end - start).num_seconds() as f64;
        Self {
            start,
            // Degenerate single-point windows scale to a unit span.
            span_seconds: if span_seconds > 0.0 { span_seconds } else { 1.0 },
        }
    }

    /// Scaled time: 0 at the training start, 1 at the training end, > 1 in
    /// the extrapolation region.
    pub fn scale(&self, timestamp: DateTime<Utc>) -> f64 {
        (timestamp - self.start).num_seconds() as f64 / self.span_seconds
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }
}

/// Select changepoint locations in scaled time.
///
/// Deterministic rule: `min(requested, n_obs / 24)` points uniformly spaced
/// over the interior 80% of the span, never at the boundary observations.
pub fn place_changepoints(requested: usize, n_obs: usize) -> Vec<f64> {
    let count = requested.min(n_obs / OBS_PER_CHANGEPOINT);
    (1..=count)
        .map(|j| INTERIOR_LOW + INTERIOR_SPAN * j as f64 / (count + 1) as f64)
        .collect()
}

/// Build the trend design block: `[1, t, hinge_1, .., hinge_c]`.
pub fn trend_columns(t_scaled: &[f64], changepoints: &[f64]) -> Vec<Vec<f64>> {
    let mut columns = Vec::with_capacity(2 + changepoints.len());
    columns.push(vec![1.0; t_scaled.len()]);
    columns.push(t_scaled.to_vec());
    for &s in changepoints {
        columns.push(t_scaled.iter().map(|&t| (t - s).max(0.0)).collect());
    }
    columns
}

/// Evaluate the fitted trend at scaled times.
///
/// `offset` and `base_rate` are the intercept and base slope; `deltas` holds
/// one slope adjustment per changepoint.
pub fn evaluate_trend(
    t_scaled: &[f64],
    offset: f64,
    base_rate: f64,
    changepoints: &[f64],
    deltas: &[f64],
) -> Vec<f64> {
    t_scaled
        .iter()
        .map(|&t| {
            let mut value = offset + base_rate * t;
            for (&s, &delta) in changepoints.iter().zip(deltas.iter()) {
                value += delta * (t - s).max(0.0);
            }
            value
        })
        .collect()
}
