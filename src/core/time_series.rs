//! TrainingSeries data structure for hourly demand observations.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An ordered-by-time, duplicate-free sequence of hourly demand observations
/// with named exogenous regressor columns.
///
/// Upstream ingestion owns cleaning (plausibility filtering, deduplication,
/// inner-joining regressor sources); construction here only enforces the
/// structural contract: strictly increasing timestamps, matching column
/// lengths, finite values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSeries {
    timestamps: Vec<DateTime<Utc>>,
    demand_mw: Vec<f64>,
    regressors: BTreeMap<String, Vec<f64>>,
}

/// Builder for constructing a [`TrainingSeries`].
#[derive(Debug, Clone, Default)]
pub struct TrainingSeriesBuilder {
    timestamps: Vec<DateTime<Utc>>,
    demand_mw: Vec<f64>,
    regressors: BTreeMap<String, Vec<f64>>,
}

impl TrainingSeriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamps(mut self, timestamps: Vec<DateTime<Utc>>) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Set the demand target column (MW).
    pub fn demand_mw(mut self, values: Vec<f64>) -> Self {
        self.demand_mw = values;
        self
    }

    /// Attach a named regressor column (e.g. hourly temperature).
    pub fn regressor(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.regressors.insert(name.into(), values);
        self
    }

    pub fn build(self) -> Result<TrainingSeries> {
        TrainingSeries::new(self.timestamps, self.demand_mw, self.regressors)
    }
}

impl TrainingSeries {
    /// Create a new series, validating the structural contract.
    pub fn new(
        timestamps: Vec<DateTime<Utc>>,
        demand_mw: Vec<f64>,
        regressors: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self> {
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::Timestamp(
                    "timestamps must be strictly increasing".to_string(),
                ));
            }
        }

        if demand_mw.len() != timestamps.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: demand_mw.len(),
            });
        }
        if demand_mw.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::MissingValues);
        }

        for (name, values) in &regressors {
            if values.len() != timestamps.len() {
                return Err(ForecastError::DimensionMismatch {
                    expected: timestamps.len(),
                    got: values.len(),
                });
            }
            if let Some(i) = values.iter().position(|v| !v.is_finite()) {
                return Err(ForecastError::MissingRegressor {
                    name: name.clone(),
                    timestamp: timestamps[i],
                });
            }
        }

        Ok(Self {
            timestamps,
            demand_mw,
            regressors,
        })
    }

    /// Create a series with no regressor columns.
    pub fn univariate(timestamps: Vec<DateTime<Utc>>, demand_mw: Vec<f64>) -> Result<Self> {
        Self::new(timestamps, demand_mw, BTreeMap::new())
    }

    /// Get the number of observations.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the series is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Get timestamps.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Get the demand target column (MW).
    pub fn demand_mw(&self) -> &[f64] {
        &self.demand_mw
    }

    /// Get regressor values by name.
    pub fn regressor(&self, name: &str) -> Option<&[f64]> {
        self.regressors.get(name).map(|v| v.as_slice())
    }

    /// Get all regressor columns.
    pub fn regressors(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.regressors
    }

    /// Names of the attached regressors, in deterministic (sorted) order.
    pub fn regressor_names(&self) -> impl Iterator<Item = &str> {
        self.regressors.keys().map(|s| s.as_str())
    }

    /// Check if the series has regressor columns.
    pub fn has_regressors(&self) -> bool {
        !self.regressors.is_empty()
    }

    /// Time covered from first to last observation.
    pub fn span(&self) -> Duration {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => *last - *first,
            _ => Duration::zero(),
        }
    }

    /// Extract a half-open index range `[start, end)` of the series.
    pub fn slice(&self, start: usize, end: usize) -> Result<TrainingSeries> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.len(),
                got: end,
            });
        }

        Ok(TrainingSeries {
            timestamps: self.timestamps[start..end].to_vec(),
            demand_mw: self.demand_mw[start..end].to_vec(),
            regressors: self
                .regressors
                .iter()
                .map(|(name, values)| (name.clone(), values[start..end].to_vec()))
                .collect(),
        })
    }

    /// Split into (timestamps `<= cutoff`, timestamps `> cutoff`), preserving
    /// regressor columns on both sides.
    pub fn split_at(&self, cutoff: DateTime<Utc>) -> (TrainingSeries, TrainingSeries) {
        let boundary = self.timestamps.partition_point(|ts| *ts <= cutoff);
        // Slices within bounds by construction.
        let train = self.slice(0, boundary).unwrap_or_else(|_| unreachable!());
        let holdout = self
            .slice(boundary, self.len())
            .unwrap_or_else(|_| unreachable!());
        (train, holdout)
    }
}
