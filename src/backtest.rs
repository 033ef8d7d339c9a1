//! Holdout backtesting: refit on a truncated series, forecast the held-out
//! tail, and score the forecast against the actuals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::TrainingSeries;
use crate::error::{ForecastError, Result};
use crate::models::{DemandModel, ModelConfig};
use crate::utils::metrics::{fraction_within, mae};

/// Narrow accuracy band for operator reporting (MW).
pub const ACCURACY_BAND_NARROW_MW: f64 = 200.0;
/// Wide accuracy band for operator reporting (MW).
pub const ACCURACY_BAND_WIDE_MW: f64 = 500.0;

/// Default holdout window when the caller does not supply one.
pub fn default_holdout() -> Duration {
    Duration::days(14)
}

/// Accuracy report for one backtest run.
///
/// Serialized field names match the persisted accuracy artifact consumed by
/// downstream dashboards; band accuracies are percentages in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    /// Mean absolute error over the holdout, in MW.
    pub mae_mw: f64,
    /// Percent of holdout hours with absolute error strictly below 200 MW.
    pub accuracy_200mw: f64,
    /// Percent of holdout hours with absolute error strictly below 500 MW.
    pub accuracy_500mw: f64,
    /// Number of holdout observations the scores are computed over.
    pub holdout_hours: usize,
    /// Wall-clock time the evaluation model was trained.
    pub trained_at: DateTime<Utc>,
}

/// Backtest the model configuration on the trailing `holdout` window of the
/// series (defaults to two weeks).
///
/// Splits at `last_timestamp − holdout`: observations at or before the
/// cutoff train the evaluation model, observations after it are scored.
/// Either side coming up empty is an `EmptyHoldout` error, not a degenerate
/// zero-score report.
pub fn backtest(
    series: &TrainingSeries,
    config: &ModelConfig,
    holdout: Option<Duration>,
) -> Result<AccuracySummary> {
    if series.is_empty() {
        return Err(ForecastError::EmptyData);
    }
    let holdout = holdout.unwrap_or_else(default_holdout);
    let last = match series.timestamps().last() {
        Some(ts) => *ts,
        None => return Err(ForecastError::EmptyData),
    };
    let cutoff = last - holdout;

    let (train, test) = series.split_at(cutoff);
    if train.is_empty() {
        return Err(ForecastError::EmptyHoldout {
            partition: "training",
        });
    }
    if test.is_empty() {
        return Err(ForecastError::EmptyHoldout {
            partition: "holdout",
        });
    }

    let model = DemandModel::fit(&train, config)?;

    let regressors: HashMap<String, Vec<f64>> = test
        .regressors()
        .iter()
        .map(|(name, values)| (name.clone(), values.clone()))
        .collect();
    let forecast = model.predict(test.timestamps(), &regressors)?;

    let actual = test.demand_mw();
    let predicted = forecast.yhat();
    Ok(AccuracySummary {
        mae_mw: mae(actual, predicted)?,
        accuracy_200mw: 100.0 * fraction_within(actual, predicted, ACCURACY_BAND_NARROW_MW)?,
        accuracy_500mw: 100.0 * fraction_within(actual, predicted, ACCURACY_BAND_WIDE_MW)?,
        holdout_hours: test.len(),
        trained_at: Utc::now(),
    })
}
