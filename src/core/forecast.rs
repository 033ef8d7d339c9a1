//! Forecast result structure for holding predictions with uncertainty bounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A forecast containing point predictions and interval bounds, columnar.
///
/// One entry per requested future timestamp, in request order. Regressor
/// columns echo the values the forecast was computed with (after any
/// documented fallback substitution), so downstream records can report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    timestamps: Vec<DateTime<Utc>>,
    yhat: Vec<f64>,
    yhat_lower: Vec<f64>,
    yhat_upper: Vec<f64>,
    regressors: BTreeMap<String, Vec<f64>>,
}

/// Row view of a single forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub timestamp: DateTime<Utc>,
    pub yhat: f64,
    pub yhat_lower: f64,
    pub yhat_upper: f64,
    pub regressors: BTreeMap<String, f64>,
}

impl Forecast {
    /// Assemble a forecast from parallel columns.
    ///
    /// Callers guarantee equal lengths; this is an internal constructor used
    /// by the forecaster after it has validated its inputs.
    pub(crate) fn from_columns(
        timestamps: Vec<DateTime<Utc>>,
        yhat: Vec<f64>,
        yhat_lower: Vec<f64>,
        yhat_upper: Vec<f64>,
        regressors: BTreeMap<String, Vec<f64>>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), yhat.len());
        debug_assert_eq!(timestamps.len(), yhat_lower.len());
        debug_assert_eq!(timestamps.len(), yhat_upper.len());
        Self {
            timestamps,
            yhat,
            yhat_lower,
            yhat_upper,
            regressors,
        }
    }

    /// Number of forecast hours.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Check if the forecast is empty.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Forecast timestamps, in request order.
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Point forecasts (MW).
    pub fn yhat(&self) -> &[f64] {
        &self.yhat
    }

    /// Lower uncertainty bounds (MW).
    pub fn yhat_lower(&self) -> &[f64] {
        &self.yhat_lower
    }

    /// Upper uncertainty bounds (MW).
    pub fn yhat_upper(&self) -> &[f64] {
        &self.yhat_upper
    }

    /// Echoed regressor column by name.
    pub fn regressor(&self, name: &str) -> Option<&[f64]> {
        self.regressors.get(name).map(|v| v.as_slice())
    }

    /// Iterate row views over the forecast.
    pub fn records(&self) -> impl Iterator<Item = ForecastRecord> + '_ {
        (0..self.len()).map(move |i| ForecastRecord {
            timestamp: self.timestamps[i],
            yhat: self.yhat[i],
            yhat_lower: self.yhat_lower[i],
            yhat_upper: self.yhat_upper[i],
            regressors: self
                .regressors
                .iter()
                .map(|(name, values)| (name.clone(), values[i]))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_forecast() -> Forecast {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<_> = (0..3).map(|i| base + chrono::Duration::hours(i)).collect();
        let mut regressors = BTreeMap::new();
        regressors.insert("temperature_c".to_string(), vec![-12.0, -10.0, -8.0]);
        Forecast::from_columns(
            timestamps,
            vec![9800.0, 9900.0, 10000.0],
            vec![9600.0, 9690.0, 9780.0],
            vec![10000.0, 10110.0, 10220.0],
            regressors,
        )
    }

    #[test]
    fn columns_and_records_agree() {
        let forecast = sample_forecast();
        assert_eq!(forecast.len(), 3);
        assert!(!forecast.is_empty());

        let records: Vec<_> = forecast.records().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].yhat, forecast.yhat()[1]);
        assert_eq!(records[1].yhat_lower, forecast.yhat_lower()[1]);
        assert_eq!(records[1].yhat_upper, forecast.yhat_upper()[1]);
        assert_eq!(records[1].regressors["temperature_c"], -10.0);
    }

    #[test]
    fn regressor_echo_is_accessible_by_name() {
        let forecast = sample_forecast();
        assert_eq!(
            forecast.regressor("temperature_c").unwrap(),
            &[-12.0, -10.0, -8.0]
        );
        assert!(forecast.regressor("is_weekend").is_none());
    }

    #[test]
    fn empty_forecast_has_no_records() {
        let forecast = Forecast::default();
        assert!(forecast.is_empty());
        assert_eq!(forecast.records().count(), 0);
    }

    #[test]
    fn forecast_serializes_round_trip() {
        let forecast = sample_forecast();
        let json = serde_json::to_string(&forecast).unwrap();
        let back: Forecast = serde_json::from_str(&json).unwrap();
        assert_eq!(back, forecast);
    }
}
