//! Grid stress classification of forecast demand against fixed MW
//! thresholds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Forecast;

/// Stress tier for one forecast hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Safe,
    Warning,
    Critical,
}

/// MW thresholds the classifier compares against. Comparisons are strict:
/// demand exactly at a threshold stays in the lower tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    pub warning_mw: f64,
    pub critical_mw: f64,
    /// Reference capacity for percent-of-capacity reporting; not a tier
    /// boundary.
    pub capacity_reference_mw: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            warning_mw: 10_500.0,
            critical_mw: 11_500.0,
            capacity_reference_mw: 11_700.0,
        }
    }
}

impl RiskThresholds {
    /// Classify a single demand value in MW.
    ///
    /// NaN and negative inputs are clamped to zero first, so they classify
    /// as `Safe` rather than poisoning downstream aggregation. Arbitrarily
    /// large values stay on the high side and classify `Critical`.
    pub fn classify(&self, demand_mw: f64) -> RiskTier {
        let demand = sanitize(demand_mw);
        if demand > self.critical_mw {
            RiskTier::Critical
        } else if demand > self.warning_mw {
            RiskTier::Warning
        } else {
            RiskTier::Safe
        }
    }

    /// Demand as a percentage of the reference capacity.
    pub fn capacity_pct(&self, demand_mw: f64) -> f64 {
        sanitize(demand_mw) / self.capacity_reference_mw * 100.0
    }
}

/// Classify with the default Alberta-grid thresholds.
pub fn classify_risk(demand_mw: f64) -> RiskTier {
    RiskThresholds::default().classify(demand_mw)
}

/// Percent of default reference capacity.
pub fn capacity_pct(demand_mw: f64) -> f64 {
    RiskThresholds::default().capacity_pct(demand_mw)
}

fn sanitize(demand_mw: f64) -> f64 {
    if demand_mw.is_nan() {
        0.0
    } else {
        demand_mw.max(0.0)
    }
}

/// One forecast hour annotated with its stress assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyOutlook {
    pub timestamp: DateTime<Utc>,
    pub demand_mw: f64,
    pub demand_lower_mw: f64,
    pub demand_upper_mw: f64,
    pub tier: RiskTier,
    pub capacity_pct: f64,
    /// Temperature echoed from the forecast's resolved regressor column,
    /// when the model was trained with one.
    pub temperature_c: Option<f64>,
}

/// Annotate every hour of a forecast with its risk tier and capacity
/// percentage. Point forecasts and lower bounds are clamped at zero
/// (demand cannot be negative); upper bounds pass through as computed.
pub fn outlook(forecast: &Forecast, thresholds: &RiskThresholds) -> Vec<HourlyOutlook> {
    forecast
        .records()
        .map(|record| {
            let demand = sanitize(record.yhat);
            HourlyOutlook {
                timestamp: record.timestamp,
                demand_mw: demand,
                demand_lower_mw: sanitize(record.yhat_lower),
                demand_upper_mw: record.yhat_upper,
                tier: thresholds.classify(demand),
                capacity_pct: thresholds.capacity_pct(demand),
                temperature_c: record.regressors.get("temperature_c").copied(),
            }
        })
        .collect()
}
