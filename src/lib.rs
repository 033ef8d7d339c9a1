//! # gridcast
//!
//! Hourly electricity demand forecasting for grid operations.
//!
//! Fits a decomposable model (piecewise-linear trend with changepoints,
//! truncated Fourier seasonalities, linear exogenous regressors such as
//! temperature and a weekend indicator) to an hourly demand history, then
//! produces point forecasts with calibrated uncertainty bands, holdout
//! accuracy reports, and per-hour grid stress classification. Fitting and
//! prediction are deterministic and single-threaded.

pub mod backtest;
pub mod core;
pub mod error;
pub mod models;
pub mod risk;
pub mod utils;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::backtest::{backtest, AccuracySummary};
    pub use crate::core::{Forecast, TrainingSeries, TrainingSeriesBuilder};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::{DemandModel, ModelConfig, RegressorSpec, SeasonalityMode};
    pub use crate::risk::{classify_risk, outlook, RiskThresholds, RiskTier};
}
