//! Error types for the gridcast library.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur during training, prediction, or evaluation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// Not enough observations to identify the trend.
    #[error("insufficient data: need at least {needed} observations, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Training span is shorter than one full cycle of an enabled seasonality.
    #[error("insufficient data: series spans {got_hours}h but {period} seasonality needs {needed_hours}h")]
    InsufficientSeasonalSpan {
        period: String,
        needed_hours: i64,
        got_hours: i64,
    },

    /// A required regressor is missing or non-finite at a timestamp.
    #[error("missing regressor '{name}' at {timestamp}")]
    MissingRegressor {
        name: String,
        timestamp: DateTime<Utc>,
    },

    /// A backtest split produced an empty partition.
    #[error("backtest holdout split produced an empty {partition} partition")]
    EmptyHoldout { partition: &'static str },

    /// Fitting exceeded the caller-supplied time budget.
    #[error("training exceeded the {budget_ms}ms time budget")]
    TrainingTimeout { budget_ms: u128 },

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Missing values detected when not allowed.
    #[error("missing values detected in data")]
    MissingValues,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    Computation(String),
}
