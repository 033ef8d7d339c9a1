//! Core data structures: training series and forecast results.

mod forecast;
mod time_series;

pub use forecast::{Forecast, ForecastRecord};
pub use time_series::{TrainingSeries, TrainingSeriesBuilder};
