//! Numeric utilities shared by the model fitter and evaluator.

pub mod metrics;
pub mod ridge;
pub mod stats;

pub use metrics::{fraction_within, mae};
pub use ridge::{design_product, ridge_fit};
pub use stats::{interval_z, mean, std_dev, variance};
