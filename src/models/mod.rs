//! Forecasting models.

pub mod decomposable;

pub use decomposable::{
    DemandModel, ModelConfig, RegressorSpec, SeasonalPeriod, SeasonalityMode, SeasonalitySpec,
    Standardizer, TEMPERATURE_FALLBACK_C,
};
