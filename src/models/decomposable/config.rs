//! Configuration for the decomposable demand model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Temperature value substituted when a future hour has no forecast
/// temperature available (°C). The one sanctioned prediction-time fallback.
pub const TEMPERATURE_FALLBACK_C: f64 = -10.0;

/// How seasonal and regressor effects combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeasonalityMode {
    /// Effects add a fixed quantity to the trend.
    #[default]
    Additive,
    /// Effects scale the trend as fractional adjustments:
    /// `trend · (1 + seasonal + regressors)`.
    Multiplicative,
}

/// A named seasonal period with its truncated Fourier order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalPeriod {
    pub enabled: bool,
    /// Number of Fourier harmonics (each contributes a sin and a cos column).
    pub harmonic_order: usize,
}

impl SeasonalPeriod {
    pub fn enabled(harmonic_order: usize) -> Self {
        Self {
            enabled: true,
            harmonic_order,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            harmonic_order: 0,
        }
    }
}

/// Which seasonal cycles the model fits, and at what harmonic order.
///
/// Defaults are the standard orders for this model class: yearly 10,
/// weekly 3, daily 4, all enabled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySpec {
    pub yearly: SeasonalPeriod,
    pub weekly: SeasonalPeriod,
    pub daily: SeasonalPeriod,
}

impl Default for SeasonalitySpec {
    fn default() -> Self {
        Self {
            yearly: SeasonalPeriod::enabled(10),
            weekly: SeasonalPeriod::enabled(3),
            daily: SeasonalPeriod::enabled(4),
        }
    }
}

impl SeasonalitySpec {
    /// All cycles disabled (trend and regressors only).
    pub fn none() -> Self {
        Self {
            yearly: SeasonalPeriod::disabled(),
            weekly: SeasonalPeriod::disabled(),
            daily: SeasonalPeriod::disabled(),
        }
    }

    /// Enabled `(name, period in days, harmonic order)` triples.
    pub(crate) fn enabled_periods(&self) -> Vec<(&'static str, f64, usize)> {
        let mut periods = Vec::new();
        if self.yearly.enabled {
            periods.push(("yearly", 365.25, self.yearly.harmonic_order));
        }
        if self.weekly.enabled {
            periods.push(("weekly", 7.0, self.weekly.harmonic_order));
        }
        if self.daily.enabled {
            periods.push(("daily", 1.0, self.daily.harmonic_order));
        }
        periods
    }
}

/// An exogenous regressor the model should use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorSpec {
    pub name: String,
    /// Z-score the regressor with training-window statistics.
    pub standardize: bool,
    /// Value substituted for hours where the regressor is unavailable at
    /// prediction time. `None` means a missing value is a caller error.
    pub fallback: Option<f64>,
}

impl RegressorSpec {
    /// A standardized regressor with no prediction-time fallback.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            standardize: true,
            fallback: None,
        }
    }

    pub fn standardize(mut self, standardize: bool) -> Self {
        self.standardize = standardize;
        self
    }

    pub fn with_fallback(mut self, fallback: f64) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Hourly ambient temperature (°C): standardized, with the documented
    /// fallback for hours the weather provider cannot cover.
    pub fn temperature() -> Self {
        Self::new("temperature_c").with_fallback(TEMPERATURE_FALLBACK_C)
    }

    /// Weekend indicator (0/1): left unscaled, no fallback — the caller can
    /// always derive it from the timestamp.
    pub fn weekend_indicator() -> Self {
        Self::new("is_weekend").standardize(false)
    }
}

/// Full model configuration handed to [`DemandModel::fit`].
///
/// [`DemandModel::fit`]: crate::models::DemandModel::fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub seasonality: SeasonalitySpec,
    pub mode: SeasonalityMode,
    /// Maximum number of trend changepoints.
    pub n_changepoints: usize,
    /// Trend flexibility knob: the L2 penalty on changepoint slope deltas is
    /// `1 / changepoint_prior_scale²`, so larger values allow more bends.
    pub changepoint_prior_scale: f64,
    /// Central uncertainty interval width in (0, 1).
    pub interval_width: f64,
    pub regressors: Vec<RegressorSpec>,
    /// Wall-clock budget for a single fit. Exceeding it aborts the fit with
    /// `TrainingTimeout` instead of returning a partially fit model.
    #[serde(skip)]
    pub timeout: Option<Duration>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seasonality: SeasonalitySpec::default(),
            mode: SeasonalityMode::Additive,
            n_changepoints: 25,
            changepoint_prior_scale: 0.05,
            interval_width: 0.95,
            regressors: Vec::new(),
            timeout: None,
        }
    }
}

impl ModelConfig {
    /// The configuration used for operational hourly demand training:
    /// multiplicative seasonality with temperature and weekend regressors.
    pub fn hourly_demand() -> Self {
        Self {
            mode: SeasonalityMode::Multiplicative,
            regressors: vec![
                RegressorSpec::temperature(),
                RegressorSpec::weekend_indicator(),
            ],
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: SeasonalityMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_seasonality(mut self, seasonality: SeasonalitySpec) -> Self {
        self.seasonality = seasonality;
        self
    }

    pub fn with_regressor(mut self, spec: RegressorSpec) -> Self {
        self.regressors.push(spec);
        self
    }

    pub fn with_changepoints(mut self, n: usize, prior_scale: f64) -> Self {
        self.n_changepoints = n;
        self.changepoint_prior_scale = prior_scale;
        self
    }

    pub fn with_interval_width(mut self, width: f64) -> Self {
        self.interval_width = width;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
