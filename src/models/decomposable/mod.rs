//! Decomposable demand model: piecewise-linear trend with changepoints,
//! truncated Fourier seasonalities, and linear exogenous regressors, fit by
//! penalized least squares.
//!
//! In additive mode the target is `trend + seasonality + regressors`; in
//! multiplicative mode seasonal and regressor effects scale the trend as
//! fractional adjustments, linearized by regressing `y / trend − 1` on the
//! seasonal and regressor columns after a trend-only fit.

mod config;
mod fourier;
mod standardize;
mod trend;

pub use config::{
    ModelConfig, RegressorSpec, SeasonalPeriod, SeasonalityMode, SeasonalitySpec,
    TEMPERATURE_FALLBACK_C,
};
pub use standardize::Standardizer;

use crate::core::{Forecast, TrainingSeries};
use crate::error::{ForecastError, Result};
use crate::utils::ridge::{design_product, ridge_fit};
use crate::utils::stats::{interval_z, std_dev};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use fourier::fourier_columns;
use trend::{evaluate_trend, place_changepoints, trend_columns, TimeScale};

/// Trend denominators below this (in scaled units) are clamped during the
/// multiplicative ratio regression.
const MIN_TREND_SCALED: f64 = 1e-8;

/// Fitted Fourier coefficients for one seasonal cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SeasonalBlock {
    name: String,
    period_days: f64,
    harmonic_order: usize,
    /// Interleaved sin/cos coefficients, `2 · harmonic_order` entries.
    coefficients: Vec<f64>,
}

/// Fitted state for one exogenous regressor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct FittedRegressor {
    name: String,
    standardizer: Standardizer,
    coefficient: f64,
    fallback: Option<f64>,
}

/// A trained demand model: the read-only artifact produced by [`fit`].
///
/// Immutable after construction, safe to share across concurrent predict and
/// backtest callers, and serializable so the persistence collaborator can
/// save and reload it without re-fitting.
///
/// [`fit`]: DemandModel::fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandModel {
    mode: SeasonalityMode,
    interval_width: f64,
    time_scale: TimeScale,
    train_start: DateTime<Utc>,
    train_end: DateTime<Utc>,
    /// Target scale: the fit runs on `y / y_scale`.
    y_scale: f64,
    offset: f64,
    base_rate: f64,
    /// Changepoint locations in scaled training time.
    changepoints: Vec<f64>,
    /// Per-changepoint slope deltas.
    deltas: Vec<f64>,
    seasonal: Vec<SeasonalBlock>,
    regressors: Vec<FittedRegressor>,
    /// Residual noise scale in MW, parameterizing the uncertainty bands.
    sigma_mw: f64,
}

impl DemandModel {
    /// Fit the model to a training series.
    ///
    /// Fails with `InsufficientData` when the series has fewer observations
    /// than twice the configured changepoint count, and with
    /// `InsufficientSeasonalSpan` when it covers less than one full cycle of
    /// an enabled seasonality. When `config.timeout` is set, exceeding the
    /// budget aborts with `TrainingTimeout` — never a partially fit model.
    pub fn fit(series: &TrainingSeries, config: &ModelConfig) -> Result<Self> {
        let started = Instant::now();
        let n = series.len();

        if n == 0 {
            return Err(ForecastError::EmptyData);
        }
        let needed = 2 * config.n_changepoints;
        if n < needed {
            return Err(ForecastError::InsufficientData { needed, got: n });
        }
        if !(0.0..1.0).contains(&config.interval_width) || config.interval_width == 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "interval_width must be in (0, 1), got {}",
                config.interval_width
            )));
        }
        if config.changepoint_prior_scale <= 0.0 {
            return Err(ForecastError::InvalidParameter(format!(
                "changepoint_prior_scale must be positive, got {}",
                config.changepoint_prior_scale
            )));
        }

        let span_hours = series.span().num_hours();
        for (name, period_days, _) in config.seasonality.enabled_periods() {
            let needed_hours = (period_days * 24.0).ceil() as i64;
            if span_hours < needed_hours {
                return Err(ForecastError::InsufficientSeasonalSpan {
                    period: name.to_string(),
                    needed_hours,
                    got_hours: span_hours,
                });
            }
        }

        // Regressor columns, standardized with training-window statistics.
        let mut fitted_regressors = Vec::with_capacity(config.regressors.len());
        let mut regressor_columns: Vec<Vec<f64>> = Vec::with_capacity(config.regressors.len());
        for spec in &config.regressors {
            let raw = series.regressor(&spec.name).ok_or_else(|| {
                ForecastError::MissingRegressor {
                    name: spec.name.clone(),
                    timestamp: series.timestamps()[0],
                }
            })?;
            let standardizer = if spec.standardize {
                Standardizer::fit(raw)
            } else {
                Standardizer::identity()
            };
            regressor_columns.push(raw.iter().map(|&v| standardizer.transform(v)).collect());
            fitted_regressors.push(FittedRegressor {
                name: spec.name.clone(),
                standardizer,
                coefficient: 0.0,
                fallback: spec.fallback,
            });
        }

        let train_start = series.timestamps()[0];
        let train_end = *series.timestamps().last().unwrap_or(&train_start);
        let time_scale = TimeScale::new(train_start, train_end);
        let t_scaled: Vec<f64> = series
            .timestamps()
            .iter()
            .map(|ts| time_scale.scale(*ts))
            .collect();
        let changepoints = place_changepoints(config.n_changepoints, n);

        let y_mw = series.demand_mw();
        let y_scale = y_mw
            .iter()
            .fold(0.0_f64, |acc, v| acc.max(v.abs()))
            .max(1e-12);
        let y_scaled: Vec<f64> = y_mw.iter().map(|v| v / y_scale).collect();

        let mut seasonal_columns: Vec<Vec<Vec<f64>>> = Vec::new();
        let mut seasonal_blocks: Vec<SeasonalBlock> = Vec::new();
        for (name, period_days, order) in config.seasonality.enabled_periods() {
            seasonal_columns.push(fourier_columns(series.timestamps(), period_days, order));
            seasonal_blocks.push(SeasonalBlock {
                name: name.to_string(),
                period_days,
                harmonic_order: order,
                coefficients: Vec::new(),
            });
        }

        check_deadline(started, config)?;

        let cp_penalty = config.changepoint_prior_scale.powi(-2);
        let trend_block = trend_columns(&t_scaled, &changepoints);

        let (offset, base_rate, deltas, fitted_scaled) = match config.mode {
            SeasonalityMode::Additive => {
                let mut columns = trend_block;
                let mut penalties = vec![0.0, 0.0];
                penalties.extend(std::iter::repeat(cp_penalty).take(changepoints.len()));
                for block in &seasonal_columns {
                    for col in block {
                        columns.push(col.clone());
                        penalties.push(0.0);
                    }
                }
                for col in &regressor_columns {
                    columns.push(col.clone());
                    penalties.push(0.0);
                }

                let beta = ridge_fit(&columns, &y_scaled, &penalties)?;
                check_deadline(started, config)?;
                let fitted = design_product(&columns, &beta);

                let mut cursor = 2 + changepoints.len();
                for (block, cols) in seasonal_blocks.iter_mut().zip(seasonal_columns.iter()) {
                    block.coefficients = beta[cursor..cursor + cols.len()].to_vec();
                    cursor += cols.len();
                }
                for regressor in fitted_regressors.iter_mut() {
                    regressor.coefficient = beta[cursor];
                    cursor += 1;
                }

                (
                    beta[0],
                    beta[1],
                    beta[2..2 + changepoints.len()].to_vec(),
                    fitted,
                )
            }
            SeasonalityMode::Multiplicative => {
                // Trend-only fit, then ratio linearization of the remaining
                // effects: seasonal and regressor coefficients become
                // fractional adjustments to the trend.
                let mut penalties = vec![0.0, 0.0];
                penalties.extend(std::iter::repeat(cp_penalty).take(changepoints.len()));
                let beta_trend = ridge_fit(&trend_block, &y_scaled, &penalties)?;
                check_deadline(started, config)?;
                let trend_fit = design_product(&trend_block, &beta_trend);

                let ratio: Vec<f64> = y_scaled
                    .iter()
                    .zip(trend_fit.iter())
                    .map(|(&y, &tr)| {
                        let denom = if tr.abs() < MIN_TREND_SCALED {
                            MIN_TREND_SCALED.copysign(tr)
                        } else {
                            tr
                        };
                        y / denom - 1.0
                    })
                    .collect();

                let mut aux_columns: Vec<Vec<f64>> = Vec::new();
                for block in &seasonal_columns {
                    for col in block {
                        aux_columns.push(col.clone());
                    }
                }
                for col in &regressor_columns {
                    aux_columns.push(col.clone());
                }

                let beta_aux = if aux_columns.is_empty() {
                    Vec::new()
                } else {
                    ridge_fit(&aux_columns, &ratio, &vec![0.0; aux_columns.len()])?
                };
                check_deadline(started, config)?;

                let mut cursor = 0;
                for (block, cols) in seasonal_blocks.iter_mut().zip(seasonal_columns.iter()) {
                    block.coefficients = beta_aux[cursor..cursor + cols.len()].to_vec();
                    cursor += cols.len();
                }
                for regressor in fitted_regressors.iter_mut() {
                    regressor.coefficient = beta_aux[cursor];
                    cursor += 1;
                }

                let aux_effect = design_product(&aux_columns, &beta_aux);
                let fitted: Vec<f64> = trend_fit
                    .iter()
                    .enumerate()
                    .map(|(i, &tr)| {
                        let effect = aux_effect.get(i).copied().unwrap_or(0.0);
                        tr * (1.0 + effect)
                    })
                    .collect();

                (
                    beta_trend[0],
                    beta_trend[1],
                    beta_trend[2..2 + changepoints.len()].to_vec(),
                    fitted,
                )
            }
        };

        let residuals_mw: Vec<f64> = y_mw
            .iter()
            .zip(fitted_scaled.iter())
            .map(|(&y, &f)| y - f * y_scale)
            .collect();
        let sigma = std_dev(&residuals_mw);
        let sigma_mw = if sigma.is_finite() { sigma } else { 0.0 };

        check_deadline(started, config)?;

        Ok(Self {
            mode: config.mode,
            interval_width: config.interval_width,
            time_scale,
            train_start,
            train_end,
            y_scale,
            offset,
            base_rate,
            changepoints,
            deltas,
            seasonal: seasonal_blocks,
            regressors: fitted_regressors,
            sigma_mw,
        })
    }

    /// Forecast at the given future timestamps.
    ///
    /// `regressors` must supply a value for every regressor the model was
    /// trained with. Non-finite or absent values are substituted with the
    /// regressor's configured fallback when it has one (temperature: −10.0)
    /// and rejected with `MissingRegressor` otherwise. Bounds widen with
    /// distance past the training boundary; the forecast echoes the resolved
    /// regressor columns.
    pub fn predict(
        &self,
        timestamps: &[DateTime<Utc>],
        regressors: &HashMap<String, Vec<f64>>,
    ) -> Result<Forecast> {
        for w in timestamps.windows(2) {
            if w[1] <= w[0] {
                return Err(ForecastError::Timestamp(
                    "future timestamps must be strictly increasing".to_string(),
                ));
            }
        }
        if timestamps.is_empty() {
            return Ok(Forecast::default());
        }
        let n = timestamps.len();

        // Resolve regressor columns, applying the sanctioned fallbacks.
        let mut resolved: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for regressor in &self.regressors {
            let column = match regressors.get(&regressor.name) {
                Some(values) => {
                    if values.len() != n {
                        return Err(ForecastError::DimensionMismatch {
                            expected: n,
                            got: values.len(),
                        });
                    }
                    let mut column = Vec::with_capacity(n);
                    for (i, &v) in values.iter().enumerate() {
                        if v.is_finite() {
                            column.push(v);
                        } else if let Some(fallback) = regressor.fallback {
                            column.push(fallback);
                        } else {
                            return Err(ForecastError::MissingRegressor {
                                name: regressor.name.clone(),
                                timestamp: timestamps[i],
                            });
                        }
                    }
                    column
                }
                None => match regressor.fallback {
                    Some(fallback) => vec![fallback; n],
                    None => {
                        return Err(ForecastError::MissingRegressor {
                            name: regressor.name.clone(),
                            timestamp: timestamps[0],
                        })
                    }
                },
            };
            resolved.insert(regressor.name.clone(), column);
        }

        let t_scaled: Vec<f64> = timestamps
            .iter()
            .map(|ts| self.time_scale.scale(*ts))
            .collect();
        let trend_scaled = evaluate_trend(
            &t_scaled,
            self.offset,
            self.base_rate,
            &self.changepoints,
            &self.deltas,
        );

        let mut effect = vec![0.0; n];
        for block in &self.seasonal {
            let columns = fourier_columns(timestamps, block.period_days, block.harmonic_order);
            let block_effect = design_product(&columns, &block.coefficients);
            for (e, b) in effect.iter_mut().zip(block_effect.iter()) {
                *e += b;
            }
        }
        for regressor in &self.regressors {
            let column = &resolved[&regressor.name];
            for (e, &v) in effect.iter_mut().zip(column.iter()) {
                *e += regressor.coefficient * regressor.standardizer.transform(v);
            }
        }

        let yhat: Vec<f64> = trend_scaled
            .iter()
            .zip(effect.iter())
            .map(|(&tr, &ef)| {
                let combined = match self.mode {
                    SeasonalityMode::Additive => tr + ef,
                    SeasonalityMode::Multiplicative => tr * (1.0 + ef),
                };
                combined * self.y_scale
            })
            .collect();

        // Trend continuation dominates forecast uncertainty: the band grows
        // with distance past the training boundary (in units of the training
        // span) while the seasonal/regressor share stays constant-width.
        let z = interval_z(self.interval_width);
        let mut yhat_lower = Vec::with_capacity(n);
        let mut yhat_upper = Vec::with_capacity(n);
        for (&point, &t) in yhat.iter().zip(t_scaled.iter()) {
            let widening = (1.0 + (t - 1.0).max(0.0)).sqrt();
            let half_width = z * self.sigma_mw * widening;
            yhat_lower.push(point - half_width);
            yhat_upper.push(point + half_width);
        }

        Ok(Forecast::from_columns(
            timestamps.to_vec(),
            yhat,
            yhat_lower,
            yhat_upper,
            resolved,
        ))
    }

    /// Evaluate the trend component alone (MW) at the given timestamps.
    pub fn trend_component(&self, timestamps: &[DateTime<Utc>]) -> Vec<f64> {
        let t_scaled: Vec<f64> = timestamps
            .iter()
            .map(|ts| self.time_scale.scale(*ts))
            .collect();
        evaluate_trend(
            &t_scaled,
            self.offset,
            self.base_rate,
            &self.changepoints,
            &self.deltas,
        )
        .into_iter()
        .map(|v| v * self.y_scale)
        .collect()
    }

    /// Evaluate one seasonal component at the given timestamps.
    ///
    /// Additive mode returns MW; multiplicative mode returns the fractional
    /// adjustment applied to the trend.
    pub fn seasonal_component(
        &self,
        name: &str,
        timestamps: &[DateTime<Utc>],
    ) -> Result<Vec<f64>> {
        let block = self
            .seasonal
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| {
                ForecastError::InvalidParameter(format!("unknown seasonal component '{name}'"))
            })?;
        let columns = fourier_columns(timestamps, block.period_days, block.harmonic_order);
        let effect = design_product(&columns, &block.coefficients);
        Ok(match self.mode {
            SeasonalityMode::Additive => effect.into_iter().map(|v| v * self.y_scale).collect(),
            SeasonalityMode::Multiplicative => effect,
        })
    }

    /// De-standardized coefficient of a regressor, per original unit.
    ///
    /// Additive mode: MW per unit. Multiplicative mode: fractional trend
    /// adjustment per unit.
    pub fn regressor_coefficient(&self, name: &str) -> Option<f64> {
        self.regressors.iter().find(|r| r.name == name).map(|r| {
            let per_unit = if r.standardizer.std() == 0.0 {
                r.coefficient
            } else {
                r.coefficient / r.standardizer.std()
            };
            match self.mode {
                SeasonalityMode::Additive => per_unit * self.y_scale,
                SeasonalityMode::Multiplicative => per_unit,
            }
        })
    }

    /// Combination mode the model was trained with.
    pub fn mode(&self) -> SeasonalityMode {
        self.mode
    }

    /// Configured central interval width.
    pub fn interval_width(&self) -> f64 {
        self.interval_width
    }

    /// Training time range (first and last training timestamp).
    pub fn train_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.train_start, self.train_end)
    }

    /// Residual noise scale estimated from training residuals (MW).
    pub fn sigma_mw(&self) -> f64 {
        self.sigma_mw
    }

    /// Names of the regressors the model was trained with.
    pub fn regressor_names(&self) -> impl Iterator<Item = &str> {
        self.regressors.iter().map(|r| r.name.as_str())
    }
}

fn check_deadline(started: Instant, config: &ModelConfig) -> Result<()> {
    if let Some(budget) = config.timeout {
        if started.elapsed() >= budget {
            return Err(ForecastError::TrainingTimeout {
                budget_ms: budget.as_millis(),
            });
        }
    }
    Ok(())
}
