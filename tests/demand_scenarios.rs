//! End-to-end scenarios: synthetic hourly demand histories pushed through
//! fit, predict, backtest, and risk classification.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use std::collections::HashMap;

use gridcast::models::{
    DemandModel, ModelConfig, RegressorSpec, SeasonalPeriod, SeasonalitySpec,
    TEMPERATURE_FALLBACK_C,
};
use gridcast::prelude::*;
use gridcast::risk;

/// Hourly timestamps starting Monday 2025-01-06 00:00 UTC.
fn hourly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
    let base = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
    (0..n).map(|i| base + Duration::hours(i as i64)).collect()
}

fn is_weekend(ts: &DateTime<Utc>) -> bool {
    ts.weekday().number_from_monday() >= 6
}

fn trend_only_config() -> ModelConfig {
    ModelConfig::default().with_seasonality(SeasonalitySpec::none())
}

#[test]
fn linear_trend_backtest_meets_operational_accuracy() {
    // Four weeks of y = 10000 + 0.1·h with a one-week holdout. The model
    // should extrapolate the line almost exactly.
    let n = 24 * 28;
    let timestamps = hourly_timestamps(n);
    let demand: Vec<f64> = (0..n).map(|i| 10_000.0 + 0.1 * i as f64).collect();
    let series = TrainingSeries::univariate(timestamps, demand).unwrap();

    let summary = backtest(&series, &trend_only_config(), Some(Duration::days(7))).unwrap();
    assert!(summary.mae_mw < 5.0, "mae_mw = {}", summary.mae_mw);
    assert!(
        summary.accuracy_200mw > 99.0,
        "accuracy_200mw = {}",
        summary.accuracy_200mw
    );
}

#[test]
fn weekly_square_wave_amplitude_is_recovered() {
    // Eight weeks of a weekday/weekend square wave: +500 MW Monday through
    // Friday, −500 MW Saturday and Sunday. A truncated Fourier basis rings
    // at the transitions, so the recovered amplitude is measured as the gap
    // between the weekday and weekend plateau levels rather than the raw
    // extrema of the fitted curve.
    let n = 24 * 7 * 8;
    let timestamps = hourly_timestamps(n);
    let demand: Vec<f64> = timestamps
        .iter()
        .map(|ts| {
            if is_weekend(ts) {
                10_000.0 - 500.0
            } else {
                10_000.0 + 500.0
            }
        })
        .collect();
    let series = TrainingSeries::univariate(timestamps.clone(), demand).unwrap();

    let config = trend_only_config().with_seasonality(SeasonalitySpec {
        yearly: SeasonalPeriod::disabled(),
        weekly: SeasonalPeriod::enabled(10),
        daily: SeasonalPeriod::disabled(),
    });
    let model = DemandModel::fit(&series, &config).unwrap();

    let week = &timestamps[..24 * 7];
    let component = model.seasonal_component("weekly", week).unwrap();
    let (mut weekday_sum, mut weekday_n) = (0.0, 0usize);
    let (mut weekend_sum, mut weekend_n) = (0.0, 0usize);
    for (ts, value) in week.iter().zip(component.iter()) {
        if is_weekend(ts) {
            weekend_sum += value;
            weekend_n += 1;
        } else {
            weekday_sum += value;
            weekday_n += 1;
        }
    }
    let peak_to_trough = weekday_sum / weekday_n as f64 - weekend_sum / weekend_n as f64;
    assert!(
        (peak_to_trough - 1000.0).abs() < 100.0,
        "peak-to-trough = {:.1}",
        peak_to_trough
    );
}

#[test]
fn missing_temperature_hours_fall_back_to_minus_ten() {
    // Thirty days of temperature-driven demand, then a 48-hour forecast
    // where five hours of the temperature feed are missing.
    let n = 24 * 30;
    let timestamps = hourly_timestamps(n);
    let temperature: Vec<f64> = (0..n)
        .map(|i| -8.0 + 6.0 * (i as f64 * std::f64::consts::PI / 12.0).sin())
        .collect();
    let demand: Vec<f64> = temperature.iter().map(|&t| 9_800.0 - 35.0 * t).collect();
    let series = TrainingSeriesBuilder::new()
        .timestamps(timestamps.clone())
        .demand_mw(demand)
        .regressor("temperature_c", temperature)
        .build()
        .unwrap();

    let config = trend_only_config().with_regressor(RegressorSpec::temperature());
    let model = DemandModel::fit(&series, &config).unwrap();

    let last = *timestamps.last().unwrap();
    let future: Vec<_> = (1..=48).map(|i| last + Duration::hours(i)).collect();
    let mut temps: Vec<f64> = (0..48).map(|i| -6.0 + 0.1 * i as f64).collect();
    let gap_hours = [3usize, 11, 19, 30, 44];
    for &h in &gap_hours {
        temps[h] = f64::NAN;
    }
    let mut regressors = HashMap::new();
    regressors.insert("temperature_c".to_string(), temps.clone());

    let forecast = model.predict(&future, &regressors).unwrap();
    assert_eq!(forecast.len(), 48);

    let echoed = forecast.regressor("temperature_c").unwrap();
    for (i, &value) in echoed.iter().enumerate() {
        if gap_hours.contains(&i) {
            assert_eq!(value, TEMPERATURE_FALLBACK_C);
        } else {
            assert_eq!(value, temps[i]);
        }
    }
    for yhat in forecast.yhat() {
        assert!(yhat.is_finite());
    }
}

#[test]
fn required_regressor_without_fallback_is_a_hard_error() {
    let n = 24 * 30;
    let timestamps = hourly_timestamps(n);
    let weekend: Vec<f64> = timestamps
        .iter()
        .map(|ts| if is_weekend(ts) { 1.0 } else { 0.0 })
        .collect();
    let demand: Vec<f64> = weekend.iter().map(|&w| 10_200.0 - 700.0 * w).collect();
    let series = TrainingSeriesBuilder::new()
        .timestamps(timestamps.clone())
        .demand_mw(demand)
        .regressor("is_weekend", weekend)
        .build()
        .unwrap();

    let config = trend_only_config().with_regressor(RegressorSpec::weekend_indicator());
    let model = DemandModel::fit(&series, &config).unwrap();

    let last = *timestamps.last().unwrap();
    let future: Vec<_> = (1..=48).map(|i| last + Duration::hours(i)).collect();

    // Column absent entirely.
    match model.predict(&future, &HashMap::new()) {
        Err(ForecastError::MissingRegressor { name, .. }) => assert_eq!(name, "is_weekend"),
        other => panic!("expected MissingRegressor, got {:?}", other),
    }

    // Column present but with a hole; the error names the offending hour.
    let mut column: Vec<f64> = future.iter().map(|ts| is_weekend(ts) as u8 as f64).collect();
    column[7] = f64::NAN;
    let mut regressors = HashMap::new();
    regressors.insert("is_weekend".to_string(), column);
    match model.predict(&future, &regressors) {
        Err(ForecastError::MissingRegressor { name, timestamp }) => {
            assert_eq!(name, "is_weekend");
            assert_eq!(timestamp, future[7]);
        }
        other => panic!("expected MissingRegressor, got {:?}", other),
    }
}

#[test]
fn fit_and_predict_are_fully_deterministic() {
    let n = 24 * 7 * 8;
    let timestamps = hourly_timestamps(n);
    let demand: Vec<f64> = timestamps
        .iter()
        .enumerate()
        .map(|(i, ts)| {
            let daily = 400.0 * ((i % 24) as f64 * std::f64::consts::PI / 12.0).sin();
            let weekend = if is_weekend(ts) { -350.0 } else { 0.0 };
            10_100.0 + 0.05 * i as f64 + daily + weekend
        })
        .collect();
    let series = TrainingSeries::univariate(timestamps.clone(), demand).unwrap();

    let config = ModelConfig::default().with_seasonality(SeasonalitySpec {
        yearly: SeasonalPeriod::disabled(),
        weekly: SeasonalPeriod::enabled(3),
        daily: SeasonalPeriod::enabled(4),
    });
    let first = DemandModel::fit(&series, &config).unwrap();
    let second = DemandModel::fit(&series, &config).unwrap();
    assert_eq!(first, second);

    let last = *timestamps.last().unwrap();
    let future: Vec<_> = (1..=72).map(|i| last + Duration::hours(i)).collect();
    assert_eq!(
        first.predict(&future, &HashMap::new()).unwrap(),
        second.predict(&future, &HashMap::new()).unwrap()
    );
}

#[test]
fn forecast_outlook_flags_stressed_hours() {
    // Demand sitting near the warning band with a pronounced evening ramp;
    // the outlook should split hours across tiers.
    let n = 24 * 30;
    let timestamps = hourly_timestamps(n);
    let demand: Vec<f64> = (0..n)
        .map(|i| {
            let hour = i % 24;
            let ramp = if (17..21).contains(&hour) { 1_400.0 } else { 0.0 };
            10_200.0 + ramp
        })
        .collect();
    let series = TrainingSeries::univariate(timestamps.clone(), demand).unwrap();

    let config = trend_only_config().with_seasonality(SeasonalitySpec {
        yearly: SeasonalPeriod::disabled(),
        weekly: SeasonalPeriod::disabled(),
        daily: SeasonalPeriod::enabled(8),
    });
    let model = DemandModel::fit(&series, &config).unwrap();

    let last = *timestamps.last().unwrap();
    let future: Vec<_> = (1..=24).map(|i| last + Duration::hours(i)).collect();
    let forecast = model.predict(&future, &HashMap::new()).unwrap();

    let outlook = risk::outlook(&forecast, &RiskThresholds::default());
    assert_eq!(outlook.len(), 24);
    assert!(outlook.iter().any(|h| h.tier >= RiskTier::Warning));
    assert!(outlook.iter().any(|h| h.tier == RiskTier::Safe));
    for hour in &outlook {
        assert!(hour.demand_mw >= 0.0);
        assert!(hour.capacity_pct > 0.0);
        assert!(hour.demand_lower_mw <= hour.demand_upper_mw);
    }
}
