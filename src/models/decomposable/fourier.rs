//! Truncated Fourier feature columns for seasonal cycles.

use chrono::{DateTime, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Timestamp as fractional days since the Unix epoch, the time unit shared
/// by all seasonal periods.
pub fn days_since_epoch(timestamp: DateTime<Utc>) -> f64 {
    timestamp.timestamp() as f64 / SECONDS_PER_DAY
        + timestamp.timestamp_subsec_nanos() as f64 / (SECONDS_PER_DAY * 1e9)
}

/// Generate `2·order` Fourier columns for one seasonal period.
///
/// For harmonic `j = 1..=order` the columns are `sin(2π j t / period)` then
/// `cos(2π j t / period)`, with `t` in days since the epoch and `period` in
/// days.
pub fn fourier_columns(
    timestamps: &[DateTime<Utc>],
    period_days: f64,
    order: usize,
) -> Vec<Vec<f64>> {
    let t_days: Vec<f64> = timestamps.iter().map(|ts| days_since_epoch(*ts)).collect();
    let mut columns = Vec::with_capacity(2 * order);

    for j in 1..=order {
        let freq = 2.0 * std::f64::consts::PI * j as f64 / period_days;
        columns.push(t_days.iter().map(|t| (freq * t).sin()).collect());
        columns.push(t_days.iter().map(|t| (freq * t).cos()).collect());
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone};

    fn hourly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let base = Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap();
        (0..n).map(|i| base + Duration::hours(i as i64)).collect()
    }

    #[test]
    fn column_count_is_twice_the_order() {
        let timestamps = hourly_timestamps(48);
        let columns = fourier_columns(&timestamps, 1.0, 4);
        assert_eq!(columns.len(), 8);
        for col in &columns {
            assert_eq!(col.len(), 48);
        }
    }

    #[test]
    fn values_are_bounded_sinusoids() {
        let timestamps = hourly_timestamps(200);
        for col in fourier_columns(&timestamps, 7.0, 3) {
            for v in col {
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn daily_features_repeat_every_24_hours() {
        let timestamps = hourly_timestamps(72);
        let columns = fourier_columns(&timestamps, 1.0, 2);
        for col in &columns {
            for i in 0..48 {
                assert_relative_eq!(col[i], col[i + 24], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn sin_cos_pair_traces_the_unit_circle() {
        let timestamps = hourly_timestamps(24);
        let columns = fourier_columns(&timestamps, 1.0, 1);
        for i in 0..24 {
            let (s, c) = (columns[0][i], columns[1][i]);
            assert_relative_eq!(s * s + c * c, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn zero_order_yields_no_columns() {
        let timestamps = hourly_timestamps(4);
        assert!(fourier_columns(&timestamps, 7.0, 0).is_empty());
    }

    #[test]
    fn days_since_epoch_counts_whole_days() {
        let day_one = Utc.with_ymd_and_hms(1970, 1, 2, 0, 0, 0).unwrap();
        assert_relative_eq!(days_since_epoch(day_one), 1.0, epsilon = 1e-9);

        let noon = Utc.with_ymd_and_hms(1970, 1, 2, 12, 0, 0).unwrap();
        assert_relative_eq!(days_since_epoch(noon), 1.5, epsilon = 1e-9);
    }
}
