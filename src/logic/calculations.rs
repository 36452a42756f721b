use crate::models::WeatherObservation;
use chrono::Datelike;

/// Monsoon-sown season, June to October.
pub const KHARIF_MONTHS: [u32; 5] = [6, 7, 8, 9, 10];
/// Winter-sown season, November to March.
pub const RABI_MONTHS: [u32; 5] = [11, 12, 1, 2, 3];

/// Days with maximum temperature above this (°C) count as heat stress.
pub const HEAT_STRESS_TEMP_C: f64 = 35.0;
/// Length of the trailing window for "recent" conditions.
pub const RECENT_WINDOW_DAYS: usize = 30;

pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sample (n - 1) standard deviation; 0.0 with fewer than two values.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = values.iter().sum::<f64>() / values.len() as f64;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}

pub fn total_precipitation(rows: &[WeatherObservation]) -> f64 {
    rows.iter().map(|r| r.precip).sum()
}

/// Precipitation summed over rows whose calendar month is in `months`.
pub fn seasonal_rainfall(rows: &[WeatherObservation], months: &[u32]) -> f64 {
    rows.iter()
        .filter(|r| months.contains(&r.date.month()))
        .map(|r| r.precip)
        .sum()
}

pub fn rainy_days(rows: &[WeatherObservation]) -> u32 {
    rows.iter().filter(|r| r.precip > 0.0).count() as u32
}

pub fn heat_stress_days(rows: &[WeatherObservation]) -> u32 {
    rows.iter()
        .filter(|r| r.temp_max > HEAT_STRESS_TEMP_C)
        .count() as u32
}

pub fn drought_stress_days(rows: &[WeatherObservation]) -> u32 {
    rows.iter().filter(|r| r.precip == 0.0).count() as u32
}
