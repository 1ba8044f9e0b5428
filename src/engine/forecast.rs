//! 24-hour AQI and pollutant forecast.
//!
//! A deliberately simple linear heuristic: fixed weather/pollutant
//! coefficients plus a rush-hour bump. Coefficients are part of the
//! observable behaviour and must not be tuned.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::{random::RandomSource, Reading};

pub const HORIZON_HOURS: u32 = 24;

const WIND_COEF: f64 = -2.5;
const TEMP_COEF: f64 = 0.8;
const PRECIP_COEF: f64 = -5.0;
const O3_COEF: f64 = 0.4;
const NO2_COEF: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub hour: u32,
    pub aqi: f64,
    pub o3: f64,
    pub no2: f64,
    pub pm25: f64,
    pub timestamp: DateTime<Utc>,
}

/// Additive AQI bump for an hour offset: morning rush 7-9, midday 12-14,
/// evening rush 17-19.
pub fn time_of_day_bump(hour: u32) -> f64 {
    match hour {
        7..=9 => 12.0,
        12..=14 => 8.0,
        17..=19 => 15.0,
        _ => 0.0,
    }
}

/// Sum of the five linear contribution terms for a reading.
pub fn linear_terms(reading: &Reading) -> f64 {
    let w = &reading.weather;
    let p = &reading.pollutants;
    WIND_COEF * (w.wind_speed / 10.0)
        + TEMP_COEF * (w.temperature / 25.0)
        + PRECIP_COEF * w.precipitation
        + O3_COEF * (p.o3 / 50.0)
        + NO2_COEF * (p.no2 / 25.0)
}

/// Produce exactly [`HORIZON_HOURS`] points in ascending hour order. Point
/// `i` is stamped `now + i` hours.
pub fn generate<R: RandomSource + ?Sized>(
    reading: &Reading,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ForecastPoint> {
    let base = reading.aqi + linear_terms(reading);
    let p = &reading.pollutants;
    let pm25_drift = if reading.weather.wind_speed < 5.0 { 3.0 } else { -2.0 };

    (0..HORIZON_HOURS)
        .map(|hour| {
            let bump = time_of_day_bump(hour);
            let aqi = (base + bump + rng.jitter(3.0)).max(0.0).round();

            let phase = (f64::from(hour) - 6.0) / 4.0;
            let o3 = (p.o3 + 12.0 * phase.sin() + rng.jitter(2.5)).max(0.0).round();
            let no2 = (p.no2 + 0.5 * bump + rng.jitter(1.5)).max(0.0).round();
            let pm25 = round_tenth((p.pm25 + pm25_drift + rng.jitter(1.0)).max(0.0));

            ForecastPoint {
                hour,
                aqi,
                o3,
                no2,
                pm25,
                timestamp: now + Duration::hours(i64::from(hour)),
            }
        })
        .collect()
}

/// Highest forecast AQI, or 0 for an empty forecast.
pub fn peak_aqi(forecast: &[ForecastPoint]) -> f64 {
    forecast.iter().map(|p| p.aqi).fold(0.0, f64::max)
}

pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
