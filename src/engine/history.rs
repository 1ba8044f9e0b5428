//! Synthesized daily history and multi-day outlook used by charts and export.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::random::RandomSource;

const AQI_MIN: f64 = 20.0;
const AQI_MAX: f64 = 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub aqi: u32,
    pub pm25: u32,
    pub pm10: u32,
    pub no2: u32,
    pub o3: u32,
    pub so2: u32,
}

/// `(mean AQI, variance)` per city code.
fn baseline(city: &str) -> (f64, f64) {
    match city.to_ascii_uppercase().as_str() {
        "NYC" => (65.0, 25.0),
        "LA" => (85.0, 30.0),
        "CHI" => (70.0, 20.0),
        "HOU" => (75.0, 25.0),
        "PHX" => (80.0, 28.0),
        _ => (70.0, 25.0),
    }
}

fn rounded(value: f64) -> u32 {
    value.round().max(0.0) as u32
}

/// `days` points ending at `end` (inclusive), oldest first.
pub fn generate_historical<R: RandomSource + ?Sized>(
    city: &str,
    days: u32,
    end: NaiveDate,
    rng: &mut R,
) -> Vec<HistoricalPoint> {
    let (mean, variance) = baseline(city);
    (0..days)
        .rev()
        .map(|back| {
            let date = end - Days::new(u64::from(back));
            let weekly = (f64::from(back) / 7.0).sin() * 10.0;
            let aqi = (mean + weekly + rng.jitter(variance / 2.0)).clamp(AQI_MIN, AQI_MAX);
            HistoricalPoint {
                date,
                aqi: rounded(aqi),
                pm25: rounded(aqi * 0.4 + rng.next_unit() * 10.0),
                pm10: rounded(aqi * 0.5 + rng.next_unit() * 15.0),
                no2: rounded(aqi * 0.3 + rng.next_unit() * 8.0),
                o3: rounded(aqi * 0.35 + rng.next_unit() * 12.0),
                so2: rounded(aqi * 0.2 + rng.next_unit() * 5.0),
            }
        })
        .collect()
}

/// Daily outlook for the `days` dates after `start`.
pub fn generate_daily_forecast<R: RandomSource + ?Sized>(
    current_aqi: f64,
    days: u32,
    start: NaiveDate,
    rng: &mut R,
) -> Vec<HistoricalPoint> {
    (1..=days)
        .map(|ahead| {
            let aqi = (current_aqi + rng.jitter(7.5)).clamp(AQI_MIN, AQI_MAX);
            HistoricalPoint {
                date: start + Days::new(u64::from(ahead)),
                aqi: rounded(aqi),
                pm25: rounded(aqi * 0.4),
                pm10: rounded(aqi * 0.5),
                no2: rounded(aqi * 0.3),
                o3: rounded(aqi * 0.35),
                so2: rounded(aqi * 0.2),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
}

impl TimeRange {
    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "Last 7 Days",
            Self::Month => "Last 30 Days",
            Self::Quarter => "Last 90 Days",
        }
    }

    pub fn days(self) -> u32 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Quarter => 90,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "7d" => Ok(Self::Week),
            "30d" => Ok(Self::Month),
            "90d" => Ok(Self::Quarter),
            other => Err(format!("unsupported range '{other}', expected 7d, 30d or 90d")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::{ConstantRandom, StdRandom};

    fn end() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 5).unwrap()
    }

    #[test]
    fn history_ends_on_reference_date() {
        let points = generate_historical("NYC", 30, end(), &mut StdRandom::seeded(3));
        assert_eq!(points.len(), 30);
        assert_eq!(points.last().unwrap().date, end());
        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert!(points.iter().all(|p| (20..=180).contains(&p.aqi)));
    }

    #[test]
    fn newest_day_sits_on_baseline_without_jitter() {
        let points = generate_historical("la", 1, end(), &mut ConstantRandom(0.5));
        assert_eq!(points[0].aqi, 85);
    }

    #[test]
    fn outlook_starts_tomorrow() {
        let points = generate_daily_forecast(250.0, 3, end(), &mut ConstantRandom::neutral());
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
        assert_eq!(points[0].aqi, 180);
        assert_eq!(points[0].pm25, 72);
    }

    #[test]
    fn ranges_parse_and_label() {
        let range: TimeRange = "30d".parse().unwrap();
        assert_eq!(range.days(), 30);
        assert_eq!(range.label(), "Last 30 Days");
        assert!("1y".parse::<TimeRange>().is_err());
    }
}
