//! Forecast, alert and advisory engine.
//!
//! Every entry point is a pure function of its inputs plus an injected
//! [`random::RandomSource`] and an explicit "now", so each request builds
//! fresh values and tests can pin both.

pub mod alerts;
pub mod category;
pub mod cities;
pub mod forecast;
pub mod history;
pub mod pollutants;
pub mod random;
pub mod trends;
pub mod validation;

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use self::{
    alerts::Alert, cities::City, forecast::ForecastPoint, random::RandomSource,
    trends::TrendSeries,
};

/// Label reported alongside every synthesized report.
pub const DATA_SOURCE: &str = "NASA GIBS/Worldview + NOAA";
/// Reference date of the per-city baselines.
pub const DATA_DATE: &str = "2025-10-05";

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("invalid input for `{field}`: {value} is not a finite number")]
    InvalidInput { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pollutants {
    pub pm25: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weather {
    pub wind_speed: f64,
    pub temperature: f64,
    pub precipitation: f64,
}

/// Snapshot of conditions for one location at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub aqi: f64,
    pub pollutants: Pollutants,
    pub weather: Weather,
}

impl Reading {
    /// Reject NaN and infinities; everything else is accepted as-is.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            ("aqi", self.aqi),
            ("pm25", self.pollutants.pm25),
            ("pm10", self.pollutants.pm10),
            ("o3", self.pollutants.o3),
            ("no2", self.pollutants.no2),
            ("wind_speed", self.weather.wind_speed),
            ("temperature", self.weather.temperature),
            ("precipitation", self.weather.precipitation),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(EngineError::InvalidInput { field, value });
            }
        }
        Ok(())
    }
}

/// Language used for alert messages and city names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            "ru" | "ru-ru" => Ok(Self::Ru),
            other => Err(format!("unsupported locale '{other}'")),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::En => f.write_str("en"),
            Self::Ru => f.write_str("ru"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentConditions {
    pub aqi: f64,
    pub timestamp: DateTime<Utc>,
    pub pollutants: Pollutants,
    pub weather: Weather,
}

/// Full document served by the AQI endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AqiReport {
    pub city: String,
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastPoint>,
    pub trends: TrendSeries,
    pub alerts: Vec<Alert>,
    #[serde(rename = "dataSource")]
    pub data_source: &'static str,
    #[serde(rename = "dataDate")]
    pub data_date: &'static str,
}

/// Build the forecast, trends and alerts for one city reading.
pub fn build_report<R: RandomSource + ?Sized>(
    city: &City,
    reading: &Reading,
    locale: Locale,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<AqiReport, EngineError> {
    reading.validate()?;
    let forecast = forecast::generate(reading, now, rng);
    let alerts = alerts::classify(
        &reading.pollutants,
        &forecast,
        city.display_name(locale),
        locale,
        now,
    );
    let trends = trends::synthesize(
        reading.pollutants.no2,
        reading.pollutants.pm25,
        reading.pollutants.o3,
        now.date_naive(),
        rng,
    );
    Ok(AqiReport {
        city: city.code.to_string(),
        current: CurrentConditions {
            aqi: reading.aqi,
            timestamp: now,
            pollutants: reading.pollutants,
            weather: reading.weather,
        },
        forecast,
        trends,
        alerts,
        data_source: DATA_SOURCE,
        data_date: DATA_DATE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::ConstantRandom;
    use chrono::TimeZone;

    #[test]
    fn nan_input_is_rejected() {
        let mut reading = cities::NYC.baseline;
        reading.weather.temperature = f64::NAN;
        let err = reading.validate().unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidInput {
                field: "temperature",
                ..
            }
        ));
    }

    #[test]
    fn report_is_reproducible_with_fixed_randomness() {
        let now = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
        let city = &cities::LA;
        let a = build_report(city, &city.baseline, Locale::En, now, &mut ConstantRandom(0.3)).unwrap();
        let b = build_report(city, &city.baseline, Locale::En, now, &mut ConstantRandom(0.3)).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
        assert_eq!(a.city, "LA");
        assert_eq!(a.data_date, DATA_DATE);
    }

    #[test]
    fn locale_parses_common_tags() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }
}
