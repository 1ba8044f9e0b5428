//! Fixed registry of supported cities and their baseline readings.

use strsim::jaro_winkler;

use super::{Locale, Pollutants, Reading, Weather};

/// Minimum Jaro-Winkler similarity for a free-text name to resolve.
const NAME_MATCH_THRESHOLD: f64 = 0.88;

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub code: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
    pub baseline: Reading,
    /// Locative form used inside Russian alert templates.
    name_ru: &'static str,
}

impl City {
    pub fn display_name(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::En => self.name,
            Locale::Ru => self.name_ru,
        }
    }
}

pub static NYC: City = City {
    code: "NYC",
    name: "New York City",
    lat: 40.7128,
    lon: -74.006,
    baseline: Reading {
        aqi: 58.0,
        pollutants: Pollutants {
            pm25: 13.2,
            pm10: 24.8,
            o3: 52.0,
            no2: 19.0,
        },
        weather: Weather {
            wind_speed: 6.8,
            temperature: 18.0,
            precipitation: 0.2,
        },
    },
    name_ru: "Нью-Йорке",
};

pub static LA: City = City {
    code: "LA",
    name: "Los Angeles",
    lat: 34.0522,
    lon: -118.2437,
    baseline: Reading {
        aqi: 75.0,
        pollutants: Pollutants {
            pm25: 18.5,
            pm10: 32.1,
            o3: 68.0,
            no2: 24.0,
        },
        weather: Weather {
            wind_speed: 4.2,
            temperature: 24.0,
            precipitation: 0.0,
        },
    },
    name_ru: "Лос-Анджелесе",
};

pub static CITIES: [&City; 2] = [&NYC, &LA];

/// Resolve a city by code (case-insensitive) or by a close-enough name.
pub fn resolve(input: &str) -> Option<&'static City> {
    let needle = input.trim();
    if needle.is_empty() {
        return None;
    }
    if let Some(city) = CITIES
        .iter()
        .copied()
        .find(|c| c.code.eq_ignore_ascii_case(needle))
    {
        return Some(city);
    }
    let lowered = needle.to_lowercase();
    CITIES
        .iter()
        .map(|c| (c, jaro_winkler(&lowered, &c.name.to_lowercase())))
        .filter(|(_, score)| *score >= NAME_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| *c)
}

/// Comma-separated list of codes, for error messages.
pub fn known_codes() -> String {
    CITIES.iter().map(|c| c.code).collect::<Vec<_>>().join(", ")
}
