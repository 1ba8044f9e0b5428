//! Satellite versus ground-station comparison.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Good,
    Acceptable,
    Poor,
}

impl ValidationStatus {
    /// |pct| < 10 is good, < 25 acceptable, anything else poor.
    pub fn classify(percent_difference: f64) -> Self {
        let magnitude = percent_difference.abs();
        if magnitude < 10.0 {
            Self::Good
        } else if magnitude < 25.0 {
            Self::Acceptable
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Station {
    pub id: &'static str,
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

const fn station(id: &'static str, name: &'static str, lat: f64, lng: f64) -> Station {
    Station { id, name, lat, lng }
}

pub static STATIONS: [Station; 36] = [
    station("NYC-001", "NYC Central", 40.7128, -74.006),
    station("NYC-002", "NYC Midtown", 40.758, -73.9855),
    station("LA-001", "LA Downtown", 34.0522, -118.2437),
    station("LA-002", "LA West", 34.0689, -118.4452),
    station("CHI-001", "Chicago Loop", 41.8781, -87.6298),
    station("HOU-001", "Houston Central", 29.7604, -95.3698),
    station("PHX-001", "Phoenix Metro", 33.4484, -112.074),
    station("PHL-001", "Philadelphia Center", 39.9526, -75.1652),
    station("SEA-001", "Seattle Downtown", 47.6062, -122.3321),
    station("SF-001", "San Francisco Bay", 37.7749, -122.4194),
    station("MIA-001", "Miami Beach", 25.7617, -80.1918),
    station("ATL-001", "Atlanta Midtown", 33.749, -84.388),
    station("DEN-001", "Denver Metro", 39.7392, -104.9903),
    station("BOS-001", "Boston Harbor", 42.3601, -71.0589),
    station("DC-001", "Washington DC", 38.9072, -77.0369),
    station("ANC-001", "Anchorage Central", 61.2181, -149.9003),
    station("FAI-001", "Fairbanks North", 64.8378, -147.7164),
    station("TOR-001", "Toronto Downtown", 43.6532, -79.3832),
    station("MTL-001", "Montreal Centre", 45.5017, -73.5673),
    station("VAN-001", "Vancouver Metro", 49.2827, -123.1207),
    station("CAL-001", "Calgary Central", 51.0447, -114.0719),
    station("EDM-001", "Edmonton North", 53.5461, -113.4938),
    station("OTT-001", "Ottawa Downtown", 45.4215, -75.6972),
    station("WIN-001", "Winnipeg Central", 49.8951, -97.1384),
    station("HAL-001", "Halifax Harbor", 44.6488, -63.5752),
    station("MEX-001", "Mexico City Centro", 19.4326, -99.1332),
    station("MEX-002", "Mexico City West", 19.391, -99.2837),
    station("GDL-001", "Guadalajara Centro", 20.6597, -103.3496),
    station("MTY-001", "Monterrey Metro", 25.6866, -100.3161),
    station("TIJ-001", "Tijuana Centro", 32.5149, -117.0382),
    station("PUE-001", "Puebla Centro", 19.0414, -98.2063),
    station("CUN-001", "Cancun Hotel Zone", 21.1619, -86.8515),
    station("GUA-001", "Guatemala City", 14.6349, -90.5069),
    station("SAL-001", "San Salvador Centro", 13.6929, -89.2182),
    station("SJO-001", "San Jose Centro", 9.9281, -84.0907),
    station("PTY-001", "Panama City", 8.9824, -79.5199),
];

#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub parameter: String,
    #[serde(rename = "stationId", skip_serializing_if = "Option::is_none")]
    pub station_id: Option<&'static str>,
    #[serde(rename = "stationName", skip_serializing_if = "Option::is_none")]
    pub station_name: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPair {
    pub satellite: Observation,
    pub ground_station: Observation,
    pub difference: f64,
    pub percent_difference: f64,
    pub status: ValidationStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub good: usize,
    pub acceptable: usize,
    pub poor: usize,
    pub total: usize,
    /// `(good + acceptable / 2) / total` as a percentage.
    pub accuracy: f64,
}

/// Pair a simulated satellite value with a ground value per station.
pub fn generate_pairs<R: RandomSource + ?Sized>(
    parameter: &str,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<ValidationPair> {
    STATIONS
        .iter()
        .map(|st| {
            let ground = rng.next_unit() * 80.0 + 20.0;
            let satellite = (ground + rng.jitter(10.0)).max(0.0);
            let difference = satellite - ground;
            let percent_difference = difference / ground * 100.0;
            ValidationPair {
                satellite: Observation {
                    lat: st.lat,
                    lng: st.lng,
                    value: satellite,
                    timestamp: now,
                    parameter: parameter.to_string(),
                    station_id: None,
                    station_name: None,
                },
                ground_station: Observation {
                    lat: st.lat,
                    lng: st.lng,
                    value: ground,
                    timestamp: now,
                    parameter: parameter.to_string(),
                    station_id: Some(st.id),
                    station_name: Some(st.name),
                },
                difference,
                percent_difference,
                status: ValidationStatus::classify(percent_difference),
            }
        })
        .collect()
}

pub fn summarize(pairs: &[ValidationPair]) -> ValidationSummary {
    let count = |status| pairs.iter().filter(|p| p.status == status).count();
    let good = count(ValidationStatus::Good);
    let acceptable = count(ValidationStatus::Acceptable);
    let poor = count(ValidationStatus::Poor);
    let total = pairs.len();
    let accuracy = if total == 0 {
        0.0
    } else {
        (good as f64 + acceptable as f64 * 0.5) / total as f64 * 100.0
    };
    ValidationSummary {
        good,
        acceptable,
        poor,
        total,
        accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::random::{ConstantRandom, StdRandom};
    use chrono::TimeZone;

    #[test]
    fn classification_boundaries() {
        assert_eq!(ValidationStatus::classify(9.99), ValidationStatus::Good);
        assert_eq!(ValidationStatus::classify(-10.0), ValidationStatus::Acceptable);
        assert_eq!(ValidationStatus::classify(24.9), ValidationStatus::Acceptable);
        assert_eq!(ValidationStatus::classify(25.0), ValidationStatus::Poor);
    }

    #[test]
    fn neutral_randomness_gives_perfect_agreement() {
        let now = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
        let pairs = generate_pairs("no2", now, &mut ConstantRandom::neutral());
        assert_eq!(pairs.len(), STATIONS.len());
        assert!(pairs.iter().all(|p| p.status == ValidationStatus::Good));
        let summary = summarize(&pairs);
        assert_eq!(summary.accuracy, 100.0);
    }

    #[test]
    fn summary_counts_add_up() {
        let now = Utc.with_ymd_and_hms(2025, 10, 5, 0, 0, 0).unwrap();
        let pairs = generate_pairs("pm25", now, &mut StdRandom::seeded(11));
        let s = summarize(&pairs);
        assert_eq!(s.good + s.acceptable + s.poor, s.total);
        assert!((0.0..=100.0).contains(&s.accuracy));
    }

    #[test]
    fn empty_summary_has_zero_accuracy() {
        assert_eq!(summarize(&[]).accuracy, 0.0);
    }
}
