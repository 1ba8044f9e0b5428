//! Threshold alerts derived from current pollutant levels and the forecast peak.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    forecast::{peak_aqi, ForecastPoint},
    Locale, Pollutants,
};

/// Peak forecast AQI above which a high alert fires.
pub const FORECAST_AQI_HIGH: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub message: String,
    pub pollutant: &'static str,
    pub value: f64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    No2,
    O3,
    Pm25,
    ForecastAqi,
}

impl Trigger {
    fn label(self) -> &'static str {
        match self {
            Self::No2 => "NO2",
            Self::O3 => "O3",
            Self::Pm25 => "PM2.5",
            Self::ForecastAqi => "AQI",
        }
    }
}

/// `(trigger, moderate_above, high_above)` for the current-level rules.
const POLLUTANT_RULES: [(Trigger, f64, f64); 3] = [
    (Trigger::No2, 25.0, 40.0),
    (Trigger::O3, 70.0, 100.0),
    (Trigger::Pm25, 15.0, 35.0),
];

fn band(value: f64, moderate_above: f64, high_above: f64) -> Option<Severity> {
    if value > high_above {
        Some(Severity::High)
    } else if value > moderate_above {
        Some(Severity::Moderate)
    } else {
        None
    }
}

/// Evaluate every rule independently; zero or more alerts may fire.
pub fn classify(
    pollutants: &Pollutants,
    forecast: &[ForecastPoint],
    city_name: &str,
    locale: Locale,
    now: DateTime<Utc>,
) -> Vec<Alert> {
    let mut alerts = Vec::new();

    for (trigger, moderate_above, high_above) in POLLUTANT_RULES {
        let value = match trigger {
            Trigger::No2 => pollutants.no2,
            Trigger::O3 => pollutants.o3,
            Trigger::Pm25 => pollutants.pm25,
            Trigger::ForecastAqi => continue,
        };
        if let Some(severity) = band(value, moderate_above, high_above) {
            alerts.push(Alert {
                severity,
                message: render(trigger, severity, value, city_name, locale),
                pollutant: trigger.label(),
                value,
                timestamp: now,
            });
        }
    }

    let peak = peak_aqi(forecast);
    if peak > FORECAST_AQI_HIGH {
        alerts.push(Alert {
            severity: Severity::High,
            message: render(Trigger::ForecastAqi, Severity::High, peak, city_name, locale),
            pollutant: Trigger::ForecastAqi.label(),
            value: peak,
            timestamp: now,
        });
    }

    alerts
}

fn render(trigger: Trigger, severity: Severity, value: f64, city: &str, locale: Locale) -> String {
    use Severity::{High, Moderate};
    use Trigger::{ForecastAqi, No2, Pm25, O3};

    match (locale, trigger, severity) {
        (Locale::En, No2, High) => format!(
            "🚨 Critical NO₂ level ({value} µg/m³) in {city}. Avoid outdoor exertion and keep windows closed."
        ),
        (Locale::En, No2, Moderate) => format!(
            "⚠️ Elevated NO₂ ({value} µg/m³) in {city}. Sensitive groups should limit time outdoors."
        ),
        (Locale::En, O3, High) => format!(
            "🚨 Dangerous ozone O₃ level ({value} µg/m³) in {city}. Do not go outside unless necessary."
        ),
        (Locale::En, O3, Moderate) => format!(
            "⚠️ Elevated ozone O₃ ({value} µg/m³) in {city}. Avoid intense outdoor exercise."
        ),
        (Locale::En, Pm25, High) => format!(
            "🚨 High PM2.5 concentration ({value} µg/m³) in {city}. Wear an N95 mask when going outside."
        ),
        (Locale::En, Pm25, Moderate) => format!(
            "⚠️ Moderate PM2.5 level ({value} µg/m³) in {city}. People with respiratory conditions should be careful."
        ),
        (Locale::En, ForecastAqi, _) => format!(
            "🚨 Forecast: unhealthy air quality (AQI {value}) in {city} within the next 24 hours."
        ),
        (Locale::Ru, No2, High) => format!(
            "🚨 Критический уровень NO₂ ({value} мкг/м³) в {city}. Избегайте физических нагрузок на улице. Закройте окна."
        ),
        (Locale::Ru, No2, Moderate) => format!(
            "⚠️ Повышенный NO₂ ({value} мкг/м³) в {city}. Чувствительным группам рекомендуется ограничить время на улице."
        ),
        (Locale::Ru, O3, High) => format!(
            "🚨 Опасный уровень озона O₃ ({value} мкг/м³) в {city}. Не выходите на улицу без необходимости."
        ),
        (Locale::Ru, O3, Moderate) => format!(
            "⚠️ Повышенный озон O₃ ({value} мкг/м³) в {city}. Избегайте интенсивных физических нагрузок на улице."
        ),
        (Locale::Ru, Pm25, High) => format!(
            "🚨 Высокая концентрация PM2.5 ({value} мкг/м³) в {city}. Используйте маски N95 при выходе на улицу."
        ),
        (Locale::Ru, Pm25, Moderate) => format!(
            "⚠️ Умеренный уровень PM2.5 ({value} мкг/м³) в {city}. Людям с респираторными заболеваниями следует быть осторожными."
        ),
        (Locale::Ru, ForecastAqi, _) => format!(
            "🚨 Прогноз: вредное качество воздуха (ИКВ {value}) в {city} в ближайшие 24 часа."
        ),
    }
}
