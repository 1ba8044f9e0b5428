//! Tools the chat model may call. All run locally and return JSON.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{ToolCall, ToolSpec};
use crate::engine::{
    cities,
    random::{RandomSource, StdRandom},
};

pub const GET_AIR_QUALITY: &str = "getAirQuality";
pub const GET_HEALTH_RECOMMENDATIONS: &str = "getHealthRecommendations";
pub const COMPARE_POLLUTANTS: &str = "comparePollutants";

pub fn specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: GET_AIR_QUALITY,
            description: "Get current air quality data for a specific location",
            parameters: json!({
                "type": "object",
                "properties": { "location": { "type": "string", "description": "City or location name" } },
                "required": ["location"],
            }),
        },
        ToolSpec {
            name: GET_HEALTH_RECOMMENDATIONS,
            description: "Get health recommendations based on air quality levels",
            parameters: json!({
                "type": "object",
                "properties": { "aqi": { "type": "number", "description": "Air Quality Index value" } },
                "required": ["aqi"],
            }),
        },
        ToolSpec {
            name: COMPARE_POLLUTANTS,
            description: "Compare pollutant levels across different locations",
            parameters: json!({
                "type": "object",
                "properties": {
                    "locations": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "List of locations to compare",
                    }
                },
                "required": ["locations"],
            }),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub level: &'static str,
    pub recommendations: &'static [&'static str],
}

/// Coarse four-band guidance returned to the model.
pub fn health_recommendations(aqi: f64) -> Recommendations {
    if aqi <= 50.0 {
        Recommendations {
            level: "Good",
            recommendations: &[
                "Air quality is satisfactory",
                "Outdoor activities are safe",
                "No health concerns",
            ],
        }
    } else if aqi <= 100.0 {
        Recommendations {
            level: "Moderate",
            recommendations: &[
                "Unusually sensitive people should limit prolonged outdoor exertion",
                "General public can enjoy outdoor activities",
            ],
        }
    } else if aqi <= 150.0 {
        Recommendations {
            level: "Unhealthy for Sensitive Groups",
            recommendations: &[
                "Sensitive groups should reduce prolonged outdoor exertion",
                "Children and elderly should limit outdoor activities",
            ],
        }
    } else {
        Recommendations {
            level: "Unhealthy",
            recommendations: &[
                "Everyone should avoid prolonged outdoor exertion",
                "Stay indoors if possible",
                "Use air purifiers",
            ],
        }
    }
}

#[derive(Deserialize)]
struct LocationArgs {
    location: String,
}

#[derive(Deserialize)]
struct AqiArgs {
    aqi: f64,
}

#[derive(Deserialize)]
struct LocationsArgs {
    locations: Vec<String>,
}

fn below<R: RandomSource + ?Sized>(rng: &mut R, max: f64) -> f64 {
    (rng.next_unit() * max).floor()
}

/// Registered cities report their baseline; anything else is simulated.
fn air_quality<R: RandomSource + ?Sized>(location: &str, rng: &mut R) -> Value {
    match cities::resolve(location) {
        Some(city) => {
            let r = &city.baseline;
            json!({
                "location": location,
                "source": "baseline",
                "aqi": r.aqi,
                "pm25": r.pollutants.pm25,
                "pm10": r.pollutants.pm10,
                "no2": r.pollutants.no2,
                "o3": r.pollutants.o3,
            })
        }
        None => json!({
            "location": location,
            "source": "simulated",
            "aqi": below(rng, 200.0),
            "pm25": below(rng, 100.0),
            "pm10": below(rng, 150.0),
            "no2": below(rng, 80.0),
            "o3": below(rng, 120.0),
            "so2": below(rng, 50.0),
            "co": below(rng, 1000.0),
        }),
    }
}

fn compare<R: RandomSource + ?Sized>(locations: &[String], rng: &mut R) -> Value {
    locations
        .iter()
        .map(|loc| {
            let aqi = cities::resolve(loc).map_or_else(|| below(rng, 200.0), |c| c.baseline.aqi);
            let trend = if rng.next_unit() > 0.5 { "improving" } else { "worsening" };
            json!({ "location": loc, "aqi": aqi, "trend": trend })
        })
        .collect()
}

/// Executes tool calls; a fixed seed makes simulated values reproducible.
#[derive(Debug, Clone, Default)]
pub struct ToolBox {
    seed: Option<u64>,
}

impl ToolBox {
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Failures are reported to the model as `{"error": ...}` payloads.
    pub fn execute(&self, call: &ToolCall) -> Value {
        debug!(tool = %call.name, "executing tool");
        let mut rng = StdRandom::maybe_seeded(self.seed);
        let args = call.arguments.clone();
        let result = match call.name.as_str() {
            GET_AIR_QUALITY => serde_json::from_value::<LocationArgs>(args)
                .map(|a| air_quality(&a.location, &mut rng)),
            GET_HEALTH_RECOMMENDATIONS => serde_json::from_value::<AqiArgs>(args)
                .map(|a| json!(health_recommendations(a.aqi))),
            COMPARE_POLLUTANTS => serde_json::from_value::<LocationsArgs>(args)
                .map(|a| compare(&a.locations, &mut rng)),
            other => return json!({ "error": format!("unknown tool '{other}'") }),
        };
        result.unwrap_or_else(|err| json!({ "error": format!("invalid arguments: {err}") }))
    }
}
