//! Query strings, request bodies and response shapes for the JSON API.

use serde::{Deserialize, Serialize};

use crate::{
    ai::{chat::ChatOutcome, vector::VectorMatch, ChatMessage},
    engine::{
        category::HealthGuidance,
        history::{HistoricalPoint, TimeRange},
        pollutants::HealthTip,
        validation::{ValidationPair, ValidationSummary},
    },
    store::alerts::AirQualityAlert,
};

/// Numeric fields arrive as strings so parse failures can name the field.
#[derive(Debug, Default, Deserialize)]
pub struct AqiQuery {
    pub city: Option<String>,
    pub lang: Option<String>,
    pub aqi: Option<String>,
    pub o3: Option<String>,
    pub no2: Option<String>,
    pub pm25: Option<String>,
    pub pm10: Option<String>,
    pub wind_speed: Option<String>,
    pub temperature: Option<String>,
    pub precipitation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub aqi: Option<String>,
}

pub type CategoryResponse = HealthGuidance;

#[derive(Debug, Deserialize)]
pub struct ValidationQuery {
    pub parameter: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub parameter: String,
    pub pairs: Vec<ValidationPair>,
    pub summary: ValidationSummary,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub city: Option<String>,
    pub range: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub city: String,
    pub range: TimeRange,
    pub label: &'static str,
    pub history: Vec<HistoricalPoint>,
    pub forecast: Vec<HistoricalPoint>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub city: Option<String>,
    pub days: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AlertCheckRequest {
    pub city: String,
    pub aqi: f64,
}

#[derive(Debug, Serialize)]
pub struct AlertCheckResponse {
    pub triggered: bool,
    pub alert: Option<AirQualityAlert>,
}

#[derive(Debug, Serialize)]
pub struct FavoriteAdded {
    pub added: bool,
}

#[derive(Debug, Deserialize)]
pub struct OpenAqQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

pub type ChatResponse = ChatOutcome;

#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub success: bool,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub results: Vec<VectorMatch>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub vector_search: bool,
    pub embedding_dimension: usize,
}

#[derive(Debug, Deserialize)]
pub struct TipsQuery {
    pub aqi: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TipsResponse {
    pub aqi: f64,
    pub tips: Vec<&'static HealthTip>,
}
