//! OpenAQ v3 locations proxy.
//!
//! Failures never surface as errors: callers get an empty result set plus a
//! labelled `error` so "no data" stays distinguishable from a broken request.

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};
use urlencoding::encode;

use crate::config::Settings;

pub const DEFAULT_RADIUS_M: u32 = 25_000;
const PAGE_LIMIT: u32 = 200;
/// PM10, PM2.5, NO2, O3, SO2 and CO parameter ids.
const PARAMETER_IDS: &str = "2,3,7,10,19,130";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: u32,
}

/// Body returned to dashboard clients.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationsOutcome {
    pub results: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LocationsOutcome {
    fn unavailable(error: impl Into<String>, message: Option<&str>) -> Self {
        Self {
            results: Vec::new(),
            meta: Some(Map::new()),
            error: Some(error.into()),
            message: message.map(str::to_string),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

#[derive(Debug, Deserialize)]
struct LocationsResponse {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    meta: Map<String, Value>,
}

#[derive(Clone)]
pub struct OpenAqClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAqClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("airguard/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.upstream_timeout())
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            base_url: settings.openaq_base_url.trim_end_matches('/').to_string(),
            api_key: settings.openaq_api_key.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn locations_url(&self, query: &LocationQuery) -> String {
        let coordinates = format!("{},{}", query.lat, query.lng);
        format!(
            "{base}/locations?coordinates={coords}&radius={radius}&limit={limit}&order_by=id&parameters_id={params}",
            base = self.base_url,
            coords = encode(&coordinates),
            radius = query.radius_m,
            limit = PAGE_LIMIT,
            params = PARAMETER_IDS,
        )
    }

    /// Fetch monitoring locations around a point. Single attempt, no retry.
    #[instrument(skip(self))]
    pub async fn locations(&self, query: LocationQuery) -> LocationsOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("OPENAQ_API_KEY is not set");
            return LocationsOutcome::unavailable(
                "OpenAQ API key not configured",
                Some("Please add OPENAQ_API_KEY to your environment variables"),
            );
        };

        let url = self.locations_url(&query);
        let response = match self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-API-Key", api_key)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                warn!(%err, "openaq request failed");
                return LocationsOutcome::unavailable(err.to_string(), None);
            }
        };

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            warn!(%status, "openaq rejected credentials");
            return LocationsOutcome::unavailable(
                "Invalid OpenAQ API key",
                Some("Please check your OPENAQ_API_KEY environment variable"),
            );
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, %body, "openaq returned an error");
            return LocationsOutcome::unavailable(format!("OpenAQ API error: {status}"), None);
        }

        match response.json::<LocationsResponse>().await {
            Ok(payload) => {
                info!(locations = payload.results.len(), "openaq data received");
                LocationsOutcome {
                    results: payload.results,
                    meta: Some(payload.meta),
                    error: None,
                    message: None,
                }
            }
            Err(err) => {
                warn!(%err, "openaq payload could not be decoded");
                LocationsOutcome::unavailable(err.to_string(), None)
            }
        }
    }
}
