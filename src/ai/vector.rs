//! Vector indexes for "similar conditions" search.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use super::{embeddings::cosine, AiError, Embedder, VectorIndex};
use crate::config::Settings;

pub const SEARCH_TOP_K: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMetadata {
    pub location: String,
    pub timestamp: DateTime<Utc>,
    pub aqi: f64,
    /// Pollutant map serialised as a JSON string.
    pub pollutants: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<VectorMetadata>,
}

/// In-process index scored by cosine similarity.
#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<Vec<(String, Vec<f32>, VectorMetadata)>>,
}

impl MemoryIndex {
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, id: &str, values: Vec<f32>, metadata: VectorMetadata) -> Result<(), AiError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| AiError::Upstream("vector index lock poisoned".into()))?;
        match entries.iter_mut().find(|(existing, _, _)| existing == id) {
            Some(slot) => {
                slot.1 = values;
                slot.2 = metadata;
            }
            None => entries.push((id.to_string(), values, metadata)),
        }
        Ok(())
    }

    async fn query(&self, values: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, AiError> {
        let entries = self
            .entries
            .read()
            .map_err(|_| AiError::Upstream("vector index lock poisoned".into()))?;
        let mut scored: Vec<VectorMatch> = entries
            .iter()
            .map(|(id, vector, metadata)| VectorMatch {
                id: id.clone(),
                score: cosine(values, vector),
                metadata: Some(metadata.clone()),
            })
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_k);
        Ok(scored)
    }
}

/// Pinecone data-plane client for a single index host.
pub struct PineconeIndex {
    client: Client,
    host: String,
    api_key: String,
}

impl PineconeIndex {
    /// `None` unless both the API key and index host are configured.
    pub fn from_settings(settings: &Settings) -> Result<Option<Self>, AiError> {
        let (Some(api_key), Some(host)) = (
            settings.pinecone_api_key.clone(),
            settings.pinecone_index_host.clone(),
        ) else {
            return Ok(None);
        };
        let host = host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        let client = Client::builder()
            .user_agent(concat!("airguard/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.upstream_timeout())
            .build()?;
        Ok(Some(Self { client, host, api_key }))
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, AiError> {
        let resp = self
            .client
            .post(format!("{}{path}", self.host))
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(%status, path, body = %text, "pinecone request failed");
            return Err(AiError::Upstream(format!("pinecone status {status}")));
        }
        Ok(resp.json().await?)
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<VectorMatch>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    #[instrument(skip(self, values, metadata))]
    async fn upsert(&self, id: &str, values: Vec<f32>, metadata: VectorMetadata) -> Result<(), AiError> {
        let body = json!({ "vectors": [{ "id": id, "values": values, "metadata": metadata }] });
        self.post("/vectors/upsert", body).await?;
        Ok(())
    }

    #[instrument(skip(self, values))]
    async fn query(&self, values: &[f32], top_k: usize) -> Result<Vec<VectorMatch>, AiError> {
        let body = json!({ "vector": values, "topK": top_k, "includeMetadata": true });
        let payload = self.post("/query", body).await?;
        let parsed: QueryResponse =
            serde_json::from_value(payload).map_err(|e| AiError::Decode(e.to_string()))?;
        debug!(matches = parsed.matches.len(), "pinecone query");
        Ok(parsed.matches)
    }
}

/// Request body shared by the index and search routes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionsRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub location: String,
    pub aqi: f64,
    #[serde(default)]
    pub pollutants: Value,
}

impl ConditionsRecord {
    pub fn index_text(&self) -> String {
        format!("Air quality data for {}: AQI {}", self.location, self.aqi)
    }

    pub fn search_text(&self) -> String {
        let pm25 = match self.pollutants.get("pm25") {
            Some(Value::Null) | None => "unknown".to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };
        format!("Air quality in {}: AQI {}, PM2.5 {pm25}", self.location, self.aqi)
    }
}

/// Embeds condition records and routes them to the configured index.
#[derive(Clone)]
pub struct VectorService {
    embedder: Arc<dyn Embedder>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl VectorService {
    pub fn new(embedder: Arc<dyn Embedder>, index: Option<Arc<dyn VectorIndex>>) -> Self {
        Self { embedder, index }
    }

    pub fn is_configured(&self) -> bool {
        self.index.is_some()
    }

    /// Length of the vectors this service writes and queries with.
    pub fn dimension(&self) -> usize {
        self.embedder.dimension()
    }

    fn index(&self) -> Result<&Arc<dyn VectorIndex>, AiError> {
        self.index.as_ref().ok_or(AiError::NotConfigured("vector search"))
    }

    /// Returns the id the record was stored under.
    pub async fn index_record(&self, record: &ConditionsRecord, now: DateTime<Utc>) -> Result<String, AiError> {
        let index = self.index()?;
        let id = record
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{}-{}", record.location, now.timestamp_millis()));
        let values = self.embedder.embed(&record.index_text()).await?;
        let metadata = VectorMetadata {
            location: record.location.clone(),
            timestamp: now,
            aqi: record.aqi,
            pollutants: record.pollutants.to_string(),
        };
        index.upsert(&id, values, metadata).await?;
        Ok(id)
    }

    pub async fn search(&self, record: &ConditionsRecord) -> Result<Vec<VectorMatch>, AiError> {
        let index = self.index()?;
        let values = self.embedder.embed(&record.search_text()).await?;
        index.query(&values, SEARCH_TOP_K).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::ai::embeddings::HashingEmbedder;

    fn record(location: &str, aqi: f64) -> ConditionsRecord {
        ConditionsRecord {
            id: None,
            location: location.into(),
            aqi,
            pollutants: json!({"pm25": 12.5}),
        }
    }

    fn service() -> VectorService {
        VectorService::new(
            Arc::new(HashingEmbedder::default()),
            Some(Arc::new(MemoryIndex::default())),
        )
    }

    #[test]
    fn texts_follow_the_expected_templates() {
        let r = record("Denver", 42.0);
        assert_eq!(r.index_text(), "Air quality data for Denver: AQI 42");
        assert_eq!(r.search_text(), "Air quality in Denver: AQI 42, PM2.5 12.5");
    }

    #[tokio::test]
    async fn search_ranks_the_closest_record_first() {
        let svc = service();
        let now = Utc.with_ymd_and_hms(2025, 10, 5, 12, 0, 0).unwrap();
        let id = svc.index_record(&record("Denver", 42.0), now).await.unwrap();
        assert_eq!(id, format!("Denver-{}", now.timestamp_millis()));
        svc.index_record(&record("Mumbai", 180.0), now).await.unwrap();

        let hits = svc.search(&record("Denver", 42.0)).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].metadata.as_ref().unwrap().location, "Denver");
    }

    #[tokio::test]
    async fn upsert_replaces_existing_ids() {
        let index = MemoryIndex::default();
        let now = Utc::now();
        let meta = |aqi| VectorMetadata {
            location: "X".into(),
            timestamp: now,
            aqi,
            pollutants: "{}".into(),
        };
        index.upsert("a", vec![1.0, 0.0], meta(1.0)).await.unwrap();
        index.upsert("a", vec![0.0, 1.0], meta(2.0)).await.unwrap();
        assert_eq!(index.len(), 1);
        let hits = index.query(&[0.0, 1.0], 5).await.unwrap();
        assert_eq!(hits[0].metadata.as_ref().unwrap().aqi, 2.0);
    }

    #[tokio::test]
    async fn missing_index_is_not_configured() {
        let svc = VectorService::new(Arc::new(HashingEmbedder::default()), None);
        let err = svc.search(&record("Denver", 42.0)).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured(_)));
    }
}
