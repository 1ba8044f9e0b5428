//! Runtime configuration utilities for airguard.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;

use crate::engine::Locale;

/// Which vector index backs the similarity-search routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    Memory,
    Pinecone,
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Root folder for the JSON store and exports.
    pub data_dir: PathBuf,
    /// Language used for alert messages unless a request overrides it.
    pub locale: Locale,
    /// `s-maxage` advertised on AQI reports.
    pub cache_seconds: u64,
    /// OpenAQ v3 credentials; the proxy degrades to empty results without it.
    pub openaq_api_key: Option<String>,
    pub openaq_base_url: String,
    /// Timeout for outbound data-provider calls.
    pub upstream_timeout_secs: u64,
    /// OpenAI-compatible chat completions endpoint.
    pub llm_api_key: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub vector_backend: VectorBackend,
    pub pinecone_api_key: Option<String>,
    pub pinecone_index_host: Option<String>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let settings = Self::from_lookup(|key| env::var(key).ok())?;
        std::fs::create_dir_all(&settings.data_dir).context("creating data dir")?;
        Ok(settings)
    }

    /// Resolve settings from an arbitrary key lookup. Does not touch disk.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str, default: u64| -> anyhow::Result<u64> {
            match non_empty(key) {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{key} must be a whole number, got '{raw}'")),
                None => Ok(default),
            }
        };

        let locale = match non_empty("AIRGUARD_LOCALE") {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => Locale::default(),
        };
        let vector_backend = match non_empty("VECTOR_BACKEND").as_deref().map(str::trim) {
            None | Some("memory") => VectorBackend::Memory,
            Some("pinecone") => VectorBackend::Pinecone,
            Some(other) => anyhow::bail!("VECTOR_BACKEND must be memory or pinecone, got '{other}'"),
        };

        Ok(Self {
            data_dir: non_empty("AIRGUARD_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data")),
            locale,
            cache_seconds: number("AIRGUARD_CACHE_SECONDS", 300)?,
            openaq_api_key: non_empty("OPENAQ_API_KEY"),
            openaq_base_url: non_empty("OPENAQ_BASE_URL")
                .unwrap_or_else(|| "https://api.openaq.org/v3".to_string()),
            upstream_timeout_secs: number("UPSTREAM_TIMEOUT_SECS", 10)?,
            llm_api_key: non_empty("LLM_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")),
            llm_base_url: non_empty("LLM_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
            llm_model: non_empty("LLM_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            llm_timeout_secs: number("LLM_TIMEOUT_SECS", 30)?,
            vector_backend,
            pinecone_api_key: non_empty("PINECONE_API_KEY"),
            pinecone_index_host: non_empty("PINECONE_INDEX_HOST"),
        })
    }

    /// Convenience helper for derived path segments.
    pub fn join_data<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.data_dir.join(path)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}
