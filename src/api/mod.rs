//! HTTP layer exposing reports, advisories, persistence and AI helpers.

pub mod error;
pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    ai::{
        embeddings::HashingEmbedder,
        openai::{DisabledModel, OpenAiModel},
        tools::ToolBox,
        vector::{MemoryIndex, PineconeIndex, VectorService},
        Embedder, LanguageModel, VectorIndex,
    },
    config::{Settings, VectorBackend},
    data::openaq::OpenAqClient,
    engine::random::StdRandom,
    store::{alerts::AlertHistory, favorites::Favorites, JsonFileStore, KeyValueStore, MemoryStore, Namespace},
};

/// Prefix shared by every persisted key.
pub const STORE_NAMESPACE: &str = "airguard";

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub model: Arc<dyn LanguageModel>,
    pub tools: ToolBox,
    pub vectors: VectorService,
    pub openaq: OpenAqClient,
    pub alerts: AlertHistory,
    pub favorites: Favorites,
    /// Fixes the random source for reproducible responses.
    pub seed: Option<u64>,
}

impl AppState {
    /// Wire production backends from settings.
    pub fn from_settings(settings: Settings) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(
            JsonFileStore::open(settings.join_data("store")).context("opening data store")?,
        );

        let model: Arc<dyn LanguageModel> = match OpenAiModel::from_settings(&settings)? {
            Some(model) => Arc::new(model),
            None => {
                warn!("no language model key configured; AI routes will answer 503");
                Arc::new(DisabledModel)
            }
        };

        let index: Option<Arc<dyn VectorIndex>> = match settings.vector_backend {
            VectorBackend::Memory => Some(Arc::new(MemoryIndex::default())),
            VectorBackend::Pinecone => match PineconeIndex::from_settings(&settings)? {
                Some(index) => Some(Arc::new(index)),
                None => {
                    warn!("pinecone selected without PINECONE_API_KEY/PINECONE_INDEX_HOST");
                    None
                }
            },
        };

        let vectors = VectorService::new(default_embedder()?, index);
        if vectors.is_configured() {
            info!(dimension = vectors.dimension(), "vector search enabled");
        }
        Self::assemble(settings, store, model, vectors)
    }

    /// Memory-backed state with the language model disabled.
    pub fn in_memory(settings: Settings) -> Result<Self> {
        let vectors = VectorService::new(
            Arc::new(HashingEmbedder::default()),
            Some(Arc::new(MemoryIndex::default())),
        );
        Self::assemble(settings, Arc::new(MemoryStore::new()), Arc::new(DisabledModel), vectors)
    }

    fn assemble(
        settings: Settings,
        store: Arc<dyn KeyValueStore>,
        model: Arc<dyn LanguageModel>,
        vectors: VectorService,
    ) -> Result<Self> {
        let openaq = OpenAqClient::new(&settings)?;
        if !openaq.is_configured() {
            warn!("OPENAQ_API_KEY not set; /api/openaq will return empty results");
        }
        Ok(Self {
            alerts: AlertHistory::new(Namespace::new(STORE_NAMESPACE, Arc::clone(&store))),
            favorites: Favorites::new(Namespace::new(STORE_NAMESPACE, store)),
            settings,
            model,
            tools: ToolBox::default(),
            vectors,
            openaq,
            seed: None,
        })
    }

    pub fn with_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = model;
        self
    }

    pub fn with_vectors(mut self, vectors: VectorService) -> Self {
        self.vectors = vectors;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.tools = ToolBox::seeded(seed);
        self
    }

    pub(crate) fn rng(&self) -> StdRandom {
        StdRandom::maybe_seeded(self.seed)
    }
}

#[cfg(feature = "embeddings")]
fn default_embedder() -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(crate::ai::embeddings::FastEmbedder::try_new()?))
}

#[cfg(not(feature = "embeddings"))]
fn default_embedder() -> Result<Arc<dyn Embedder>> {
    Ok(Arc::new(HashingEmbedder::default()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(routes::health))
        .route("/api/aqi", get(routes::aqi_report))
        .route("/api/aqi/category", get(routes::aqi_category))
        .route("/api/pollutants", get(routes::list_pollutants))
        .route("/api/pollutants/:id", get(routes::pollutant))
        .route("/api/tips", get(routes::health_tips))
        .route("/api/validation", get(routes::validation_pairs))
        .route("/api/history", get(routes::history_series))
        .route("/api/export", get(routes::export_csv))
        .route(
            "/api/alerts/settings",
            get(routes::alert_settings).put(routes::save_alert_settings),
        )
        .route("/api/alerts", get(routes::list_alerts).delete(routes::clear_alerts))
        .route("/api/alerts/check", post(routes::check_alert))
        .route("/api/favorites", get(routes::list_favorites).post(routes::add_favorite))
        .route("/api/favorites/:code", delete(routes::remove_favorite))
        .route("/api/openaq", get(routes::openaq_locations))
        .route("/api/ai/analyze", post(routes::ai_analyze))
        .route("/api/ai/chat", post(routes::ai_chat))
        .route("/api/vector/index", post(routes::vector_index))
        .route("/api/vector/search", post(routes::vector_search))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let state = AppState::from_settings(settings)?;
    let app = router(state);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving airguard API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown requested");
            }
        })
        .await?;
    Ok(())
}
