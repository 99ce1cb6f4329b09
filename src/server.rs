//! HTTP front end for site search.
//!
//! Every request builds its own [`SearchDispatcher`] from the current
//! configuration snapshot and the shared content store, so no hit list is
//! ever shared between requests.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/search?q=` | Search page (HTML) |
//! | `GET`  | `/api/search?q=` | Search results (JSON) |
//! | `GET`  | `/refresh` | Reload the config file and content store |
//! | `GET`  | `/health` | Health check |
//!
//! Search endpoints always answer `200`: a failed search renders its error
//! state instead of an error status. `/refresh` answers `500` with
//! `{ "error": { "code": "refresh_failed", "message": "..." } }` and keeps
//! serving the previous state when the reload fails.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::{self, Config};
use crate::content;
use crate::error::ErrorDetail;
use crate::search::{BackendMode, SearchDispatcher};
use crate::store::memory::InMemoryContentStore;
use crate::store::ContentStore;
use crate::view::{HtmlRenderer, JsonRenderer};

/// Configuration and content that `/refresh` swaps together.
struct Site {
    config: Config,
    store: Arc<InMemoryContentStore>,
    loaded_at: DateTime<Utc>,
}

/// Shared application state passed to all route handlers via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    site: Arc<RwLock<Site>>,
    /// Config file re-read by `/refresh`; `None` disables reloading config.
    config_path: Option<PathBuf>,
    html: Arc<HtmlRenderer>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: InMemoryContentStore,
        config_path: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            site: Arc::new(RwLock::new(Site {
                config,
                store: Arc::new(store),
                loaded_at: Utc::now(),
            })),
            config_path,
            html: Arc::new(HtmlRenderer::new()?),
        })
    }

    fn dispatcher(&self, query: Option<String>) -> SearchDispatcher {
        let site = self.site.read().unwrap_or_else(|e| e.into_inner());
        let store: Arc<dyn ContentStore> = site.store.clone();
        let mut dispatcher = SearchDispatcher::new(store, site.config.search.clone());
        dispatcher.set_query(query);
        dispatcher
    }

    fn reload(&self) -> anyhow::Result<RefreshResponse> {
        let config = match &self.config_path {
            Some(path) => config::load_config(path)?,
            None => self.site.read().unwrap_or_else(|e| e.into_inner()).config.clone(),
        };
        let store = content::load_store(&config)?;

        let mut site = self.site.write().unwrap_or_else(|e| e.into_inner());
        site.config = config;
        site.store = Arc::new(store);
        site.loaded_at = Utc::now();

        Ok(RefreshResponse {
            status: "ok".to_string(),
            documents: site.store.len(),
            backend: BackendMode::from_setting(&site.config.search.backend)
                .as_str()
                .to_string(),
            loaded_at: site.loaded_at.to_rfc3339(),
        })
    }
}

/// Build the router without binding a socket.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(handle_search_page))
        .route("/api/search", get(handle_search_api))
        .route("/refresh", get(handle_refresh))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server.
///
/// Loads the content store, binds to `[server].bind` and serves until the
/// process is terminated.
pub async fn run_server(config: &Config, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let store = content::load_store(config)?;
    let bind_addr = config.server.bind.clone();
    let state = AppState::new(config.clone(), store, config_path)?;

    info!("docsite listening on http://{}", bind_addr);
    println!("docsite listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

// ============ GET /search ============

async fn handle_search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Html<String> {
    let mut dispatcher = state.dispatcher(params.q);
    Html(dispatcher.render(state.html.as_ref()).await)
}

// ============ GET /api/search ============

async fn handle_search_api(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<serde_json::Value> {
    let mut dispatcher = state.dispatcher(params.q);
    Json(dispatcher.render(&JsonRenderer).await)
}

// ============ GET /refresh ============

#[derive(Debug, Serialize)]
struct RefreshResponse {
    status: String,
    documents: usize,
    backend: String,
    loaded_at: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

async fn handle_refresh(State(state): State<AppState>) -> Response {
    match state.reload() {
        Ok(summary) => {
            info!(documents = summary.documents, "site refreshed");
            Json(summary).into_response()
        }
        Err(e) => {
            warn!("refresh failed, keeping previous state: {:#}", e);
            let body = ErrorBody {
                error: ErrorDetail {
                    code: "refresh_failed".to_string(),
                    message: format!("{:#}", e),
                },
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
    documents: usize,
    backend: String,
    loaded_at: String,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let site = state.site.read().unwrap_or_else(|e| e.into_inner());
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        documents: site.store.len(),
        backend: BackendMode::from_setting(&site.config.search.backend)
            .as_str()
            .to_string(),
        loaded_at: site.loaded_at.to_rfc3339(),
    })
}
