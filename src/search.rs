//! Search dispatch between the local content store and a remote index.
//!
//! A [`SearchDispatcher`] owns one query and one hit list. Each call to
//! [`search`](SearchDispatcher::search) clears the hit list, reads the
//! backend mode from the current [`SearchConfig`] and runs exactly one
//! backend:
//!
//! - **local**: case-insensitive substring match of the query against the
//!   store's searchable fields, in store iteration order.
//! - **remote**: a freshly connected [`IndexClient`] queries the configured
//!   index; hits keep the order the service returned them in.
//!
//! Backend failures never escape a search. They leave the hit list empty
//! and set [`SearchDispatcher::error`].

use anyhow::{bail, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Config, SearchConfig};
use crate::content;
use crate::error::{SearchError, SearchResult};
use crate::models::{HitList, SearchableDocument};
use crate::remote::{IndexClient, IndexConnector, MeilisearchConnector};
use crate::store::ContentStore;
use crate::view::{HtmlRenderer, JsonRenderer, SearchView, TextRenderer, ViewRenderer};

/// Which backend a search runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Local,
    Remote,
}

impl BackendMode {
    /// `"local"` and the legacy driver name `"collection"` select the local
    /// backend. Every other value, including unknown ones, selects remote.
    pub fn from_setting(value: &str) -> Self {
        match value {
            "local" | "collection" => BackendMode::Local,
            _ => BackendMode::Remote,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Local => "local",
            BackendMode::Remote => "remote",
        }
    }
}

/// A backend resolved for a single search call.
enum Backend<'a> {
    Local(&'a dyn ContentStore),
    Remote {
        client: Box<dyn IndexClient>,
        index: String,
    },
}

/// `Idle`: no hits, no query searched. `Searched`: hits reflect the last
/// non-empty query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    Idle,
    Searched,
}

pub struct SearchDispatcher {
    store: Arc<dyn ContentStore>,
    connector: Arc<dyn IndexConnector>,
    config: SearchConfig,
    query: Option<String>,
    hits: HitList,
    error: Option<SearchError>,
    state: DispatcherState,
}

impl SearchDispatcher {
    /// Dispatcher using [`MeilisearchConnector`] for remote searches.
    pub fn new(store: Arc<dyn ContentStore>, config: SearchConfig) -> Self {
        Self::with_connector(store, Arc::new(MeilisearchConnector), config)
    }

    pub fn with_connector(
        store: Arc<dyn ContentStore>,
        connector: Arc<dyn IndexConnector>,
        config: SearchConfig,
    ) -> Self {
        Self {
            store,
            connector,
            config,
            query: None,
            hits: Vec::new(),
            error: None,
            state: DispatcherState::Idle,
        }
    }

    /// Store the query verbatim. An empty or missing query drops any
    /// previous hits.
    pub fn set_query(&mut self, query: Option<String>) {
        let empty = query.as_deref().map_or(true, str::is_empty);
        self.query = query;
        if empty {
            self.clear();
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Replace the configuration read by subsequent searches.
    pub fn set_config(&mut self, config: SearchConfig) {
        self.config = config;
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SearchConfig {
        &mut self.config
    }

    pub fn hits(&self) -> &[SearchableDocument] {
        &self.hits
    }

    /// The failure recorded by the last search, if any.
    pub fn error(&self) -> Option<&SearchError> {
        self.error.as_ref()
    }

    pub fn state(&self) -> DispatcherState {
        self.state
    }

    /// Empty the hit list and error flag. Idempotent.
    pub fn clear(&mut self) {
        self.hits.clear();
        self.error = None;
        self.state = DispatcherState::Idle;
    }

    /// Run the current query and return the fresh hit list.
    pub async fn search(&mut self) -> &[SearchableDocument] {
        self.clear();

        let outcome = match self.query.as_deref() {
            Some(q) if !q.is_empty() => self.dispatch(q).await,
            _ => return &self.hits,
        };

        self.state = DispatcherState::Searched;
        match outcome {
            Ok(hits) => {
                debug!(hits = hits.len(), "search finished");
                self.hits.extend(hits);
            }
            Err(e) => {
                warn!("search failed, returning no hits: {}", e);
                self.error = Some(e);
            }
        }
        &self.hits
    }

    /// Clear, search again, and hand the result to `renderer`.
    pub async fn render<R: ViewRenderer>(&mut self, renderer: &R) -> R::Output {
        self.clear();
        self.search().await;
        renderer.render(&SearchView {
            query: self.query.as_deref(),
            hits: &self.hits,
            error: self.error.as_ref(),
        })
    }

    async fn dispatch(&self, query: &str) -> SearchResult<HitList> {
        let mode = BackendMode::from_setting(&self.config.backend);
        debug!(backend = mode.as_str(), query, "dispatching search");

        match self.resolve_backend(mode)? {
            Backend::Local(store) => store
                .where_like(store.searchable_fields(), query)
                .await
                .map_err(|e| SearchError::BackendUnavailable(format!("{:#}", e))),
            Backend::Remote { client, index } => {
                let raw = client.search(&index, query).await?;
                Ok(raw.iter().map(SearchableDocument::from_hit).collect())
            }
        }
    }

    fn resolve_backend(&self, mode: BackendMode) -> SearchResult<Backend<'_>> {
        match mode {
            BackendMode::Local => Ok(Backend::Local(self.store.as_ref())),
            BackendMode::Remote => {
                let remote = &self.config.remote;
                let host = remote
                    .host
                    .as_deref()
                    .filter(|h| !h.trim().is_empty())
                    .ok_or_else(|| {
                        SearchError::Configuration("search.remote.host is not set".to_string())
                    })?;
                let key = remote.resolved_key().ok_or_else(|| {
                    SearchError::Configuration("search.remote.key is not set".to_string())
                })?;

                let client = self.connector.connect(
                    host,
                    &key,
                    Duration::from_secs(remote.timeout_secs),
                )?;
                let index = self
                    .config
                    .index_name
                    .clone()
                    .unwrap_or_else(|| self.store.index_name().to_string());

                Ok(Backend::Remote { client, index })
            }
        }
    }
}

/// Entry point for `docsite search`.
///
/// Loads the content store, runs one search, and prints it in `format`
/// (`text`, `json`, or `html`). A failed search prints its error state
/// and still exits successfully.
pub async fn run_search(
    config: &Config,
    query: &str,
    backend: Option<String>,
    format: &str,
) -> Result<()> {
    match format {
        "text" | "json" | "html" => {}
        _ => bail!("Unknown output format: {}. Use text, json, or html.", format),
    }

    let store = content::load_store(config)?;
    let mut search_config = config.search.clone();
    if let Some(backend) = backend {
        search_config.backend = backend;
    }
    info!(
        backend = BackendMode::from_setting(&search_config.backend).as_str(),
        documents = store.len(),
        "running search"
    );

    let mut dispatcher = SearchDispatcher::new(Arc::new(store), search_config);
    dispatcher.set_query(Some(query.to_string()));

    match format {
        "json" => {
            let value = dispatcher.render(&JsonRenderer).await;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        "html" => {
            let renderer = HtmlRenderer::new()?;
            print!("{}", dispatcher.render(&renderer).await);
        }
        _ => print!("{}", dispatcher.render(&TextRenderer).await),
    }

    Ok(())
}
