//! Remote search-index client.
//!
//! Defines the [`IndexClient`] trait (one query against a named index) and
//! the [`IndexConnector`] factory the dispatcher uses to build a fresh
//! client from host and key on every remote search.
//!
//! [`MeilisearchClient`] speaks the Meilisearch HTTP API:
//!
//! ```text
//! POST {host}/indexes/{index}/search
//! Authorization: Bearer {key}
//! {"q": "<query>"}
//! ```
//!
//! and returns the response's `hits` array untouched. Mapping hits into
//! documents is the dispatcher's job.
//!
//! # Failure Mapping
//!
//! - Empty or non-http(s) host → [`SearchError::Configuration`]
//! - Network error, timeout → [`SearchError::BackendUnavailable`]
//! - Non-success HTTP status → [`SearchError::BackendUnavailable`] with body
//! - Response without a `hits` array → [`SearchError::BackendUnavailable`]

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::error::{SearchError, SearchResult};

/// A client able to query one named index.
#[async_trait]
pub trait IndexClient: Send + Sync {
    /// Run `query` against `index`, returning raw hits in service order.
    async fn search(&self, index: &str, query: &str) -> SearchResult<Vec<Value>>;
}

/// Builds an [`IndexClient`] from connection settings.
pub trait IndexConnector: Send + Sync {
    fn connect(&self, host: &str, key: &str, timeout: Duration)
        -> SearchResult<Box<dyn IndexClient>>;
}

/// Connector producing [`MeilisearchClient`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeilisearchConnector;

impl IndexConnector for MeilisearchConnector {
    fn connect(
        &self,
        host: &str,
        key: &str,
        timeout: Duration,
    ) -> SearchResult<Box<dyn IndexClient>> {
        Ok(Box::new(MeilisearchClient::new(host, key, timeout)?))
    }
}

pub struct MeilisearchClient {
    host: String,
    key: String,
    http: reqwest::Client,
}

impl MeilisearchClient {
    pub fn new(host: &str, key: &str, timeout: Duration) -> SearchResult<Self> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(SearchError::Configuration(
                "search.remote.host is empty".to_string(),
            ));
        }
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(SearchError::Configuration(format!(
                "search.remote.host must start with http:// or https://, got '{}'",
                host
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            host: host.to_string(),
            key: key.to_string(),
            http,
        })
    }

    fn search_url(&self, index: &str) -> String {
        format!("{}/indexes/{}/search", self.host, index)
    }
}

#[async_trait]
impl IndexClient for MeilisearchClient {
    async fn search(&self, index: &str, query: &str) -> SearchResult<Vec<Value>> {
        let body = serde_json::json!({ "q": query });

        let response = self
            .http
            .post(self.search_url(index))
            .header("Authorization", format!("Bearer {}", self.key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(SearchError::BackendUnavailable(format!(
                "index '{}' returned {}: {}",
                index, status, body_text
            )));
        }

        let json: Value = response.json().await?;
        parse_hits(json)
    }
}

/// Extract the `hits` array from a search response.
fn parse_hits(json: Value) -> SearchResult<Vec<Value>> {
    match json {
        Value::Object(mut map) => match map.remove("hits") {
            Some(Value::Array(hits)) => Ok(hits),
            _ => Err(SearchError::BackendUnavailable(
                "Invalid search response: missing hits array".to_string(),
            )),
        },
        _ => Err(SearchError::BackendUnavailable(
            "Invalid search response: expected an object".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_hits_preserves_order() {
        let hits = parse_hits(json!({
            "hits": [{"title": "B"}, {"title": "A"}],
            "query": "x",
            "processingTimeMs": 1
        }))
        .unwrap();
        assert_eq!(hits, vec![json!({"title": "B"}), json!({"title": "A"})]);
    }

    #[test]
    fn test_parse_hits_missing_array() {
        let err = parse_hits(json!({"message": "index not found"})).unwrap_err();
        assert!(matches!(err, SearchError::BackendUnavailable(_)));
        assert!(parse_hits(json!([1, 2])).is_err());
    }

    #[test]
    fn test_new_rejects_bad_hosts() {
        let timeout = Duration::from_secs(1);
        assert!(matches!(
            MeilisearchClient::new("  ", "k", timeout),
            Err(SearchError::Configuration(_))
        ));
        assert!(matches!(
            MeilisearchClient::new("localhost:7700", "k", timeout),
            Err(SearchError::Configuration(_))
        ));
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let client =
            MeilisearchClient::new("http://127.0.0.1:7700/", "k", Duration::from_secs(1)).unwrap();
        assert_eq!(
            client.search_url("content_documents"),
            "http://127.0.0.1:7700/indexes/content_documents/search"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_backend_unavailable() {
        // Port 9 (discard) is not expected to run an HTTP server.
        let client =
            MeilisearchClient::new("http://127.0.0.1:9", "k", Duration::from_secs(2)).unwrap();
        let err = client.search("docs", "anything").await.unwrap_err();
        assert!(matches!(err, SearchError::BackendUnavailable(_)));
    }
}
