//! Error types for search dispatch.
//!
//! These never escape a search call: the dispatcher records the error next
//! to an empty hit list so the view can show it. An empty hit list on its
//! own is a successful search with no results.

use serde::Serialize;
use thiserror::Error;

/// Result type alias using [`SearchError`].
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Failures a search can record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Remote mode without a usable host or key
    #[error("Search configuration error: {0}")]
    Configuration(String),

    /// Remote index or content store could not answer
    #[error("Search backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl SearchError {
    /// Machine-readable code used in JSON responses.
    pub fn code(&self) -> &'static str {
        match self {
            SearchError::Configuration(_) => "configuration_error",
            SearchError::BackendUnavailable(_) => "backend_unavailable",
        }
    }

    pub fn detail(&self) -> ErrorDetail {
        ErrorDetail {
            code: self.code().to_string(),
            message: self.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        SearchError::BackendUnavailable(err.to_string())
    }
}

/// Serializable form of a [`SearchError`].
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
