//! Content store abstraction.
//!
//! The [`ContentStore`] trait is everything the search dispatcher needs
//! from the site's content in local mode, plus the canonical index name
//! it uses to address the remote index.
//!
//! Implementations must be `Send + Sync` so a single store can be shared
//! across HTTP handlers behind an `Arc`.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{SearchableDocument, SearchableField};

/// Abstract source of searchable documents.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`list_all`](ContentStore::list_all) | Every document, in store order |
/// | [`searchable_fields`](ContentStore::searchable_fields) | Fields matched in local mode |
/// | [`index_name`](ContentStore::index_name) | Canonical remote index name |
/// | [`where_like`](ContentStore::where_like) | Substring filter over `fields` |
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Return every document in store iteration order.
    async fn list_all(&self) -> Result<Vec<SearchableDocument>>;

    /// Fields eligible for local substring matching.
    fn searchable_fields(&self) -> &[SearchableField] {
        &SearchableField::ALL
    }

    /// Name of the remote index holding this store's documents.
    fn index_name(&self) -> &str;

    /// Documents where `query` is a case-insensitive substring of at least
    /// one of `fields`, in store iteration order.
    ///
    /// The default implementation filters [`list_all`](ContentStore::list_all);
    /// stores with a native query language can push the filter down.
    async fn where_like(
        &self,
        fields: &[SearchableField],
        query: &str,
    ) -> Result<Vec<SearchableDocument>> {
        Ok(self
            .list_all()
            .await?
            .into_iter()
            .filter(|doc| doc.matches(query, fields))
            .collect())
    }
}
