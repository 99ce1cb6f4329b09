//! In-memory [`ContentStore`] implementation.
//!
//! Documents live in a `Vec` behind `std::sync::RwLock`, so iteration order
//! is insertion order. Upserting an existing id replaces it in place.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::config::default_index_name;
use crate::models::SearchableDocument;

use super::ContentStore;

/// In-memory content store used by the site and by tests.
pub struct InMemoryContentStore {
    docs: RwLock<Vec<SearchableDocument>>,
    index_name: String,
}

impl InMemoryContentStore {
    pub fn new() -> Self {
        Self::with_index_name(default_index_name())
    }

    pub fn with_index_name(index_name: impl Into<String>) -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
            index_name: index_name.into(),
        }
    }

    pub fn from_documents(docs: Vec<SearchableDocument>) -> Self {
        let store = Self::new();
        store.replace_all(docs);
        store
    }

    /// Insert `doc`, or replace the stored document with the same id.
    pub fn upsert(&self, doc: SearchableDocument) {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        match docs.iter_mut().find(|d| d.id == doc.id) {
            Some(existing) => *existing = doc,
            None => docs.push(doc),
        }
    }

    /// Swap the whole collection.
    pub fn replace_all(&self, new_docs: Vec<SearchableDocument>) {
        let mut docs = self.docs.write().unwrap_or_else(|e| e.into_inner());
        *docs = new_docs;
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for InMemoryContentStore {
    async fn list_all(&self) -> Result<Vec<SearchableDocument>> {
        let docs = self
            .docs
            .read()
            .map_err(|_| anyhow!("content store lock poisoned"))?;
        Ok(docs.clone())
    }

    fn index_name(&self) -> &str {
        &self.index_name
    }
}
