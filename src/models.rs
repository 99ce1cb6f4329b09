//! Core data models used throughout docsite.
//!
//! [`SearchableDocument`] is the single record shape that every search
//! backend produces. Local matches are cloned out of the content store;
//! remote hits arrive as raw JSON and go through
//! [`SearchableDocument::from_hit`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A document attribute eligible for substring matching in local mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchableField {
    Title,
    ParamsInline,
    Category,
    Parent,
    Description,
    Headings,
}

impl SearchableField {
    /// Every searchable field, in matching order.
    pub const ALL: [SearchableField; 6] = [
        SearchableField::Title,
        SearchableField::ParamsInline,
        SearchableField::Category,
        SearchableField::Parent,
        SearchableField::Description,
        SearchableField::Headings,
    ];

    /// The attribute name as it appears in stored and remote documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchableField::Title => "title",
            SearchableField::ParamsInline => "params_inline",
            SearchableField::Category => "category",
            SearchableField::Parent => "parent",
            SearchableField::Description => "description",
            SearchableField::Headings => "headings",
        }
    }
}

/// The canonical unit returned by a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchableDocument {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub headings: Vec<String>,
    #[serde(default)]
    pub params_inline: Option<String>,
}

/// Ordered list of hits, in the order the backend produced them.
pub type HitList = Vec<SearchableDocument>;

impl SearchableDocument {
    /// Shorthand used by tests and fixtures.
    pub fn titled(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Text values stored under `field`. Headings yield one value per heading.
    pub fn field_values(&self, field: SearchableField) -> Vec<&str> {
        fn single(v: &Option<String>) -> Vec<&str> {
            v.as_deref().into_iter().collect()
        }
        match field {
            SearchableField::Title => single(&self.title),
            SearchableField::ParamsInline => single(&self.params_inline),
            SearchableField::Category => single(&self.category),
            SearchableField::Parent => single(&self.parent),
            SearchableField::Description => single(&self.description),
            SearchableField::Headings => self.headings.iter().map(String::as_str).collect(),
        }
    }

    /// Case-insensitive substring match of `query` against any of `fields`.
    pub fn matches(&self, query: &str, fields: &[SearchableField]) -> bool {
        let needle = query.to_lowercase();
        fields.iter().any(|field| {
            self.field_values(*field)
                .iter()
                .any(|value| value.to_lowercase().contains(&needle))
        })
    }

    /// Map a raw hit (remote index response or content file entry) into a
    /// document.
    ///
    /// Unknown keys are ignored. `id` may be a string or a number; when it
    /// is absent the id is left empty for the caller to fill in. `headings`
    /// accepts either an array of strings or a single string.
    pub fn from_hit(hit: &Value) -> Self {
        let text = |key: &str| -> Option<String> {
            match hit.get(key)? {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            }
        };

        let id = match hit.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };

        let headings = match hit.get("headings") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|h| h.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };

        Self {
            id,
            title: text("title"),
            category: text("category"),
            parent: text("parent"),
            description: text("description"),
            headings,
            params_inline: text("params_inline"),
        }
    }
}
