//! View layer for search results.
//!
//! A [`ViewRenderer`] turns one [`SearchView`] (the query, the hit list and
//! the error indicator) into output. Renderers never fail: a broken template
//! degrades to a static fallback page.
//!
//! | Renderer | Output | Used by |
//! |----------|--------|---------|
//! | [`HtmlRenderer`] | HTML page (`minijinja`, auto-escaped) | `GET /search`, `--format html` |
//! | [`JsonRenderer`] | `serde_json::Value` | `GET /api/search`, `--format json` |
//! | [`TextRenderer`] | Plain text listing | `docsite search` |

use anyhow::Result;
use minijinja::{context, Environment};
use serde_json::{json, Value};

use crate::error::SearchError;
use crate::models::SearchableDocument;

/// Everything a renderer gets to see.
#[derive(Debug, Clone, Copy)]
pub struct SearchView<'a> {
    pub query: Option<&'a str>,
    pub hits: &'a [SearchableDocument],
    pub error: Option<&'a SearchError>,
}

pub trait ViewRenderer {
    type Output;

    fn render(&self, view: &SearchView<'_>) -> Self::Output;
}

const SEARCH_TEMPLATE_NAME: &str = "search.html";

const SEARCH_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% if query %}{{ query }} - {% endif %}Search</title>
</head>
<body>
    <form action="/search" method="get" role="search">
        <input type="search" name="q" value="{{ query or "" }}" placeholder="Search the docs" autofocus>
    </form>
    {%- if error %}
    <p class="search-error" data-code="{{ error.code }}">Search is currently unavailable.</p>
    {%- elif query and not hits %}
    <p class="search-empty">No results for "{{ query }}".</p>
    {%- elif hits %}
    <ul class="search-hits">
        {%- for hit in hits %}
        <li class="search-hit" data-id="{{ hit.id }}">
            {%- if hit.category or hit.parent %}
            <p class="search-trail">{{ [hit.category, hit.parent] | select | join(" / ") }}</p>
            {%- endif %}
            <h3>{{ hit.title or "(untitled)" }}</h3>
            {%- if hit.description %}
            <p>{{ hit.description }}</p>
            {%- endif %}
            {%- if hit.headings %}
            <ul class="search-headings">
                {%- for heading in hit.headings %}
                <li>{{ heading }}</li>
                {%- endfor %}
            </ul>
            {%- endif %}
        </li>
        {%- endfor %}
    </ul>
    {%- endif %}
</body>
</html>
"#;

const FALLBACK_PAGE: &str =
    "<!DOCTYPE html><html><body><p>Search is currently unavailable.</p></body></html>";

pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(SEARCH_TEMPLATE_NAME, SEARCH_TEMPLATE)?;
        Ok(Self { env })
    }

    fn try_render(&self, view: &SearchView<'_>) -> Result<String, minijinja::Error> {
        let template = self.env.get_template(SEARCH_TEMPLATE_NAME)?;
        template.render(context! {
            query => view.query.filter(|q| !q.is_empty()),
            hits => view.hits,
            error => view.error.map(SearchError::detail),
        })
    }
}

impl ViewRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, view: &SearchView<'_>) -> String {
        match self.try_render(view) {
            Ok(html) => html,
            Err(e) => {
                tracing::error!("search template failed to render: {}", e);
                FALLBACK_PAGE.to_string()
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl ViewRenderer for JsonRenderer {
    type Output = Value;

    fn render(&self, view: &SearchView<'_>) -> Value {
        json!({
            "query": view.query,
            "hits": view.hits,
            "error": view.error.map(SearchError::detail),
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer;

impl ViewRenderer for TextRenderer {
    type Output = String;

    fn render(&self, view: &SearchView<'_>) -> String {
        if let Some(err) = view.error {
            return format!("Search failed: {}\n", err);
        }
        if view.hits.is_empty() {
            return "No results.\n".to_string();
        }

        let mut out = String::new();
        for (i, hit) in view.hits.iter().enumerate() {
            let title = hit.title.as_deref().unwrap_or("(untitled)");
            let trail: Vec<&str> = [hit.category.as_deref(), hit.parent.as_deref()]
                .into_iter()
                .flatten()
                .collect();
            if trail.is_empty() {
                out.push_str(&format!("{}. {}\n", i + 1, title));
            } else {
                out.push_str(&format!("{}. {} / {}\n", i + 1, trail.join(" / "), title));
            }
            if let Some(desc) = &hit.description {
                out.push_str(&format!("    {}\n", desc.replace('\n', " ").trim()));
            }
            if !hit.headings.is_empty() {
                out.push_str(&format!("    headings: {}\n", hit.headings.join(", ")));
            }
            out.push_str(&format!("    id: {}\n\n", hit.id));
        }
        out
    }
}
