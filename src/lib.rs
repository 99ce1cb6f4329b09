//! # docsite
//!
//! Search for a content-driven documentation site.
//!
//! A search box on the site feeds a [`search::SearchDispatcher`], which
//! answers from one of two backends chosen by configuration on every call:
//! an in-process substring filter over the site's content, or a remote
//! Meilisearch index. Both produce the same [`models::SearchableDocument`]
//! records, which a [`view::ViewRenderer`] turns into HTML, JSON or text.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌─────────────┐
//! │ content/*.json│──▶│ InMemoryContent  │◀──│             │
//! └──────────────┘   │ Store (local)    │   │   Search    │──▶ ViewRenderer
//!                    └──────────────────┘   │ Dispatcher  │    HTML/JSON/text
//!                    ┌──────────────────┐   │             │
//!                    │ Meilisearch index│◀──│             │
//!                    │ (remote)         │   └─────────────┘
//!                    └──────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docsite files                          # list content files
//! docsite search "getting started"       # search with the configured backend
//! docsite search routing --backend remote --format json
//! docsite serve                          # start the HTTP server
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Searchable document and field types |
//! | [`error`] | Search error taxonomy |
//! | [`store`] | Content store trait and in-memory store |
//! | [`content`] | Content directory walker and loader |
//! | [`remote`] | Remote index client (Meilisearch) |
//! | [`search`] | Search dispatcher |
//! | [`view`] | HTML, JSON and text renderers |
//! | [`server`] | HTTP server |

pub mod config;
pub mod content;
pub mod error;
pub mod models;
pub mod remote;
pub mod search;
pub mod server;
pub mod store;
pub mod view;
