use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable consulted when `search.remote.key` is not set.
pub const REMOTE_KEY_ENV: &str = "MEILISEARCH_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Everything the search dispatcher reads at search time.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// `local` (or the legacy `collection`) searches the content store;
    /// any other value queries the remote index.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Overrides the content store's canonical index name.
    #[serde(default)]
    pub index_name: Option<String>,
    #[serde(default)]
    pub remote: RemoteConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            index_name: None,
            remote: RemoteConfig::default(),
        }
    }
}

fn default_backend() -> String {
    "local".to_string()
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RemoteConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: None,
            key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

impl RemoteConfig {
    /// The configured key, or the value of [`REMOTE_KEY_ENV`].
    pub fn resolved_key(&self) -> Option<String> {
        self.key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var(REMOTE_KEY_ENV).ok().filter(|k| !k.is_empty()))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    #[serde(default = "default_content_root")]
    pub root: PathBuf,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
    #[serde(default)]
    pub follow_symlinks: bool,
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
            index_name: default_index_name(),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("./content")
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.json".to_string()]
}

pub fn default_index_name() -> String {
    "content_documents".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

impl Config {
    /// Defaults only: local search over `./content`.
    pub fn minimal() -> Self {
        Self {
            search: SearchConfig::default(),
            content: ContentConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    if config.search.remote.timeout_secs == 0 {
        anyhow::bail!("search.remote.timeout_secs must be > 0");
    }

    if config.content.index_name.trim().is_empty() {
        anyhow::bail!("content.index_name must not be empty");
    }

    if let Some(name) = &config.search.index_name {
        if name.trim().is_empty() {
            anyhow::bail!("search.index_name must not be empty when set");
        }
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}
