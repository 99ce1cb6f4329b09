//! Content directory walker.
//!
//! Recursively lists the files under `[content].root` that match the
//! include globs, and loads them into an [`InMemoryContentStore`]. Each
//! matched file is JSON holding either one document object or an array of
//! them. Documents without an `id` are identified by their relative path
//! (`guides/intro.json`, or `guides/intro.json#2` for array entries).

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::Config;
use crate::models::SearchableDocument;
use crate::store::memory::InMemoryContentStore;

/// A content file found by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    pub path: PathBuf,
    /// Path relative to the content root, `/`-separated.
    pub relative: String,
}

pub fn list_content_files(config: &Config) -> Result<Vec<ContentFile>> {
    let content = &config.content;
    let root = &content.root;
    if !root.exists() {
        bail!("Content root does not exist: {}", root.display());
    }

    let include_set = build_globset(&content.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(content.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(content.follow_symlinks);
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        files.push(ContentFile {
            path: path.to_path_buf(),
            relative: rel_str,
        });
    }

    // Sort for deterministic ordering
    files.sort_by(|a, b| a.relative.cmp(&b.relative));

    Ok(files)
}

/// Load every document under the content root, in file order.
pub fn scan_content(config: &Config) -> Result<Vec<SearchableDocument>> {
    let mut docs = Vec::new();
    for file in list_content_files(config)? {
        let loaded = load_file(&file.path, &file.relative)?;
        debug!(file = %file.relative, documents = loaded.len(), "loaded content file");
        docs.extend(loaded);
    }
    Ok(docs)
}

/// Build the site's content store from the content directory.
///
/// A missing content root yields an empty store so that a site running
/// purely against the remote index needs no local content.
pub fn load_store(config: &Config) -> Result<InMemoryContentStore> {
    let store = InMemoryContentStore::with_index_name(config.content.index_name.clone());
    if !config.content.root.exists() {
        info!(
            root = %config.content.root.display(),
            "content root not found, starting with an empty store"
        );
        return Ok(store);
    }
    store.replace_all(scan_content(config)?);
    info!(documents = store.len(), "content store loaded");
    Ok(store)
}

/// Entry point for `docsite files`.
pub fn run_list_files(config: &Config) -> Result<()> {
    let files = list_content_files(config)?;
    if files.is_empty() {
        println!("No content files.");
        return Ok(());
    }
    for file in &files {
        println!("{}", file.relative);
    }
    println!();
    println!("{} file(s) under {}", files.len(), config.content.root.display());
    Ok(())
}

fn load_file(path: &Path, relative: &str) -> Result<Vec<SearchableDocument>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read content file: {}", path.display()))?;
    let json: Value = serde_json::from_str(&text)
        .with_context(|| format!("Invalid JSON in content file: {}", path.display()))?;

    match json {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| to_document(item, &format!("{}#{}", relative, i), path))
            .collect(),
        item => Ok(vec![to_document(&item, relative, path)?]),
    }
}

fn to_document(item: &Value, fallback_id: &str, path: &Path) -> Result<SearchableDocument> {
    if !item.is_object() {
        bail!(
            "Content file {} must hold a JSON object or an array of objects",
            path.display()
        );
    }
    let mut doc = SearchableDocument::from_hit(item);
    if doc.id.is_empty() {
        doc.id = fallback_id.to_string();
    }
    Ok(doc)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(root: &Path) -> Config {
        let mut cfg = Config::minimal();
        cfg.content.root = root.to_path_buf();
        cfg
    }

    fn write_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("guides/advanced")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::write(
            root.join("guides/intro.json"),
            r#"{"title": "Getting Started", "category": "guides"}"#,
        )
        .unwrap();
        fs::write(
            root.join("guides/advanced/routing.json"),
            r#"[{"id": "routing", "title": "Routing"}, {"title": "Params"}]"#,
        )
        .unwrap();
        fs::write(root.join("faq.json"), r#"{"id": "faq", "title": "FAQ"}"#).unwrap();
        fs::write(root.join("notes.md"), "# not content").unwrap();
        fs::write(root.join("node_modules/pkg/package.json"), "{}").unwrap();
        tmp
    }

    #[test]
    fn test_list_files_recursive_and_filtered() {
        let tmp = write_tree();
        let files = list_content_files(&config_for(tmp.path())).unwrap();
        let rel: Vec<&str> = files.iter().map(|f| f.relative.as_str()).collect();
        assert_eq!(
            rel,
            vec!["faq.json", "guides/advanced/routing.json", "guides/intro.json"]
        );
    }

    #[test]
    fn test_exclude_globs() {
        let tmp = write_tree();
        let mut cfg = config_for(tmp.path());
        cfg.content.exclude_globs = vec!["guides/advanced/**".to_string()];
        let files = list_content_files(&cfg).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_scan_assigns_fallback_ids() {
        let tmp = write_tree();
        let docs = scan_content(&config_for(tmp.path())).unwrap();
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["faq", "routing", "guides/advanced/routing.json#1", "guides/intro.json"]
        );
        assert_eq!(docs[3].category.as_deref(), Some("guides"));
    }

    #[test]
    fn test_missing_root() {
        let cfg = config_for(Path::new("/definitely/not/here"));
        assert!(list_content_files(&cfg).is_err());
        assert!(load_store(&cfg).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("bad.json"), "{ nope").unwrap();
        let err = scan_content(&config_for(tmp.path())).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_scalar_json_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("n.json"), "42").unwrap();
        assert!(scan_content(&config_for(tmp.path())).is_err());
    }
}
