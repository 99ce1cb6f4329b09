//! HTTP server tests: the router is served on an ephemeral port and
//! exercised with reqwest.

use docsite::config::{parse_config, Config};
use docsite::content;
use docsite::server::{router, AppState};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_site(root: &Path, backend: &str) -> PathBuf {
    let content_dir = root.join("content");
    fs::create_dir_all(&content_dir).unwrap();
    fs::write(
        content_dir.join("start.json"),
        r#"{"id": "start", "title": "Getting Started"}"#,
    )
    .unwrap();
    fs::write(content_dir.join("faq.json"), r#"{"id": "faq", "title": "FAQ"}"#).unwrap();

    let config_path = root.join("docsite.toml");
    fs::write(
        &config_path,
        format!(
            "[search]\nbackend = \"{}\"\n\n[search.remote]\nhost = \"http://127.0.0.1:9\"\nkey = \"k\"\ntimeout_secs = 2\n\n[content]\nroot = \"{}\"\n",
            backend,
            content_dir.display()
        ),
    )
    .unwrap();
    config_path
}

async fn spawn(config_path: &Path) -> String {
    let text = fs::read_to_string(config_path).unwrap();
    let config: Config = parse_config(&text).unwrap();
    let store = content::load_store(&config).unwrap();
    let state = AppState::new(config, store, Some(config_path.to_path_buf())).unwrap();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn get_json(url: &str) -> (u16, Value) {
    let resp = reqwest::get(url).await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.json().await.unwrap())
}

#[tokio::test]
async fn api_search_returns_hits() {
    let tmp = TempDir::new().unwrap();
    let base = spawn(&write_site(tmp.path(), "local")).await;

    let (status, body) = get_json(&format!("{}/api/search?q=start", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["hits"][0]["id"], "start");
    assert_eq!(body["hits"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn api_search_without_query_is_empty() {
    let tmp = TempDir::new().unwrap();
    let base = spawn(&write_site(tmp.path(), "remote")).await;

    let (status, body) = get_json(&format!("{}/api/search", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["hits"], serde_json::json!([]));
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn api_search_remote_down_still_ok() {
    let tmp = TempDir::new().unwrap();
    let base = spawn(&write_site(tmp.path(), "remote")).await;

    let (status, body) = get_json(&format!("{}/api/search?q=start", base)).await;
    assert_eq!(status, 200);
    assert_eq!(body["hits"], serde_json::json!([]));
    assert_eq!(body["error"]["code"], "backend_unavailable");
}

#[tokio::test]
async fn search_page_renders_html() {
    let tmp = TempDir::new().unwrap();
    let base = spawn(&write_site(tmp.path(), "local")).await;

    let resp = reqwest::get(format!("{}/search?q=faq", base)).await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));
    let html = resp.text().await.unwrap();
    assert!(html.contains("data-id=\"faq\""));
    assert!(!html.contains("Getting Started"));
}

#[tokio::test]
async fn refresh_reloads_config_and_content() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_site(tmp.path(), "remote");
    let base = spawn(&config_path).await;

    let (_, health) = get_json(&format!("{}/health", base)).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["backend"], "remote");
    assert_eq!(health["documents"], 2);

    // Switch to local search and add a page, then refresh.
    let text = fs::read_to_string(&config_path).unwrap();
    fs::write(&config_path, text.replace("\"remote\"", "\"local\"")).unwrap();
    fs::write(
        tmp.path().join("content/routing.json"),
        r#"{"id": "routing", "title": "Routing"}"#,
    )
    .unwrap();

    let (status, summary) = get_json(&format!("{}/refresh", base)).await;
    assert_eq!(status, 200);
    assert_eq!(summary["documents"], 3);
    assert_eq!(summary["backend"], "local");

    let (_, body) = get_json(&format!("{}/api/search?q=rout", base)).await;
    assert_eq!(body["hits"][0]["id"], "routing");
}

#[tokio::test]
async fn failed_refresh_keeps_previous_state() {
    let tmp = TempDir::new().unwrap();
    let config_path = write_site(tmp.path(), "local");
    let base = spawn(&config_path).await;

    fs::write(&config_path, "this is [not toml").unwrap();

    let (status, body) = get_json(&format!("{}/refresh", base)).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "refresh_failed");

    let (_, body) = get_json(&format!("{}/api/search?q=faq", base)).await;
    assert_eq!(body["hits"][0]["id"], "faq");
}
