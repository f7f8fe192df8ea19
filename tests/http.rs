//! HTTP surface and remote catalog acquisition, exercised end to end against
//! in-process axum servers on ephemeral ports.

mod common;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, routing::get, Router};
use tempfile::TempDir;

use course_catalog::config::load_config;
use course_catalog::models::RecordKind;
use course_catalog::server::router;
use course_catalog::service::CatalogService;

use common::{write_config, FIXTURE};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Serves the fixture at `/catalog.txt`, counting downloads.
async fn spawn_catalog_host() -> (SocketAddr, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route(
            "/catalog.txt",
            get(|State(hits): State<Arc<AtomicUsize>>| async move {
                hits.fetch_add(1, Ordering::SeqCst);
                FIXTURE
            }),
        )
        .with_state(hits.clone());
    (spawn(app).await, hits)
}

fn service_for(tmp: &TempDir, source_url: &str, timeout_secs: u64) -> CatalogService {
    let catalog_path = tmp.path().join("data").join("catalog.txt");
    let config_path = write_config(tmp.path(), &catalog_path, source_url, timeout_secs);
    CatalogService::from_config(&load_config(&config_path).unwrap())
}

fn local_service(tmp: &TempDir) -> CatalogService {
    let catalog_path = tmp.path().join("catalog.txt");
    std::fs::write(&catalog_path, FIXTURE).unwrap();
    let config_path = write_config(tmp.path(), &catalog_path, "http://127.0.0.1:9/unused", 2);
    CatalogService::from_config(&load_config(&config_path).unwrap())
}

async fn spawn_api(service: CatalogService) -> String {
    let addr = spawn(router(Arc::new(service))).await;
    format!("http://{}", addr)
}

// ============ Catalog acquisition ============

#[tokio::test]
async fn test_missing_document_is_fetched_and_persisted() {
    let tmp = TempDir::new().unwrap();
    let (addr, hits) = spawn_catalog_host().await;
    let service = service_for(&tmp, &format!("http://{}/catalog.txt", addr), 10);

    let courses = service.records(RecordKind::Course).await;
    assert_eq!(courses.len(), 3);

    let saved = tmp.path().join("data").join("catalog.txt");
    assert_eq!(std::fs::read_to_string(&saved).unwrap(), FIXTURE);
    assert!(!tmp.path().join("data").join("catalog.txt.part").exists());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_access_downloads_once() {
    let tmp = TempDir::new().unwrap();
    let (addr, hits) = spawn_catalog_host().await;
    let service = Arc::new(service_for(&tmp, &format!("http://{}/catalog.txt", addr), 10));

    let mut handles = Vec::new();
    for i in 0..12 {
        let service = service.clone();
        let kind = if i % 2 == 0 {
            RecordKind::Course
        } else {
            RecordKind::Program
        };
        handles.push(tokio::spawn(async move {
            (kind, service.records(kind).await.len())
        }));
    }

    for handle in handles {
        let (kind, count) = handle.await.unwrap();
        match kind {
            RecordKind::Course => assert_eq!(count, 3),
            RecordKind::Program => assert_eq!(count, 2),
        }
    }
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_timeout_yields_empty_catalog() {
    let tmp = TempDir::new().unwrap();

    // Accepts connections and never answers.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let service = service_for(&tmp, &format!("http://{}/catalog.pdf", addr), 1);

    let started = std::time::Instant::now();
    assert!(service.records(RecordKind::Course).await.is_empty());
    assert!(started.elapsed() < Duration::from_secs(10));

    let results = service
        .search(RecordKind::Course, "machine learning", None)
        .await;
    assert!(results.is_empty());
    assert!(!tmp.path().join("data").join("catalog.txt").exists());
}

#[tokio::test]
async fn test_http_error_status_yields_empty_catalog() {
    let tmp = TempDir::new().unwrap();
    let addr = spawn(Router::new()).await;
    let service = service_for(&tmp, &format!("http://{}/missing.pdf", addr), 5);

    assert!(service.records(RecordKind::Program).await.is_empty());
    assert!(!tmp.path().join("data").join("catalog.txt").exists());
}

// ============ HTTP API ============

#[tokio::test]
async fn test_health() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_catalog_lists_records() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/catalog/courses", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["kind"], "course");
    assert_eq!(body["count"], 3);
    assert_eq!(body["records"][0]["id"], "CS 5100");
    assert_eq!(body["records"][0]["credits"], 4.0);
    assert_eq!(body["records"][0]["page"], 1);

    let body: serde_json::Value = reqwest::get(format!("{}/catalog/programs", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_search_endpoint_ranks() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let resp = reqwest::get(format!(
        "{}/search/courses?q=machine%20learning%2C%20ai&limit=2",
        base
    ))
    .await
    .unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["query"], "machine learning, ai");
    assert_eq!(body["count"], 2);
    assert_eq!(body["results"][0]["id"], "CS 6140");
    assert_eq!(
        body["results"][0]["matched_terms"],
        serde_json::json!(["machine learning", "ai"])
    );
    let first = body["results"][0]["score"].as_f64().unwrap();
    let second = body["results"][1]["score"].as_f64().unwrap();
    assert!(first >= second);
}

#[tokio::test]
async fn test_search_blank_query_is_empty() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let body: serde_json::Value = reqwest::get(format!("{}/search/courses?q=%20%20", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 0);

    let body: serde_json::Value = reqwest::get(format!("{}/search/programs", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_unknown_kind_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let resp = reqwest::get(format!("{}/catalog/patents", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "not_found");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("patents"));
}

#[tokio::test]
async fn test_zero_limit_is_bad_request() {
    let tmp = TempDir::new().unwrap();
    let base = spawn_api(local_service(&tmp)).await;

    let resp = reqwest::get(format!("{}/search/courses?q=data&limit=0", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}
