//! JSON HTTP server over the catalog service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check (returns version) |
//! | `GET`  | `/catalog/{kind}` | Every record of `courses` or `programs` |
//! | `GET`  | `/search/{kind}?q=<query>&limit=<n>` | Ranked search results |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "not_found", "message": "unknown record kind 'patents'. Use courses or programs." } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front ends can
//! call the API directly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::models::{CatalogRecord, RecordKind, SearchResult};
use crate::service::CatalogService;

/// Starts the HTTP server on `[server].bind` and runs until the process is
/// terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let service = Arc::new(CatalogService::from_config(config));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(bind = %config.server.bind, "catalog server listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the application router around a shared service.
pub fn router(service: Arc<CatalogService>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/catalog/{kind}", get(handle_catalog))
        .route("/search/{kind}", get(handle_search))
        .layer(cors)
        .with_state(service)
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code.to_string(),
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request",
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found",
        message: message.into(),
    }
}

fn parse_kind(raw: &str) -> Result<RecordKind, AppError> {
    raw.parse::<RecordKind>().map_err(not_found)
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ GET /catalog/{kind} ============

#[derive(Serialize)]
struct CatalogResponse {
    kind: RecordKind,
    count: usize,
    records: Vec<CatalogRecord>,
}

async fn handle_catalog(
    State(service): State<Arc<CatalogService>>,
    Path(kind): Path<String>,
) -> Result<Json<CatalogResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    let records = service.records(kind).await;
    Ok(Json(CatalogResponse {
        kind,
        count: records.len(),
        records: records.as_ref().clone(),
    }))
}

// ============ GET /search/{kind} ============

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    count: usize,
    results: Vec<SearchResult>,
}

/// Ranked search. A missing or blank `q` yields an empty result list.
async fn handle_search(
    State(service): State<Arc<CatalogService>>,
    Path(kind): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let kind = parse_kind(&kind)?;
    if params.limit == Some(0) {
        return Err(bad_request("limit must be >= 1"));
    }

    let results = service.search(kind, &params.q, params.limit).await;
    Ok(Json(SearchResponse {
        query: params.q,
        count: results.len(),
        results,
    }))
}
