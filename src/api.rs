use crate::corpus::load_records;
use crate::engine::{SearchEngine, SearchOptions};
use crate::record::Record;
use anyhow::Context;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// ========== Shared State ==========

/// Shared server state
///
/// The engine is swapped whole on reload. Handlers clone the `Arc` and
/// search without holding the lock.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<RwLock<Arc<SearchEngine>>>,
    corpus_path: Option<PathBuf>,
}

impl AppState {
    pub fn new(engine: SearchEngine, corpus_path: Option<PathBuf>) -> Self {
        Self {
            engine: Arc::new(RwLock::new(Arc::new(engine))),
            corpus_path,
        }
    }

    /// Current engine snapshot
    pub fn engine(&self) -> Arc<SearchEngine> {
        let guard = self.engine.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    fn swap(&self, engine: SearchEngine) {
        let mut guard = self.engine.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(engine);
    }
}

// ========== Request/Response Types ==========

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub explain: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub elapsed_ms: u128,
    pub results: Vec<SearchHit>,
}

#[derive(Debug, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub username: String,
    pub text: String,
    pub like_count: u64,
    pub reply_count: u64,
    pub retweet_count: u64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BTreeMap<String, f64>>,
}

impl SearchHit {
    fn new(record: &Record, score: f64, breakdown: Option<BTreeMap<String, f64>>) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            text: record.text().to_string(),
            like_count: record.like_count,
            reply_count: record.reply_count,
            retweet_count: record.retweet_count,
            score,
            breakdown,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub records: usize,
    pub terms: usize,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }
}

// ========== Error Handling ==========

pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

impl AppError {
    fn bad_request(message: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(message.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = format!("{:#}", self.error);
        tracing::error!("API error: {}", message);

        (self.status, Json(ApiResponse::<()>::error(message))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: err.into(),
        }
    }
}

// ========== Handlers ==========

async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK"))
}

async fn search_records(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> impl IntoResponse {
    let engine = state.engine();

    let options = SearchOptions {
        limit: req.limit,
        offset: req.offset.unwrap_or(0),
        explain: req.explain.unwrap_or(false),
    };

    let result = engine.search(&req.q, &options);
    let elapsed_ms = result.elapsed_millis();
    let total = result.total;
    let results = result
        .results
        .into_iter()
        .map(|scored| SearchHit::new(scored.record, scored.score, scored.breakdown))
        .collect();

    Json(ApiResponse::success(SearchResponse {
        query: req.q,
        total,
        elapsed_ms,
        results,
    }))
}

async fn get_record(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    let engine = state.engine();
    match engine.get_record(&id) {
        Some(record) => Json(ApiResponse::success(record.clone())),
        None => Json(ApiResponse::error(format!("Record with id '{}' not found", id))),
    }
}

async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(state.engine().stats()))
}

async fn reload_corpus(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let path = state
        .corpus_path
        .clone()
        .ok_or_else(|| AppError::bad_request("no corpus path configured"))?;

    // Build off the async workers, then swap in the finished engine
    let engine = tokio::task::spawn_blocking(move || -> anyhow::Result<SearchEngine> {
        let records = load_records(&path)
            .with_context(|| format!("reloading corpus from {}", path.display()))?;
        Ok(SearchEngine::new(records))
    })
    .await??;

    let response = ReloadResponse {
        records: engine.record_count(),
        terms: engine.index().term_count(),
    };
    state.swap(engine);
    tracing::info!(records = response.records, terms = response.terms, "corpus reloaded");

    Ok(Json(ApiResponse::success(response)))
}

// ========== Router ==========

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_records))
        .route("/records/:id", get(get_record))
        .route("/stats", get(get_stats))
        .route("/reload", post(reload_corpus))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}
