// src/api.rs
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::language::{self, LanguageOption};
use crate::metrics::Metrics;
use crate::pipeline::{AnalysisResult, Analyzer};

/// Upper bound on items per `/analyze/batch` call.
pub const MAX_BATCH: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
}

impl AppState {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
        }
    }
}

/// Core routes (no `/metrics`).
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/languages", get(languages))
        .route("/analyze", post(analyze))
        .route("/analyze/batch", post(analyze_batch))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Core routes plus `/metrics` when a recorder is available.
pub fn router(state: AppState, metrics: Option<&Metrics>) -> Router {
    let app = create_router(state);
    match metrics {
        Some(m) => app.merge(m.router()),
        None => app,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeReq {
    pub text: String,
    /// UI label or code; defaults to auto-detect.
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody { error: msg.into() }),
    )
}

async fn languages() -> Json<Vec<LanguageOption>> {
    Json(language::options())
}

async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeReq>,
) -> Result<Json<AnalysisResult>, ApiError> {
    state
        .analyzer
        .analyze_with_selector(&body.text, body.language.as_deref())
        .await
        .map(Json)
        .map_err(|e| bad_request(e.to_string()))
}

async fn analyze_batch(
    State(state): State<AppState>,
    Json(items): Json<Vec<AnalyzeReq>>,
) -> Result<Json<Vec<AnalysisResult>>, ApiError> {
    if items.len() > MAX_BATCH {
        return Err(bad_request(format!(
            "batch of {} exceeds the limit of {MAX_BATCH}",
            items.len()
        )));
    }

    // Validate every selector up front so a bad item fails the whole call
    // before any collaborator is hit.
    let mut resolved = Vec::with_capacity(items.len());
    for (i, it) in items.into_iter().enumerate() {
        let code = language::resolve(it.language.as_deref())
            .map_err(|e| bad_request(format!("item {i}: {e}")))?;
        resolved.push((it.text, code));
    }

    let mut set = JoinSet::new();
    for (i, (text, code)) in resolved.into_iter().enumerate() {
        let analyzer = state.analyzer.clone();
        set.spawn(async move { (i, analyzer.analyze(&text, code).await) });
    }

    let mut out: Vec<Option<AnalysisResult>> = vec![None; set.len()];
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((i, res)) => out[i] = Some(res),
            Err(e) => {
                error!(error = %e, "batch analysis task failed");
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "analysis task failed".into(),
                    }),
                ));
            }
        }
    }
    Ok(Json(out.into_iter().flatten().collect()))
}
