// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod config;
pub mod detect;
pub mod highlight;
pub mod language;
pub mod lexicon;
pub mod metrics;
pub mod pipeline;
pub mod scorer;
pub mod summary;
pub mod tokenizer;
pub mod translate;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, router, AppState};
pub use crate::lexicon::{Lexicon, Polarity};
pub use crate::pipeline::{AnalysisResult, Analyzer};
pub use crate::scorer::{PhraseMap, ScoreResult, SentimentLabel, WindowedScorer};

use axum::Router;
use tracing::info;

/// Build the full application Router from process configuration
/// (`config/app.toml` + `SENTIMENT_*` env vars). `/metrics` is mounted only
/// when enabled and a recorder could be installed.
pub async fn app() -> anyhow::Result<Router> {
    let cfg = config::AppConfig::from_env()?;
    let analyzer = Analyzer::from_config(&cfg)?;
    let metrics = if cfg.metrics {
        metrics::Metrics::init(cfg.window)
    } else {
        None
    };
    info!(metrics = metrics.is_some(), "router assembled");
    Ok(router(AppState::new(analyzer), metrics.as_ref()))
}
