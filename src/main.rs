//! Comment Sentiment Service — Binary Entrypoint
//! Boots the Axum HTTP server: config, analyzer, routes and middleware.

use shuttle_axum::ShuttleAxum;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs by default, JSON with `LOG_FORMAT=json`.
/// `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("comment_sentiment_analyzer=info,pipeline=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    // Shuttle may already own the global subscriber.
    if let Err(e) = installed {
        debug!(error = %e, "tracing subscriber already set; keeping the existing one");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let router = comment_sentiment_analyzer::app().await?;

    Ok(router.into())
}
