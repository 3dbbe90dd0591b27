// src/metrics.rs
use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::warn;

pub const ANALYSES_TOTAL: &str = "analyses_total";
pub const NOT_APPLICABLE_TOTAL: &str = "analyses_not_applicable_total";
pub const DETECT_FALLBACKS_TOTAL: &str = "detect_fallbacks_total";
pub const TRANSLATION_ERRORS_TOTAL: &str = "translation_errors_total";
pub const ANALYZE_DURATION_MS: &str = "analyze_duration_ms";
pub const SCORER_WINDOW: &str = "scorer_window";

/// One recorder per process; later calls reuse the first handle.
static HANDLE: OnceCell<Option<PrometheusHandle>> = OnceCell::new();

#[derive(Clone)]
pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder (once) and publish the scorer window.
    /// `None` when another recorder already owns the process.
    pub fn init(window: usize) -> Option<Self> {
        let handle = HANDLE
            .get_or_init(|| match PrometheusBuilder::new().install_recorder() {
                Ok(h) => Some(h),
                Err(e) => {
                    warn!(error = %e, "prometheus recorder not installed");
                    None
                }
            })
            .clone()?;

        describe();
        gauge!(SCORER_WINDOW).set(window as f64);
        Some(Self { handle })
    }

    /// Router exposing `/metrics` in the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(ANALYSES_TOTAL, "Analyses run through the full pipeline.");
        describe_counter!(
            NOT_APPLICABLE_TOTAL,
            "Empty or whitespace-only inputs short-circuited."
        );
        describe_counter!(
            DETECT_FALLBACKS_TOTAL,
            "Language detections that fell back to 'unknown'."
        );
        describe_counter!(
            TRANSLATION_ERRORS_TOTAL,
            "Translations replaced by the error marker."
        );
        describe_histogram!(ANALYZE_DURATION_MS, "End-to-end analysis time in milliseconds.");
        describe_gauge!(SCORER_WINDOW, "Negation look-ahead window in tokens.");
    });
}

pub(crate) fn record_not_applicable() {
    counter!(NOT_APPLICABLE_TOTAL).increment(1);
}

pub(crate) fn record_detect_fallback() {
    counter!(DETECT_FALLBACKS_TOTAL).increment(1);
}

pub(crate) fn record_translation_error() {
    counter!(TRANSLATION_ERRORS_TOTAL).increment(1);
}

pub(crate) fn record_analysis(duration_ms: f64) {
    counter!(ANALYSES_TOTAL).increment(1);
    histogram!(ANALYZE_DURATION_MS).record(duration_ms);
}
