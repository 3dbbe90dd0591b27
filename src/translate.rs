// src/translate.rs
//! Translation collaborator: trait + providers.
//!
//! Failures are explicit `TranslateError`s; the pipeline turns them into the
//! `[Translation error]` marker. No retries here, a failed call is final.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Marker text that replaces the translation when the provider fails.
pub const TRANSLATION_ERROR: &str = "[Translation error]";

const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslateError {
    /// Transport-level failure (DNS, TLS, timeout, ...).
    Http(String),
    /// Non-2xx status from the provider.
    Status(u16),
    /// Body did not have the expected shape.
    Malformed(String),
    /// Provider answered with no text.
    Empty,
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Http(e) => write!(f, "translation request failed: {e}"),
            TranslateError::Status(s) => write!(f, "translation provider returned HTTP {s}"),
            TranslateError::Malformed(e) => write!(f, "unexpected translation response: {e}"),
            TranslateError::Empty => write!(f, "translation provider returned no text"),
        }
    }
}

impl std::error::Error for TranslateError {}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into `target`. `source = None` lets the provider detect
    /// the source language itself.
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynTranslator = Arc<dyn Translator>;

/// Parsed reply of the public Google translate endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleReply {
    pub text: String,
    /// Source language the provider detected, when it reports one.
    pub detected: Option<String>,
}

/// Google translate over the public `translate_a/single` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("comment-sentiment-analyzer/0.1")
            .connect_timeout(Duration::from_secs(4).min(timeout))
            .timeout(timeout)
            .build()
            .context("building translation HTTP client")?;
        Ok(Self {
            http,
            endpoint: GOOGLE_ENDPOINT.to_string(),
        })
    }

    /// Point at a different endpoint (local stub servers in tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn fetch(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<GoogleReply, TranslateError> {
        let sl = source.unwrap_or("auto");
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", sl),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| TranslateError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;
        let reply = parse_google_body(&body)?;
        debug!(sl, tl = target, detected = ?reply.detected, "google translate ok");
        Ok(reply)
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError> {
        self.fetch(text, source, target).await.map(|r| r.text)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Body shape: `[[["chunk","orig",..], ...], null, "src", ...]`.
pub fn parse_google_body(body: &Value) -> Result<GoogleReply, TranslateError> {
    let chunks = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::Malformed("missing sentence array".into()))?;

    let text: String = chunks
        .iter()
        .filter_map(|c| c.get(0).and_then(Value::as_str))
        .collect();
    if text.trim().is_empty() {
        return Err(TranslateError::Empty);
    }

    let detected = body
        .get(2)
        .and_then(Value::as_str)
        .map(|s| s.to_ascii_lowercase());
    Ok(GoogleReply { text, detected })
}

/// Returns the input unchanged. Offline mode and English-only deployments.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTranslator;

#[async_trait]
impl Translator for PassthroughTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Option<&str>,
        _target: &str,
    ) -> Result<String, TranslateError> {
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "passthrough"
    }
}
