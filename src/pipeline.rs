// src/pipeline.rs
//! # Analysis pipeline
//! detect (or accept) language → translate to English → tokenize → score →
//! highlight → package for presentation.
//!
//! Collaborator failures never escape: detection falls back to `unknown`,
//! translation to the `[Translation error]` marker (which then scores Neutral).
//! Empty input short-circuits before any collaborator is called.

use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::config::{AppConfig, DetectorKind, TranslatorKind};
use crate::detect::{DynDetector, FixedDetector, GoogleDetector, ScriptDetector};
use crate::highlight::{self, HighlightSpan};
use crate::language::{self, AUTO, TARGET, UNKNOWN};
use crate::lexicon::Lexicon;
use crate::metrics;
use crate::scorer::{PhraseMap, SentimentLabel, WindowedScorer};
use crate::summary::VisualSummary;
use crate::tokenizer::tokenize;
use crate::translate::{
    DynTranslator, GoogleTranslator, PassthroughTranslator, TRANSLATION_ERROR,
};

/// Placeholder shown for language and translation when there is nothing to analyze.
pub const NOT_APPLICABLE: &str = "N/A";

/// Everything the presentation layer needs for one comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    /// `false` for the empty-input sentinel.
    pub applicable: bool,
    /// Upper-cased code as shown to users (`VI`, `UNKNOWN`, `N/A`).
    pub detected_language: String,
    pub translated_text: String,
    pub translation_failed: bool,
    pub sentiment: SentimentLabel,
    pub score: i32,
    pub positive_count: u32,
    pub negative_count: u32,
    pub highlights: PhraseMap,
    pub spans: Vec<HighlightSpan>,
    pub highlighted_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<VisualSummary>,
}

impl AnalysisResult {
    pub fn not_applicable() -> Self {
        Self {
            applicable: false,
            detected_language: NOT_APPLICABLE.to_string(),
            translated_text: NOT_APPLICABLE.to_string(),
            translation_failed: false,
            sentiment: SentimentLabel::Neutral,
            score: 0,
            positive_count: 0,
            negative_count: 0,
            highlights: PhraseMap::new(),
            spans: Vec::new(),
            highlighted_html: String::new(),
            summary: None,
        }
    }
}

pub struct Analyzer {
    detector: DynDetector,
    translator: DynTranslator,
    scorer: WindowedScorer,
}

impl Analyzer {
    pub fn new(detector: DynDetector, translator: DynTranslator, scorer: WindowedScorer) -> Self {
        Self {
            detector,
            translator,
            scorer,
        }
    }

    /// Wire lexicon, scorer and collaborators from configuration.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let lexicon = match &cfg.lexicon_path {
            Some(p) => Lexicon::from_path(p).context("loading lexicon override")?,
            None => Lexicon::default(),
        };
        let (pos, neg, negation) = lexicon.sizes();
        let scorer = WindowedScorer::new(Arc::new(lexicon)).with_window(cfg.window);

        let timeout = Duration::from_secs(cfg.http_timeout_secs);
        let detector: DynDetector = match &cfg.detector {
            DetectorKind::Script => Arc::new(ScriptDetector),
            DetectorKind::Google => Arc::new(GoogleDetector::new(GoogleTranslator::new(timeout)?)),
            DetectorKind::Fixed(code) => Arc::new(FixedDetector::new(code.as_str())),
        };
        let translator: DynTranslator = match cfg.translator {
            TranslatorKind::Google => Arc::new(GoogleTranslator::new(timeout)?),
            TranslatorKind::Passthrough => Arc::new(PassthroughTranslator),
        };

        info!(
            detector = detector.name(),
            translator = translator.name(),
            window = cfg.window,
            pos,
            neg,
            negation,
            "analyzer ready"
        );
        Ok(Self::new(detector, translator, scorer))
    }

    pub fn scorer(&self) -> &WindowedScorer {
        &self.scorer
    }

    /// Resolve a UI selector (label or code, `None` = auto) and analyze.
    pub async fn analyze_with_selector(
        &self,
        text: &str,
        selector: Option<&str>,
    ) -> Result<AnalysisResult> {
        let code = language::resolve(selector)?;
        Ok(self.analyze(text, code).await)
    }

    /// `code` is a language code or `auto`.
    pub async fn analyze(&self, text: &str, code: &str) -> AnalysisResult {
        if text.trim().is_empty() {
            metrics::record_not_applicable();
            return AnalysisResult::not_applicable();
        }
        let started = Instant::now();
        let id = anon_hash(text);

        let lang = if code.eq_ignore_ascii_case(AUTO) {
            match self.detector.detect(text).await {
                Ok(c) => c,
                Err(e) => {
                    warn!(%id, detector = self.detector.name(), error = %e, "language detection fell back to unknown");
                    metrics::record_detect_fallback();
                    UNKNOWN.to_string()
                }
            }
        } else {
            code.to_ascii_lowercase()
        };

        let (translated, translation_failed) = match self
            .translator
            .translate(text, language::translator_source(&lang), TARGET)
            .await
        {
            Ok(t) => (t, false),
            Err(e) => {
                warn!(%id, lang = %lang, translator = self.translator.name(), error = %e, "translation failed");
                metrics::record_translation_error();
                (TRANSLATION_ERROR.to_string(), true)
            }
        };

        let scored = self.scorer.score(&tokenize(&translated));
        let annotated = highlight::render(&translated, &scored.highlights);
        let summary = VisualSummary::from_score(&scored);

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        metrics::record_analysis(elapsed_ms);
        // Never log raw text. Only hashed id + aggregates.
        info!(
            target: "pipeline",
            %id,
            lang = %lang,
            sentiment = scored.sentiment.as_str(),
            score = scored.score,
            pos = scored.positive_count,
            neg = scored.negative_count,
            spans = annotated.spans.len(),
            elapsed_ms,
            "analysis done"
        );

        AnalysisResult {
            applicable: true,
            detected_language: lang.to_uppercase(),
            highlighted_html: annotated.to_html(),
            spans: annotated.spans,
            translated_text: translated,
            translation_failed,
            sentiment: scored.sentiment,
            score: scored.score,
            positive_count: scored.positive_count,
            negative_count: scored.negative_count,
            highlights: scored.highlights,
            summary: Some(summary),
        }
    }
}

/// Short, stable id for correlating log lines without the text itself.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    use std::fmt::Write as _;
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anon_hash_is_short_and_stable() {
        let a = anon_hash("the room is clean");
        assert_eq!(a.len(), 12);
        assert_eq!(a, anon_hash("the room is clean"));
        assert_ne!(a, anon_hash("the room is dirty"));
    }

    #[test]
    fn not_applicable_shape() {
        let r = AnalysisResult::not_applicable();
        assert!(!r.applicable);
        assert_eq!(r.detected_language, "N/A");
        assert_eq!(r.translated_text, "N/A");
        assert!(r.highlighted_html.is_empty());
        let v = serde_json::to_value(&r).unwrap();
        assert!(v.get("summary").is_none());
    }

    #[tokio::test]
    async fn passthrough_pipeline_scores_english() {
        let a = Analyzer::from_config(&AppConfig {
            translator: TranslatorKind::Passthrough,
            detector: DetectorKind::Fixed("en".into()),
            ..AppConfig::default()
        })
        .unwrap();
        let r = a.analyze("Friendly staff, but the room was not clean.", "auto").await;
        assert_eq!(r.detected_language, "EN");
        assert_eq!(r.score, 0);
        assert_eq!(r.highlights.get("friendly").map(|p| p.as_str()), Some("pos"));
        assert_eq!(r.highlights.get("not clean").map(|p| p.as_str()), Some("neg"));
        assert_eq!(r.spans.len(), 2);
    }
}
