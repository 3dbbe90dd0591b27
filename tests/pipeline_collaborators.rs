// tests/pipeline_collaborators.rs
//
// Orchestrator behavior around the external collaborators, using call-recording
// mock detector/translator implementations.
//
// Covered:
// - empty / whitespace input never reaches a collaborator
// - detector failure -> "unknown", translator asked to auto-detect
// - translator failure -> error marker, Neutral / 0
// - explicit code skips detection; zh variants defer to translator

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use comment_sentiment_analyzer::detect::{DetectError, LanguageDetector};
use comment_sentiment_analyzer::translate::{TranslateError, Translator, TRANSLATION_ERROR};
use comment_sentiment_analyzer::{Analyzer, Lexicon, SentimentLabel, WindowedScorer};

#[derive(Default)]
struct RecordingDetector {
    answer: Option<String>,
    calls: Mutex<Vec<String>>,
}

#[async_trait]
impl LanguageDetector for RecordingDetector {
    async fn detect(&self, text: &str) -> Result<String, DetectError> {
        self.calls.lock().push(text.to_string());
        self.answer
            .clone()
            .ok_or_else(|| DetectError::Backend("detector offline".into()))
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Returns a canned English text, or fails when `output` is `None`.
#[derive(Default)]
struct RecordingTranslator {
    output: Option<String>,
    calls: Mutex<Vec<(String, Option<String>, String)>>,
}

#[async_trait]
impl Translator for RecordingTranslator {
    async fn translate(
        &self,
        text: &str,
        source: Option<&str>,
        target: &str,
    ) -> Result<String, TranslateError> {
        self.calls
            .lock()
            .push((text.to_string(), source.map(str::to_string), target.to_string()));
        self.output.clone().ok_or(TranslateError::Status(429))
    }
    fn name(&self) -> &'static str {
        "recording"
    }
}

fn analyzer(
    detect: Option<&str>,
    translate: Option<&str>,
) -> (Analyzer, Arc<RecordingDetector>, Arc<RecordingTranslator>) {
    let d = Arc::new(RecordingDetector {
        answer: detect.map(str::to_string),
        ..Default::default()
    });
    let t = Arc::new(RecordingTranslator {
        output: translate.map(str::to_string),
        ..Default::default()
    });
    let scorer = WindowedScorer::new(Arc::new(Lexicon::default()));
    (Analyzer::new(d.clone(), t.clone(), scorer), d, t)
}

#[tokio::test]
async fn empty_input_short_circuits() {
    let (a, d, t) = analyzer(Some("vi"), Some("good"));
    for input in ["", "   ", "\n\t "] {
        let r = a.analyze(input, "auto").await;
        assert!(!r.applicable);
        assert_eq!(r.detected_language, "N/A");
        assert_eq!(r.translated_text, "N/A");
        assert_eq!(r.score, 0);
        assert!(r.highlighted_html.is_empty());
    }
    assert!(d.calls.lock().is_empty(), "detector must not be called");
    assert!(t.calls.lock().is_empty(), "translator must not be called");
}

#[tokio::test]
async fn auto_detect_feeds_translator() {
    let (a, d, t) = analyzer(
        Some("vi"),
        Some("I like this product but the battery is not very good"),
    );
    let r = a.analyze("Tôi thích sản phẩm này nhưng pin không tốt lắm", "auto").await;

    assert_eq!(d.calls.lock().len(), 1);
    let calls = t.calls.lock();
    assert_eq!(calls[0].1.as_deref(), Some("vi"));
    assert_eq!(calls[0].2, "en");

    assert_eq!(r.detected_language, "VI");
    // like (+1), not very good (-1)
    assert_eq!(r.score, 0);
    assert_eq!(r.sentiment, SentimentLabel::Neutral);
    assert_eq!((r.positive_count, r.negative_count), (1, 1));
    assert!(r.highlights.get("not very good").is_some());
    assert!(r.summary.is_some());
}

#[tokio::test]
async fn detector_failure_becomes_unknown() {
    let (a, _d, t) = analyzer(None, Some("great"));
    let r = a.analyze("???", "auto").await;
    assert_eq!(r.detected_language, "UNKNOWN");
    assert!(r.applicable);
    // Unknown source: the translator detects on its own.
    assert_eq!(t.calls.lock()[0].1, None);
    assert_eq!(r.sentiment, SentimentLabel::Positive);
}

#[tokio::test]
async fn translation_failure_scores_the_marker() {
    let (a, _d, _t) = analyzer(Some("de"), None);
    let r = a.analyze("Das Essen war schrecklich", "auto").await;
    assert!(r.translation_failed);
    assert_eq!(r.translated_text, TRANSLATION_ERROR);
    assert_eq!(r.score, 0);
    assert_eq!(r.sentiment, SentimentLabel::Neutral);
    assert!(r.highlights.is_empty());
    assert!(r.spans.is_empty());
}

#[tokio::test]
async fn explicit_code_skips_detection() {
    let (a, d, t) = analyzer(Some("ko"), Some("The staff were friendly"));
    let r = a.analyze("Le personnel était sympathique", "fr").await;
    assert!(d.calls.lock().is_empty());
    assert_eq!(t.calls.lock()[0].1.as_deref(), Some("fr"));
    assert_eq!(r.detected_language, "FR");
    assert_eq!(r.score, 1);
}

#[tokio::test]
async fn chinese_defers_source_to_translator() {
    let (a, _d, t) = analyzer(Some("zh-tw"), Some("very good"));
    a.analyze("這個產品很好", "zh").await;
    a.analyze("這個產品很好", "auto").await;
    let calls = t.calls.lock();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.1.is_none()), "{calls:?}");
}

#[tokio::test]
async fn unknown_selector_is_rejected_before_collaborators() {
    let (a, d, t) = analyzer(Some("en"), Some("good"));
    let err = a
        .analyze_with_selector("good", Some("Klingon"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Klingon"));
    assert!(d.calls.lock().is_empty());
    assert!(t.calls.lock().is_empty());
}
