// src/detect.rs
//! Language-detection collaborator: trait + detectors.
//!
//! `ScriptDetector` runs offline on `whatlang`. Han-only text maps to `zh-cn`;
//! guesses `whatlang` itself marks unreliable are reported as inconclusive.
//!
//! The pipeline maps any `DetectError` to `unknown`; nothing here is fatal.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use whatlang::Lang;

use crate::language::TARGET;
use crate::translate::GoogleTranslator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// No letters to look at (digits, emoji, punctuation only).
    NoFeatures,
    /// Letters present but no language stood out.
    Inconclusive,
    /// Remote detector failed.
    Backend(String),
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectError::NoFeatures => write!(f, "no detectable features in text"),
            DetectError::Inconclusive => write!(f, "language detection inconclusive"),
            DetectError::Backend(e) => write!(f, "language detector failed: {e}"),
        }
    }
}

impl std::error::Error for DetectError {}

#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// ISO 639-1 style code (lowercase), e.g. `vi`, `ja`, `zh-cn`.
    async fn detect(&self, text: &str) -> Result<String, DetectError>;

    fn name(&self) -> &'static str;
}

pub type DynDetector = Arc<dyn LanguageDetector>;

/// Always answers with the configured code.
#[derive(Debug, Clone)]
pub struct FixedDetector {
    code: String,
}

impl FixedDetector {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into().to_ascii_lowercase(),
        }
    }
}

#[async_trait]
impl LanguageDetector for FixedDetector {
    async fn detect(&self, _text: &str) -> Result<String, DetectError> {
        Ok(self.code.clone())
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

/// Uses the source language reported by the Google translate endpoint.
#[derive(Debug, Clone)]
pub struct GoogleDetector {
    client: GoogleTranslator,
}

impl GoogleDetector {
    pub fn new(client: GoogleTranslator) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LanguageDetector for GoogleDetector {
    async fn detect(&self, text: &str) -> Result<String, DetectError> {
        let reply = self
            .client
            .fetch(text, None, TARGET)
            .await
            .map_err(|e| DetectError::Backend(e.to_string()))?;
        reply.detected.ok_or(DetectError::Inconclusive)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Local statistical detector (`whatlang` trigram profiles).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptDetector;

#[async_trait]
impl LanguageDetector for ScriptDetector {
    async fn detect(&self, text: &str) -> Result<String, DetectError> {
        detect_script(text).map(str::to_string)
    }

    fn name(&self) -> &'static str {
        "script"
    }
}

pub fn detect_script(text: &str) -> Result<&'static str, DetectError> {
    let info = whatlang::detect(text).ok_or_else(|| {
        if text.chars().any(char::is_alphabetic) {
            DetectError::Inconclusive
        } else {
            DetectError::NoFeatures
        }
    })?;
    // Han without kana; the translator picks simplified or traditional itself.
    if info.lang() == Lang::Cmn {
        return Ok("zh-cn");
    }
    if !info.is_reliable() {
        return Err(DetectError::Inconclusive);
    }
    iso639_1(info.lang()).ok_or(DetectError::Inconclusive)
}

/// Codes the translate endpoint accepts as `sl`.
fn iso639_1(lang: Lang) -> Option<&'static str> {
    let code = match lang {
        Lang::Eng => "en",
        Lang::Vie => "vi",
        Lang::Kor => "ko",
        Lang::Jpn => "ja",
        Lang::Deu => "de",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Por => "pt",
        Lang::Ita => "it",
        Lang::Nld => "nl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Pol => "pl",
        Lang::Ces => "cs",
        Lang::Slk => "sk",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Hrv => "hr",
        Lang::Srp => "sr",
        Lang::Slv => "sl",
        Lang::Ell => "el",
        Lang::Tur => "tr",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Est => "et",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Cat => "ca",
        Lang::Afr => "af",
        Lang::Ind => "id",
        Lang::Tgl => "tl",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Pes => "fa",
        Lang::Urd => "ur",
        Lang::Hin => "hi",
        Lang::Ben => "bn",
        Lang::Tam => "ta",
        Lang::Tel => "te",
        Lang::Tha => "th",
        Lang::Lat => "la",
        Lang::Epo => "eo",
        _ => return None,
    };
    Some(code)
}
