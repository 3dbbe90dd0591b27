// src/config/app.rs
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, fs};
use tracing::{info, warn};

use crate::scorer::DEFAULT_WINDOW;

pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

pub const ENV_CONFIG_PATH: &str = "SENTIMENT_CONFIG_PATH";
pub const ENV_WINDOW: &str = "SENTIMENT_WINDOW";
pub const ENV_LEXICON_PATH: &str = "SENTIMENT_LEXICON_PATH";
pub const ENV_DETECTOR: &str = "SENTIMENT_DETECTOR";
pub const ENV_TRANSLATOR: &str = "SENTIMENT_TRANSLATOR";
pub const ENV_HTTP_TIMEOUT: &str = "SENTIMENT_HTTP_TIMEOUT_SECS";
pub const ENV_METRICS: &str = "SENTIMENT_METRICS";

fn default_timeout_secs() -> u64 {
    10
}

/// Which language detector backs auto-detect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DetectorKind {
    Script,
    Google,
    /// `fixed:<code>`
    Fixed(String),
}

impl FromStr for DetectorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "script" | "local" => Ok(DetectorKind::Script),
            "google" => Ok(DetectorKind::Google),
            _ => match s.strip_prefix("fixed:") {
                Some(code) if !code.trim().is_empty() => {
                    Ok(DetectorKind::Fixed(code.trim().to_string()))
                }
                _ => Err(anyhow!("unknown detector '{s}' (script | google | fixed:<code>)")),
            },
        }
    }
}

impl TryFrom<String> for DetectorKind {
    type Error = anyhow::Error;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<DetectorKind> for String {
    fn from(k: DetectorKind) -> Self {
        match k {
            DetectorKind::Script => "script".into(),
            DetectorKind::Google => "google".into(),
            DetectorKind::Fixed(code) => format!("fixed:{code}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorKind {
    Google,
    Passthrough,
}

impl FromStr for TranslatorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(TranslatorKind::Google),
            "passthrough" | "none" | "off" => Ok(TranslatorKind::Passthrough),
            other => Err(anyhow!("unknown translator '{other}' (google | passthrough)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Negation look-ahead window.
    pub window: usize,
    /// Lexicon override; built-in lists when absent.
    pub lexicon_path: Option<PathBuf>,
    pub detector: DetectorKind,
    pub translator: TranslatorKind,
    #[serde(default = "default_timeout_secs")]
    pub http_timeout_secs: u64,
    /// Expose `/metrics`.
    pub metrics: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            lexicon_path: None,
            detector: DetectorKind::Script,
            translator: TranslatorKind::Google,
            http_timeout_secs: default_timeout_secs(),
            metrics: false,
        }
    }
}

impl AppConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        let mut cfg: AppConfig =
            toml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// File (if present) then env overrides. A malformed file is an error;
    /// malformed env values are logged and ignored.
    pub fn from_env() -> Result<Self> {
        let path = env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut cfg = if path.exists() {
            info!(path = %path.display(), "loading app config");
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        cfg.apply_env();
        cfg.sanitize();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Some(w) = env_parsed::<usize>(ENV_WINDOW) {
            self.window = w;
        }
        if let Ok(p) = env::var(ENV_LEXICON_PATH) {
            if !p.trim().is_empty() {
                self.lexicon_path = Some(PathBuf::from(p.trim()));
            }
        }
        if let Some(d) = env_parsed::<DetectorKind>(ENV_DETECTOR) {
            self.detector = d;
        }
        if let Some(t) = env_parsed::<TranslatorKind>(ENV_TRANSLATOR) {
            self.translator = t;
        }
        if let Some(s) = env_parsed::<u64>(ENV_HTTP_TIMEOUT) {
            self.http_timeout_secs = s;
        }
        if let Ok(v) = env::var(ENV_METRICS) {
            self.metrics = matches!(v.trim(), "1" | "true" | "yes" | "on");
        }
    }

    fn sanitize(&mut self) {
        if self.http_timeout_secs == 0 {
            warn!("http_timeout_secs=0 is not usable, using default");
            self.http_timeout_secs = default_timeout_secs();
        }
    }
}

fn env_parsed<T>(name: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(var = name, value = %raw, error = %e, "ignoring invalid env override");
            None
        }
    }
}
