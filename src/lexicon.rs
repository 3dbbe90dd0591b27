// src/lexicon.rs
//! English sentiment lexicon: positive words, negative words and negation cues.
//!
//! All three sets hold *normalized* keys (lowercase, apostrophes stripped), so
//! `don't` and `dont` are one entry. The lexicon is built once at startup and
//! shared read-only (`Arc<Lexicon>`) between concurrent analyses.
//!
//! Override file shape (TOML; JSON with the same keys is accepted too):
//! ```toml
//! positive = ["good", "great"]
//! negative = ["bad"]
//! negation = ["not", "don't"]
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::tokenizer::normalize_key;

/// Polarity of a lexicon word or of a resolved phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    #[serde(rename = "pos")]
    Positive,
    #[serde(rename = "neg")]
    Negative,
}

impl Polarity {
    /// Negation flips the direction of the cue it governs.
    pub fn flipped(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::Positive => "pos",
            Polarity::Negative => "neg",
        }
    }
}

const POSITIVE: &[&str] = &[
    // general
    "good", "great", "excellent", "amazing", "awesome", "perfect", "nice", "love", "like",
    "enjoy", "satisfied",
    // quality / experience
    "comfortable", "clean", "cozy", "quiet", "spacious", "modern", "beautiful", "convenient",
    "reliable",
    // service / people
    "friendly", "helpful", "professional", "polite", "attentive",
    // food
    "tasty", "delicious", "fresh", "yummy",
    // value
    "affordable", "reasonable", "worth", "value",
    // location / travel
    "central", "conveniently", "accessible",
    // stay / usage
    "pleasant", "smooth", "easy", "fast", "efficient",
];

const NEGATIVE: &[&str] = &[
    // general
    "bad", "terrible", "awful", "poor", "worst", "hate",
    // quality / condition
    "dirty", "old", "outdated", "broken", "damaged", "uncomfortable", "noisy", "crowded", "small",
    // service
    "rude", "unhelpful", "slow", "careless", "unprofessional",
    // food
    "tasteless", "cold", "stale", "bland",
    // price
    "expensive", "overpriced", "costly",
    // technical / facilities
    "unstable", "laggy", "disconnect",
    // experience
    "disappointed", "frustrating", "annoying", "problematic",
];

const NEGATION: &[&str] = &[
    "not", "no", "never", "dont", "don't", "doesnt", "doesn't", "didnt", "didn't", "cannot",
    "can't", "hardly", "rarely",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    positive: HashSet<String>,
    negative: HashSet<String>,
    negation: HashSet<String>,
}

/// On-disk shape of a lexicon override.
#[derive(Debug, Clone, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    positive: Vec<String>,
    #[serde(default)]
    negative: Vec<String>,
    #[serde(default)]
    negation: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        // The built-in lists are disjoint; `builtin_lists_are_disjoint` pins that.
        Self {
            positive: normalize_all(POSITIVE),
            negative: normalize_all(NEGATIVE),
            negation: normalize_all(NEGATION),
        }
    }
}

impl Lexicon {
    /// Build from raw word lists. A word present in two sets is a configuration
    /// error and is rejected.
    pub fn new<I, S>(positive: I, negative: I, negation: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lex = Self {
            positive: normalize_all(positive),
            negative: normalize_all(negative),
            negation: normalize_all(negation),
        };
        lex.check_disjoint()?;
        Ok(lex)
    }

    /// Load an override file. TOML or JSON, chosen by extension with a fallback
    /// to the other format.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let file = parse_lexicon(&content, &ext)
            .with_context(|| format!("parsing lexicon {}", path.display()))?;
        Self::new(file.positive, file.negative, file.negation)
    }

    pub fn is_positive(&self, key: &str) -> bool {
        self.positive.contains(key)
    }

    pub fn is_negative(&self, key: &str) -> bool {
        self.negative.contains(key)
    }

    pub fn is_negation(&self, key: &str) -> bool {
        self.negation.contains(key)
    }

    /// Polarity of a normalized key, `None` for neutral words and negation cues.
    pub fn polarity_of(&self, key: &str) -> Option<Polarity> {
        if self.is_positive(key) {
            Some(Polarity::Positive)
        } else if self.is_negative(key) {
            Some(Polarity::Negative)
        } else {
            None
        }
    }

    /// (positive, negative, negation) set sizes.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.positive.len(), self.negative.len(), self.negation.len())
    }

    fn check_disjoint(&self) -> Result<()> {
        let sets = [
            ("positive", &self.positive),
            ("negative", &self.negative),
            ("negation", &self.negation),
        ];
        for (i, (name_a, a)) in sets.iter().enumerate() {
            for (name_b, b) in sets.iter().skip(i + 1) {
                // Sorted so the error is stable across runs.
                let mut shared: Vec<&String> = a.intersection(b).collect();
                shared.sort();
                if let Some(word) = shared.first() {
                    bail!("lexicon word '{word}' is listed as both {name_a} and {name_b}");
                }
            }
        }
        Ok(())
    }
}

fn normalize_all<I, S>(words: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| normalize_key(w.as_ref().trim()))
        .filter(|w| !w.is_empty())
        .collect()
}

fn parse_lexicon(s: &str, hint_ext: &str) -> Result<LexiconFile> {
    if hint_ext == "json" {
        if let Ok(v) = serde_json::from_str::<LexiconFile>(s) {
            return Ok(v);
        }
        return toml::from_str(s).map_err(|e| anyhow!("unsupported lexicon format: {e}"));
    }
    if let Ok(v) = toml::from_str::<LexiconFile>(s) {
        return Ok(v);
    }
    serde_json::from_str(s).map_err(|e| anyhow!("unsupported lexicon format: {e}"))
}
