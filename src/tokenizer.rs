// src/tokenizer.rs
//! Tokenizer for translated English text.
//!
//! Lowercases, drops every character that is not `a-z`, whitespace or an
//! apostrophe, and splits on whitespace runs. Tokens keep their apostrophe for
//! phrase reconstruction; `norm` is the apostrophe-free lexicon key.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_STRIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z\s']").expect("strip regex"));

/// A single word of the normalized token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased surface form, apostrophes kept (`don't`).
    pub text: String,
    /// Lexicon key, apostrophes stripped (`dont`).
    pub norm: String,
    /// 0-based position in the sequence.
    pub index: usize,
}

/// Lexicon key for a word: apostrophes removed. Input is expected lowercase.
#[inline]
pub fn normalize_key(word: &str) -> String {
    word.to_lowercase().replace('\'', "")
}

pub fn tokenize(text: &str) -> Vec<Token> {
    let lower = text.to_lowercase();
    let clean = RE_STRIP.replace_all(&lower, "");
    clean
        .split_whitespace()
        .enumerate()
        .map(|(index, w)| Token {
            text: w.to_string(),
            norm: w.replace('\'', ""),
            index,
        })
        .collect()
}
