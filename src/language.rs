// src/language.rs
//! Input-language selector: UI labels, fixed codes, and how a code is handed
//! to the translator.

use anyhow::{bail, Result};
use serde::Serialize;

/// Sentinel code: run the language detector.
pub const AUTO: &str = "auto";
/// Sentinel code: the detector could not decide.
pub const UNKNOWN: &str = "unknown";
/// Translation target for scoring.
pub const TARGET: &str = "en";

/// (label, code) in UI order.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("Auto detect", AUTO),
    ("Vietnamese", "vi"),
    ("German", "de"),
    ("French", "fr"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Chinese", "zh"),
];

/// Codes the translator is not asked to honour; it auto-detects instead.
const TRANSLATOR_AUTO_CODES: &[&str] = &[AUTO, UNKNOWN, "zh", "zh-cn", "zh-tw"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LanguageOption {
    pub label: &'static str,
    pub code: &'static str,
}

pub fn options() -> Vec<LanguageOption> {
    LANGUAGES
        .iter()
        .map(|&(label, code)| LanguageOption { label, code })
        .collect()
}

/// Resolve a selector (label, case-insensitive, or raw code) to its code.
/// `None` / blank means auto-detect.
pub fn resolve(selector: Option<&str>) -> Result<&'static str> {
    let sel = selector.map(str::trim).unwrap_or_default();
    if sel.is_empty() {
        return Ok(AUTO);
    }
    if let Some((_, code)) = LANGUAGES
        .iter()
        .find(|(label, code)| label.eq_ignore_ascii_case(sel) || code.eq_ignore_ascii_case(sel))
    {
        return Ok(*code);
    }
    match suggest(sel) {
        Some(label) => bail!("unknown language '{sel}' (did you mean '{label}'?)"),
        None => bail!("unknown language '{sel}'"),
    }
}

/// Source code to pass to the translator, or `None` to let it auto-detect.
pub fn translator_source(code: &str) -> Option<&str> {
    if TRANSLATOR_AUTO_CODES
        .iter()
        .any(|c| c.eq_ignore_ascii_case(code))
    {
        None
    } else {
        Some(code)
    }
}

fn suggest(sel: &str) -> Option<&'static str> {
    let lower = sel.to_lowercase();
    LANGUAGES
        .iter()
        .map(|(label, _)| (label, strsim::jaro_winkler(&lower, &label.to_lowercase())))
        .filter(|(_, sim)| *sim >= 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(label, _)| *label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_and_codes_resolve() {
        assert_eq!(resolve(Some("Auto detect")).unwrap(), "auto");
        assert_eq!(resolve(Some("vietnamese")).unwrap(), "vi");
        assert_eq!(resolve(Some("JA")).unwrap(), "ja");
        assert_eq!(resolve(Some("  ")).unwrap(), "auto");
        assert_eq!(resolve(None).unwrap(), "auto");
    }

    #[test]
    fn typo_gets_a_suggestion() {
        let err = resolve(Some("Germn")).unwrap_err().to_string();
        assert!(err.contains("did you mean 'German'"), "{err}");
    }

    #[test]
    fn garbage_has_no_suggestion() {
        let err = resolve(Some("xx-qq-zz")).unwrap_err().to_string();
        assert!(!err.contains("did you mean"), "{err}");
    }

    #[test]
    fn chinese_and_sentinels_defer_to_translator() {
        for code in ["auto", "unknown", "zh", "zh-CN", "zh-tw"] {
            assert_eq!(translator_source(code), None, "{code}");
        }
        assert_eq!(translator_source("vi"), Some("vi"));
        assert_eq!(translator_source("ja"), Some("ja"));
    }

    #[test]
    fn options_keep_ui_order() {
        let opts = options();
        assert_eq!(opts.first().map(|o| o.code), Some("auto"));
        assert_eq!(opts.len(), 7);
    }
}
