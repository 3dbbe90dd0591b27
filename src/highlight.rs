// src/highlight.rs
//! Highlight renderer: maps scored phrases back onto the *original* translated
//! text as non-overlapping spans.
//!
//! Candidate order: longest phrase first (char length), then earliest first
//! occurrence, then detection order. Each phrase claims at most one span, the
//! first case-insensitive occurrence that shares no character with an already
//! accepted span. Overlapping occurrences are dropped, never shrunk.

use regex::RegexBuilder;
use serde::Serialize;
use std::cmp::Reverse;
use tracing::warn;

use crate::lexicon::Polarity;
use crate::scorer::PhraseMap;

pub const POS_COLOR: &str = "#c8f7c5";
pub const NEG_COLOR: &str = "#f7c5c5";

/// Byte span `[start, end)` into the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub polarity: Polarity,
}

impl HighlightSpan {
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        start < self.end && self.start < end
    }
}

/// A piece of the annotated text, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str, Polarity),
}

impl<'a> Segment<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Segment::Plain(s) | Segment::Highlight(s, _) => *s,
        }
    }
}

/// Original text plus accepted spans; presentation-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedText {
    pub text: String,
    pub spans: Vec<HighlightSpan>,
}

impl AnnotatedText {
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut out = Vec::with_capacity(self.spans.len() * 2 + 1);
        let mut last = 0;
        for sp in &self.spans {
            if sp.start > last {
                out.push(Segment::Plain(&self.text[last..sp.start]));
            }
            out.push(Segment::Highlight(&self.text[sp.start..sp.end], sp.polarity));
            last = sp.end;
        }
        if last < self.text.len() {
            out.push(Segment::Plain(&self.text[last..]));
        }
        out
    }

    /// Concatenation of all segments; always equal to `self.text`.
    pub fn plain_text(&self) -> String {
        self.segments().iter().map(Segment::text).collect()
    }

    /// HTML with every span wrapped in a polarity-colored `<span>`.
    pub fn to_html(&self) -> String {
        let mut body = String::with_capacity(self.text.len() + self.spans.len() * 96);
        for seg in self.segments() {
            match seg {
                Segment::Plain(s) => body.push_str(&html_escape::encode_text(s)),
                Segment::Highlight(s, pol) => {
                    let color = match pol {
                        Polarity::Positive => POS_COLOR,
                        Polarity::Negative => NEG_COLOR,
                    };
                    body.push_str(&format!(
                        "<span class='hl-{}' style='background:{color};padding:4px 6px;border-radius:6px'>{}</span>",
                        pol.as_str(),
                        html_escape::encode_text(s)
                    ));
                }
            }
        }
        format!("<div style='font-size:16px;line-height:1.8'>{body}</div>")
    }
}

/// Accepted spans for `phrases` in `text`, sorted by start offset.
pub fn find_spans(text: &str, phrases: &PhraseMap) -> Vec<HighlightSpan> {
    let mut candidates: Vec<(usize, usize, &str, Polarity, Vec<(usize, usize)>)> = phrases
        .iter()
        .enumerate()
        .filter(|(_, (p, _))| !p.is_empty())
        .map(|(order, (phrase, pol))| {
            let occ = occurrences(text, phrase);
            (phrase.chars().count(), order, phrase, pol, occ)
        })
        .collect();

    candidates.sort_by_key(|(len, order, _, _, occ)| {
        let first = occ.first().map(|(s, _)| *s).unwrap_or(usize::MAX);
        (Reverse(*len), first, *order)
    });

    let mut spans: Vec<HighlightSpan> = Vec::new();
    for (_, _, _, polarity, occ) in candidates {
        let free = occ
            .into_iter()
            .find(|&(s, e)| !spans.iter().any(|sp| sp.overlaps(s, e)));
        if let Some((start, end)) = free {
            spans.push(HighlightSpan {
                start,
                end,
                polarity,
            });
        }
    }

    spans.sort_by_key(|sp| sp.start);
    spans
}

pub fn render(text: &str, phrases: &PhraseMap) -> AnnotatedText {
    AnnotatedText {
        text: text.to_string(),
        spans: find_spans(text, phrases),
    }
}

/// Case-insensitive literal occurrences, left to right, non-overlapping.
fn occurrences(text: &str, phrase: &str) -> Vec<(usize, usize)> {
    match RegexBuilder::new(&regex::escape(phrase))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.find_iter(text).map(|m| (m.start(), m.end())).collect(),
        Err(e) => {
            warn!(error = %e, len = phrase.len(), "highlight pattern rejected");
            Vec::new()
        }
    }
}
