// src/scorer.rs
//! # Windowed Scorer
//! Negation-aware, single-pass lexicon scorer over the token stream.
//!
//! Policy:
//! - A negation cue looks ahead 1..=window tokens; the *nearest* polarity word
//!   is flipped (`not good` → neg, `not bad` → pos) and the whole span
//!   `[cue ..= word]` is consumed. A cue with no hit in the window is a no-op.
//! - Any other polarity word scores directly unless a negation span already
//!   consumed its position.
//!
//! Pure function of (tokens, lexicon, window); no I/O, no shared mutable state.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use tracing::debug;

use crate::lexicon::{Lexicon, Polarity};
use crate::tokenizer::{tokenize, Token};

/// Look-ahead distance after a negation cue.
pub const DEFAULT_WINDOW: usize = 3;

/// Overall verdict derived from the sign of the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub fn from_score(score: i32) -> Self {
        if score > 0 {
            SentimentLabel::Positive
        } else if score < 0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

/// A consumed token span `[start, end)` with its reconstructed phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    pub start: usize,
    pub end: usize,
    pub phrase: String,
    pub polarity: Polarity,
}

/// Ordered phrase → polarity map.
///
/// Iteration follows first detection. Re-inserting a phrase overwrites its
/// polarity in place (last write wins, position kept).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseMap {
    entries: Vec<(String, Polarity)>,
}

impl PhraseMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, phrase: impl Into<String>, polarity: Polarity) {
        let phrase = phrase.into();
        match self.entries.iter_mut().find(|(p, _)| *p == phrase) {
            Some(slot) => slot.1 = polarity,
            None => self.entries.push((phrase, polarity)),
        }
    }

    pub fn get(&self, phrase: &str) -> Option<Polarity> {
        self.entries
            .iter()
            .find(|(p, _)| p == phrase)
            .map(|(_, pol)| *pol)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Polarity)> + '_ {
        self.entries.iter().map(|(p, pol)| (p.as_str(), *pol))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Polarity)> for PhraseMap {
    fn from_iter<T: IntoIterator<Item = (S, Polarity)>>(iter: T) -> Self {
        let mut map = PhraseMap::new();
        for (p, pol) in iter {
            map.insert(p, pol);
        }
        map
    }
}

impl Serialize for PhraseMap {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut m = serializer.serialize_map(Some(self.entries.len()))?;
        for (p, pol) in &self.entries {
            m.serialize_entry(p, pol)?;
        }
        m.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub score: i32,
    pub positive_count: u32,
    pub negative_count: u32,
    pub sentiment: SentimentLabel,
    pub highlights: PhraseMap,
    pub matches: Vec<Match>,
    pub token_count: usize,
}

impl ScoreResult {
    pub fn empty() -> Self {
        Self {
            score: 0,
            positive_count: 0,
            negative_count: 0,
            sentiment: SentimentLabel::Neutral,
            highlights: PhraseMap::new(),
            matches: Vec::new(),
            token_count: 0,
        }
    }

    fn record(&mut self, tokens: &[Token], start: usize, end: usize, polarity: Polarity) {
        let phrase = tokens[start..end]
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        match polarity {
            Polarity::Positive => {
                self.score += 1;
                self.positive_count += 1;
            }
            Polarity::Negative => {
                self.score -= 1;
                self.negative_count += 1;
            }
        }
        self.highlights.insert(phrase.clone(), polarity);
        self.matches.push(Match {
            start,
            end,
            phrase,
            polarity,
        });
    }
}

#[derive(Debug, Clone)]
pub struct WindowedScorer {
    lexicon: Arc<Lexicon>,
    window: usize,
}

impl WindowedScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self {
            lexicon,
            window: DEFAULT_WINDOW,
        }
    }

    /// Override the look-ahead window (0 disables negation matching).
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Tokenize and score in one go.
    pub fn score_text(&self, text: &str) -> ScoreResult {
        self.score(&tokenize(text))
    }

    pub fn score(&self, tokens: &[Token]) -> ScoreResult {
        let mut out = ScoreResult::empty();
        out.token_count = tokens.len();
        let mut consumed = vec![false; tokens.len()];

        let mut i = 0;
        while i < tokens.len() {
            let norm = tokens[i].norm.as_str();

            if self.lexicon.is_negation(norm) {
                match self.negated_hit(tokens, i) {
                    Some((j, polarity)) => {
                        out.record(tokens, i, i + j + 1, polarity.flipped());
                        consumed[i..=i + j].iter_mut().for_each(|c| *c = true);
                        i += j + 1;
                    }
                    None => i += 1,
                }
                continue;
            }

            if !consumed[i] {
                if let Some(polarity) = self.lexicon.polarity_of(norm) {
                    out.record(tokens, i, i + 1, polarity);
                }
            }
            i += 1;
        }

        out.sentiment = SentimentLabel::from_score(out.score);
        debug!(
            tokens = out.token_count,
            score = out.score,
            pos = out.positive_count,
            neg = out.negative_count,
            phrases = out.highlights.len(),
            "scored token stream"
        );
        out
    }

    /// Nearest polarity word within the window after the cue at `i`:
    /// (distance, un-flipped polarity).
    fn negated_hit(&self, tokens: &[Token], i: usize) -> Option<(usize, Polarity)> {
        (1..=self.window)
            .take_while(|j| i + j < tokens.len())
            .find_map(|j| {
                self.lexicon
                    .polarity_of(&tokens[i + j].norm)
                    .map(|pol| (j, pol))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> WindowedScorer {
        WindowedScorer::new(Arc::new(Lexicon::default()))
    }

    #[test]
    fn empty_input_is_neutral() {
        let r = scorer().score(&[]);
        assert_eq!(r, ScoreResult::empty());
        assert_eq!(r.sentiment, SentimentLabel::Neutral);
    }

    #[test]
    fn not_good_counts_once() {
        let r = scorer().score_text("not good");
        assert_eq!(r.score, -1);
        assert_eq!((r.positive_count, r.negative_count), (0, 1));
        assert_eq!(r.highlights.len(), 1);
        assert_eq!(r.highlights.get("not good"), Some(Polarity::Negative));
        assert_eq!(r.matches[0].start, 0);
        assert_eq!(r.matches[0].end, 2);
    }

    #[test]
    fn double_negative_reads_positive() {
        let r = scorer().score_text("the food was not bad");
        assert_eq!(r.score, 1);
        assert_eq!(r.sentiment, SentimentLabel::Positive);
        assert_eq!(r.highlights.get("not bad"), Some(Polarity::Positive));
    }

    #[test]
    fn window_boundary_three_vs_four() {
        let inside = scorer().score_text("not x x good");
        assert_eq!(inside.score, -1);
        assert_eq!(inside.highlights.get("not x x good"), Some(Polarity::Negative));

        let outside = scorer().score_text("not x x x good");
        assert_eq!(outside.score, 1);
        assert_eq!(outside.positive_count, 1);
        assert_eq!(outside.highlights.get("good"), Some(Polarity::Positive));
        assert_eq!(outside.highlights.len(), 1);
    }

    #[test]
    fn nearest_hit_wins() {
        // `bad` at distance 1 is taken; `good` is then scored on its own.
        let r = scorer().score_text("not bad good");
        assert_eq!(r.highlights.get("not bad"), Some(Polarity::Positive));
        assert_eq!(r.highlights.get("good"), Some(Polarity::Positive));
        assert_eq!(r.score, 2);
    }

    #[test]
    fn clean_but_rude_is_neutral() {
        let r = scorer().score_text("the room is clean but the service is rude");
        assert_eq!(r.score, 0);
        assert_eq!(r.sentiment, SentimentLabel::Neutral);
        assert_eq!((r.positive_count, r.negative_count), (1, 1));
        let got: Vec<(&str, Polarity)> = r.highlights.iter().collect();
        assert_eq!(
            got,
            vec![("clean", Polarity::Positive), ("rude", Polarity::Negative)]
        );
    }

    #[test]
    fn dont_like_but_good_is_neutral() {
        let r = scorer().score_text("i don't like this product but the quality is good");
        assert_eq!(r.score, 0);
        assert_eq!((r.positive_count, r.negative_count), (1, 1));
        assert_eq!(r.highlights.get("don't like"), Some(Polarity::Negative));
        assert_eq!(r.highlights.get("good"), Some(Polarity::Positive));
    }

    #[test]
    fn unmatched_cue_is_noop() {
        let r = scorer().score_text("no way");
        assert_eq!(r, {
            let mut e = ScoreResult::empty();
            e.token_count = 2;
            e
        });
    }

    #[test]
    fn cue_at_end_of_stream() {
        let r = scorer().score_text("good but never");
        assert_eq!(r.score, 1);
        assert_eq!(r.highlights.len(), 1);
    }

    #[test]
    fn match_spans_never_overlap() {
        let r = scorer().score_text("not not good bad never x rude clean not");
        let mut claimed = vec![false; r.token_count];
        for m in &r.matches {
            for c in &mut claimed[m.start..m.end] {
                assert!(!*c, "position claimed twice in {:?}", r.matches);
                *c = true;
            }
        }
    }

    #[test]
    fn repeated_phrase_last_write_wins_in_place() {
        // `bad` recurs: counted twice, listed once at its first position.
        let r = scorer().score_text("bad good bad");
        let got: Vec<(&str, Polarity)> = r.highlights.iter().collect();
        assert_eq!(
            got,
            vec![("bad", Polarity::Negative), ("good", Polarity::Positive)]
        );
        assert_eq!(r.negative_count, 2);
        assert_eq!(r.score, -1);
    }

    #[test]
    fn phrase_map_overwrites_polarity_keeping_position() {
        let mut m = PhraseMap::new();
        m.insert("good", Polarity::Positive);
        m.insert("rude", Polarity::Negative);
        m.insert("good", Polarity::Negative);
        let got: Vec<(&str, Polarity)> = m.iter().collect();
        assert_eq!(
            got,
            vec![("good", Polarity::Negative), ("rude", Polarity::Negative)]
        );
    }

    #[test]
    fn zero_window_disables_negation() {
        let r = scorer().with_window(0).score_text("not good");
        // The cue still never scores; `good` is not consumed.
        assert_eq!(r.score, 1);
        assert_eq!(r.highlights.get("good"), Some(Polarity::Positive));
    }

    #[test]
    fn scoring_is_idempotent() {
        let s = scorer();
        let toks = tokenize("It's not clean, never friendly, hardly ever cold. Great view though!");
        assert_eq!(s.score(&toks), s.score(&toks));
    }

    #[test]
    fn phrase_map_serializes_in_order() {
        let r = scorer().score_text("rude but clean");
        let json = serde_json::to_string(&r.highlights).unwrap();
        assert_eq!(json, r#"{"rude":"neg","clean":"pos"}"#);
    }
}
