// src/summary.rs
//! Visual summary data for the presentation layer: a sentiment card and a
//! stacked positive/negative signal bar. Rendering the chart itself is left to
//! the client; only the card ships ready-made markup.

use serde::Serialize;

use crate::scorer::{ScoreResult, SentimentLabel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentCard {
    pub label: SentimentLabel,
    pub score: i32,
    pub icon: &'static str,
    pub symbol: &'static str,
    pub background: &'static str,
}

impl SentimentCard {
    pub fn new(label: SentimentLabel, score: i32) -> Self {
        let (icon, symbol, background) = match label {
            SentimentLabel::Positive => ("😊", "✔", "#d1fae5"),
            SentimentLabel::Negative => ("😠", "✖", "#fee2e2"),
            SentimentLabel::Neutral => ("😐", "•", "#e5e7eb"),
        };
        Self {
            label,
            score,
            icon,
            symbol,
            background,
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            "<div style='background:{bg};border-radius:20px;padding:24px;margin-bottom:20px;text-align:center;color:#000'>\
             <div style='font-size:46px;line-height:1'>{icon}</div>\
             <div style='font-size:32px;font-weight:800;margin-top:6px'>{symbol} {label}</div>\
             <div style='font-size:18px;margin-top:10px'>Score: {score}</div>\
             </div>",
            bg = self.background,
            icon = self.icon,
            symbol = self.symbol,
            label = self.label.as_str(),
            score = self.score,
        )
    }
}

/// One stacked bar: positive signals at the bottom, negative on top.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignalChart {
    pub title: &'static str,
    pub y_label: &'static str,
    pub positive: u32,
    pub negative: u32,
    /// Upper bound of the y axis; never below 3 so tiny counts stay readable.
    pub y_max: u32,
}

impl SignalChart {
    pub fn new(positive: u32, negative: u32) -> Self {
        Self {
            title: "Sentiment Signals Overview",
            y_label: "Signal Count (rule-based)",
            positive,
            negative,
            y_max: (positive + negative + 1).max(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisualSummary {
    pub card: SentimentCard,
    pub card_html: String,
    pub chart: SignalChart,
}

impl VisualSummary {
    pub fn from_score(r: &ScoreResult) -> Self {
        let card = SentimentCard::new(r.sentiment, r.score);
        Self {
            card_html: card.to_html(),
            card,
            chart: SignalChart::new(r.positive_count, r.negative_count),
        }
    }
}
