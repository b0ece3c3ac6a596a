use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::Theme;
use crate::payload::{format_count, HistogramPayload};
use crate::widgets::notice::Notice;

/// Counter slot ids, in display order.
pub const COUNTER_SLOT_IDS: [&str; 3] = ["negative-count", "positive-count", "neutral-count"];

/// Negative/positive/neutral post counters from the histogram endpoint.
#[derive(Debug, Default)]
pub struct HistogramCounters {
    negative: Option<String>,
    positive: Option<String>,
    neutral: Option<String>,
    pub notice: Option<Notice>,
}

impl HistogramCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_histogram(&mut self, payload: &HistogramPayload) {
        self.negative = Some(format_count(payload.negative()));
        self.positive = Some(format_count(payload.positive()));
        self.neutral = Some(format_count(payload.neutral()));
        self.notice = None;
    }

    pub fn slot(&self, id: &str) -> Option<&str> {
        match id {
            "negative-count" => self.negative.as_deref(),
            "positive-count" => self.positive.as_deref(),
            "neutral-count" => self.neutral.as_deref(),
            _ => None,
        }
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("panel_border")))
            .title(" Sentiment counts ");
        let inner = block.inner(area);
        block.render(area, buf);

        let counter = |label: &'static str, value: Option<&str>, color: &str| {
            Line::from(vec![
                Span::styled(
                    format!("{:<9}", label),
                    Style::default().fg(theme.get("text_secondary")),
                ),
                Span::styled(
                    value.unwrap_or("-").to_string(),
                    Style::default()
                        .fg(theme.get(color))
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };
        let lines = vec![
            counter("Negative", self.negative.as_deref(), "sentiment_negative"),
            counter("Positive", self.positive.as_deref(), "sentiment_positive"),
            counter("Neutral", self.neutral.as_deref(), "sentiment_neutral"),
        ];
        Paragraph::new(lines).render(inner, buf);

        if let Some(notice) = &self.notice {
            notice.draw(inner, buf, theme);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_histogram_positional_projection() {
        let mut counters = HistogramCounters::new();
        counters.render_histogram(&HistogramPayload {
            counts: vec![[1.0, 7.0, 2.0]],
        });
        assert_eq!(counters.slot("negative-count"), Some("1"));
        assert_eq!(counters.slot("positive-count"), Some("7"));
        assert_eq!(counters.slot("neutral-count"), Some("2"));
    }

    #[test]
    fn test_only_first_triple_is_shown() {
        let mut counters = HistogramCounters::new();
        counters.render_histogram(&HistogramPayload {
            counts: vec![[4.0, 0.0, 1.5], [9.0, 9.0, 9.0]],
        });
        assert_eq!(counters.slot("negative-count"), Some("4"));
        assert_eq!(counters.slot("neutral-count"), Some("1.5"));
    }

    #[test]
    fn test_slot_ids_resolve() {
        let counters = HistogramCounters::new();
        for id in COUNTER_SLOT_IDS {
            assert_eq!(counters.slot(id), None);
        }
    }
}
