use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::config::Theme;
use crate::payload::{CardPayload, CARD_SLOTS};
use crate::widgets::notice::Notice;

/// Slot ids in payload order, with their card titles.
pub const CARD_SLOT_IDS: [(&str, &str); CARD_SLOTS] = [
    ("post-count", "Posts"),
    ("analyzed-count", "Analyzed"),
    ("average-posts", "Avg posts"),
    ("subreddit-count", "Subreddits"),
];

/// Summary cards. Each slot shows the first field of its payload entry.
#[derive(Debug, Default)]
pub struct CardsView {
    slots: [Option<String>; CARD_SLOTS],
    pub notice: Option<Notice>,
}

impl CardsView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render_cards(&mut self, payload: &CardPayload) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = Some(payload.slot(i).to_string());
        }
        self.notice = None;
    }

    /// Text currently shown in the slot with this id.
    pub fn slot(&self, id: &str) -> Option<&str> {
        let idx = CARD_SLOT_IDS.iter().position(|(slot_id, _)| *slot_id == id)?;
        self.slots[idx].as_deref()
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let columns = Layout::new(
            Direction::Horizontal,
            [Constraint::Ratio(1, CARD_SLOTS as u32); CARD_SLOTS],
        )
        .split(area);

        for (i, (_, title)) in CARD_SLOT_IDS.iter().enumerate() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.get("panel_border")))
                .title(format!(" {} ", title));
            let inner = block.inner(columns[i]);
            block.render(columns[i], buf);
            let value = self.slots[i].as_deref().unwrap_or("-");
            Paragraph::new(Line::from(Span::styled(
                value,
                Style::default()
                    .fg(theme.get("card_value"))
                    .add_modifier(Modifier::BOLD),
            )))
            .centered()
            .render(inner, buf);
        }

        if let Some(notice) = &self.notice {
            notice.draw(area, buf, theme);
        }
    }
}
