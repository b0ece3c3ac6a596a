//! Non-blocking failure notice shown inside a single view.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Paragraph, Widget, Wrap},
};

use crate::config::Theme;
use crate::error::SentidashError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub code: &'static str,
    pub message: String,
}

impl Notice {
    pub fn from_error(err: &SentidashError) -> Self {
        Self {
            code: err.code(),
            message: err.user_message(),
        }
    }

    /// Draw the notice on the last line(s) of `area`, over whatever the view drew.
    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.height == 0 {
            return;
        }
        let height = area.height.min(2);
        let line_area = Rect {
            y: area.y + area.height - height,
            height,
            ..area
        };
        Paragraph::new(format!("⚠ {} ({})", self.message, self.code))
            .style(
                Style::default()
                    .fg(theme.get("error"))
                    .add_modifier(Modifier::BOLD),
            )
            .wrap(Wrap { trim: true })
            .render(line_area, buf);
    }
}
