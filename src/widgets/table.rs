use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

use crate::config::Theme;
use crate::payload::ROW_WIDTH;
use crate::widgets::notice::Notice;

const HEADERS: [&str; ROW_WIDTH] = [
    "Subreddit",
    "Post title",
    "Negative",
    "Neutral",
    "Positive",
    "Compound",
];

/// Sample posts for the active filter, one row per post.
#[derive(Debug, Default)]
pub struct TableView {
    rows: Vec<[String; ROW_WIDTH]>,
    pub notice: Option<Notice>,
}

impl TableView {
    pub const ID: &'static str = "subreddit-table";

    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every row. Short rows get empty trailing cells; extra fields are dropped.
    pub fn render(&mut self, rows: Vec<Vec<String>>) {
        self.rows.clear();
        for row in rows {
            let mut cells: [String; ROW_WIDTH] = Default::default();
            for (cell, value) in cells.iter_mut().zip(row) {
                *cell = value;
            }
            self.rows.push(cells);
        }
        self.notice = None;
    }

    pub fn rows(&self) -> &[[String; ROW_WIDTH]] {
        &self.rows
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("panel_border")))
            .title(" Posts ");
        let inner = block.inner(area);
        block.render(area, buf);

        if self.rows.is_empty() && self.notice.is_none() {
            Paragraph::new("No posts")
                .style(Style::default().fg(theme.get("text_secondary")))
                .centered()
                .render(inner, buf);
            return;
        }

        let header = Row::new(HEADERS).style(
            Style::default()
                .fg(theme.get("table_header"))
                .add_modifier(Modifier::BOLD),
        );
        let rows = self
            .rows
            .iter()
            .map(|cells| Row::new(cells.iter().map(String::as_str)));
        let widths = [
            Constraint::Length(16),
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(9),
        ];
        Widget::render(
            Table::new(rows, widths)
                .header(header)
                .style(Style::default().fg(theme.get("text_primary"))),
            inner,
            buf,
        );

        if let Some(notice) = &self.notice {
            notice.draw(inner, buf, theme);
        }
    }
}
