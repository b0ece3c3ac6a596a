use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use crate::config::Theme;
use crate::payload::FilterValue;
use crate::widgets::notice::Notice;

/// One entry in the selector. The value doubles as the display text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorOption {
    pub value: String,
    pub text: String,
}

/// The subreddit selection control.
#[derive(Debug, Default)]
pub struct SelectorView {
    options: Vec<SelectorOption>,
    state: ListState,
    pub notice: Option<Notice>,
}

impl SelectorView {
    pub const ID: &'static str = "select-dropdown";

    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every option. The previous selection is not kept: `"all"` is
    /// selected when offered, otherwise the first option.
    pub fn populate(&mut self, options: Vec<String>) {
        self.options = options
            .into_iter()
            .map(|value| SelectorOption {
                text: value.clone(),
                value,
            })
            .collect();
        let default = self
            .options
            .iter()
            .position(|o| o.value == FilterValue::ALL)
            .or(if self.options.is_empty() { None } else { Some(0) });
        self.state = ListState::default();
        self.state.select(default);
        self.notice = None;
    }

    pub fn options(&self) -> &[SelectorOption] {
        &self.options
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    /// Value of the highlighted option, if any.
    pub fn selected(&self) -> Option<&str> {
        self.state
            .selected()
            .and_then(|i| self.options.get(i))
            .map(|o| o.value.as_str())
    }

    /// Highlight the option whose value is `value`. Returns false if absent.
    pub fn select_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(idx) => {
                self.state.select(Some(idx));
                true
            }
            None => false,
        }
    }

    pub fn select_next(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let next = match self.state.selected() {
            Some(i) if i + 1 < self.options.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.options.is_empty() {
            return;
        }
        let prev = self.state.selected().map(|i| i.saturating_sub(1)).unwrap_or(0);
        self.state.select(Some(prev));
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, active: Option<&str>) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.get("panel_border_active")))
            .title(" Subreddit ");
        let inner = block.inner(area);
        block.render(area, buf);

        let items: Vec<ListItem> = self
            .options
            .iter()
            .map(|o| {
                let style = if Some(o.value.as_str()) == active {
                    Style::default().fg(theme.get("primary"))
                } else {
                    Style::default().fg(theme.get("text_primary"))
                };
                ListItem::new(Line::from(Span::styled(o.text.as_str(), style)))
            })
            .collect();
        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = self.state.clone();
        StatefulWidget::render(list, inner, buf, &mut state);

        if let Some(notice) = &self.notice {
            notice.draw(inner, buf, theme);
        }
    }
}
