use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

/// Bottom bar: key hints on the left, sync status on the right.
#[derive(Default)]
pub struct Controls {
    pub status: Option<String>,
    pub dimmed: bool,
    pub background: Option<Color>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            dimmed: false,
            background: None,
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }
}

const CONTROLS: [(&str, &str); 6] = [
    ("↵", "Apply"),
    ("a", "All"),
    ("r", "Refresh"),
    ("u", "Reload list"),
    ("?", "Help"),
    ("q", "Quit"),
];

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = CONTROLS.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let color = self.background.unwrap_or(Color::DarkGray);

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(color))
                .render(layout[j + 1], buf);
        }

        let fill_idx = CONTROLS.len() * 2;
        Paragraph::new(self.status.clone().unwrap_or_default())
            .style(base_style.bg(color).fg(if self.dimmed {
                Color::DarkGray
            } else {
                Color::White
            }))
            .right_aligned()
            .render(layout[fill_idx], buf);
    }
}
