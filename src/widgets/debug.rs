use crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Paragraph, Widget},
};

/// Counters shown in the `--debug` bar.
#[derive(Debug, Default)]
pub struct DebugState {
    pub enabled: bool,
    pub num_events: usize,
    pub num_frames: usize,
    pub generation: u64,
    pub phase: String,
    pub discarded: usize,
    pub last_discarded: Option<String>,
    pub last_key: Option<String>,
}

impl DebugState {
    pub fn on_key(&mut self, event: &KeyEvent) {
        self.last_key = Some(format!("{:?} {:?}", event.code, event.modifiers));
    }

    pub fn line(&self) -> String {
        format!(
            "events: {} | frames: {} | gen: {} | phase: {} | stale: {}{} | key: {}",
            self.num_events,
            self.num_frames,
            self.generation,
            self.phase,
            self.discarded,
            self.last_discarded
                .as_deref()
                .map(|d| format!(" (last {})", d))
                .unwrap_or_default(),
            self.last_key.as_deref().unwrap_or("-"),
        )
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.line())
            .style(Style::default().fg(Color::Black).bg(Color::Yellow))
            .render(area, buf);
    }
}
