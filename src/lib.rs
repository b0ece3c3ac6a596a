use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::{mpsc::Sender, Arc};
use std::time::Duration;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Paragraph};

pub mod config;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod payload;
pub mod widgets;

pub use config::{
    rgb_to_256_color, rgb_to_basic_ansi, AppConfig, ColorParser, ConfigManager, GatewayConfig,
    Theme,
};
pub use controller::{FetchOutcome, Generation, SyncController, SyncPhase};
pub use error::SentidashError;
pub use gateway::{DataGateway, Endpoint, HttpGateway, MockGateway};
pub use payload::FilterValue;
pub use sentidash_cli::{Args, LogLevel};

use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::Views;

/// Application name used for config, cache and log paths
pub const APP_NAME: &str = "sentidash";

const HELP_BINDINGS: [(&str, &str); 8] = [
    ("↑ / k", "Highlight previous subreddit"),
    ("↓ / j", "Highlight next subreddit"),
    ("Enter", "Show the highlighted subreddit in every view"),
    ("a", "Show all subreddits"),
    ("r", "Refresh the current subreddit"),
    ("u", "Reload the subreddit list"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

#[derive(Debug, Clone)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Load the selector and the first dataset. `None` starts on `"all"`.
    Start(Option<FilterValue>),
    /// Refresh every view; `None` re-reads the selector.
    RefreshAll(Option<FilterValue>),
    AutoRefresh,
    Fetched(FetchOutcome),
    Exit,
    Resize(u16, u16), // resized (width, height)
}

pub struct App {
    events: Sender<AppEvent>,
    controller: SyncController,
    pub views: Views,
    debug: DebugState,
    show_help: bool,
    theme: Theme,
    config: AppConfig,
}

impl App {
    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn new(events: Sender<AppEvent>, gateway: Arc<dyn DataGateway>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to create default theme, using fallback");
            Theme::default()
        });

        Self::new_with_config(events, gateway, theme, AppConfig::default())
    }

    pub fn new_with_config(
        events: Sender<AppEvent>,
        gateway: Arc<dyn DataGateway>,
        theme: Theme,
        app_config: AppConfig,
    ) -> App {
        let controller = SyncController::new(gateway, events.clone());
        let mut app = App {
            events,
            controller,
            views: Views::new(app_config.display.max_chart_ticks),
            debug: DebugState::default(),
            show_help: false,
            theme,
            config: app_config,
        };
        if app.config.debug.enabled || app.config.display.show_debug_bar {
            app.enable_debug();
        }
        app
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn controller(&self) -> &SyncController {
        &self.controller
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.config.performance.event_poll_interval_ms)
    }

    /// Interval for [`AppEvent::AutoRefresh`], if enabled.
    pub fn auto_refresh_interval(&self) -> Option<Duration> {
        match self.config.performance.auto_refresh_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Text for the right side of the controls bar.
    pub fn status_line(&self) -> String {
        let updated = self
            .controller
            .last_refreshed()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());
        format!(
            "r/{} · {} · updated {} ",
            self.controller.active_filter(),
            self.controller.phase(),
            updated
        )
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        let next = match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Start(filter) => {
                self.controller.refresh_selector();
                self.controller
                    .refresh_all(Some(filter.clone().unwrap_or_default()), &self.views.selector);
                None
            }
            AppEvent::RefreshAll(filter) => {
                self.controller
                    .refresh_all(filter.clone(), &self.views.selector);
                None
            }
            AppEvent::AutoRefresh => {
                if self.controller.phase() == SyncPhase::Idle {
                    let filter = self.controller.active_filter().clone();
                    self.controller.refresh_all(Some(filter), &self.views.selector);
                } else {
                    tracing::debug!(phase = %self.controller.phase(), "auto refresh skipped, refresh in flight");
                }
                None
            }
            AppEvent::Fetched(outcome) => {
                self.controller.handle(outcome.clone(), &mut self.views);
                None
            }
            AppEvent::Exit | AppEvent::Resize(_, _) => None,
        };
        self.sync_debug();
        next
    }

    fn sync_debug(&mut self) {
        self.debug.generation = self.controller.generation();
        self.debug.phase = self.controller.phase().to_string();
        self.debug.discarded = self.controller.discarded();
        self.debug.last_discarded = self.controller.last_discarded().map(str::to_string);
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.modifiers.contains(KeyModifiers::CONTROL) && event.code == KeyCode::Char('c') {
            return Some(AppEvent::Exit);
        }

        if self.show_help {
            if matches!(event.code, KeyCode::Esc | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return None;
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Exit),
            KeyCode::Up | KeyCode::Char('k') => {
                self.views.selector.select_previous();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.views.selector.select_next();
                None
            }
            KeyCode::Enter => {
                let filter = FilterValue::from_selection(self.views.selector.selected());
                self.controller.submit_selection(filter.clone());
                Some(AppEvent::RefreshAll(Some(filter)))
            }
            KeyCode::Char('a') => {
                self.views.selector.select_value(FilterValue::ALL);
                self.controller.submit_selection(FilterValue::all());
                Some(AppEvent::RefreshAll(Some(FilterValue::all())))
            }
            KeyCode::Char('r') => Some(AppEvent::RefreshAll(Some(
                self.controller.active_filter().clone(),
            ))),
            KeyCode::Char('u') => {
                self.controller.refresh_selector();
                None
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                None
            }
            _ => None,
        }
    }

    fn render_help(&self, area: Rect, buf: &mut Buffer) {
        let popup = centered_rect(area, 60, 50);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("panel_border_active")))
            .title(" Help ");
        let lines: Vec<Line> = HELP_BINDINGS
            .iter()
            .map(|(key, action)| {
                Line::from(vec![
                    Span::styled(
                        format!("{:<10}", key),
                        Style::default()
                            .fg(self.theme.get("primary"))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*action, Style::default().fg(self.theme.get("text_primary"))),
                ])
            })
            .collect();
        Paragraph::new(lines).block(block).render(popup, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![
            Constraint::Length(3),      // cards
            Constraint::Percentage(50), // selector, chart, counters
            Constraint::Fill(1),        // table
            Constraint::Length(1),      // controls
        ];
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(26),
                Constraint::Fill(1),
                Constraint::Length(26),
            ])
            .split(layout[1]);

        let theme = &self.theme;
        self.views.cards.draw(layout[0], buf, theme);
        self.views.selector.draw(
            middle[0],
            buf,
            theme,
            Some(self.controller.active_filter().as_str()),
        );
        self.views.chart.draw(middle[1], buf, theme, false);
        self.views.histogram.draw(middle[2], buf, theme);
        self.views.table.draw(layout[2], buf, theme);

        let controls = Controls::with_status(self.status_line())
            .with_background(self.theme.get("controls_bg"))
            .with_dimmed(self.show_help);
        controls.render(layout[3], buf);

        if self.debug.enabled && layout.len() > 4 {
            self.debug.render(layout[4], buf);
        }

        if self.show_help {
            self.render_help(area, buf);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
