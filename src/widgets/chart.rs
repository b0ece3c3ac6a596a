//! Sentiment bar chart: the renderer owns the single live chart instance.
//!
//! Every refresh destroys the previous [`ChartInstance`] before building the
//! next one, so repeated refreshes never stack charts or grow memory.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    symbols,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::config::Theme;
use crate::payload::ChartPayload;
use crate::widgets::notice::Notice;

/// Upper bound on category-axis tick labels.
pub const MAX_CATEGORY_TICKS: usize = 21;

/// Static legend for the category axis.
pub const DIRECTION_LEGEND: &str = "<<< More Negative Posts     More Positive Posts >>>";

/// A chart bound to one dataset. Never mutated after construction.
#[derive(Debug)]
pub struct ChartInstance {
    id: u64,
    points: Vec<(f64, f64)>,
    labels: Vec<String>,
    scope_name: String,
}

impl ChartInstance {
    fn new(id: u64, values: Vec<f64>, labels: Vec<String>, scope_name: String) -> Self {
        let points = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i as f64, v))
            .collect();
        Self {
            id,
            points,
            labels,
            scope_name,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn scope_name(&self) -> &str {
        &self.scope_name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, y)| *y).collect()
    }

    /// Legend entry for the single dataset.
    pub fn dataset_label(&self) -> String {
        format!("Subreddit: {}", self.scope_name)
    }

    fn y_max(&self) -> f64 {
        self.points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max)
    }
}

#[derive(Debug)]
pub struct ChartRenderer {
    instance: Option<ChartInstance>,
    max_ticks: usize,
    created: u64,
    destroyed: u64,
    pub notice: Option<Notice>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new(MAX_CATEGORY_TICKS)
    }
}

impl ChartRenderer {
    pub const ID: &'static str = "sentiment_histogram";

    pub fn new(max_ticks: usize) -> Self {
        Self {
            instance: None,
            max_ticks,
            created: 0,
            destroyed: 0,
            notice: None,
        }
    }

    /// Replace the live chart with one bound to this dataset.
    pub fn render(&mut self, values: Vec<f64>, labels: Vec<String>, scope_name: String) {
        self.dispose();
        self.created += 1;
        self.instance = Some(ChartInstance::new(self.created, values, labels, scope_name));
        self.notice = None;
    }

    pub fn render_payload(&mut self, payload: ChartPayload) {
        self.render(payload.values, payload.labels, payload.scope_name);
    }

    /// Destroy the live chart, if any.
    pub fn dispose(&mut self) {
        if let Some(instance) = self.instance.take() {
            drop(instance);
            self.destroyed += 1;
        }
    }

    pub fn instance(&self) -> Option<&ChartInstance> {
        self.instance.as_ref()
    }

    /// Charts constructed and not yet destroyed.
    pub fn live_instances(&self) -> u64 {
        self.created - self.destroyed
    }

    /// Category labels actually drawn on the axis.
    pub fn tick_labels(&self) -> Vec<String> {
        self.instance
            .as_ref()
            .map(|instance| tick_labels(&instance.labels, self.max_ticks))
            .unwrap_or_default()
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        let border = if focused {
            theme.get("panel_border_active")
        } else {
            theme.get("panel_border")
        };
        let title = self
            .instance
            .as_ref()
            .map(|i| format!(" {} ", i.dataset_label()))
            .unwrap_or_else(|| " Sentiment ".to_string());
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(instance) = self.instance.as_ref().filter(|i| !i.points.is_empty()) else {
            let text = if self.notice.is_some() { "" } else { "No chart data yet" };
            Paragraph::new(text)
                .style(Style::default().fg(theme.get("text_secondary")))
                .centered()
                .render(inner, buf);
            if let Some(notice) = &self.notice {
                notice.draw(inner, buf, theme);
            }
            return;
        };

        let axis_style = Style::default().fg(theme.get("text_primary"));
        let n = instance.points.len();
        let x_bounds = [-0.5, n as f64 - 0.5];
        let y_top = if instance.y_max() > 0.0 {
            instance.y_max() * 1.1
        } else {
            1.0
        };

        let x_labels: Vec<Span> = tick_labels(&instance.labels, self.max_ticks)
            .into_iter()
            .map(|l| Span::styled(l, axis_style))
            .collect();
        let y_labels = vec![
            Span::styled(format_axis_label(0.0), axis_style),
            Span::styled(format_axis_label(y_top / 2.0), axis_style),
            Span::styled(format_axis_label(y_top), axis_style),
        ];

        let dataset = Dataset::default()
            .name(instance.dataset_label())
            .marker(symbols::Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(theme.get("chart_bar")))
            .data(&instance.points);

        Chart::new(vec![dataset])
            .x_axis(
                Axis::default()
                    .title(Span::styled(DIRECTION_LEGEND, axis_style))
                    .bounds(x_bounds)
                    .style(axis_style)
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, y_top])
                    .style(axis_style)
                    .labels(y_labels),
            )
            .legend_position(None)
            .render(inner, buf);

        if let Some(notice) = &self.notice {
            notice.draw(inner, buf, theme);
        }
    }
}

/// Pick at most `max_ticks` labels, evenly spread and always including the
/// first and last. The data itself is never resampled.
pub fn tick_labels(labels: &[String], max_ticks: usize) -> Vec<String> {
    let n = labels.len();
    if n <= max_ticks {
        return labels.to_vec();
    }
    match max_ticks {
        0 => Vec::new(),
        1 => vec![labels[0].clone()],
        k => (0..k)
            .map(|j| labels[j * (n - 1) / (k - 1)].clone())
            .collect(),
    }
}

fn format_axis_label(v: f64) -> String {
    if v.abs() >= 1e6 || (v.abs() < 1e-2 && v != 0.0) {
        format!("{:.2e}", v)
    } else {
        format!("{:.2}", v)
    }
}
