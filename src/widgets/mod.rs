pub mod cards;
pub mod chart;
pub mod controls;
pub mod debug;
pub mod histogram;
pub mod notice;
pub mod selector;
pub mod table;

use cards::CardsView;
use chart::ChartRenderer;
use histogram::HistogramCounters;
use selector::SelectorView;
use table::TableView;

/// Every view kept in sync by the controller.
#[derive(Debug, Default)]
pub struct Views {
    pub selector: SelectorView,
    pub chart: ChartRenderer,
    pub table: TableView,
    pub cards: CardsView,
    pub histogram: HistogramCounters,
}

impl Views {
    pub fn new(max_chart_ticks: usize) -> Self {
        Self {
            chart: ChartRenderer::new(max_chart_ticks),
            ..Self::default()
        }
    }
}
