//! Client side of the sentiment data gateway.
//!
//! The gateway exposes one query endpoint per view, each keyed by the active
//! filter, plus a fire-and-forget endpoint that records the user's selection.

mod http;
mod mock;

pub use http::HttpGateway;
pub use mock::MockGateway;

use crate::error::Result;
use crate::payload::{
    decode_envelope, CardPayload, CardsWire, ChartPayload, ChartWire, FilterValue, HistWire,
    HistogramPayload, RowsWire, SelectWire, SelectorPayload, TablePayload,
};

/// Gateway endpoints used by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Chart,
    Rows,
    Select,
    Cards,
    Histogram,
    SelectValue,
}

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Chart,
        Endpoint::Rows,
        Endpoint::Select,
        Endpoint::Cards,
        Endpoint::Histogram,
        Endpoint::SelectValue,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Self::Chart => "/get_data",
            Self::Rows => "/update_rows",
            Self::Select => "/update_select",
            Self::Cards => "/update_card_values",
            Self::Histogram => "/update_hist_values",
            Self::SelectValue => "/get_select_value",
        }
    }
}

/// One method per endpoint. Implementations block the calling thread; the
/// controller runs each call on its own worker thread.
pub trait DataGateway: Send + Sync {
    fn fetch_chart(&self, filter: &FilterValue) -> Result<ChartPayload>;

    fn fetch_rows(&self, filter: &FilterValue) -> Result<TablePayload>;

    /// The selector universe is not filter-scoped; the query carries `vals=""`.
    fn fetch_select_options(&self) -> Result<SelectorPayload>;

    fn fetch_cards(&self, filter: &FilterValue) -> Result<CardPayload>;

    fn fetch_histogram(&self, filter: &FilterValue) -> Result<HistogramPayload>;

    /// Report the selected filter. The acknowledgement body is returned as-is.
    fn submit_select_value(&self, filter: &FilterValue) -> Result<String>;
}

pub fn decode_chart(body: &str) -> Result<ChartPayload> {
    decode_envelope::<ChartWire, _>(Endpoint::Chart.path(), body)
}

pub fn decode_rows(body: &str) -> Result<TablePayload> {
    decode_envelope::<RowsWire, _>(Endpoint::Rows.path(), body)
}

pub fn decode_select(body: &str) -> Result<SelectorPayload> {
    decode_envelope::<SelectWire, _>(Endpoint::Select.path(), body)
}

pub fn decode_cards(body: &str) -> Result<CardPayload> {
    decode_envelope::<CardsWire, _>(Endpoint::Cards.path(), body)
}

pub fn decode_histogram(body: &str) -> Result<HistogramPayload> {
    decode_envelope::<HistWire, _>(Endpoint::Histogram.path(), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_endpoint_paths_are_unique() {
        let paths: HashSet<&str> = Endpoint::ALL.iter().map(|e| e.path()).collect();
        assert_eq!(paths.len(), Endpoint::ALL.len());
        assert!(paths.iter().all(|p| p.starts_with('/')));
    }

    #[test]
    fn test_decode_select_keeps_server_order() {
        let body = serde_json::json!({
            "payload": r#"{"data_labels":["all","AskReddit","news"]}"#
        })
        .to_string();
        let select = decode_select(&body).unwrap();
        assert_eq!(select.options, vec!["all", "AskReddit", "news"]);
    }

    #[test]
    fn test_decode_errors_name_endpoint() {
        let err = decode_histogram("not json").unwrap_err();
        assert_eq!(err.endpoint(), "/update_hist_values");
    }
}
