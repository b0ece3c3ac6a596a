//! In-memory gateway backing the controller and `App` test suites.
//!
//! Payloads are derived from the requested filter so a view can be traced
//! back to the filter that produced it. Every call is recorded in order.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use super::{DataGateway, Endpoint};
use crate::error::{Result, SentidashError};
use crate::payload::{
    CardPayload, ChartPayload, FilterValue, HistogramPayload, SelectorPayload, TablePayload,
};

#[derive(Default)]
pub struct MockGateway {
    options: Vec<String>,
    failures: HashSet<Endpoint>,
    filter_failures: HashSet<(Endpoint, String)>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<(Endpoint, String)>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            options: vec![FilterValue::ALL.to_string()],
            ..Self::default()
        }
    }

    /// Options returned by the selector endpoint.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Make every call to `endpoint` fail with `FetchFailed`.
    pub fn failing(mut self, endpoint: Endpoint) -> Self {
        self.failures.insert(endpoint);
        self
    }

    /// Make calls to `endpoint` fail only when they carry `filter`.
    pub fn failing_for(mut self, endpoint: Endpoint, filter: &str) -> Self {
        self.filter_failures.insert((endpoint, filter.to_string()));
        self
    }

    /// Delay every filter-scoped response for `filter`.
    pub fn with_delay(mut self, filter: &str, delay: Duration) -> Self {
        self.delays.insert(filter.to_string(), delay);
        self
    }

    /// Calls received so far as `(endpoint, vals)` pairs, in arrival order.
    pub fn calls(&self) -> Vec<(Endpoint, String)> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Scope name reported by the chart payload for `filter`.
    pub fn scope_name(filter: &FilterValue) -> String {
        format!("r/{}", filter)
    }

    fn record(&self, endpoint: Endpoint, vals: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((endpoint, vals.to_string()));
        if let Some(delay) = self.delays.get(vals) {
            std::thread::sleep(*delay);
        }
        if self.failures.contains(&endpoint)
            || self.filter_failures.contains(&(endpoint, vals.to_string()))
        {
            return Err(SentidashError::fetch_failed(
                endpoint.path(),
                "mock gateway configured to fail",
            ));
        }
        Ok(())
    }
}

impl DataGateway for MockGateway {
    fn fetch_chart(&self, filter: &FilterValue) -> Result<ChartPayload> {
        self.record(Endpoint::Chart, filter.as_str())?;
        Ok(ChartPayload {
            values: vec![0.2, 0.5, 0.3],
            labels: vec!["-1".to_string(), "0".to_string(), "1".to_string()],
            scope_name: Self::scope_name(filter),
        })
    }

    fn fetch_rows(&self, filter: &FilterValue) -> Result<TablePayload> {
        self.record(Endpoint::Rows, filter.as_str())?;
        Ok(TablePayload {
            rows: vec![vec![
                filter.to_string(),
                format!("Top post in {}", filter),
                "0.1".to_string(),
                "0.7".to_string(),
                "0.2".to_string(),
                "0.3".to_string(),
            ]],
        })
    }

    fn fetch_select_options(&self) -> Result<SelectorPayload> {
        self.record(Endpoint::Select, "")?;
        Ok(SelectorPayload {
            options: self.options.clone(),
        })
    }

    fn fetch_cards(&self, filter: &FilterValue) -> Result<CardPayload> {
        self.record(Endpoint::Cards, filter.as_str())?;
        Ok(CardPayload {
            values: vec![
                vec![filter.as_str().len().to_string()],
                vec!["5".to_string()],
                vec!["2.0".to_string()],
                vec!["3".to_string()],
            ],
        })
    }

    fn fetch_histogram(&self, filter: &FilterValue) -> Result<HistogramPayload> {
        self.record(Endpoint::Histogram, filter.as_str())?;
        Ok(HistogramPayload {
            counts: vec![[1.0, 7.0, 2.0]],
        })
    }

    fn submit_select_value(&self, filter: &FilterValue) -> Result<String> {
        self.record(Endpoint::SelectValue, filter.as_str())?;
        Ok(serde_json::to_string(filter.as_str()).unwrap_or_default())
    }
}
