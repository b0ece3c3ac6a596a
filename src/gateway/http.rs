//! Blocking HTTP implementation of [`DataGateway`] on top of `ureq`.

use std::time::Duration;

use super::{
    decode_cards, decode_chart, decode_histogram, decode_rows, decode_select, DataGateway,
    Endpoint,
};
use crate::config::GatewayConfig;
use crate::error::{Result, SentidashError};
use crate::payload::{
    CardPayload, ChartPayload, FilterValue, HistogramPayload, SelectorPayload, TablePayload,
};

pub struct HttpGateway {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { agent, base_url }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            Duration::from_millis(config.timeout_ms),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GET `endpoint?vals=<vals>` and return the raw response body.
    fn get(&self, endpoint: Endpoint, vals: &str) -> Result<String> {
        let path = endpoint.path();
        tracing::debug!(endpoint = path, vals, "gateway request");
        let response = self
            .agent
            .get(&self.url(endpoint))
            .query("vals", vals)
            .call()
            .map_err(|e| transport_error(path, e))?;
        read_body(path, response)
    }
}

fn transport_error(endpoint: &'static str, err: ureq::Error) -> SentidashError {
    match err {
        ureq::Error::Status(code, response) => SentidashError::fetch_failed(
            endpoint,
            format!("server returned {} {}", code, response.status_text()),
        ),
        ureq::Error::Transport(transport) => {
            SentidashError::fetch_failed(endpoint, transport.to_string())
        }
    }
}

fn read_body(endpoint: &'static str, response: ureq::Response) -> Result<String> {
    let body = response.into_string().map_err(|e| {
        SentidashError::fetch_failed(endpoint, format!("could not read response: {}", e))
    })?;
    tracing::trace!(endpoint, bytes = body.len(), "gateway response");
    Ok(body)
}

impl DataGateway for HttpGateway {
    fn fetch_chart(&self, filter: &FilterValue) -> Result<ChartPayload> {
        decode_chart(&self.get(Endpoint::Chart, filter.as_str())?)
    }

    fn fetch_rows(&self, filter: &FilterValue) -> Result<TablePayload> {
        decode_rows(&self.get(Endpoint::Rows, filter.as_str())?)
    }

    fn fetch_select_options(&self) -> Result<SelectorPayload> {
        decode_select(&self.get(Endpoint::Select, "")?)
    }

    fn fetch_cards(&self, filter: &FilterValue) -> Result<CardPayload> {
        decode_cards(&self.get(Endpoint::Cards, filter.as_str())?)
    }

    fn fetch_histogram(&self, filter: &FilterValue) -> Result<HistogramPayload> {
        decode_histogram(&self.get(Endpoint::Histogram, filter.as_str())?)
    }

    fn submit_select_value(&self, filter: &FilterValue) -> Result<String> {
        let path = Endpoint::SelectValue.path();
        let body = serde_json::to_string(filter.as_str())
            .map_err(|e| SentidashError::shape_invalid(path, e.to_string()))?;
        let response = self
            .agent
            .post(&self.url(Endpoint::SelectValue))
            .set("Content-Type", "application/json")
            .send_string(&body)
            .map_err(|e| transport_error(path, e))?;
        read_body(path, response)
    }
}
