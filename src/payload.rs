//! Filter value and the per-view payloads carried inside gateway responses.
//!
//! Every gateway response is a JSON object whose `payload` field is itself a
//! JSON document encoded as a string. [`decode_envelope`] unwraps both layers;
//! the `TryFrom` impls on each payload enforce the shape each view relies on.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;

use crate::error::{Result, SentidashError};

/// Number of cells in every table row.
pub const ROW_WIDTH: usize = 6;

/// Number of card slots fed by the card payload.
pub const CARD_SLOTS: usize = 4;

/// The subreddit scope shared by every view. `"all"` aggregates everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterValue(String);

impl FilterValue {
    pub const ALL: &'static str = "all";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.trim().is_empty() {
            Self::all()
        } else {
            Self(name)
        }
    }

    pub fn all() -> Self {
        Self(Self::ALL.to_string())
    }

    /// Normalize a selector reading: nothing selected means `"all"`.
    pub fn from_selection(selection: Option<&str>) -> Self {
        selection.map(Self::new).unwrap_or_else(Self::all)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_all(&self) -> bool {
        self.0 == Self::ALL
    }
}

impl Default for FilterValue {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bar chart data: one value per bucket label.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub values: Vec<f64>,
    pub labels: Vec<String>,
    pub scope_name: String,
}

/// Rows for the detail table, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePayload {
    pub rows: Vec<Vec<String>>,
}

/// Universe of selectable filter values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectorPayload {
    pub options: Vec<String>,
}

/// Card values; index 0 post count, 1 analyzed count, 2 average posts,
/// 3 subreddit count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPayload {
    pub values: Vec<Vec<String>>,
}

impl CardPayload {
    /// First field of the entry at `index`, empty when absent.
    pub fn slot(&self, index: usize) -> &str {
        self.values
            .get(index)
            .and_then(|entry| entry.first())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Sentiment counts; only the first triple is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPayload {
    pub counts: Vec<[f64; 3]>,
}

impl HistogramPayload {
    fn first(&self, index: usize) -> f64 {
        self.counts.first().map(|triple| triple[index]).unwrap_or(0.0)
    }

    pub fn negative(&self) -> f64 {
        self.first(0)
    }

    pub fn positive(&self) -> f64 {
        self.first(1)
    }

    pub fn neutral(&self) -> f64 {
        self.first(2)
    }
}

#[derive(Deserialize)]
struct Envelope {
    payload: String,
}

#[derive(Deserialize)]
pub(crate) struct ChartWire {
    data_values: Vec<f64>,
    data_labels: Vec<Value>,
    subreddit_name: Value,
}

#[derive(Deserialize)]
pub(crate) struct RowsWire {
    data_labels: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
pub(crate) struct SelectWire {
    data_labels: Vec<Value>,
}

#[derive(Deserialize)]
pub(crate) struct CardsWire {
    data_values: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
pub(crate) struct HistWire {
    histogram_counts: Vec<Vec<Option<f64>>>,
}

/// Decode a double-encoded gateway response into `W`, then validate it into `T`.
pub fn decode_envelope<W, T>(endpoint: &'static str, body: &str) -> Result<T>
where
    W: DeserializeOwned,
    T: TryFrom<W, Error = String>,
{
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        SentidashError::shape_invalid(endpoint, format!("response envelope: {}", e))
    })?;
    let wire: W = parse_inner(endpoint, &envelope.payload)?;
    T::try_from(wire).map_err(|details| SentidashError::shape_invalid(endpoint, details))
}

fn parse_inner<W: DeserializeOwned>(endpoint: &'static str, payload: &str) -> Result<W> {
    serde_json::from_str(payload)
        .map_err(|e| SentidashError::shape_invalid(endpoint, format!("payload: {}", e)))
}

/// Render a scalar JSON value the way a template would print it.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Format a count without a trailing `.0` when it is integral.
pub fn format_count(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

impl TryFrom<ChartWire> for ChartPayload {
    type Error = String;

    fn try_from(wire: ChartWire) -> std::result::Result<Self, String> {
        if wire.data_values.len() != wire.data_labels.len() {
            return Err(format!(
                "{} values but {} labels",
                wire.data_values.len(),
                wire.data_labels.len()
            ));
        }
        Ok(Self {
            values: wire.data_values,
            labels: wire.data_labels.iter().map(display_text).collect(),
            scope_name: display_text(&wire.subreddit_name),
        })
    }
}

impl TryFrom<RowsWire> for TablePayload {
    type Error = String;

    fn try_from(wire: RowsWire) -> std::result::Result<Self, String> {
        Ok(Self {
            rows: wire
                .data_labels
                .iter()
                .map(|row| row.iter().map(display_text).collect())
                .collect(),
        })
    }
}

impl TryFrom<SelectWire> for SelectorPayload {
    type Error = String;

    fn try_from(wire: SelectWire) -> std::result::Result<Self, String> {
        Ok(Self {
            options: wire.data_labels.iter().map(display_text).collect(),
        })
    }
}

impl TryFrom<CardsWire> for CardPayload {
    type Error = String;

    fn try_from(wire: CardsWire) -> std::result::Result<Self, String> {
        if wire.data_values.len() < CARD_SLOTS {
            return Err(format!(
                "expected {} card values, got {}",
                CARD_SLOTS,
                wire.data_values.len()
            ));
        }
        if let Some(idx) = wire.data_values[..CARD_SLOTS]
            .iter()
            .position(|entry| entry.is_empty())
        {
            return Err(format!("card value {} is empty", idx));
        }
        Ok(Self {
            values: wire
                .data_values
                .iter()
                .map(|entry| entry.iter().map(display_text).collect())
                .collect(),
        })
    }
}

impl TryFrom<HistWire> for HistogramPayload {
    type Error = String;

    fn try_from(wire: HistWire) -> std::result::Result<Self, String> {
        let Some(first) = wire.histogram_counts.first() else {
            return Err("no histogram counts".to_string());
        };
        if first.len() < 3 {
            return Err(format!("expected 3 histogram counts, got {}", first.len()));
        }
        // SUM over an empty subreddit comes back as null
        let counts = wire
            .histogram_counts
            .iter()
            .filter(|triple| triple.len() >= 3)
            .map(|triple| {
                [
                    triple[0].unwrap_or(0.0),
                    triple[1].unwrap_or(0.0),
                    triple[2].unwrap_or(0.0),
                ]
            })
            .collect();
        Ok(Self { counts })
    }
}
