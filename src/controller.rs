//! Keeps the five views on one filter value.
//!
//! `refresh_all` bumps the generation, fetches the chart, and only once the
//! chart response has been handled fans out the table, histogram and card
//! fetches for the same filter and generation. Every gateway call runs on a
//! worker thread and reports back through the application event channel, so
//! all view mutation happens on the UI thread inside [`SyncController::handle`].
//!
//! Responses tagged with an older generation are dropped unrendered.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use chrono::{DateTime, Local};

use crate::error::{Result, SentidashError};
use crate::gateway::{DataGateway, Endpoint};
use crate::payload::{
    CardPayload, ChartPayload, FilterValue, HistogramPayload, SelectorPayload, TablePayload,
};
use crate::widgets::notice::Notice;
use crate::widgets::selector::SelectorView;
use crate::widgets::Views;
use crate::AppEvent;

/// Monotonic token identifying one `refresh_all` call.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Fetching,
    Rendered,
    Failed,
    TriggeringDependents,
}

impl fmt::Display for SyncPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Fetching => "Fetching",
            Self::Rendered => "Rendered",
            Self::Failed => "Failed",
            Self::TriggeringDependents => "Updating views",
        };
        f.write_str(name)
    }
}

/// Views refreshed after the chart settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dependent {
    Table,
    Histogram,
    Cards,
}

impl Dependent {
    /// Trigger order after the chart settles.
    pub const ALL: [Dependent; 3] = [Dependent::Table, Dependent::Histogram, Dependent::Cards];

    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Table => Endpoint::Rows,
            Self::Histogram => Endpoint::Histogram,
            Self::Cards => Endpoint::Cards,
        }
    }
}

/// Result of one gateway call, tagged with what issued it.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Chart {
        generation: Generation,
        filter: FilterValue,
        result: Result<ChartPayload>,
    },
    Rows {
        generation: Generation,
        filter: FilterValue,
        result: Result<TablePayload>,
    },
    Histogram {
        generation: Generation,
        filter: FilterValue,
        result: Result<HistogramPayload>,
    },
    Cards {
        generation: Generation,
        filter: FilterValue,
        result: Result<CardPayload>,
    },
    Selector {
        result: Result<SelectorPayload>,
    },
    SelectValueAck {
        filter: FilterValue,
        result: Result<String>,
    },
}

impl FetchOutcome {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::Chart { .. } => Endpoint::Chart,
            Self::Rows { .. } => Endpoint::Rows,
            Self::Histogram { .. } => Endpoint::Histogram,
            Self::Cards { .. } => Endpoint::Cards,
            Self::Selector { .. } => Endpoint::Select,
            Self::SelectValueAck { .. } => Endpoint::SelectValue,
        }
    }

    /// Generation token, for filter-scoped view fetches only.
    pub fn generation(&self) -> Option<Generation> {
        match self {
            Self::Chart { generation, .. }
            | Self::Rows { generation, .. }
            | Self::Histogram { generation, .. }
            | Self::Cards { generation, .. } => Some(*generation),
            Self::Selector { .. } | Self::SelectValueAck { .. } => None,
        }
    }
}

pub struct SyncController {
    gateway: Arc<dyn DataGateway>,
    events: Sender<AppEvent>,
    generation: Generation,
    filter: FilterValue,
    phase: SyncPhase,
    pending: BTreeSet<Dependent>,
    discarded: usize,
    last_discarded: Option<String>,
    last_refreshed: Option<DateTime<Local>>,
}

impl SyncController {
    pub fn new(gateway: Arc<dyn DataGateway>, events: Sender<AppEvent>) -> Self {
        Self {
            gateway,
            events,
            generation: 0,
            filter: FilterValue::all(),
            phase: SyncPhase::Idle,
            pending: BTreeSet::new(),
            discarded: 0,
            last_discarded: None,
            last_refreshed: None,
        }
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn active_filter(&self) -> &FilterValue {
        &self.filter
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Dependents issued for the current generation that have not settled.
    pub fn pending(&self) -> Vec<Dependent> {
        self.pending.iter().copied().collect()
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn last_discarded(&self) -> Option<&str> {
        self.last_discarded.as_deref()
    }

    /// When the last full refresh (chart plus dependents) settled.
    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    /// Start a refresh of every filter-scoped view.
    ///
    /// Without an explicit filter the selector's current selection is used,
    /// and no selection means `"all"`.
    pub fn refresh_all(
        &mut self,
        filter: Option<FilterValue>,
        selector: &SelectorView,
    ) -> Generation {
        let filter = filter.unwrap_or_else(|| FilterValue::from_selection(selector.selected()));
        self.generation += 1;
        self.filter = filter.clone();
        self.phase = SyncPhase::Fetching;
        self.pending.clear();

        let generation = self.generation;
        tracing::info!(generation, filter = %filter, "refreshing all views");
        let started = self.spawn("chart", move |gateway| FetchOutcome::Chart {
            generation,
            result: gateway.fetch_chart(&filter),
            filter,
        });
        if started.is_err() {
            self.phase = SyncPhase::Idle;
        }
        generation
    }

    /// Reload the selector universe. Not tied to any generation.
    pub fn refresh_selector(&self) {
        tracing::debug!("reloading selector options");
        let _ = self.spawn("select", |gateway| FetchOutcome::Selector {
            result: gateway.fetch_select_options(),
        });
    }

    /// Report the chosen filter to the gateway; the reply is only logged.
    pub fn submit_selection(&self, filter: FilterValue) {
        let _ = self.spawn("select-value", move |gateway| FetchOutcome::SelectValueAck {
            result: gateway.submit_select_value(&filter),
            filter,
        });
    }

    /// Apply one gateway result to the views. Returns false when the result
    /// belonged to an older generation and was dropped.
    pub fn handle(&mut self, outcome: FetchOutcome, views: &mut Views) -> bool {
        if let Some(generation) = outcome.generation() {
            if generation != self.generation {
                self.discard(&outcome, generation);
                return false;
            }
        }

        match outcome {
            FetchOutcome::Chart { result, filter, .. } => {
                match result {
                    Ok(payload) => {
                        views.chart.render_payload(payload);
                        self.phase = SyncPhase::Rendered;
                    }
                    Err(err) => {
                        report(&err, &filter);
                        views.chart.dispose();
                        views.chart.notice = Some(Notice::from_error(&err));
                        self.phase = SyncPhase::Failed;
                    }
                }
                self.trigger_dependents(filter, views);
            }
            FetchOutcome::Rows { result, filter, .. } => {
                match result {
                    Ok(payload) => views.table.render(payload.rows),
                    Err(err) => {
                        report(&err, &filter);
                        views.table.notice = Some(Notice::from_error(&err));
                    }
                }
                self.settle(Dependent::Table);
            }
            FetchOutcome::Histogram { result, filter, .. } => {
                match result {
                    Ok(payload) => views.histogram.render_histogram(&payload),
                    Err(err) => {
                        report(&err, &filter);
                        views.histogram.notice = Some(Notice::from_error(&err));
                    }
                }
                self.settle(Dependent::Histogram);
            }
            FetchOutcome::Cards { result, filter, .. } => {
                match result {
                    Ok(payload) => views.cards.render_cards(&payload),
                    Err(err) => {
                        report(&err, &filter);
                        views.cards.notice = Some(Notice::from_error(&err));
                    }
                }
                self.settle(Dependent::Cards);
            }
            FetchOutcome::Selector { result } => match result {
                Ok(payload) => {
                    tracing::debug!(options = payload.options.len(), "selector populated");
                    views.selector.populate(payload.options);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "selector reload failed");
                    views.selector.notice = Some(Notice::from_error(&err));
                }
            },
            FetchOutcome::SelectValueAck { filter, result } => match result {
                Ok(ack) => tracing::debug!(filter = %filter, ack = %ack, "selection acknowledged"),
                Err(err) => tracing::warn!(filter = %filter, error = %err, "selection not recorded"),
            },
        }
        true
    }

    fn trigger_dependents(&mut self, filter: FilterValue, views: &mut Views) {
        self.phase = SyncPhase::TriggeringDependents;
        let generation = self.generation;
        self.pending.extend(Dependent::ALL);
        for dependent in Dependent::ALL {
            let filter = filter.clone();
            let started = match dependent {
                Dependent::Table => self.spawn("rows", move |gateway| FetchOutcome::Rows {
                    generation,
                    result: gateway.fetch_rows(&filter),
                    filter,
                }),
                Dependent::Histogram => {
                    self.spawn("histogram", move |gateway| FetchOutcome::Histogram {
                        generation,
                        result: gateway.fetch_histogram(&filter),
                        filter,
                    })
                }
                Dependent::Cards => self.spawn("cards", move |gateway| FetchOutcome::Cards {
                    generation,
                    result: gateway.fetch_cards(&filter),
                    filter,
                }),
            };
            if let Err(e) = started {
                let err = SentidashError::fetch_failed(
                    dependent.endpoint().path(),
                    format!("could not start request: {}", e),
                );
                self.abandon(dependent, &err, views);
            }
        }
    }

    /// Settle a dependent whose request never ran, leaving a notice on its view.
    fn abandon(&mut self, dependent: Dependent, err: &SentidashError, views: &mut Views) {
        let notice = Some(Notice::from_error(err));
        match dependent {
            Dependent::Table => views.table.notice = notice,
            Dependent::Histogram => views.histogram.notice = notice,
            Dependent::Cards => views.cards.notice = notice,
        }
        self.settle(dependent);
    }

    fn settle(&mut self, dependent: Dependent) {
        self.pending.remove(&dependent);
        if self.pending.is_empty() && self.phase == SyncPhase::TriggeringDependents {
            self.phase = SyncPhase::Idle;
            self.last_refreshed = Some(Local::now());
            tracing::info!(generation = self.generation, filter = %self.filter, "refresh settled");
        }
    }

    fn discard(&mut self, outcome: &FetchOutcome, generation: Generation) {
        let label = format!("{} gen {}", outcome.endpoint().path(), generation);
        tracing::debug!(
            stale = generation,
            current = self.generation,
            endpoint = outcome.endpoint().path(),
            "discarding stale response"
        );
        self.discarded += 1;
        self.last_discarded = Some(label);
    }

    fn spawn<F>(&self, name: &str, job: F) -> std::io::Result<()>
    where
        F: FnOnce(&dyn DataGateway) -> FetchOutcome + Send + 'static,
    {
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let spawned = thread::Builder::new()
            .name(format!("fetch-{}", name))
            .spawn(move || {
                let outcome = job(gateway.as_ref());
                // The receiver is gone once the app has exited.
                let _ = events.send(AppEvent::Fetched(outcome));
            });
        match spawned {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(worker = name, error = %e, "failed to start fetch worker");
                Err(e)
            }
        }
    }
}

fn report(err: &SentidashError, filter: &FilterValue) {
    tracing::warn!(code = err.code(), endpoint = err.endpoint(), filter = %filter, error = %err, "view fetch failed");
}
