#![allow(dead_code)]

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sentidash::{App, AppEvent, DataGateway, FetchOutcome, MockGateway};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

pub struct Harness {
    pub app: App,
    pub mock: Arc<MockGateway>,
    pub rx: Receiver<AppEvent>,
}

pub fn harness(mock: MockGateway) -> Harness {
    let (tx, rx) = mpsc::channel();
    let mock = Arc::new(mock);
    let gateway: Arc<dyn DataGateway> = mock.clone();
    Harness {
        app: App::new(tx, gateway),
        mock,
        rx,
    }
}

pub fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

impl Harness {
    /// Dispatch an event, following any event the app returns.
    pub fn send(&mut self, event: AppEvent) {
        let mut next = Some(event);
        while let Some(event) = next {
            next = self.app.event(&event);
        }
    }

    /// Wait for the next worker result without handing it to the app.
    pub fn next_outcome(&self) -> FetchOutcome {
        match self.rx.recv_timeout(Duration::from_secs(5)) {
            Ok(AppEvent::Fetched(outcome)) => outcome,
            other => panic!("expected a fetch outcome, got {:?}", other),
        }
    }

    /// Feed `n` worker results to the app.
    pub fn pump(&mut self, n: usize) {
        for _ in 0..n {
            let outcome = self.next_outcome();
            self.send(AppEvent::Fetched(outcome));
        }
    }
}
