//! Background evidence service calls.
//!
//! Each search or suggestion lookup runs on its own tokio task and reports
//! back through an unbounded mpsc channel, which the TUI main loop polls
//! with tokio::select!. The ticket travels with the call so the dashboard
//! can match the outcome to the request that produced it.

use evidex_core::{
    EvidenceService, SearchFailure, SearchResult, SearchTicket, SuggestTicket, SuggestionFailure,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Completions sent from service tasks to the TUI event loop.
#[derive(Debug)]
pub enum ServiceEvent {
    SearchFinished {
        ticket: SearchTicket,
        outcome: Result<SearchResult, SearchFailure>,
    },
    SuggestFinished {
        ticket: SuggestTicket,
        outcome: Result<Vec<String>, SuggestionFailure>,
    },
}

pub struct ServiceWorker {
    service: Arc<dyn EvidenceService>,
    tx: mpsc::UnboundedSender<ServiceEvent>,
}

impl ServiceWorker {
    pub fn new(service: Arc<dyn EvidenceService>) -> (Self, mpsc::UnboundedReceiver<ServiceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { service, tx }, rx)
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    pub fn spawn_search(&self, ticket: SearchTicket) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = service.search(ticket.query()).await;
            if tx.send(ServiceEvent::SearchFinished { ticket, outcome }).is_err() {
                debug!("Search finished after the dashboard closed");
            }
        });
    }

    pub fn spawn_suggest(&self, ticket: SuggestTicket) {
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = service.suggest(ticket.text()).await;
            if tx.send(ServiceEvent::SuggestFinished { ticket, outcome }).is_err() {
                debug!("Suggestions finished after the dashboard closed");
            }
        });
    }
}
