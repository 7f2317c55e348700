//! Evidence service interface.
//!
//! The dashboard never synthesizes evidence itself. Everything it shows comes
//! from an [`EvidenceService`]: one call to run a search, one to suggest
//! refined queries. Backends live in [`crate::providers`]; this module also
//! carries the scripted [`MockEvidenceService`] used by tests and demos.

use crate::error::{SearchFailure, SuggestionFailure};
use crate::types::SearchResult;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Trait for evidence search backends.
#[async_trait]
pub trait EvidenceService: Send + Sync {
    /// Run a search and return the synthesized result.
    async fn search(&self, query: &str) -> Result<SearchResult, SearchFailure>;

    /// Suggest refined queries for partially typed text.
    async fn suggest(&self, partial_query: &str) -> Result<Vec<String>, SuggestionFailure>;

    /// Short backend name for logs and the status bar.
    fn name(&self) -> &str;
}

/// Reject results whose evidence matrix repeats a study id.
pub fn validate_result(result: SearchResult) -> Result<SearchResult, SearchFailure> {
    if let Some(id) = result.duplicate_study_id() {
        return Err(SearchFailure::Malformed {
            message: format!("duplicate study id '{id}' in evidence matrix"),
        });
    }
    Ok(result)
}

/// A scripted evidence service.
///
/// Queued responses are returned in order. Once a queue runs dry, searches
/// fall back to the configured fallback result (with the query echoed) or an
/// empty result, and suggestions fall back to the fallback list filtered by
/// the typed text.
pub struct MockEvidenceService {
    searches: Mutex<VecDeque<Result<SearchResult, SearchFailure>>>,
    suggestions: Mutex<VecDeque<Result<Vec<String>, SuggestionFailure>>>,
    fallback_result: Option<SearchResult>,
    fallback_suggestions: Vec<String>,
    search_calls: AtomicUsize,
    suggest_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl MockEvidenceService {
    pub fn new() -> Self {
        Self {
            searches: Mutex::new(VecDeque::new()),
            suggestions: Mutex::new(VecDeque::new()),
            fallback_result: None,
            fallback_suggestions: Vec::new(),
            search_calls: AtomicUsize::new(0),
            suggest_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Serve `result` for every search that has no queued response.
    pub fn with_fallback(mut self, result: SearchResult, suggestions: Vec<String>) -> Self {
        self.fallback_result = Some(result);
        self.fallback_suggestions = suggestions;
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_result(&self, result: SearchResult) {
        self.searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(result));
    }

    pub fn queue_failure(&self, failure: SearchFailure) {
        self.searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(failure));
    }

    pub fn queue_suggestions(&self, suggestions: Vec<String>) {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Ok(suggestions));
    }

    pub fn queue_suggestion_failure(&self, failure: SuggestionFailure) {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(Err(failure));
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn suggest_calls(&self) -> usize {
        self.suggest_calls.load(Ordering::SeqCst)
    }

    /// Queries passed to `search`, in call order.
    pub fn searched_queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockEvidenceService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EvidenceService for MockEvidenceService {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchFailure> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(query.to_string());
        self.pause().await;

        let queued = self
            .searches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match queued {
            Some(outcome) => outcome.and_then(validate_result),
            None => {
                let mut result = self
                    .fallback_result
                    .clone()
                    .unwrap_or_else(|| SearchResult::with_studies(query, Vec::new()));
                result.query = query.to_string();
                Ok(result)
            }
        }
    }

    async fn suggest(&self, partial_query: &str) -> Result<Vec<String>, SuggestionFailure> {
        self.suggest_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;

        let queued = self
            .suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        match queued {
            Some(outcome) => outcome,
            None => Ok(filter_suggestions(&self.fallback_suggestions, partial_query)),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Suggestions containing `text`, ignoring case.
pub(crate) fn filter_suggestions(candidates: &[String], text: &str) -> Vec<String> {
    let needle = text.trim().to_lowercase();
    candidates
        .iter()
        .filter(|s| s.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
