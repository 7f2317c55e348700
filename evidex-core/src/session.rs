//! Search session state.
//!
//! Holds the query text, the suggestion list, the loading flag, the active
//! search result and the recent-query history. Calls to the evidence service
//! are not made here: the session hands out tickets describing the call to
//! make, and the caller reports the outcome back with the same ticket.

use crate::config::SessionConfig;
use crate::error::{SearchFailure, SuggestionFailure};
use crate::types::SearchResult;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// A search the caller must run against the evidence service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    seq: u64,
    query: String,
}

impl SearchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

/// A suggestion lookup the caller must run against the evidence service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestTicket {
    seq: u64,
    text: String,
}

impl SuggestTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// What applying a search outcome did to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCompletion {
    /// The result replaced the previous one.
    Replaced,
    /// The search failed; the previous result is still shown.
    Failed(SearchFailure),
    /// A newer search was issued after this one; the outcome was dropped.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SearchSession {
    query_text: String,
    suggestions: Vec<String>,
    loading: bool,
    result: Option<SearchResult>,
    history: VecDeque<String>,
    last_search_seq: u64,
    last_suggest_seq: u64,
    settings: SessionConfig,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    pub fn new(settings: SessionConfig) -> Self {
        let limit = settings.history_limit.max(1);
        let history = settings
            .seed_history
            .iter()
            .take(limit)
            .cloned()
            .collect();
        Self {
            query_text: String::new(),
            suggestions: Vec::new(),
            loading: false,
            result: None,
            history,
            last_search_seq: 0,
            last_suggest_seq: 0,
            settings,
        }
    }

    pub fn query_text(&self) -> &str {
        &self.query_text
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    /// Recent queries, newest first.
    pub fn history(&self) -> impl ExactSizeIterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn settings(&self) -> &SessionConfig {
        &self.settings
    }

    /// Start a search for `query`.
    ///
    /// Returns `None` without touching any state when the query is blank.
    /// Otherwise the session enters loading, drops its suggestions and
    /// returns the ticket for the service call.
    pub fn begin_submit(&mut self, query: &str) -> Option<SearchTicket> {
        if query.trim().is_empty() {
            debug!("Ignoring blank search submission");
            return None;
        }
        self.last_search_seq += 1;
        self.query_text = query.to_string();
        self.loading = true;
        self.suggestions.clear();
        info!(seq = self.last_search_seq, query = %query, "Search started");
        Some(SearchTicket {
            seq: self.last_search_seq,
            query: query.to_string(),
        })
    }

    /// Apply the outcome of the search described by `ticket`.
    pub fn complete_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResult, SearchFailure>,
    ) -> SearchCompletion {
        if self.is_stale_search(ticket) {
            debug!(
                seq = ticket.seq,
                latest = self.last_search_seq,
                "Discarding stale search response"
            );
            return SearchCompletion::Discarded;
        }
        self.loading = false;
        match outcome {
            Ok(result) => {
                info!(
                    seq = ticket.seq,
                    studies = result.evidence_matrix.len(),
                    "Search completed"
                );
                self.remember(ticket.query.clone());
                self.result = Some(result);
                SearchCompletion::Replaced
            }
            Err(failure) => {
                warn!(seq = ticket.seq, error = %failure, "Search failed");
                SearchCompletion::Failed(failure)
            }
        }
    }

    /// Store the text typed into the search bar.
    ///
    /// Text longer than the suggestion threshold yields a ticket for a
    /// suggestion lookup. Shorter text clears the suggestions right away.
    pub fn update_query_text(&mut self, text: &str) -> Option<SuggestTicket> {
        self.query_text = text.to_string();
        self.last_suggest_seq += 1;
        if text.chars().count() > self.settings.suggest_min_chars {
            Some(SuggestTicket {
                seq: self.last_suggest_seq,
                text: text.to_string(),
            })
        } else {
            self.suggestions.clear();
            None
        }
    }

    /// Apply the outcome of a suggestion lookup. Failures become an empty
    /// list. Returns whether the suggestions were replaced.
    pub fn complete_suggest(
        &mut self,
        ticket: &SuggestTicket,
        outcome: Result<Vec<String>, SuggestionFailure>,
    ) -> bool {
        if self.settings.discard_stale_responses && ticket.seq != self.last_suggest_seq {
            debug!(
                seq = ticket.seq,
                latest = self.last_suggest_seq,
                "Discarding stale suggestions"
            );
            return false;
        }
        self.suggestions = outcome.unwrap_or_else(|failure| {
            debug!(error = %failure, "Suggestion lookup failed");
            Vec::new()
        });
        true
    }

    pub fn clear_suggestions(&mut self) {
        self.suggestions.clear();
    }

    /// Empty the search bar, keeping the result and history.
    pub fn clear_query(&mut self) {
        self.query_text.clear();
        self.suggestions.clear();
    }

    fn is_stale_search(&self, ticket: &SearchTicket) -> bool {
        self.settings.discard_stale_responses && ticket.seq != self.last_search_seq
    }

    fn remember(&mut self, query: String) {
        self.history.push_front(query);
        self.history.truncate(self.settings.history_limit.max(1));
    }
}
