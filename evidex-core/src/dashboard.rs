//! The dashboard state root.
//!
//! [`Dashboard`] owns the search session, the selection and the matrix sort
//! order, and is the only way front ends change them. Search and suggestion
//! calls are split into a `begin_*` step that returns a ticket and a
//! `finish_*` step that applies the outcome, so a front end can run the
//! service call on another task. [`Dashboard::submit`] and
//! [`Dashboard::refresh_suggestions`] run both steps inline.

use crate::config::SessionConfig;
use crate::error::{SearchFailure, SuggestionFailure};
use crate::selection::{SelectionController, SelectionState};
use crate::service::EvidenceService;
use crate::session::{SearchCompletion, SearchSession, SearchTicket, SuggestTicket};
use crate::sort::{SortKey, SortSpec, sort_studies};
use crate::types::{SearchResult, Study, StudyId};
use crate::view::{self, ViewModel};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    session: SearchSession,
    selection: SelectionController,
    sort: SortSpec,
}

impl Dashboard {
    pub fn new(settings: SessionConfig) -> Self {
        Self {
            session: SearchSession::new(settings),
            selection: SelectionController::new(),
            sort: SortSpec::default(),
        }
    }

    pub fn session(&self) -> &SearchSession {
        &self.session
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn sort_spec(&self) -> SortSpec {
        self.sort
    }

    pub fn result(&self) -> Option<&SearchResult> {
        self.session.result()
    }

    // --- Search ---

    /// Start a search. Blank queries are ignored. The selection is cleared
    /// as soon as the search starts.
    pub fn begin_search(&mut self, query: &str) -> Option<SearchTicket> {
        let ticket = self.session.begin_submit(query)?;
        self.selection.clear();
        Some(ticket)
    }

    pub fn finish_search(
        &mut self,
        ticket: &SearchTicket,
        outcome: Result<SearchResult, SearchFailure>,
    ) -> SearchCompletion {
        let completion = self.session.complete_search(ticket, outcome);
        if completion == SearchCompletion::Replaced {
            self.selection.on_result_replaced();
        }
        completion
    }

    /// Run a search to completion against `service`.
    pub async fn submit(
        &mut self,
        service: &dyn EvidenceService,
        query: &str,
    ) -> Option<SearchCompletion> {
        let ticket = self.begin_search(query)?;
        let outcome = service.search(ticket.query()).await;
        Some(self.finish_search(&ticket, outcome))
    }

    /// Submit the suggestion at `index` and drop the suggestion list.
    pub fn choose_suggestion(&mut self, index: usize) -> Option<SearchTicket> {
        let suggestion = self.session.suggestions().get(index)?.clone();
        self.session.clear_suggestions();
        self.begin_search(&suggestion)
    }

    // --- Suggestions ---

    pub fn update_query_text(&mut self, text: &str) -> Option<SuggestTicket> {
        self.session.update_query_text(text)
    }

    pub fn finish_suggest(
        &mut self,
        ticket: &SuggestTicket,
        outcome: Result<Vec<String>, SuggestionFailure>,
    ) -> bool {
        self.session.complete_suggest(ticket, outcome)
    }

    /// Store `text` and, past the threshold, fetch suggestions for it.
    /// Returns whether the suggestion list changed.
    pub async fn refresh_suggestions(&mut self, service: &dyn EvidenceService, text: &str) -> bool {
        let had_suggestions = !self.session.suggestions().is_empty();
        match self.update_query_text(text) {
            Some(ticket) => {
                let outcome = service.suggest(ticket.text()).await;
                self.finish_suggest(&ticket, outcome)
            }
            None => had_suggestions,
        }
    }

    pub fn dismiss_suggestions(&mut self) {
        self.session.clear_suggestions();
    }

    /// Empty the search bar and the selection. The result stays on screen.
    pub fn reset(&mut self) {
        debug!("Resetting search bar and selection");
        self.session.clear_query();
        self.selection.clear();
    }

    // --- Selection ---

    pub fn focus(&mut self, id: &StudyId) -> bool {
        self.selection.focus(id, self.session.result())
    }

    pub fn toggle_multi_select(&mut self, id: &StudyId) -> bool {
        self.selection.toggle_multi_select(id, self.session.result())
    }

    pub fn promote_to_full_page(&mut self) -> bool {
        self.selection.promote_to_full_page()
    }

    pub fn exit_full_page(&mut self) -> bool {
        self.selection.exit_full_page()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Sorting ---

    /// Header click on `key`.
    pub fn sort_by(&mut self, key: SortKey) {
        self.sort = self.sort.toggled(key);
        debug!(key = ?self.sort.key, direction = ?self.sort.direction, "Sort changed");
    }

    pub fn set_sort(&mut self, spec: SortSpec) {
        self.sort = spec;
    }

    /// The evidence matrix in the active sort order.
    pub fn sorted_studies(&self) -> Vec<&Study> {
        self.session
            .result()
            .map(|r| sort_studies(&r.evidence_matrix, self.sort))
            .unwrap_or_default()
    }

    pub fn view(&self) -> ViewModel<'_> {
        view::compose(&self.session, self.selection.state())
    }
}
