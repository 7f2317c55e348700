//! Study selection state machine.
//!
//! A selection is exactly one of four shapes: nothing selected, one study
//! focused for the detail panel, a set of studies collected for comparison, or
//! that set promoted to the full-page comparison view. Encoding these as a
//! closed enum means a focused study and a multi-select set can never be
//! active at the same time, and the full-page view can never be empty.
//!
//! [`SelectionState`] transitions are pure and return the next state.
//! [`SelectionController`] owns the current state and rejects ids that are not
//! part of the active search result.

use crate::types::{SearchResult, StudyId};
use tracing::debug;

/// Current selection over the evidence matrix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Empty,
    /// One study opened in the detail panel.
    SingleFocus(StudyId),
    /// Studies collected via checkboxes, in the order they were checked.
    /// Never empty.
    MultiSelect(Vec<StudyId>),
    /// The collected studies shown side by side. Never empty.
    FullPageCompare(Vec<StudyId>),
}

impl SelectionState {
    /// Focus a single study. Replaces any multi-selection and leaves the
    /// full-page view.
    pub fn focus(&self, id: StudyId) -> Self {
        SelectionState::SingleFocus(id)
    }

    /// Add `id` to the multi-select set, or remove it if already present.
    ///
    /// A removed id that is toggled again is appended at the end. Any single
    /// focus is dropped. Inside the full-page view the set is edited in place
    /// and the view closes once nothing is left to compare.
    pub fn toggle_multi_select(&self, id: StudyId) -> Self {
        let mut ids = self.multi_selected_ids().to_vec();
        match ids.iter().position(|existing| existing == &id) {
            Some(pos) => {
                ids.remove(pos);
            }
            None => ids.push(id),
        }

        if ids.is_empty() {
            return SelectionState::Empty;
        }
        match self {
            SelectionState::FullPageCompare(_) => SelectionState::FullPageCompare(ids),
            _ => SelectionState::MultiSelect(ids),
        }
    }

    /// Open the full-page comparison. No-op unless at least two studies are
    /// multi-selected.
    pub fn promote_to_full_page(&self) -> Self {
        match self {
            SelectionState::MultiSelect(ids) if ids.len() >= 2 => {
                SelectionState::FullPageCompare(ids.clone())
            }
            other => other.clone(),
        }
    }

    /// Leave the full-page comparison, keeping the selected studies.
    pub fn exit_full_page(&self) -> Self {
        match self {
            SelectionState::FullPageCompare(ids) => SelectionState::MultiSelect(ids.clone()),
            other => other.clone(),
        }
    }

    /// The study the detail panel describes: the focused study, or the only
    /// member of a one-element multi-selection.
    pub fn effective_focused_id(&self) -> Option<&StudyId> {
        match self {
            SelectionState::SingleFocus(id) => Some(id),
            SelectionState::MultiSelect(ids) | SelectionState::FullPageCompare(ids)
                if ids.len() == 1 =>
            {
                ids.first()
            }
            _ => None,
        }
    }

    /// Multi-selected studies in selection order. Empty for a single focus.
    pub fn multi_selected_ids(&self) -> &[StudyId] {
        match self {
            SelectionState::MultiSelect(ids) | SelectionState::FullPageCompare(ids) => ids,
            SelectionState::Empty | SelectionState::SingleFocus(_) => &[],
        }
    }

    pub fn is_compare_full_page(&self) -> bool {
        matches!(self, SelectionState::FullPageCompare(_))
    }

    pub fn is_detail_panel_open(&self) -> bool {
        (self.effective_focused_id().is_some() || !self.multi_selected_ids().is_empty())
            && !self.is_compare_full_page()
    }

    /// Whether the comparison view may be opened.
    pub fn is_comparison_eligible(&self) -> bool {
        self.multi_selected_ids().len() >= 2
    }

    /// Whether `id` is checked in the multi-select column.
    pub fn is_selected(&self, id: &StudyId) -> bool {
        self.multi_selected_ids().contains(id)
    }

    pub fn is_focused(&self, id: &StudyId) -> bool {
        matches!(self, SelectionState::SingleFocus(focused) if focused == id)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, SelectionState::Empty)
    }

    fn label(&self) -> &'static str {
        match self {
            SelectionState::Empty => "empty",
            SelectionState::SingleFocus(_) => "single_focus",
            SelectionState::MultiSelect(_) => "multi_select",
            SelectionState::FullPageCompare(_) => "full_page_compare",
        }
    }
}

/// Owner of the selection for the active search result.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    /// Focus a study of `result`. Ids outside the result are ignored.
    /// Returns whether the selection changed.
    pub fn focus(&mut self, id: &StudyId, result: Option<&SearchResult>) -> bool {
        if !Self::is_known(id, result) {
            debug!(study_id = %id, "Ignoring focus on study outside the active result");
            return false;
        }
        let next = self.state.focus(id.clone());
        self.apply(next)
    }

    /// Toggle a study of `result` in the multi-select set. Ids outside the
    /// result are ignored. Returns whether the selection changed.
    pub fn toggle_multi_select(&mut self, id: &StudyId, result: Option<&SearchResult>) -> bool {
        if !Self::is_known(id, result) {
            debug!(study_id = %id, "Ignoring toggle of study outside the active result");
            return false;
        }
        let next = self.state.toggle_multi_select(id.clone());
        self.apply(next)
    }

    pub fn promote_to_full_page(&mut self) -> bool {
        let next = self.state.promote_to_full_page();
        self.apply(next)
    }

    pub fn exit_full_page(&mut self) -> bool {
        let next = self.state.exit_full_page();
        self.apply(next)
    }

    pub fn clear(&mut self) {
        self.apply(SelectionState::Empty);
    }

    /// A new search result replaced the previous one; every held id is stale.
    pub fn on_result_replaced(&mut self) {
        self.clear();
    }

    fn is_known(id: &StudyId, result: Option<&SearchResult>) -> bool {
        result.is_some_and(|r| r.contains(id))
    }

    fn apply(&mut self, next: SelectionState) -> bool {
        if next == self.state {
            return false;
        }
        debug!(from = self.state.label(), to = next.label(), "Selection transition");
        self.state = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EvidenceGrade, Study, StudyType};
    use pretty_assertions::assert_eq;

    fn id(s: &str) -> StudyId {
        StudyId::from(s)
    }

    fn result() -> SearchResult {
        let studies = ["s1", "s2", "s3"]
            .iter()
            .map(|i| Study::new(*i, "t", 2020, StudyType::Rct, EvidenceGrade::Strong))
            .collect();
        SearchResult::with_studies("q", studies)
    }

    #[test]
    fn test_default_is_empty() {
        let state = SelectionState::default();
        assert!(state.is_empty());
        assert!(!state.is_detail_panel_open());
        assert_eq!(state.effective_focused_id(), None);
    }

    #[test]
    fn test_focus_opens_detail_panel() {
        let state = SelectionState::Empty.focus(id("s1"));
        assert_eq!(state.effective_focused_id(), Some(&id("s1")));
        assert!(state.is_detail_panel_open());
        assert!(state.is_focused(&id("s1")));
    }

    #[test]
    fn test_focus_replaces_multi_select() {
        let state = SelectionState::MultiSelect(vec![id("s1"), id("s2")]).focus(id("s3"));
        assert_eq!(state, SelectionState::SingleFocus(id("s3")));
        assert!(state.multi_selected_ids().is_empty());
    }

    #[test]
    fn test_focus_leaves_full_page() {
        let state = SelectionState::FullPageCompare(vec![id("s1"), id("s2")]).focus(id("s1"));
        assert!(!state.is_compare_full_page());
    }

    #[test]
    fn test_toggle_drops_single_focus() {
        let state = SelectionState::SingleFocus(id("s1")).toggle_multi_select(id("s2"));
        assert_eq!(state, SelectionState::MultiSelect(vec![id("s2")]));
        // A singleton set becomes the effective focus.
        assert_eq!(state.effective_focused_id(), Some(&id("s2")));
    }

    #[test]
    fn test_toggle_twice_restores_membership() {
        let start = SelectionState::MultiSelect(vec![id("s1"), id("s2")]);
        let state = start.toggle_multi_select(id("s1")).toggle_multi_select(id("s1"));
        // Same members, re-inserted id moves to the end.
        assert_eq!(state, SelectionState::MultiSelect(vec![id("s2"), id("s1")]));
    }

    #[test]
    fn test_toggle_last_id_collapses_to_empty() {
        let state = SelectionState::MultiSelect(vec![id("s1")]).toggle_multi_select(id("s1"));
        assert_eq!(state, SelectionState::Empty);
    }

    #[test]
    fn test_toggle_in_full_page_edits_set() {
        let state = SelectionState::FullPageCompare(vec![id("s1"), id("s2")])
            .toggle_multi_select(id("s2"));
        assert_eq!(state, SelectionState::FullPageCompare(vec![id("s1")]));
        let state = state.toggle_multi_select(id("s1"));
        assert_eq!(state, SelectionState::Empty);
    }

    #[test]
    fn test_promote_requires_two() {
        let single = SelectionState::MultiSelect(vec![id("s1")]);
        assert_eq!(single.promote_to_full_page(), single);
        assert_eq!(
            SelectionState::SingleFocus(id("s1")).promote_to_full_page(),
            SelectionState::SingleFocus(id("s1"))
        );
        assert_eq!(
            SelectionState::Empty.promote_to_full_page(),
            SelectionState::Empty
        );
    }

    #[test]
    fn test_promote_and_exit_preserve_ids() {
        let state = SelectionState::Empty
            .toggle_multi_select(id("s1"))
            .toggle_multi_select(id("s2"));
        assert!(state.is_comparison_eligible());
        assert!(state.is_detail_panel_open());

        let full = state.promote_to_full_page();
        assert!(full.is_compare_full_page());
        assert!(!full.is_detail_panel_open());

        let back = full.exit_full_page();
        assert_eq!(back, SelectionState::MultiSelect(vec![id("s1"), id("s2")]));
    }

    #[test]
    fn test_exit_full_page_is_noop_elsewhere() {
        let state = SelectionState::SingleFocus(id("s1"));
        assert_eq!(state.exit_full_page(), state);
    }

    #[test]
    fn test_detail_panel_open_for_multi_selection() {
        let state = SelectionState::MultiSelect(vec![id("s1"), id("s2")]);
        assert_eq!(state.effective_focused_id(), None);
        assert!(state.is_detail_panel_open());
        assert!(state.is_selected(&id("s2")));
        assert!(!state.is_selected(&id("s3")));
    }

    #[test]
    fn test_controller_ignores_unknown_ids() {
        let result = result();
        let mut controller = SelectionController::new();
        assert!(!controller.focus(&id("nope"), Some(&result)));
        assert!(!controller.toggle_multi_select(&id("nope"), Some(&result)));
        assert!(controller.state().is_empty());
    }

    #[test]
    fn test_controller_ignores_everything_without_result() {
        let mut controller = SelectionController::new();
        assert!(!controller.focus(&id("s1"), None));
        assert!(controller.state().is_empty());
    }

    #[test]
    fn test_controller_transitions() {
        let result = result();
        let mut controller = SelectionController::new();
        assert!(controller.toggle_multi_select(&id("s1"), Some(&result)));
        assert!(!controller.promote_to_full_page());
        assert!(controller.toggle_multi_select(&id("s2"), Some(&result)));
        assert!(controller.promote_to_full_page());
        assert!(controller.state().is_compare_full_page());
        assert!(controller.exit_full_page());
        assert_eq!(controller.state().multi_selected_ids(), &[id("s1"), id("s2")]);
    }

    #[test]
    fn test_result_replaced_clears_everything() {
        let result = result();
        let mut controller = SelectionController::new();
        controller.toggle_multi_select(&id("s1"), Some(&result));
        controller.toggle_multi_select(&id("s2"), Some(&result));
        controller.promote_to_full_page();
        controller.on_result_replaced();
        assert_eq!(controller.state(), &SelectionState::Empty);
    }
}
