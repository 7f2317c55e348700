//! Render projection.
//!
//! Everything here is a pure function of the search session and the
//! selection: which screen to show, what the detail panel holds, the columns
//! of the comparison view and the publication-year trend.

use crate::selection::SelectionState;
use crate::session::SearchSession;
use crate::types::{OutcomeGroup, SearchResult, Study, StudyId};
use std::collections::BTreeMap;

/// Which screen the dashboard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// No result yet and nothing in flight.
    Empty,
    Loading,
    /// Summary, evidence matrix and, when something is selected, the detail panel.
    Results,
    /// Selected studies side by side, replacing the results view.
    FullPageCompare,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPanel<'a> {
    Hidden,
    /// One study in full.
    Study(&'a Study),
    /// Several multi-selected studies, in selection order.
    Selection(Vec<&'a Study>),
}

impl DetailPanel<'_> {
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailPanel::Hidden)
    }
}

/// Number of studies published in one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

/// An outcome group with its study ids resolved against the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOutcome<'a> {
    pub group: &'a OutcomeGroup,
    pub studies: Vec<&'a Study>,
}

/// Everything a frame needs besides the sorted matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewModel<'a> {
    pub mode: RenderMode,
    pub result: Option<&'a SearchResult>,
    pub detail: DetailPanel<'a>,
    pub compare: Vec<&'a Study>,
    pub trend: Vec<YearCount>,
    pub outcomes: Vec<ResolvedOutcome<'a>>,
    pub comparison_eligible: bool,
    pub selected_count: usize,
}

pub fn render_mode(session: &SearchSession, selection: &SelectionState) -> RenderMode {
    if session.is_loading() {
        RenderMode::Loading
    } else if session.result().is_none() {
        RenderMode::Empty
    } else if selection.is_compare_full_page() {
        RenderMode::FullPageCompare
    } else {
        RenderMode::Results
    }
}

pub fn detail_panel<'a>(
    result: Option<&'a SearchResult>,
    selection: &SelectionState,
) -> DetailPanel<'a> {
    let Some(result) = result else {
        return DetailPanel::Hidden;
    };
    if !selection.is_detail_panel_open() {
        return DetailPanel::Hidden;
    }
    if let Some(study) = selection.effective_focused_id().and_then(|id| result.study(id)) {
        return DetailPanel::Study(study);
    }
    let studies = resolve(result, selection.multi_selected_ids());
    if studies.is_empty() {
        DetailPanel::Hidden
    } else {
        DetailPanel::Selection(studies)
    }
}

/// Studies shown in the comparison view, in selection order.
pub fn compare_columns<'a>(
    result: Option<&'a SearchResult>,
    selection: &SelectionState,
) -> Vec<&'a Study> {
    result
        .map(|r| resolve(r, selection.multi_selected_ids()))
        .unwrap_or_default()
}

/// Study count per publication year, oldest year first.
pub fn trend_buckets(studies: &[Study]) -> Vec<YearCount> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for study in studies {
        *counts.entry(study.year).or_default() += 1;
    }
    counts
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect()
}

/// Outcome groups with their referenced studies. Unknown ids are skipped.
pub fn resolved_outcomes(result: &SearchResult) -> Vec<ResolvedOutcome<'_>> {
    result
        .outcomes
        .iter()
        .map(|group| ResolvedOutcome {
            group,
            studies: resolve(result, &group.study_ids),
        })
        .collect()
}

pub fn compose<'a>(session: &'a SearchSession, selection: &SelectionState) -> ViewModel<'a> {
    let result = session.result();
    let mode = render_mode(session, selection);
    let detail = if mode == RenderMode::Results {
        detail_panel(result, selection)
    } else {
        DetailPanel::Hidden
    };
    ViewModel {
        mode,
        result,
        detail,
        compare: compare_columns(result, selection),
        trend: result
            .map(|r| trend_buckets(&r.evidence_matrix))
            .unwrap_or_default(),
        outcomes: result.map(resolved_outcomes).unwrap_or_default(),
        comparison_eligible: selection.is_comparison_eligible(),
        selected_count: selection.multi_selected_ids().len(),
    }
}

fn resolve<'a>(result: &'a SearchResult, ids: &[StudyId]) -> Vec<&'a Study> {
    ids.iter().filter_map(|id| result.study(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SearchFailure;
    use crate::types::{EvidenceGrade, StudyType};
    use pretty_assertions::assert_eq;

    fn study(id: &str, year: i32) -> Study {
        Study::new(id, format!("Study {id}"), year, StudyType::Rct, EvidenceGrade::Moderate)
    }

    fn result() -> SearchResult {
        let mut result = SearchResult::with_studies(
            "q",
            vec![study("s1", 2020), study("s2", 2018), study("s3", 2020)],
        );
        result.outcomes = vec![OutcomeGroup {
            category: "Mortality".into(),
            summary: "lower".into(),
            study_ids: vec!["s3".into(), "missing".into(), "s1".into()],
        }];
        result
    }

    fn session_with_result() -> SearchSession {
        let mut session = SearchSession::default();
        let ticket = session.begin_submit("q").unwrap();
        session.complete_search(&ticket, Ok(result()));
        session
    }

    fn ids(studies: &[&Study]) -> Vec<String> {
        studies.iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_render_mode_priority() {
        let mut session = SearchSession::default();
        let state = SelectionState::Empty;
        assert_eq!(render_mode(&session, &state), RenderMode::Empty);

        let ticket = session.begin_submit("q").unwrap();
        assert_eq!(render_mode(&session, &state), RenderMode::Loading);
        session.complete_search(&ticket, Ok(result()));
        assert_eq!(render_mode(&session, &state), RenderMode::Results);

        let full = SelectionState::FullPageCompare(vec!["s1".into(), "s2".into()]);
        assert_eq!(render_mode(&session, &full), RenderMode::FullPageCompare);

        // Loading wins over everything.
        session.begin_submit("again").unwrap();
        assert_eq!(render_mode(&session, &full), RenderMode::Loading);
    }

    #[test]
    fn test_empty_after_failed_first_search() {
        let mut session = SearchSession::default();
        let ticket = session.begin_submit("q").unwrap();
        session.complete_search(&ticket, Err(SearchFailure::Timeout { timeout_secs: 1 }));
        assert_eq!(
            render_mode(&session, &SelectionState::Empty),
            RenderMode::Empty
        );
    }

    #[test]
    fn test_detail_panel_single_study() {
        let result = result();
        let panel = detail_panel(Some(&result), &SelectionState::SingleFocus("s2".into()));
        assert_eq!(panel, DetailPanel::Study(&result.evidence_matrix[1]));
    }

    #[test]
    fn test_detail_panel_singleton_multi_select_shows_study() {
        let result = result();
        let panel = detail_panel(Some(&result), &SelectionState::MultiSelect(vec!["s3".into()]));
        assert!(matches!(panel, DetailPanel::Study(s) if s.id.as_str() == "s3"));
    }

    #[test]
    fn test_detail_panel_selection_in_selection_order() {
        let result = result();
        let state = SelectionState::MultiSelect(vec!["s3".into(), "s1".into()]);
        match detail_panel(Some(&result), &state) {
            DetailPanel::Selection(studies) => assert_eq!(ids(&studies), vec!["s3", "s1"]),
            other => panic!("expected selection panel, got {other:?}"),
        }
    }

    #[test]
    fn test_detail_panel_hidden_in_full_page() {
        let result = result();
        let state = SelectionState::FullPageCompare(vec!["s1".into(), "s2".into()]);
        assert_eq!(detail_panel(Some(&result), &state), DetailPanel::Hidden);
        assert_eq!(ids(&compare_columns(Some(&result), &state)), vec!["s1", "s2"]);
    }

    #[test]
    fn test_trend_buckets_sorted_by_year() {
        let studies: Vec<Study> = [2019, 2018, 2022, 2019, 2021, 2020]
            .iter()
            .enumerate()
            .map(|(i, y)| study(&format!("s{i}"), *y))
            .collect();
        let buckets: Vec<(i32, usize)> = trend_buckets(&studies)
            .iter()
            .map(|b| (b.year, b.count))
            .collect();
        assert_eq!(
            buckets,
            vec![(2018, 1), (2019, 2), (2020, 1), (2021, 1), (2022, 1)]
        );
    }

    #[test]
    fn test_trend_buckets_empty() {
        assert!(trend_buckets(&[]).is_empty());
    }

    #[test]
    fn test_resolved_outcomes_skip_unknown_ids() {
        let result = result();
        let outcomes = resolved_outcomes(&result);
        assert_eq!(outcomes.len(), 1);
        assert_eq!(ids(&outcomes[0].studies), vec!["s3", "s1"]);
    }

    #[test]
    fn test_compose_results_view() {
        let session = session_with_result();
        let state = SelectionState::MultiSelect(vec!["s1".into(), "s2".into()]);
        let view = compose(&session, &state);
        assert_eq!(view.mode, RenderMode::Results);
        assert!(view.detail.is_open());
        assert!(view.comparison_eligible);
        assert_eq!(view.selected_count, 2);
        assert_eq!(view.trend.len(), 2);
    }

    #[test]
    fn test_compose_empty_view() {
        let session = SearchSession::default();
        let view = compose(&session, &SelectionState::Empty);
        assert_eq!(view.mode, RenderMode::Empty);
        assert_eq!(view.detail, DetailPanel::Hidden);
        assert!(view.trend.is_empty());
        assert!(view.result.is_none());
    }
}
