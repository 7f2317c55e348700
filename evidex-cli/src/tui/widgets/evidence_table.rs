//! Sortable evidence matrix.

use crate::tui::theme::Theme;
use evidex_core::{SelectionState, SortKey, SortSpec, Study};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};

/// Data for one frame of the matrix.
pub struct EvidenceTableData<'a> {
    pub studies: &'a [&'a Study],
    pub sort: SortSpec,
    pub selection: &'a SelectionState,
    pub cursor: usize,
    pub focused: bool,
}

/// Column header text, with the sort arrow on the active column.
pub fn header_label(key: SortKey, sort: SortSpec) -> String {
    if key == sort.key {
        format!("{} {}", key.header(), sort.direction.arrow())
    } else {
        key.header().to_string()
    }
}

/// Marker column: `●` for the focused study, `✓` for multi-selected ones.
pub fn marker(selection: &SelectionState, study: &Study) -> &'static str {
    if selection.is_focused(&study.id) {
        "●"
    } else if selection.is_selected(&study.id) {
        "✓"
    } else {
        " "
    }
}

pub fn render_evidence_table(
    frame: &mut Frame,
    area: Rect,
    data: &EvidenceTableData<'_>,
    theme: &Theme,
) {
    let header_cells = std::iter::once(Cell::from(" ")).chain(SortKey::ALL.iter().enumerate().map(
        |(i, key)| {
            let style = if *key == data.sort.key {
                theme.label_style()
            } else {
                theme.heading_style()
            };
            Cell::from(Span::styled(
                format!("{} {}", i + 1, header_label(*key, data.sort)),
                style,
            ))
        },
    ));
    let header = Row::new(header_cells).height(1);

    let rows = data.studies.iter().map(|study| {
        let selected = data.selection.is_selected(&study.id);
        let row_style = if selected {
            theme.base_style().add_modifier(Modifier::BOLD)
        } else {
            theme.base_style()
        };
        Row::new(vec![
            Cell::from(Span::styled(marker(data.selection, study), theme.label_style())),
            Cell::from(study.year.to_string()),
            Cell::from(study.study_type.label()),
            Cell::from(study.population.as_str()),
            Cell::from(study.outcome.as_str()),
            Cell::from(Line::from(Span::styled(
                study.grade.label(),
                theme.grade_style(study.grade),
            ))),
        ])
        .style(row_style)
    });

    let widths = [
        Constraint::Length(1),
        Constraint::Length(9),
        Constraint::Length(20),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Length(14),
    ];

    let title = format!(" Evidence matrix ({} studies) ", data.studies.len());
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(theme.border_style(data.focused)),
        )
        .style(theme.base_style())
        .row_highlight_style(theme.selection_style())
        .column_spacing(1);

    let cursor = (!data.studies.is_empty()).then(|| data.cursor.min(data.studies.len() - 1));
    let mut state = TableState::default().with_selected(cursor);
    frame.render_stateful_widget(table, area, &mut state);
}
