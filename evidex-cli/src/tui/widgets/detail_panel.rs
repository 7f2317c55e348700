//! Detail panel for the focused study or the current multi-selection.

use crate::tui::theme::Theme;
use evidex_core::{DetailPanel, Study};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Labelled fields of one study, as shown in the detail panel and the
/// comparison columns.
pub fn study_lines<'a>(study: &'a Study, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(study.title.as_str(), theme.heading_style())),
        Line::from(vec![
            Span::styled(study.grade.label(), theme.grade_style(study.grade)),
            Span::styled(
                format!(" · {} · {}", study.study_type, study.year),
                theme.muted_style(),
            ),
        ]),
        Line::from(""),
    ];

    let fields: [(&str, String); 6] = [
        ("Authors", study.authors.clone()),
        ("Journal", study.journal.clone()),
        (
            "Sample",
            if study.sample_size > 0 {
                study.sample_size.to_string()
            } else {
                String::new()
            },
        ),
        ("Population", study.population.clone()),
        ("Intervention", study.intervention.clone()),
        ("Outcome", study.outcome.clone()),
    ];
    for (label, value) in fields {
        if value.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::styled(format!("{label}: "), theme.label_style()),
            Span::styled(value, theme.base_style()),
        ]));
    }
    lines.push(Line::from(vec![
        Span::styled("Risk of bias: ", theme.label_style()),
        Span::styled(study.risk_of_bias.to_string(), theme.risk_style(study.risk_of_bias)),
    ]));

    if !study.abstract_snippet.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            study.abstract_snippet.as_str(),
            theme.muted_style(),
        )));
    }
    if !study.pubmed_id.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("PMID {}", study.pubmed_id),
            theme.muted_style(),
        )));
    }
    lines
}

/// Render the detail panel. Draws nothing when the panel is hidden.
pub fn render_detail_panel(frame: &mut Frame, area: Rect, panel: &DetailPanel<'_>, theme: &Theme) {
    let (title, lines) = match panel {
        DetailPanel::Hidden => return,
        DetailPanel::Study(study) => {
            let mut lines = study_lines(study, theme);
            if !study.url.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "[o] Open in browser",
                    theme.muted_style(),
                )));
            }
            (" Study ".to_string(), lines)
        }
        DetailPanel::Selection(studies) => {
            let mut lines: Vec<Line> = studies
                .iter()
                .map(|s| {
                    Line::from(vec![
                        Span::styled("✓ ", theme.label_style()),
                        Span::styled(s.title.as_str(), theme.base_style()),
                        Span::styled(format!(" ({})", s.year), theme.muted_style()),
                    ])
                })
                .collect();
            lines.push(Line::from(""));
            let hint = if studies.len() >= 2 {
                Span::styled("[c] Compare side by side", theme.success_style())
            } else {
                Span::styled("Select another study to compare", theme.muted_style())
            };
            lines.push(Line::from(hint));
            (format!(" {} selected ", studies.len()), lines)
        }
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
