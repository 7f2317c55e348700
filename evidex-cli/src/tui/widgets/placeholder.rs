//! Full-screen placeholders for the empty and loading states.

use crate::tui::theme::Theme;
use crate::tui::widgets::spinner_frame;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Queries offered on the empty screen.
pub const EXAMPLE_QUERIES: [&str; 3] = [
    "Effect of metformin on longevity",
    "GLP-1 agonists side effects",
    "Statins for primary prevention in older adults",
];

/// Render the welcome screen shown before the first search.
pub fn render_empty(frame: &mut Frame, area: Rect, theme: &Theme) {
    let mut lines = vec![
        Line::from(Span::styled("Evidence-first medical search", theme.heading_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Type a clinical question and press Enter. Results are synthesized from the literature and laid out as an evidence matrix you can sort, inspect and compare.",
            theme.base_style(),
        )),
        Line::from(""),
        Line::from(Span::styled("Try:", theme.label_style())),
    ];
    lines.extend(
        EXAMPLE_QUERIES
            .iter()
            .map(|q| Line::from(Span::styled(format!("  {q}"), theme.muted_style()))),
    );

    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(lines.len() as u16 + 4),
        Constraint::Fill(1),
    ])
    .areas(area);

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::NONE));
    frame.render_widget(welcome, middle);
}

/// Render the loading screen for an in-flight search.
pub fn render_loading(frame: &mut Frame, area: Rect, query: &str, tick: usize, theme: &Theme) {
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    let lines = vec![
        Line::from(vec![
            Span::styled(spinner_frame(tick), theme.label_style()),
            Span::styled(" Synthesizing evidence", theme.heading_style()),
        ]),
        Line::from(""),
        Line::from(Span::styled(format!("\"{query}\""), theme.muted_style())),
    ];
    let loading = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(loading, middle);
}
