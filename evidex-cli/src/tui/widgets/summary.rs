//! Synthesized answer panel: summary, takeaways, outcomes and caveats.

use crate::tui::theme::Theme;
use evidex_core::SearchResult;
use evidex_core::view::ResolvedOutcome;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Build the panel's lines. Sections with no content are left out.
pub fn summary_lines<'a>(
    result: &'a SearchResult,
    outcomes: &[ResolvedOutcome<'a>],
    theme: &Theme,
) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if !result.summary.is_empty() {
        lines.push(Line::from(Span::styled(
            result.summary.as_str(),
            theme.base_style(),
        )));
    }

    push_bullets(&mut lines, "Key takeaways", &result.key_takeaways, theme);

    if !outcomes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Outcomes", theme.heading_style())));
        for outcome in outcomes {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}", outcome.group.category), theme.label_style()),
                Span::styled(
                    format!(" ({} studies)", outcome.studies.len()),
                    theme.muted_style(),
                ),
            ]));
            if !outcome.group.summary.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("    {}", outcome.group.summary),
                    theme.base_style(),
                )));
            }
        }
    }

    push_bullets(&mut lines, "Limitations", &result.limitations, theme);
    push_bullets(&mut lines, "Recommendations", &result.recommendations, theme);
    lines
}

fn push_bullets<'a>(lines: &mut Vec<Line<'a>>, title: &'a str, items: &'a [String], theme: &Theme) {
    if items.is_empty() {
        return;
    }
    if !lines.is_empty() {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(title, theme.heading_style())));
    for item in items {
        lines.push(Line::from(vec![
            Span::styled("  • ", theme.label_style()),
            Span::styled(item.as_str(), theme.base_style()),
        ]));
    }
}

/// Render the answer panel, scrolled down by `scroll` lines.
pub fn render_summary(
    frame: &mut Frame,
    area: Rect,
    result: &SearchResult,
    outcomes: &[ResolvedOutcome<'_>],
    scroll: u16,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Answer ")
        .borders(Borders::ALL)
        .border_style(theme.border_style(false));
    let paragraph = Paragraph::new(summary_lines(result, outcomes, theme))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
