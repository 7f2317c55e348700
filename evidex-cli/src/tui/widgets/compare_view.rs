//! Full-page side-by-side comparison of the selected studies.

use crate::tui::theme::Theme;
use crate::tui::widgets::detail_panel::study_lines;
use evidex_core::Study;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Narrowest a comparison column is allowed to get.
pub const MIN_COLUMN_WIDTH: u16 = 32;

/// How many columns fit side by side in `width`.
pub fn visible_columns(width: u16, total: usize) -> usize {
    let fit = usize::from((width / MIN_COLUMN_WIDTH).max(1));
    fit.min(total.max(1))
}

/// Largest useful horizontal scroll offset.
pub fn max_scroll(width: u16, total: usize) -> usize {
    total.saturating_sub(visible_columns(width, total))
}

fn study_count(count: usize) -> String {
    match count {
        1 => "1 study".to_string(),
        n => format!("{n} studies"),
    }
}

/// Render the comparison, starting at column `scroll`.
pub fn render_compare_view(
    frame: &mut Frame,
    area: Rect,
    studies: &[&Study],
    scroll: usize,
    theme: &Theme,
) {
    let outer = Block::default()
        .title(format!(" Comparing {} · [Esc] back ", study_count(studies.len())))
        .borders(Borders::ALL)
        .border_style(theme.border_style(true));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    if studies.is_empty() {
        return;
    }
    let count = visible_columns(inner.width, studies.len());
    let start = scroll.min(max_scroll(inner.width, studies.len()));
    let columns = Layout::horizontal(vec![Constraint::Fill(1); count]).split(inner);

    for (column, study) in columns.iter().zip(&studies[start..]) {
        let block = Block::default()
            .title(format!(" {} ", study.id))
            .borders(Borders::ALL)
            .border_style(theme.border_style(false));
        let paragraph = Paragraph::new(study_lines(study, theme))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evidex_core::{EvidenceGrade, StudyType};

    #[test]
    fn test_visible_columns() {
        assert_eq!(visible_columns(100, 5), 3);
        assert_eq!(visible_columns(100, 2), 2);
        assert_eq!(visible_columns(10, 4), 1);
    }

    #[test]
    fn test_max_scroll() {
        assert_eq!(max_scroll(100, 5), 2);
        assert_eq!(max_scroll(100, 2), 0);
    }

    #[test]
    fn test_study_count_agrees_with_number() {
        assert_eq!(study_count(1), "1 study");
        assert_eq!(study_count(3), "3 studies");
    }

    #[test]
    fn test_render_compare_view_scrolled() {
        let owned: Vec<Study> = (1..=4)
            .map(|i| {
                Study::new(
                    format!("s{i}"),
                    format!("Study number {i}"),
                    2018 + i,
                    StudyType::Rct,
                    EvidenceGrade::Strong,
                )
            })
            .collect();
        let refs: Vec<&Study> = owned.iter().collect();
        let backend = ratatui::backend::TestBackend::new(68, 12);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_compare_view(frame, frame.area(), &refs, 1, &theme))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Comparing 4 studies"));
        assert!(!text.contains("Study number 1"));
        assert!(text.contains("Study number 2"));
        assert!(text.contains("Study number 3"));
    }
}
