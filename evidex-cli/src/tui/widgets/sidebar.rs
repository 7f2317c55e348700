//! Sidebar listing recent searches.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

/// Render the recent-search list, newest first.
pub fn render_sidebar(frame: &mut Frame, area: Rect, history: &[&str], theme: &Theme) {
    let block = Block::default()
        .title(" Recent searches ")
        .borders(Borders::RIGHT)
        .border_style(theme.border_style(false))
        .style(theme.sidebar_style());

    if history.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            " Nothing yet",
            theme.sidebar_style(),
        )))
        .wrap(Wrap { trim: false })
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = history
        .iter()
        .enumerate()
        .map(|(i, query)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", i + 1), theme.sidebar_style()),
                Span::styled(*query, theme.sidebar_style()),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(history: &[&str]) -> String {
        let backend = ratatui::backend::TestBackend::new(36, 8);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_sidebar(frame, frame.area(), history, &theme))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_sidebar_lists_history() {
        let text = render(&["statins", "metformin"]);
        assert!(text.contains("1 statins"));
        assert!(text.contains("2 metformin"));
    }

    #[test]
    fn test_sidebar_empty() {
        assert!(render(&[]).contains("Nothing yet"));
    }
}
