//! Suggestion dropdown rendered under the search bar.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

/// Most suggestions shown at once.
pub const MAX_VISIBLE: usize = 6;

/// Area of the dropdown directly below `anchor`, clipped to `bounds`.
pub fn popup_area(anchor: Rect, bounds: Rect, count: usize) -> Rect {
    let height = (count.min(MAX_VISIBLE) as u16).saturating_add(2);
    let y = anchor.y.saturating_add(anchor.height);
    let available = bounds.y.saturating_add(bounds.height).saturating_sub(y);
    Rect {
        x: anchor.x,
        y,
        width: anchor.width,
        height: height.min(available),
    }
}

/// Render the suggestion list. Nothing is drawn when `suggestions` is empty.
pub fn render_suggestions(
    frame: &mut Frame,
    anchor: Rect,
    suggestions: &[String],
    cursor: Option<usize>,
    theme: &Theme,
) {
    if suggestions.is_empty() {
        return;
    }
    let area = popup_area(anchor, frame.area(), suggestions.len());
    if area.height < 3 {
        return;
    }

    let items: Vec<ListItem> = suggestions
        .iter()
        .map(|s| ListItem::new(Line::from(format!(" {s}"))))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .title(" Suggestions ")
                .borders(Borders::ALL)
                .border_style(theme.border_style(true)),
        )
        .style(theme.popup_style())
        .highlight_style(theme.selection_style())
        .highlight_symbol("▸");

    let mut state = ListState::default().with_selected(cursor);
    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}
