//! Header bar widget showing the service, the current query and the sort order.

use crate::tui::theme::Theme;
use evidex_core::SortSpec;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data needed to render the header bar.
#[derive(Debug, Clone)]
pub struct HeaderData {
    pub service: String,
    pub query: Option<String>,
    pub study_count: usize,
    pub sort: SortSpec,
    pub is_loading: bool,
}

impl HeaderData {
    /// Sort order as shown in the header, e.g. `Year ↓`.
    pub fn sort_display(&self) -> String {
        format!("{} {}", self.sort.key.header(), self.sort.direction.arrow())
    }
}

/// Render the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let indicator = if data.is_loading { "⟳" } else { "●" };

    let mut spans = vec![
        Span::styled(
            format!(" {indicator} Evidex"),
            theme.header_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled(" │ ", theme.header_style()),
        Span::styled(data.service.clone(), theme.header_style()),
    ];

    if let Some(query) = &data.query {
        spans.push(Span::styled(" │ ", theme.header_style()));
        spans.push(Span::styled(
            format!("\"{query}\""),
            theme.header_style().add_modifier(Modifier::ITALIC),
        ));
        spans.push(Span::styled(
            format!(" │ {} studies │ {}", data.study_count, data.sort_display()),
            theme.header_style(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}
