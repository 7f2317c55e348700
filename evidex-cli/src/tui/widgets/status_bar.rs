//! Status bar widget showing the focused pane, key hints and the last message.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// What the keyboard currently drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Search,
    Matrix,
    Compare,
}

impl InputMode {
    /// Short display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "SEARCH",
            Self::Matrix => "MATRIX",
            Self::Compare => "COMPARE",
        }
    }

    pub fn hints(&self) -> &'static str {
        match self {
            Self::Search => "[Enter] Search │ [↑↓] Suggestions │ [Tab] Matrix │ [Ctrl+N] New │ [Ctrl+C] Quit",
            Self::Matrix => {
                "[↑↓] Move │ [Enter] Focus │ [Space] Select │ [c] Compare │ [1-5] Sort │ [o] Open │ [/] Search"
            }
            Self::Compare => "[←→] Scroll │ [Space] Deselect │ [Esc] Back │ [Ctrl+C] Quit",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A one-line message shown at the right of the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Render the status bar.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    mode: InputMode,
    message: Option<&StatusMessage>,
    theme: &Theme,
) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode.label()),
            theme
                .status_bar_style()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", theme.status_bar_style()),
    ];

    match message {
        Some(msg) => {
            let style = if msg.is_error {
                theme.error_style().bg(theme.status_bar_bg)
            } else {
                theme.status_bar_style()
            };
            spans.push(Span::styled(msg.text.clone(), style));
        }
        None => spans.push(Span::styled(mode.hints(), theme.status_bar_style())),
    }

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar_style());
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(mode: InputMode, message: Option<&StatusMessage>) -> String {
        let backend = ratatui::backend::TestBackend::new(120, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_status_bar(frame, frame.area(), mode, message, &theme))
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
    fn test_input_mode_labels() {
        assert_eq!(InputMode::Search.label(), "SEARCH");
        assert_eq!(InputMode::Matrix.label(), "MATRIX");
        assert_eq!(format!("{}", InputMode::Compare), "COMPARE");
    }

    #[test]
    fn test_hints_shown_without_message() {
        let line = rendered(InputMode::Matrix, None);
        assert!(line.contains("MATRIX"));
        assert!(line.contains("[c] Compare"));
    }

    #[test]
    fn test_message_replaces_hints() {
        let msg = StatusMessage::error("Search failed: timed out");
        let line = rendered(InputMode::Search, Some(&msg));
        assert!(line.contains("Search failed: timed out"));
        assert!(!line.contains("[Enter] Search"));
    }
}
