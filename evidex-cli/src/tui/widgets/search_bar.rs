//! Search bar widget wrapping tui-textarea as a single-line query input.

use crate::tui::theme::Theme;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use tui_textarea::{CursorMove, TextArea};

/// Result of processing a key in the search bar.
#[derive(Debug, PartialEq)]
pub enum SearchBarAction {
    /// Enter was pressed on a non-blank query.
    Submit(String),
    /// The text changed; carries the new text.
    Changed(String),
    Up,
    Down,
    Escape,
    /// Input was consumed by the textarea without changing the text.
    Consumed,
}

pub struct SearchBar {
    textarea: TextArea<'static>,
    history_index: Option<usize>,
    draft: Option<String>,
}

impl SearchBar {
    pub fn new(theme: &Theme) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_placeholder_text("Ask a clinical question, e.g. metformin and longevity");
        textarea.set_placeholder_style(theme.muted_style());
        let mut bar = Self {
            textarea,
            history_index: None,
            draft: None,
        };
        bar.apply_theme(theme, true);
        bar
    }

    /// Restyle for the current theme and focus.
    pub fn apply_theme(&mut self, theme: &Theme, focused: bool) {
        self.textarea.set_style(Style::default().fg(theme.fg).bg(theme.bg));
        self.textarea.set_block(
            Block::default()
                .title(" Search ")
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused)),
        );
        if focused {
            self.textarea.set_cursor_style(theme.selection_style());
        } else {
            self.textarea.set_cursor_style(Style::default());
        }
    }

    pub fn text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.textarea.lines().iter().all(|l| l.is_empty())
    }

    /// Clear the input and reset history navigation.
    pub fn clear(&mut self) {
        self.clear_textarea();
        self.history_index = None;
        self.draft = None;
    }

    fn clear_textarea(&mut self) {
        self.textarea.select_all();
        self.textarea.cut();
    }

    /// Replace the text, leaving the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.clear_textarea();
        self.textarea.insert_str(text);
        self.textarea.move_cursor(CursorMove::End);
    }

    pub fn handle_event(&mut self, event: &Event) -> SearchBarAction {
        let Event::Key(key) = event else {
            return SearchBarAction::Consumed;
        };
        match key {
            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => {
                let text = self.text();
                if text.trim().is_empty() {
                    return SearchBarAction::Consumed;
                }
                self.history_index = None;
                self.draft = None;
                SearchBarAction::Submit(text)
            }
            KeyEvent {
                code: KeyCode::Up,
                modifiers: KeyModifiers::NONE,
                ..
            } => SearchBarAction::Up,
            KeyEvent {
                code: KeyCode::Down,
                modifiers: KeyModifiers::NONE,
                ..
            } => SearchBarAction::Down,
            KeyEvent {
                code: KeyCode::Esc, ..
            } => SearchBarAction::Escape,
            _ => {
                let before = self.text();
                self.textarea.input(event.clone());
                let after = self.text();
                if after != before {
                    self.history_index = None;
                    SearchBarAction::Changed(after)
                } else {
                    SearchBarAction::Consumed
                }
            }
        }
    }

    /// Step to an older query from `history` (newest first). Returns the
    /// recalled text, or None when already at the oldest entry.
    pub fn history_prev(&mut self, history: &[&str]) -> Option<String> {
        if history.is_empty() {
            return None;
        }
        let next = match self.history_index {
            None => {
                self.draft = Some(self.text());
                0
            }
            Some(i) if i + 1 < history.len() => i + 1,
            Some(_) => return None,
        };
        self.history_index = Some(next);
        self.set_text(history[next]);
        Some(history[next].to_string())
    }

    /// Step to a newer query, restoring the draft past the newest one.
    pub fn history_next(&mut self, history: &[&str]) -> Option<String> {
        match self.history_index {
            None => None,
            Some(0) => {
                self.history_index = None;
                let draft = self.draft.take().unwrap_or_default();
                self.set_text(&draft);
                Some(draft)
            }
            Some(i) => {
                let prev = (i - 1).min(history.len().saturating_sub(1));
                self.history_index = Some(prev);
                let text = history.get(prev).copied().unwrap_or_default();
                self.set_text(text);
                Some(text.to_string())
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar() -> SearchBar {
        SearchBar::new(&Theme::dark())
    }

    fn key_event(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(bar: &mut SearchBar, text: &str) -> SearchBarAction {
        let mut last = SearchBarAction::Consumed;
        for c in text.chars() {
            last = bar.handle_event(&key_event(KeyCode::Char(c)));
        }
        last
    }

    #[test]
    fn test_new_bar_is_empty() {
        let bar = make_bar();
        assert!(bar.is_empty());
        assert_eq!(bar.text(), "");
    }

    #[test]
    fn test_typing_reports_changes() {
        let mut bar = make_bar();
        assert_eq!(
            type_str(&mut bar, "statins"),
            SearchBarAction::Changed("statins".into())
        );
    }

    #[test]
    fn test_enter_submits_and_keeps_text() {
        let mut bar = make_bar();
        type_str(&mut bar, "aspirin");
        assert_eq!(
            bar.handle_event(&key_event(KeyCode::Enter)),
            SearchBarAction::Submit("aspirin".into())
        );
        assert_eq!(bar.text(), "aspirin");
    }

    #[test]
    fn test_enter_on_blank_is_consumed() {
        let mut bar = make_bar();
        type_str(&mut bar, "   ");
        assert_eq!(
            bar.handle_event(&key_event(KeyCode::Enter)),
            SearchBarAction::Consumed
        );
    }

    #[test]
    fn test_arrows_and_escape_are_passed_up() {
        let mut bar = make_bar();
        assert_eq!(bar.handle_event(&key_event(KeyCode::Up)), SearchBarAction::Up);
        assert_eq!(
            bar.handle_event(&key_event(KeyCode::Down)),
            SearchBarAction::Down
        );
        assert_eq!(
            bar.handle_event(&key_event(KeyCode::Esc)),
            SearchBarAction::Escape
        );
    }

    #[test]
    fn test_history_navigation_restores_draft() {
        let mut bar = make_bar();
        type_str(&mut bar, "draft");
        let history = ["newest", "older"];

        assert_eq!(bar.history_prev(&history).as_deref(), Some("newest"));
        assert_eq!(bar.history_prev(&history).as_deref(), Some("older"));
        assert_eq!(bar.history_prev(&history), None);
        assert_eq!(bar.text(), "older");

        assert_eq!(bar.history_next(&history).as_deref(), Some("newest"));
        assert_eq!(bar.history_next(&history).as_deref(), Some("draft"));
        assert_eq!(bar.history_next(&history), None);
        assert_eq!(bar.text(), "draft");
    }

    #[test]
    fn test_history_prev_with_empty_history() {
        let mut bar = make_bar();
        assert_eq!(bar.history_prev(&[]), None);
    }

    #[test]
    fn test_set_text_and_clear() {
        let mut bar = make_bar();
        bar.set_text("GLP-1 agonists side effects");
        assert_eq!(bar.text(), "GLP-1 agonists side effects");
        bar.clear();
        assert!(bar.is_empty());
    }
}
