//! Terminal event handling using crossterm EventStream.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;

/// High-level actions the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleSidebar,
    /// Empty the search bar and selection and jump to it.
    NewSearch,
    SwitchPane,
    FocusSearch,
    MoveUp,
    MoveDown,
    ScrollLeft,
    ScrollRight,
    /// Focus the study under the cursor.
    FocusStudy,
    ToggleSelect,
    OpenComparison,
    /// Leave the comparison view, or clear the selection.
    Back,
    /// Sort by the 1-based matrix column.
    SortColumn(usize),
    OpenStudyUrl,
}

/// Reads terminal events asynchronously using crossterm's EventStream.
pub struct EventHandler {
    stream: EventStream,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Read the next terminal event. Returns None if the stream ends.
    pub async fn next(&mut self) -> Option<Event> {
        self.stream.next().await.and_then(|r| r.ok())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys that work regardless of which pane has focus.
pub fn map_global_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(Action::NewSearch),
        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => Some(Action::SwitchPane),
        _ => None,
    }
}

/// Keys for the evidence matrix and comparison view.
pub fn map_matrix_key(event: &KeyEvent) -> Option<Action> {
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Left | KeyCode::Char('h') => Some(Action::ScrollLeft),
        KeyCode::Right | KeyCode::Char('l') => Some(Action::ScrollRight),
        KeyCode::Enter => Some(Action::FocusStudy),
        KeyCode::Char(' ') => Some(Action::ToggleSelect),
        KeyCode::Char('c') => Some(Action::OpenComparison),
        KeyCode::Char('o') => Some(Action::OpenStudyUrl),
        KeyCode::Char('/') => Some(Action::FocusSearch),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Char(d @ '1'..='5') => d.to_digit(10).map(|n| Action::SortColumn(n as usize)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::CONTROL)
    }

    #[test]
    fn test_ctrl_c_and_ctrl_d_quit() {
        assert_eq!(map_global_key(&ctrl(KeyCode::Char('c'))), Some(Action::Quit));
        assert_eq!(map_global_key(&ctrl(KeyCode::Char('d'))), Some(Action::Quit));
    }

    #[test]
    fn test_ctrl_b_toggles_sidebar() {
        assert_eq!(
            map_global_key(&ctrl(KeyCode::Char('b'))),
            Some(Action::ToggleSidebar)
        );
    }

    #[test]
    fn test_tab_switches_pane() {
        assert_eq!(map_global_key(&key(KeyCode::Tab)), Some(Action::SwitchPane));
    }

    #[test]
    fn test_regular_key_not_global() {
        assert_eq!(map_global_key(&key(KeyCode::Char('a'))), None);
    }

    #[test]
    fn test_matrix_navigation() {
        assert_eq!(map_matrix_key(&key(KeyCode::Char('j'))), Some(Action::MoveDown));
        assert_eq!(map_matrix_key(&key(KeyCode::Up)), Some(Action::MoveUp));
        assert_eq!(map_matrix_key(&key(KeyCode::Enter)), Some(Action::FocusStudy));
        assert_eq!(
            map_matrix_key(&key(KeyCode::Char(' '))),
            Some(Action::ToggleSelect)
        );
        assert_eq!(map_matrix_key(&key(KeyCode::Esc)), Some(Action::Back));
    }

    #[test]
    fn test_digit_sorts_column() {
        assert_eq!(
            map_matrix_key(&key(KeyCode::Char('1'))),
            Some(Action::SortColumn(1))
        );
        assert_eq!(
            map_matrix_key(&key(KeyCode::Char('5'))),
            Some(Action::SortColumn(5))
        );
        assert_eq!(map_matrix_key(&key(KeyCode::Char('6'))), None);
    }

    #[test]
    fn test_matrix_ignores_ctrl_chords() {
        assert_eq!(map_matrix_key(&ctrl(KeyCode::Char('c'))), None);
    }
}
