//! TUI widget modules.

pub mod compare_view;
pub mod detail_panel;
pub mod evidence_table;
pub mod header;
pub mod placeholder;
pub mod search_bar;
pub mod sidebar;
pub mod status_bar;
pub mod suggestions;
pub mod summary;
pub mod trend_chart;

/// Frames of the braille spinner shown while a search is in flight.
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner frame for a tick counter.
pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}
