//! Interactive terminal dashboard.
//!
//! A search bar, the synthesized answer with a publication trend, the
//! sortable evidence matrix with its detail panel, and a full-page
//! comparison view.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;
pub mod worker;

use app::App;
use evidex_core::config::EvidexConfig;
use evidex_core::create_service;
use tracing::info;

/// Run the TUI application.
pub async fn run(config: EvidexConfig, initial_query: Option<String>) -> anyhow::Result<()> {
    let service = create_service(&config.service)?;
    info!(backend = %config.service.backend, service = service.name(), "Starting dashboard");

    // Setup terminal
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::event::EnableMouseCapture
    )?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.clear()?;

    // Run app
    let mut app = App::new(&config, service);
    if let Some(query) = initial_query {
        app.submit_query(&query);
    }
    let result = app.run(&mut terminal).await;

    // Restore terminal
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableMouseCapture,
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}
