//! Main TUI application state and event loop.

use crate::tui::event::{Action, EventHandler, map_global_key, map_matrix_key};
use crate::tui::theme::Theme;
use crate::tui::widgets::compare_view::{self, render_compare_view};
use crate::tui::widgets::detail_panel::render_detail_panel;
use crate::tui::widgets::evidence_table::{EvidenceTableData, render_evidence_table};
use crate::tui::widgets::header::{HeaderData, render_header};
use crate::tui::widgets::placeholder::{render_empty, render_loading};
use crate::tui::widgets::search_bar::{SearchBar, SearchBarAction};
use crate::tui::widgets::sidebar::render_sidebar;
use crate::tui::widgets::status_bar::{InputMode, StatusMessage, render_status_bar};
use crate::tui::widgets::suggestions::render_suggestions;
use crate::tui::widgets::summary::render_summary;
use crate::tui::widgets::trend_chart::render_trend_chart;
use crate::tui::worker::{ServiceEvent, ServiceWorker};
use crossterm::event::{Event, KeyEvent, KeyEventKind, MouseEventKind};
use evidex_core::config::EvidexConfig;
use evidex_core::{
    Dashboard, EvidenceService, RenderMode, SearchCompletion, SortKey, StudyId,
};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Block;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Which pane receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    SearchBar,
    Matrix,
}

/// Width of the sidebar when visible.
const SIDEBAR_WIDTH: u16 = 30;
/// Width of the detail panel when open.
const DETAIL_WIDTH: u16 = 48;
/// Width of the trend chart next to the answer panel.
const TREND_WIDTH: u16 = 42;

pub struct App {
    dashboard: Dashboard,
    search_bar: SearchBar,
    theme: Theme,
    pane: Pane,
    show_sidebar: bool,
    table_cursor: usize,
    suggestion_cursor: Option<usize>,
    compare_scroll: usize,
    /// Width of the last drawn comparison area, for clamping the scroll.
    compare_width: u16,
    summary_scroll: u16,
    status: Option<StatusMessage>,
    should_quit: bool,
    spinner: usize,
    tick_rate: Duration,
    worker: ServiceWorker,
    rx: mpsc::UnboundedReceiver<ServiceEvent>,
}

impl App {
    pub fn new(config: &EvidexConfig, service: Arc<dyn EvidenceService>) -> Self {
        let theme = Theme::from_name(&config.ui.theme);
        let search_bar = SearchBar::new(&theme);
        let (worker, rx) = ServiceWorker::new(service);
        Self {
            dashboard: Dashboard::new(config.session.clone()),
            search_bar,
            theme,
            pane: Pane::SearchBar,
            show_sidebar: config.ui.show_sidebar,
            table_cursor: 0,
            suggestion_cursor: None,
            compare_scroll: 0,
            compare_width: 0,
            summary_scroll: 0,
            status: None,
            should_quit: false,
            spinner: 0,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            worker,
            rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<impl ratatui::backend::Backend>,
    ) -> anyhow::Result<()> {
        let mut event_handler = EventHandler::new();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            if self.should_quit {
                break;
            }

            tokio::select! {
                event = event_handler.next() => {
                    match event {
                        Some(event) => self.handle_terminal_event(event),
                        None => break,
                    }
                }
                event = self.rx.recv() => {
                    if let Some(event) = event {
                        self.handle_service_event(event);
                    }
                }
                _ = tokio::time::sleep(self.tick_rate) => {
                    self.on_tick();
                }
            }
        }

        Ok(())
    }

    // --- Accessors ---

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn pane(&self) -> Pane {
        self.pane
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn table_cursor(&self) -> usize {
        self.table_cursor
    }

    fn input_mode(&self) -> InputMode {
        if self.dashboard.view().mode == RenderMode::FullPageCompare {
            InputMode::Compare
        } else {
            match self.pane {
                Pane::SearchBar => InputMode::Search,
                Pane::Matrix => InputMode::Matrix,
            }
        }
    }

    // --- Searching ---

    /// Start a search for `query` on a background task.
    pub fn submit_query(&mut self, query: &str) {
        self.search_bar.set_text(query);
        if let Some(ticket) = self.dashboard.begin_search(query) {
            self.suggestion_cursor = None;
            self.status = None;
            self.set_pane(Pane::SearchBar);
            self.worker.spawn_search(ticket);
        }
    }

    fn choose_suggestion(&mut self, index: usize) {
        let Some(text) = self.dashboard.session().suggestions().get(index).cloned() else {
            return;
        };
        if let Some(ticket) = self.dashboard.choose_suggestion(index) {
            self.search_bar.set_text(&text);
            self.suggestion_cursor = None;
            self.status = None;
            self.set_pane(Pane::SearchBar);
            self.worker.spawn_search(ticket);
        }
    }

    fn query_changed(&mut self, text: &str) {
        self.suggestion_cursor = None;
        if let Some(ticket) = self.dashboard.update_query_text(text) {
            self.worker.spawn_suggest(ticket);
        }
    }

    fn new_search(&mut self) {
        self.dashboard.reset();
        self.search_bar.clear();
        self.suggestion_cursor = None;
        self.status = None;
        self.set_pane(Pane::SearchBar);
    }

    pub fn handle_service_event(&mut self, event: ServiceEvent) {
        match event {
            ServiceEvent::SearchFinished { ticket, outcome } => {
                match self.dashboard.finish_search(&ticket, outcome) {
                    SearchCompletion::Replaced => {
                        let count = self.dashboard.result().map_or(0, |r| r.evidence_matrix.len());
                        self.table_cursor = 0;
                        self.compare_scroll = 0;
                        self.summary_scroll = 0;
                        self.status = Some(StatusMessage::info(format!(
                            "{count} studies for \"{}\"",
                            ticket.query()
                        )));
                        self.set_pane(Pane::Matrix);
                    }
                    SearchCompletion::Failed(failure) => {
                        self.status = Some(StatusMessage::error(format!("Search failed: {failure}")));
                    }
                    SearchCompletion::Discarded => {}
                }
            }
            ServiceEvent::SuggestFinished { ticket, outcome } => {
                if self.dashboard.finish_suggest(&ticket, outcome) {
                    self.suggestion_cursor = None;
                }
            }
        }
    }

    fn on_tick(&mut self) {
        if self.dashboard.session().is_loading() {
            self.spinner = self.spinner.wrapping_add(1);
        }
    }

    // --- Input handling ---

    pub fn handle_terminal_event(&mut self, event: Event) {
        match &event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key, &event),
            Event::Mouse(mouse) if self.pane == Pane::Matrix => match mouse.kind {
                MouseEventKind::ScrollDown => self.apply_action(Action::MoveDown),
                MouseEventKind::ScrollUp => self.apply_action(Action::MoveUp),
                _ => {}
            },
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, event: &Event) {
        if let Some(action) = map_global_key(&key) {
            self.apply_action(action);
            return;
        }

        let comparing = self.dashboard.view().mode == RenderMode::FullPageCompare;
        if self.pane == Pane::SearchBar && !comparing {
            let action = self.search_bar.handle_event(event);
            self.handle_search_bar_action(action);
        } else if let Some(action) = map_matrix_key(&key) {
            self.apply_action(action);
        }
    }

    fn handle_search_bar_action(&mut self, action: SearchBarAction) {
        let suggestion_count = self.dashboard.session().suggestions().len();
        match action {
            SearchBarAction::Submit(text) => match self.suggestion_cursor {
                Some(index) if index < suggestion_count => self.choose_suggestion(index),
                _ => self.submit_query(&text),
            },
            SearchBarAction::Changed(text) => self.query_changed(&text),
            SearchBarAction::Up if suggestion_count > 0 => {
                self.suggestion_cursor = match self.suggestion_cursor {
                    None | Some(0) => None,
                    Some(i) => Some(i - 1),
                };
            }
            SearchBarAction::Down if suggestion_count > 0 => {
                self.suggestion_cursor = Some(match self.suggestion_cursor {
                    None => 0,
                    Some(i) => (i + 1).min(suggestion_count - 1),
                });
            }
            SearchBarAction::Up => {
                let history: Vec<&str> = self.dashboard.session().history().collect();
                if let Some(text) = self.search_bar.history_prev(&history) {
                    // Recalled queries do not trigger suggestion lookups.
                    let _ = self.dashboard.update_query_text(&text);
                }
            }
            SearchBarAction::Down => {
                let history: Vec<&str> = self.dashboard.session().history().collect();
                if let Some(text) = self.search_bar.history_next(&history) {
                    let _ = self.dashboard.update_query_text(&text);
                }
            }
            SearchBarAction::Escape => {
                if suggestion_count > 0 {
                    self.dashboard.dismiss_suggestions();
                    self.suggestion_cursor = None;
                } else if self.matrix_visible() {
                    self.set_pane(Pane::Matrix);
                }
            }
            SearchBarAction::Consumed => {}
        }
    }

    /// Whether the evidence matrix or the comparison is on screen.
    fn matrix_visible(&self) -> bool {
        matches!(
            self.dashboard.view().mode,
            RenderMode::Results | RenderMode::FullPageCompare
        )
    }

    pub fn apply_action(&mut self, action: Action) {
        let comparing = self.dashboard.view().mode == RenderMode::FullPageCompare;
        let acts_on_matrix = !matches!(
            action,
            Action::Quit
                | Action::ToggleSidebar
                | Action::NewSearch
                | Action::SwitchPane
                | Action::FocusSearch
        );
        if acts_on_matrix && !self.matrix_visible() {
            return;
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::ToggleSidebar => self.show_sidebar = !self.show_sidebar,
            Action::NewSearch => self.new_search(),
            Action::SwitchPane => {
                let next = match self.pane {
                    Pane::SearchBar if self.matrix_visible() => Pane::Matrix,
                    _ => Pane::SearchBar,
                };
                self.set_pane(next);
            }
            Action::FocusSearch => self.set_pane(Pane::SearchBar),
            Action::MoveUp if !comparing => {
                self.table_cursor = self.table_cursor.saturating_sub(1);
            }
            Action::MoveDown if !comparing => {
                let len = self.dashboard.sorted_studies().len();
                if self.table_cursor + 1 < len {
                    self.table_cursor += 1;
                }
            }
            Action::MoveUp | Action::MoveDown => {}
            Action::ScrollLeft if comparing => {
                self.compare_scroll = self.compare_scroll.saturating_sub(1);
            }
            Action::ScrollRight if comparing => {
                let total = self.dashboard.selection().multi_selected_ids().len();
                let max = compare_view::max_scroll(self.compare_width, total);
                self.compare_scroll = (self.compare_scroll + 1).min(max);
            }
            Action::ScrollLeft => {
                self.summary_scroll = self.summary_scroll.saturating_sub(1);
            }
            Action::ScrollRight => {
                self.summary_scroll = self.summary_scroll.saturating_add(1);
            }
            Action::FocusStudy if !comparing => {
                if let Some(id) = self.cursor_study_id() {
                    self.dashboard.focus(&id);
                }
            }
            Action::FocusStudy => {}
            Action::ToggleSelect => {
                let target = if comparing {
                    self.dashboard
                        .selection()
                        .multi_selected_ids()
                        .get(self.compare_scroll)
                        .cloned()
                } else {
                    self.cursor_study_id()
                };
                if let Some(id) = target {
                    self.dashboard.toggle_multi_select(&id);
                    let total = self.dashboard.selection().multi_selected_ids().len();
                    self.compare_scroll = self
                        .compare_scroll
                        .min(compare_view::max_scroll(self.compare_width, total));
                }
            }
            Action::OpenComparison => {
                if self.dashboard.promote_to_full_page() {
                    self.compare_scroll = 0;
                    self.status = None;
                } else if !comparing {
                    self.status = Some(StatusMessage::info(
                        "Select at least two studies to compare",
                    ));
                }
            }
            Action::Back => {
                if comparing {
                    self.dashboard.exit_full_page();
                } else if self.dashboard.selection().is_empty() {
                    self.set_pane(Pane::SearchBar);
                } else {
                    self.dashboard.clear_selection();
                }
            }
            Action::SortColumn(column) => {
                if let Some(key) = SortKey::from_column(column) {
                    self.sort_keeping_cursor(key);
                }
            }
            Action::OpenStudyUrl => self.open_study_url(),
        }
    }

    fn set_pane(&mut self, pane: Pane) {
        self.pane = pane;
        self.search_bar
            .apply_theme(&self.theme, pane == Pane::SearchBar);
        if pane != Pane::SearchBar {
            self.dashboard.dismiss_suggestions();
            self.suggestion_cursor = None;
        }
    }

    fn cursor_study_id(&self) -> Option<StudyId> {
        self.dashboard
            .sorted_studies()
            .get(self.table_cursor)
            .map(|s| s.id.clone())
    }

    fn sort_keeping_cursor(&mut self, key: SortKey) {
        let current = self.cursor_study_id();
        self.dashboard.sort_by(key);
        if let Some(id) = current {
            self.table_cursor = self
                .dashboard
                .sorted_studies()
                .iter()
                .position(|s| s.id == id)
                .unwrap_or(0);
        }
    }

    /// Link of the focused study, or of the study under the cursor.
    fn study_url(&self) -> Option<String> {
        let id = self
            .dashboard
            .selection()
            .effective_focused_id()
            .cloned()
            .or_else(|| self.cursor_study_id())?;
        self.dashboard
            .result()?
            .study(&id)
            .map(|s| s.url.clone())
            .filter(|url| !url.is_empty())
    }

    fn open_study_url(&mut self) {
        let Some(url) = self.study_url() else {
            self.status = Some(StatusMessage::info("No link for this study"));
            return;
        };
        debug!(url = %url, "Opening study link");
        if let Err(e) = open::that(&url) {
            warn!(error = %e, "Failed to open browser");
            self.status = Some(StatusMessage::error(format!("Could not open {url}: {e}")));
        }
    }

    // --- Drawing ---

    fn draw(&mut self, frame: &mut Frame) {
        frame.render_widget(Block::default().style(self.theme.base_style()), frame.area());

        let [header_area, search_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let view = self.dashboard.view();
        let header = HeaderData {
            service: self.worker.service_name().to_string(),
            query: view.result.map(|r| r.query.clone()),
            study_count: view.result.map_or(0, |r| r.evidence_matrix.len()),
            sort: self.dashboard.sort_spec(),
            is_loading: view.mode == RenderMode::Loading,
        };
        render_header(frame, header_area, &header, &self.theme);
        self.search_bar.render(frame, search_area);

        let main_area = if self.show_sidebar {
            let [sidebar_area, main_area] =
                Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Fill(1)])
                    .areas(body_area);
            let history: Vec<&str> = self.dashboard.session().history().collect();
            render_sidebar(frame, sidebar_area, &history, &self.theme);
            main_area
        } else {
            body_area
        };

        match view.mode {
            RenderMode::Empty => render_empty(frame, main_area, &self.theme),
            RenderMode::Loading => render_loading(
                frame,
                main_area,
                self.dashboard.session().query_text(),
                self.spinner,
                &self.theme,
            ),
            RenderMode::FullPageCompare => {
                self.compare_width = main_area.width.saturating_sub(2);
                render_compare_view(
                    frame,
                    main_area,
                    &view.compare,
                    self.compare_scroll,
                    &self.theme,
                );
            }
            RenderMode::Results => self.draw_results(frame, main_area),
        }

        render_status_bar(
            frame,
            status_area,
            self.input_mode(),
            self.status.as_ref(),
            &self.theme,
        );

        if self.pane == Pane::SearchBar {
            render_suggestions(
                frame,
                search_area,
                self.dashboard.session().suggestions(),
                self.suggestion_cursor,
                &self.theme,
            );
        }
    }

    fn draw_results(&self, frame: &mut Frame, area: Rect) {
        let view = self.dashboard.view();
        let Some(result) = view.result else {
            return;
        };

        let [top, bottom] =
            Layout::vertical([Constraint::Percentage(35), Constraint::Fill(1)]).areas(area);
        let [summary_area, trend_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(TREND_WIDTH)]).areas(top);
        render_summary(
            frame,
            summary_area,
            result,
            &view.outcomes,
            self.summary_scroll,
            &self.theme,
        );
        render_trend_chart(frame, trend_area, &view.trend, &self.theme);

        let (table_area, detail_area) = if view.detail.is_open() {
            let [table, detail] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(DETAIL_WIDTH)])
                    .areas(bottom);
            (table, Some(detail))
        } else {
            (bottom, None)
        };

        let studies = self.dashboard.sorted_studies();
        let data = EvidenceTableData {
            studies: &studies,
            sort: self.dashboard.sort_spec(),
            selection: self.dashboard.selection(),
            cursor: self.table_cursor,
            focused: self.pane == Pane::Matrix,
        };
        render_evidence_table(frame, table_area, &data, &self.theme);

        if let Some(detail_area) = detail_area {
            render_detail_panel(frame, detail_area, &view.detail, &self.theme);
        }
    }
}
