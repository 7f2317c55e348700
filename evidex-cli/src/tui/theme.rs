//! Theme system for the evidex TUI.
//!
//! Provides dark and light color palettes, loaded from UiConfig.theme.

use evidex_core::{EvidenceGrade, RiskOfBias};
use ratatui::style::{Color, Modifier, Style};

/// Complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub accent: Color,
    pub heading_fg: Color,

    // Grade colors
    pub grade_strong_fg: Color,
    pub grade_moderate_fg: Color,
    pub grade_weak_fg: Color,
    pub grade_conflicting_fg: Color,

    // Status colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,

    // UI chrome
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub border_color: Color,
    pub focus_border_color: Color,
    pub selection_bg: Color,
    pub sidebar_bg: Color,
    pub popup_bg: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            bg: Color::Rgb(22, 28, 36),
            fg: Color::Rgb(214, 222, 230),
            muted_fg: Color::Rgb(128, 140, 156),
            accent: Color::Rgb(0, 150, 136),
            heading_fg: Color::Rgb(128, 203, 234),

            grade_strong_fg: Color::Rgb(77, 208, 189),
            grade_moderate_fg: Color::Rgb(110, 168, 254),
            grade_weak_fg: Color::Rgb(250, 189, 90),
            grade_conflicting_fg: Color::Rgb(243, 119, 128),

            error_fg: Color::Rgb(243, 119, 128),
            warning_fg: Color::Rgb(250, 189, 90),
            success_fg: Color::Rgb(77, 208, 189),

            header_bg: Color::Rgb(0, 77, 115),
            header_fg: Color::Rgb(236, 244, 250),
            status_bar_bg: Color::Rgb(16, 20, 26),
            status_bar_fg: Color::Rgb(160, 172, 188),
            border_color: Color::Rgb(58, 68, 82),
            focus_border_color: Color::Rgb(0, 150, 136),
            selection_bg: Color::Rgb(38, 58, 70),
            sidebar_bg: Color::Rgb(0, 45, 68),
            popup_bg: Color::Rgb(30, 38, 48),
        }
    }

    /// Create the light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            bg: Color::Rgb(248, 249, 250),
            fg: Color::Rgb(45, 55, 72),
            muted_fg: Color::Rgb(113, 128, 150),
            accent: Color::Rgb(0, 150, 136),
            heading_fg: Color::Rgb(0, 77, 115),

            grade_strong_fg: Color::Rgb(13, 148, 136),
            grade_moderate_fg: Color::Rgb(37, 99, 235),
            grade_weak_fg: Color::Rgb(217, 119, 6),
            grade_conflicting_fg: Color::Rgb(220, 38, 38),

            error_fg: Color::Rgb(220, 38, 38),
            warning_fg: Color::Rgb(217, 119, 6),
            success_fg: Color::Rgb(13, 148, 136),

            header_bg: Color::Rgb(0, 77, 115),
            header_fg: Color::Rgb(255, 255, 255),
            status_bar_bg: Color::Rgb(226, 232, 240),
            status_bar_fg: Color::Rgb(74, 85, 104),
            border_color: Color::Rgb(203, 213, 224),
            focus_border_color: Color::Rgb(0, 150, 136),
            selection_bg: Color::Rgb(224, 242, 241),
            sidebar_bg: Color::Rgb(0, 77, 115),
            popup_bg: Color::Rgb(255, 255, 255),
        }
    }

    /// Load a theme by name from config. Falls back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    // -- Convenience style constructors --

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted_fg)
    }

    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.heading_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning_fg)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    /// Border style for a pane, highlighted when it has keyboard focus.
    pub fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.focus_border_color)
        } else {
            Style::default().fg(self.border_color)
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn sidebar_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.sidebar_bg)
    }

    pub fn popup_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.popup_bg)
    }

    /// Color for an evidence grade badge.
    pub fn grade_color(&self, grade: EvidenceGrade) -> Color {
        match grade {
            EvidenceGrade::Strong => self.grade_strong_fg,
            EvidenceGrade::Moderate => self.grade_moderate_fg,
            EvidenceGrade::Weak => self.grade_weak_fg,
            EvidenceGrade::Conflicting => self.grade_conflicting_fg,
        }
    }

    pub fn grade_style(&self, grade: EvidenceGrade) -> Style {
        Style::default()
            .fg(self.grade_color(grade))
            .add_modifier(Modifier::BOLD)
    }

    pub fn risk_style(&self, risk: RiskOfBias) -> Style {
        match risk {
            RiskOfBias::Low => self.success_style(),
            RiskOfBias::Moderate => self.warning_style(),
            RiskOfBias::High => self.error_style(),
        }
    }
}
