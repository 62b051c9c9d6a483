//! Theme system for the research TUI.
//!
//! Provides dark and light color palettes, loaded from `UiConfig.theme`.

use ratatui::style::{Color, Modifier, Style};

/// Complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted_fg: Color,

    // Phase cards
    pub active_fg: Color,
    pub completed_fg: Color,

    // Report
    pub heading_fg: Color,
    pub link_fg: Color,
    pub gap_fg: Color,

    // Status colors
    pub error_fg: Color,
    pub success_fg: Color,

    // UI chrome
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub border_color: Color,
    pub focus_border_color: Color,
    pub selection_bg: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(102, 126, 234),
            muted_fg: Color::Rgb(127, 132, 156),

            active_fg: Color::Rgb(249, 226, 175),
            completed_fg: Color::Rgb(166, 227, 161),

            heading_fg: Color::Rgb(180, 190, 254),
            link_fg: Color::Rgb(137, 180, 250),
            gap_fg: Color::Rgb(250, 179, 135),

            error_fg: Color::Rgb(243, 139, 168),
            success_fg: Color::Rgb(166, 227, 161),

            header_bg: Color::Rgb(24, 24, 37),
            header_fg: Color::Rgb(205, 214, 244),
            status_bar_bg: Color::Rgb(24, 24, 37),
            status_bar_fg: Color::Rgb(166, 173, 200),
            border_color: Color::Rgb(69, 71, 90),
            focus_border_color: Color::Rgb(102, 126, 234),
            selection_bg: Color::Rgb(69, 71, 90),
        }
    }

    /// Create the light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            bg: Color::Rgb(239, 241, 245),
            fg: Color::Rgb(76, 79, 105),
            accent: Color::Rgb(102, 126, 234),
            muted_fg: Color::Rgb(140, 143, 161),

            active_fg: Color::Rgb(223, 142, 29),
            completed_fg: Color::Rgb(64, 160, 43),

            heading_fg: Color::Rgb(114, 135, 253),
            link_fg: Color::Rgb(30, 102, 245),
            gap_fg: Color::Rgb(254, 100, 11),

            error_fg: Color::Rgb(210, 15, 57),
            success_fg: Color::Rgb(64, 160, 43),

            header_bg: Color::Rgb(220, 224, 232),
            header_fg: Color::Rgb(76, 79, 105),
            status_bar_bg: Color::Rgb(220, 224, 232),
            status_bar_fg: Color::Rgb(92, 95, 119),
            border_color: Color::Rgb(172, 176, 190),
            focus_border_color: Color::Rgb(30, 102, 245),
            selection_bg: Color::Rgb(188, 192, 204),
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

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.heading_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn link_style(&self) -> Style {
        Style::default()
            .fg(self.link_fg)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn selected_link_style(&self) -> Style {
        self.link_style().bg(self.selection_bg)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_color)
    }

    pub fn focus_border_style(&self) -> Style {
        Style::default().fg(self.focus_border_color)
    }

    /// Card title color: active phases stand out, finished ones go green.
    pub fn phase_style(&self, active: bool) -> Style {
        let fg = if active {
            self.active_fg
        } else {
            self.completed_fg
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }
}
