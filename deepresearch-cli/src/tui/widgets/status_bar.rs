//! Status bar widget showing keybinding hints for the current screen.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Which part of the flow the screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Topic form, no run yet.
    Form,
    /// Phase cards while a run advances.
    Running,
    /// Finished report.
    Report,
}

impl Screen {
    /// Short display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Form => "FORM",
            Self::Running => "RUNNING",
            Self::Report => "REPORT",
        }
    }

    pub fn hints(&self) -> &'static str {
        match self {
            Self::Form => "[Enter] Start │ [Tab] Next field │ [Esc] Clear │ [Ctrl+C] Quit",
            Self::Running => "[Esc] Reset │ [Ctrl+C] Quit",
            Self::Report => {
                "[↑↓] Source │ [Enter/o] Open │ [PgUp/PgDn] Scroll │ [n] New research │ [Ctrl+C] Quit"
            }
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A one-off message shown in place of the key hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
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

/// Render the status bar. A transient notice replaces the hints.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    screen: Screen,
    notice: Option<&Notice>,
    theme: &Theme,
) {
    let body = match notice {
        Some(notice) if notice.is_error => Span::styled(
            notice.text.clone(),
            theme.error_style().bg(theme.status_bar_bg),
        ),
        Some(notice) => Span::styled(
            notice.text.clone(),
            theme.status_bar_style().fg(theme.accent),
        ),
        None => Span::styled(screen.hints(), theme.status_bar_style()),
    };

    let spans = vec![
        Span::styled(
            format!(" {} ", screen.label()),
            theme
                .status_bar_style()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", theme.status_bar_style()),
        body,
    ];

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar_style());
    frame.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_labels() {
        assert_eq!(Screen::Form.label(), "FORM");
        assert_eq!(Screen::Running.label(), "RUNNING");
        assert_eq!(format!("{}", Screen::Report), "REPORT");
    }

    #[test]
    fn test_report_hints_mention_new_research() {
        assert!(Screen::Report.hints().contains("[n] New research"));
        assert!(!Screen::Running.hints().contains("[Enter]"));
    }

    #[test]
    fn test_render_status_bar_with_notice() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                let notice = Notice::info("Opened link");
                render_status_bar(frame, frame.area(), Screen::Report, Some(&notice), &theme);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("REPORT"));
        assert!(text.contains("Opened link"));
    }
}
