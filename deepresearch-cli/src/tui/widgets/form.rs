//! The start button under the research form.

use crate::tui::theme::Theme;
use crate::tui::widgets::progress_panel::spinner_frame;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

pub const START_LABEL: &str = "Start Deep Research";
pub const RUNNING_LABEL: &str = "Researching...";

/// Button text for the current state.
pub fn button_label(is_researching: bool, tick: usize) -> String {
    if is_researching {
        format!("{} {}", spinner_frame(tick), RUNNING_LABEL)
    } else {
        START_LABEL.to_string()
    }
}

/// Render the button; dimmed when it would do nothing.
pub fn render_start_button(
    frame: &mut Frame,
    area: Rect,
    enabled: bool,
    is_researching: bool,
    tick: usize,
    theme: &Theme,
) {
    let style = if enabled {
        theme
            .base_style()
            .fg(theme.bg)
            .bg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        theme.muted_style()
    };
    let line = Line::from(vec![
        Span::raw(" "),
        Span::styled(format!("[ {} ]", button_label(is_researching, tick)), style),
    ]);
    frame.render_widget(Paragraph::new(line).style(theme.base_style()), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_label() {
        assert_eq!(button_label(false, 3), "Start Deep Research");
        assert_eq!(button_label(true, 0), "⠋ Researching...");
    }

    #[test]
    fn test_render_disabled_button() {
        let backend = ratatui::backend::TestBackend::new(40, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_start_button(frame, frame.area(), false, false, 0, &Theme::dark());
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("[ Start Deep Research ]"));
    }
}
