//! Header showing the app title, the current step, and run time.

use crate::tui::theme::Theme;
use deepresearch_core::ResearchStep;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::time::Duration;

pub const TITLE: &str = "Deep Research Orchestrator";
pub const SUBTITLE: &str = "Synthesize large amounts of web data into comprehensive reports";

/// Data needed to render the header.
#[derive(Debug, Clone, Default)]
pub struct HeaderData {
    pub step: Option<ResearchStep>,
    pub is_researching: bool,
    pub elapsed: Option<Duration>,
    pub stale_policy: String,
}

/// Format a run duration as `m:ss`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Render the two-line header.
pub fn render_header(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let indicator = if data.is_researching { "⟳" } else { "●" };
    let separator = || Span::styled(" │ ", theme.header_style().fg(theme.border_color));

    let mut spans = vec![Span::styled(
        format!(" {} {}", indicator, TITLE),
        theme
            .header_style()
            .add_modifier(Modifier::BOLD)
            .fg(theme.accent),
    )];
    if let Some(step) = data.step {
        spans.push(separator());
        spans.push(Span::styled(
            step.to_string(),
            theme.header_style().add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(elapsed) = data.elapsed {
        spans.push(separator());
        spans.push(Span::styled(format_elapsed(elapsed), theme.header_style()));
    }
    if !data.stale_policy.is_empty() {
        spans.push(separator());
        spans.push(Span::styled(
            format!("stale: {}", data.stale_policy),
            theme.header_style().fg(theme.muted_fg),
        ));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled(
            format!("   {}", SUBTITLE),
            theme.header_style().fg(theme.muted_fg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(theme.header_style()), area);
}
