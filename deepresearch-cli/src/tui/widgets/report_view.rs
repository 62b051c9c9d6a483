//! Finished report: summary, key findings, per-question analysis with
//! selectable sources, and the gap list.

use crate::tui::theme::Theme;
use deepresearch_core::ResearchProgress;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Rows moved by one PageUp/PageDown.
const SCROLL_STEP: u16 = 10;

/// Selection and scroll position inside the report.
///
/// `scroll` counts wrapped rows. While `follow_selection` is set the next draw
/// brings the selected source into view; manual scrolling clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportViewState {
    pub selected_source: usize,
    pub scroll: u16,
    pub follow_selection: bool,
}

impl Default for ReportViewState {
    fn default() -> Self {
        Self {
            selected_source: 0,
            scroll: 0,
            follow_selection: true,
        }
    }
}

impl ReportViewState {
    pub fn select_next(&mut self, total: usize) {
        if self.selected_source + 1 < total {
            self.selected_source += 1;
        }
        self.follow_selection = true;
    }

    pub fn select_prev(&mut self) {
        self.selected_source = self.selected_source.saturating_sub(1);
        self.follow_selection = true;
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
        self.follow_selection = false;
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(SCROLL_STEP);
        self.follow_selection = false;
    }
}

/// Every source in display order (finding by finding).
pub fn all_sources(progress: &ResearchProgress) -> Vec<&str> {
    progress
        .findings()
        .iter()
        .flat_map(|f| f.sources.iter().map(String::as_str))
        .collect()
}

/// The URL under the selection, if any.
pub fn selected_source<'a>(progress: &'a ResearchProgress, state: &ReportViewState) -> Option<&'a str> {
    all_sources(progress).get(state.selected_source).copied()
}

/// Report lines plus the index of the selected source's line.
pub fn report_lines(
    topic: &str,
    progress: &ResearchProgress,
    state: &ReportViewState,
    theme: &Theme,
) -> (Vec<Line<'static>>, Option<usize>) {
    let Some(report) = progress.report.as_ref() else {
        return (Vec::new(), None);
    };

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Research Report: {}", topic),
            theme.heading_style(),
        )),
        Line::default(),
        Line::from(Span::styled("Executive Summary", theme.heading_style())),
        Line::from(report.summary.clone()),
        Line::default(),
        Line::from(Span::styled("Key Findings", theme.heading_style())),
    ];
    for finding in &report.key_findings {
        lines.push(Line::from(format!("  • {}", finding)));
    }

    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Detailed Analysis",
        theme.heading_style(),
    )));
    let mut selected_line = None;
    let mut source_index = 0;
    for finding in progress.findings() {
        lines.push(Line::from(Span::styled(
            finding.question.clone(),
            theme.base_style().fg(theme.accent),
        )));
        lines.push(Line::from(finding.answer.clone()));
        lines.push(Line::from(Span::styled("Sources:", theme.muted_style())));
        for source in &finding.sources {
            let selected = source_index == state.selected_source;
            let (marker, style) = if selected {
                selected_line = Some(lines.len());
                ("▸ ", theme.selected_link_style())
            } else {
                ("  ", theme.link_style())
            };
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(source.clone(), style),
            ]));
            source_index += 1;
        }
        lines.push(Line::default());
    }

    lines.push(Line::from(Span::styled("Gap Analysis", theme.heading_style())));
    lines.push(Line::from(Span::styled(
        "Areas identified that require additional research or have limited information:",
        theme.muted_style(),
    )));
    for gap in &report.gaps {
        lines.push(Line::from(Span::styled(
            format!("  • {}", gap),
            theme.base_style().fg(theme.gap_fg),
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[n] Start New Research",
        theme.base_style().fg(theme.accent),
    )));

    (lines, selected_line)
}

/// First wrapped row of every line at `width`, plus the total row count.
fn row_starts(lines: &[Line<'static>], width: u16) -> (Vec<u16>, u16) {
    let mut starts = Vec::with_capacity(lines.len());
    let mut row: u16 = 0;
    for line in lines {
        starts.push(row);
        let rows = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(width)
            .max(1);
        row = row.saturating_add(u16::try_from(rows).unwrap_or(u16::MAX));
    }
    (starts, row)
}

/// Render the report. Follows the selected source after a selection change and
/// clamps the scroll offset to the wrapped content.
pub fn render_report_view(
    frame: &mut Frame,
    area: Rect,
    topic: &str,
    progress: &ResearchProgress,
    state: &mut ReportViewState,
    theme: &Theme,
) {
    let (lines, selected_line) = report_lines(topic, progress, state, theme);
    let width = area.width.saturating_sub(2);
    let visible = area.height.saturating_sub(2);
    let (starts, total_rows) = row_starts(&lines, width);

    let mut scroll = state.scroll.min(total_rows.saturating_sub(visible));
    if state.follow_selection {
        if let Some(line) = selected_line {
            let top = starts[line];
            let bottom = starts.get(line + 1).copied().unwrap_or(total_rows);
            if top < scroll {
                scroll = top;
            } else if bottom > scroll.saturating_add(visible) {
                scroll = bottom.saturating_sub(visible).min(top);
            }
        }
        state.follow_selection = false;
    }
    state.scroll = scroll;

    let block = Block::default()
        .title(" Report ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let view = Paragraph::new(lines)
        .block(block)
        .style(theme.base_style())
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(view, area);
}
