//! Phase cards for a research run in progress.
//!
//! Each phase that has been reached gets a card: a spinner while it is the
//! active one, a check mark once the run has moved past it.

use crate::tui::theme::Theme;
use deepresearch_core::{DisplayPhase, PhaseStatus, ResearchProgress};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// Spinner frames for animation.
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// The text lines for every visible card, in order.
pub fn phase_lines(progress: &ResearchProgress, tick: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (phase, status) in progress.visible_phases() {
        let active = status == PhaseStatus::Active;
        let marker = if active { spinner_frame(tick) } else { "✓" };
        lines.push(Line::from(Span::styled(
            format!("{} {}", marker, phase.title()),
            theme.phase_style(active),
        )));
        lines.push(Line::from(Span::styled(
            format!("   {}", phase.description()),
            theme.muted_style(),
        )));

        match phase {
            DisplayPhase::QueryDecomposition => {
                for question in progress.sub_questions() {
                    lines.push(Line::from(format!("   • {}", question)));
                }
            }
            DisplayPhase::MultiStepResearch => {
                if let Some(current) = progress.research_status_line() {
                    lines.push(Line::from(Span::styled(
                        format!("   {}", current),
                        theme.base_style().add_modifier(Modifier::BOLD),
                    )));
                }
                if let Some(done) = progress.completed_status_line() {
                    lines.push(Line::from(Span::styled(
                        format!("   ✓ {}", done),
                        theme.success_style(),
                    )));
                }
            }
            _ => {
                if let Some(note) = phase.completion_note(progress.step) {
                    lines.push(Line::from(Span::styled(
                        format!("   ✓ {}", note),
                        theme.success_style(),
                    )));
                }
            }
        }
        lines.push(Line::default());
    }

    lines
}

/// Render the phase cards.
pub fn render_progress_panel(
    frame: &mut Frame,
    area: Rect,
    progress: &ResearchProgress,
    tick: usize,
    theme: &Theme,
) {
    let block = Block::default()
        .title(" Research Progress ")
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let panel = Paragraph::new(phase_lines(progress, tick, theme))
        .block(block)
        .style(theme.base_style())
        .wrap(Wrap { trim: false });
    frame.render_widget(panel, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepresearch_core::research::machine::{ProgressEvent, advance};

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    fn decomposed() -> ResearchProgress {
        advance(
            None,
            ProgressEvent::Decomposed {
                sub_questions: vec!["Why bees?".into(), "How bees?".into()],
            },
        )
    }

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(spinner_frame(0), "⠋");
        assert_eq!(spinner_frame(SPINNER_FRAMES.len()), "⠋");
    }

    #[test]
    fn test_started_shows_one_active_card() {
        let lines = text(&phase_lines(&ResearchProgress::started(), 1, &Theme::dark()));
        assert_eq!(lines[0], "⠙ 1. Query Decomposition");
        assert!(!lines.iter().any(|l| l.contains("2. Multi-Step Research")));
    }

    #[test]
    fn test_decomposition_lists_questions() {
        let lines = text(&phase_lines(&decomposed(), 0, &Theme::dark()));
        assert!(lines.contains(&"   • Why bees?".to_string()));
        assert!(lines.contains(&"   • How bees?".to_string()));
    }

    #[test]
    fn test_research_card_status_lines() {
        let progress = advance(Some(&decomposed()), ProgressEvent::QuestionStarted { index: 0 });
        let progress = advance(
            Some(&progress),
            ProgressEvent::FindingRecorded {
                finding: deepresearch_core::Finding {
                    question: "Why bees?".into(),
                    answer: "Because.".into(),
                    sources: vec![],
                },
            },
        );
        let lines = text(&phase_lines(&progress, 0, &Theme::dark()));
        assert_eq!(lines[0], "✓ 1. Query Decomposition");
        assert!(lines.iter().any(|l| l.contains("⠋ 2. Multi-Step Research")));
        assert!(lines.contains(&"   Researching question 1 of 2".to_string()));
        assert!(lines.contains(&"   ✓ Completed 1 of 2 sub-questions".to_string()));
    }

    #[test]
    fn test_gap_phase_notes() {
        let progress = ResearchProgress {
            step: deepresearch_core::ResearchStep::Gap,
            ..decomposed()
        };
        let lines = text(&phase_lines(&progress, 0, &Theme::dark()));
        assert!(lines.contains(&"   ✓ All sources verified and cross-referenced".to_string()));
        assert!(lines.contains(&"   ✓ Report synthesized with key insights".to_string()));
        assert!(!lines.iter().any(|l| l.contains("Gap analysis completed")));
    }

    #[test]
    fn test_render_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| {
                render_progress_panel(frame, frame.area(), &decomposed(), 3, &theme);
            })
            .unwrap();
    }
}
