//! Terminal UI for the Deep Research Orchestrator.
//!
//! One screen that moves from the topic form, through the phase cards, to the
//! finished report.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

use app::App;
use deepresearch_core::AppConfig;
use std::io::Write;

/// Raw mode and the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        crossterm::terminal::enable_raw_mode()?;
        let guard = TerminalGuard;
        crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::EnterAlternateScreen,
            crossterm::event::EnableBracketedPaste
        )?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        // Each step runs even if an earlier one failed.
        if let Err(e) = crossterm::terminal::disable_raw_mode() {
            tracing::error!(error = %e, "failed to disable raw mode");
        }
        if let Err(e) = restore_screen(&mut std::io::stdout()) {
            tracing::error!(error = %e, "failed to restore the terminal screen");
        }
    }
}

/// Leave the alternate screen, stop bracketed paste, show the cursor.
fn restore_screen<W: Write>(out: &mut W) -> std::io::Result<()> {
    crossterm::execute!(
        out,
        crossterm::event::DisableBracketedPaste,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )
}

/// Run the TUI application.
pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;

    let backend = ratatui::backend::CrosstermBackend::new(std::io::stdout());
    let mut terminal = ratatui::Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(&config);
    app.run(&mut terminal).await
}
