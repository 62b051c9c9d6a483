//! Terminal event handling using crossterm EventStream.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;

/// High-level actions the TUI can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Cancel the run (if any) and clear the form.
    Reset,
    /// Move focus between the topic and context fields.
    NextField,
    /// Leave the report and start over.
    NewResearch,
    SelectPrevSource,
    SelectNextSource,
    OpenSource,
    ScrollUp,
    ScrollDown,
}

/// Reads terminal events asynchronously using crossterm's EventStream.
pub struct EventHandler {
    stream: EventStream,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Read the next terminal event. Returns None if the stream ends.
    pub async fn next(&mut self) -> Option<Event> {
        self.stream.next().await.and_then(|r| r.ok())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Keys that mean the same thing on every screen.
pub fn map_global_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('d')) => Some(Action::Quit),
        (_, KeyCode::Esc) => Some(Action::Reset),
        _ => None,
    }
}

/// Form keys the app handles before the focused field sees them.
pub fn map_form_key(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Tab | KeyCode::BackTab => Some(Action::NextField),
        _ => None,
    }
}

/// Keys on the finished report.
pub fn map_report_key(event: &KeyEvent) -> Option<Action> {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Action::SelectPrevSource),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::SelectNextSource),
        KeyCode::Enter | KeyCode::Char('o') => Some(Action::OpenSource),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Action::NewResearch),
        KeyCode::PageUp => Some(Action::ScrollUp),
        KeyCode::PageDown => Some(Action::ScrollDown),
        _ => None,
    }
}
