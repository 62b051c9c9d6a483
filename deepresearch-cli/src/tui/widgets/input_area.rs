//! Form field widget wrapping tui-textarea.

use crate::tui::theme::Theme;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders};
use tui_textarea::TextArea;

/// One labelled input on the research form.
pub struct InputWidget {
    textarea: TextArea<'static>,
    label: &'static str,
    multiline: bool,
}

/// Result of processing an input event.
#[derive(Debug, PartialEq, Eq)]
pub enum InputAction {
    /// Enter was pressed; the form should try to start research.
    Submit,
    /// The field took the event.
    Consumed,
}

impl InputWidget {
    /// A single-line field.
    pub fn single_line(label: &'static str, placeholder: &str, theme: &Theme) -> Self {
        Self::build(label, placeholder, false, theme)
    }

    /// A field that accepts Shift+Enter / Alt+Enter newlines.
    pub fn multi_line(label: &'static str, placeholder: &str, theme: &Theme) -> Self {
        Self::build(label, placeholder, true, theme)
    }

    fn build(label: &'static str, placeholder: &str, multiline: bool, theme: &Theme) -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        textarea.set_style(Style::default().fg(theme.fg).bg(theme.bg));
        textarea.set_placeholder_text(placeholder);
        textarea.set_placeholder_style(theme.muted_style());

        let mut widget = Self {
            textarea,
            label,
            multiline,
        };
        widget.set_focused(false, theme);
        widget
    }

    /// Restyle the border and cursor for the focus state.
    pub fn set_focused(&mut self, focused: bool, theme: &Theme) {
        let border = if focused {
            theme.focus_border_style()
        } else {
            theme.border_style()
        };
        self.textarea.set_block(
            Block::default()
                .title(format!(" {} ", self.label))
                .borders(Borders::ALL)
                .border_style(border),
        );
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.textarea.set_cursor_style(cursor);
    }

    /// Get the current input text.
    pub fn text(&self) -> String {
        self.textarea.lines().join("\n")
    }

    pub fn clear(&mut self) {
        self.textarea.select_all();
        self.textarea.cut();
    }

    /// Process a crossterm event. Returns the resulting action.
    pub fn handle_event(&mut self, event: &Event) -> InputAction {
        match event {
            Event::Key(KeyEvent {
                code: KeyCode::Enter,
                modifiers,
                ..
            }) => {
                let newline = modifiers.contains(KeyModifiers::SHIFT)
                    || modifiers.contains(KeyModifiers::ALT);
                if newline && self.multiline {
                    self.textarea.insert_newline();
                    InputAction::Consumed
                } else {
                    InputAction::Submit
                }
            }
            Event::Paste(text) => {
                if self.multiline {
                    self.textarea.insert_str(text);
                } else {
                    self.textarea.insert_str(text.replace(['\r', '\n'], " "));
                }
                InputAction::Consumed
            }
            _ => {
                self.textarea.input(event.clone());
                InputAction::Consumed
            }
        }
    }

    /// Render the input widget.
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(&self.textarea, area);
    }
}
