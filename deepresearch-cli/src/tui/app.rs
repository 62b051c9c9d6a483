//! Main TUI application: state, event loop, and top-level draw function.

use crate::tui::event::{Action, EventHandler, map_form_key, map_global_key, map_report_key};
use crate::tui::theme::Theme;
use crate::tui::widgets::form::render_start_button;
use crate::tui::widgets::header::{HeaderData, render_header};
use crate::tui::widgets::input_area::{InputAction, InputWidget};
use crate::tui::widgets::progress_panel::render_progress_panel;
use crate::tui::widgets::report_view::{
    ReportViewState, all_sources, render_report_view, selected_source,
};
use crate::tui::widgets::status_bar::{Notice, Screen, render_status_bar};
use crossterm::event::{Event, KeyEvent};
use deepresearch_core::research::runner::{run_rng, spawn_run};
use deepresearch_core::{AppConfig, PhaseDelays, ProgressUpdate, ResearchController, ResearchRunner};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const TOPIC_PLACEHOLDER: &str = "e.g., The impact of artificial intelligence on healthcare";
const CONTEXT_PLACEHOLDER: &str =
    "Provide any specific focus areas, time periods, or constraints...";

/// Which form field receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Topic,
    Context,
}

/// Opens a source URL outside the terminal.
pub type SourceOpener = fn(&str) -> std::io::Result<()>;

fn open_in_browser(url: &str) -> std::io::Result<()> {
    open::that(url)
}

/// The main TUI application state.
pub struct App {
    pub controller: ResearchController,
    pub topic_input: InputWidget,
    pub context_input: InputWidget,
    pub focus: FormField,
    pub report_view: ReportViewState,
    pub theme: Theme,
    pub tick: usize,
    pub notice: Option<Notice>,
    pub should_quit: bool,

    run_started: Option<Instant>,
    run_elapsed: Option<Duration>,

    // Run wiring
    delays: PhaseDelays,
    seed: Option<u64>,
    tick_rate: Duration,
    update_tx: mpsc::UnboundedSender<ProgressUpdate>,
    update_rx: mpsc::UnboundedReceiver<ProgressUpdate>,
    opener: SourceOpener,
}

impl App {
    /// Create a new TUI application.
    pub fn new(config: &AppConfig) -> Self {
        let theme = Theme::from_name(&config.ui.theme);
        let mut topic_input = InputWidget::single_line("Research Topic", TOPIC_PLACEHOLDER, &theme);
        topic_input.set_focused(true, &theme);
        let context_input =
            InputWidget::multi_line("Additional Context (Optional)", CONTEXT_PLACEHOLDER, &theme);
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        Self {
            controller: ResearchController::new(config.run.stale_updates),
            topic_input,
            context_input,
            focus: FormField::Topic,
            report_view: ReportViewState::default(),
            theme,
            tick: 0,
            notice: None,
            should_quit: false,
            run_started: None,
            run_elapsed: None,
            delays: PhaseDelays::from(&config.timing),
            seed: config.run.seed,
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            update_tx,
            update_rx,
            opener: open_in_browser,
        }
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_handler = EventHandler::new();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                event = event_handler.next() => {
                    if let Some(event) = event {
                        self.handle_terminal_event(event);
                    }
                }
                update = self.update_rx.recv() => {
                    if let Some(update) = update {
                        self.handle_update(update);
                    }
                }
                _ = tokio::time::sleep(self.tick_rate) => {
                    self.on_tick();
                }
            }

            if self.should_quit {
                self.controller.reset();
                break;
            }
        }

        Ok(())
    }

    /// What the main area is showing.
    pub fn screen(&self) -> Screen {
        match self.controller.progress() {
            None => Screen::Form,
            Some(progress) if progress.is_complete() => Screen::Report,
            Some(_) => Screen::Running,
        }
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.controller.is_researching() {
            self.run_elapsed = self.run_started.map(|started| started.elapsed());
        }
    }

    /// Install a snapshot coming from a runner.
    pub fn handle_update(&mut self, update: ProgressUpdate) {
        let completes = update.progress.is_complete();
        if self.controller.apply(update) && completes {
            self.report_view = ReportViewState::default();
            self.run_elapsed = self.run_started.map(|started| started.elapsed());
        }
    }

    /// Draw the full UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let [header_area, main_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = HeaderData {
            step: self.controller.progress().map(|p| p.step),
            is_researching: self.controller.is_researching(),
            elapsed: self.run_elapsed,
            stale_policy: self.controller.policy().to_string(),
        };
        render_header(frame, header_area, &header, &self.theme);

        let screen = self.screen();
        match (screen, self.controller.progress()) {
            (Screen::Report, Some(progress)) => {
                let [phases_area, report_area] =
                    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                        .areas(main_area);
                render_progress_panel(frame, phases_area, progress, self.tick, &self.theme);
                render_report_view(
                    frame,
                    report_area,
                    &self.controller.form().topic,
                    progress,
                    &mut self.report_view,
                    &self.theme,
                );
            }
            (_, Some(progress)) => {
                render_progress_panel(frame, main_area, progress, self.tick, &self.theme);
            }
            (_, None) => self.draw_form(frame, main_area),
        }

        render_status_bar(
            frame,
            status_area,
            screen,
            self.notice.as_ref(),
            &self.theme,
        );
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let [topic_area, context_area, button_area, _] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);

        self.topic_input.render(frame, topic_area);
        self.context_input.render(frame, context_area);
        render_start_button(
            frame,
            button_area,
            self.controller.can_submit(),
            self.controller.is_researching(),
            self.tick,
            &self.theme,
        );
    }

    /// Handle a terminal event (keyboard, paste, resize).
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Paste(_) if self.screen() == Screen::Form => {
                self.focused_input().handle_event(&event);
                self.sync_form();
            }
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if let Some(action) = map_global_key(&key) {
            self.execute_action(action);
            return;
        }

        match self.screen() {
            Screen::Form => {
                if let Some(action) = map_form_key(&key) {
                    self.execute_action(action);
                    return;
                }
                let action = self.focused_input().handle_event(&Event::Key(key));
                self.sync_form();
                if action == InputAction::Submit {
                    self.start_research();
                }
            }
            Screen::Running => {}
            Screen::Report => {
                if let Some(action) = map_report_key(&key) {
                    self.execute_action(action);
                }
            }
        }
    }

    /// Execute a high-level action.
    pub fn execute_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Reset | Action::NewResearch => self.reset(),
            Action::NextField => {
                self.focus = match self.focus {
                    FormField::Topic => FormField::Context,
                    FormField::Context => FormField::Topic,
                };
                self.topic_input
                    .set_focused(self.focus == FormField::Topic, &self.theme);
                self.context_input
                    .set_focused(self.focus == FormField::Context, &self.theme);
            }
            Action::SelectPrevSource => self.report_view.select_prev(),
            Action::SelectNextSource => {
                let total = self
                    .controller
                    .progress()
                    .map(|p| all_sources(p).len())
                    .unwrap_or(0);
                self.report_view.select_next(total);
            }
            Action::OpenSource => self.open_selected_source(),
            Action::ScrollUp => self.report_view.scroll_up(),
            Action::ScrollDown => self.report_view.scroll_down(),
        }
    }

    fn focused_input(&mut self) -> &mut InputWidget {
        match self.focus {
            FormField::Topic => &mut self.topic_input,
            FormField::Context => &mut self.context_input,
        }
    }

    fn sync_form(&mut self) {
        self.controller.set_topic(self.topic_input.text());
        self.controller
            .set_additional_context(self.context_input.text());
    }

    /// Submit the form and spawn a runner for it.
    fn start_research(&mut self) {
        let Some(ticket) = self.controller.submit() else {
            self.notice = Some(Notice::error("Enter a research topic first"));
            return;
        };

        let runner = ResearchRunner::new(self.delays, run_rng(self.seed));
        spawn_run(runner, ticket, self.update_tx.clone());
        self.notice = None;
        self.report_view = ReportViewState::default();
        self.run_started = Some(Instant::now());
        self.run_elapsed = Some(Duration::ZERO);
    }

    fn reset(&mut self) {
        self.controller.reset();
        self.topic_input.clear();
        self.context_input.clear();
        self.focus = FormField::Topic;
        self.topic_input.set_focused(true, &self.theme);
        self.context_input.set_focused(false, &self.theme);
        self.report_view = ReportViewState::default();
        self.run_started = None;
        self.run_elapsed = None;
        self.notice = None;
    }

    fn open_selected_source(&mut self) {
        let Some(url) = self
            .controller
            .progress()
            .and_then(|p| selected_source(p, &self.report_view))
            .map(str::to_string)
        else {
            return;
        };

        match (self.opener)(&url) {
            Ok(()) => {
                tracing::debug!(%url, "opened source");
                self.notice = Some(Notice::info(format!("Opened {}", url)));
            }
            Err(e) => {
                tracing::warn!(%url, error = %e, "failed to open source");
                self.notice = Some(Notice::error(format!("Could not open {}: {}", url, e)));
            }
        }
    }
}
