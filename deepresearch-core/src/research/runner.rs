//! Async driver for one research run.
//!
//! The run is a single task that walks the fixed phase schedule. Every wait
//! is a sleep raced against the run's cancellation token, and every snapshot
//! it emits is tagged with the run generation it belongs to, so a controller
//! that has since been reset can recognise and drop it.

use super::decomposition::generate_sub_questions;
use super::findings::conduct_research;
use super::machine::{ProgressEvent, advance};
use super::progress::ResearchProgress;
use super::synthesis::synthesize_report;
use crate::config::TimingConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

/// Fixed waits between transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDelays {
    pub decomposition: Duration,
    pub question_listing: Duration,
    pub research: Duration,
    pub finding_pause: Duration,
    pub verification: Duration,
    pub synthesis: Duration,
    pub gap: Duration,
}

impl From<&TimingConfig> for PhaseDelays {
    fn from(timing: &TimingConfig) -> Self {
        Self {
            decomposition: Duration::from_millis(timing.decomposition_ms),
            question_listing: Duration::from_millis(timing.question_listing_ms),
            research: Duration::from_millis(timing.research_ms),
            finding_pause: Duration::from_millis(timing.finding_pause_ms),
            verification: Duration::from_millis(timing.verification_ms),
            synthesis: Duration::from_millis(timing.synthesis_ms),
            gap: Duration::from_millis(timing.gap_ms),
        }
    }
}

impl Default for PhaseDelays {
    fn default() -> Self {
        Self::from(&TimingConfig::default())
    }
}

/// Everything a runner needs to know about the run it is driving.
#[derive(Debug, Clone)]
pub struct RunTicket {
    pub run_id: Uuid,
    pub generation: u64,
    pub topic: String,
    pub cancel: CancellationToken,
}

/// A snapshot emitted by a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub run_id: Uuid,
    pub generation: u64,
    pub progress: ResearchProgress,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// All phases ran; holds the terminal snapshot.
    Completed(ResearchProgress),
    /// The token fired or the receiver went away before the end.
    Cancelled,
}

/// Build the RNG for a run: seeded when asked, otherwise from OS entropy.
pub fn run_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Walks the phase schedule for one run.
pub struct ResearchRunner<R> {
    delays: PhaseDelays,
    rng: R,
}

impl<R: Rng> ResearchRunner<R> {
    pub fn new(delays: PhaseDelays, rng: R) -> Self {
        Self { delays, rng }
    }

    /// Drive the run to completion or cancellation.
    ///
    /// The initial `decomposition` snapshot is not emitted here; the
    /// controller installs it when the submission is accepted.
    pub async fn run(
        self,
        ticket: RunTicket,
        tx: mpsc::UnboundedSender<ProgressUpdate>,
    ) -> RunOutcome {
        let span = tracing::info_span!(
            "research_run",
            run_id = %ticket.run_id,
            generation = ticket.generation
        );
        self.drive(ticket, tx).instrument(span).await
    }

    async fn drive(
        mut self,
        ticket: RunTicket,
        tx: mpsc::UnboundedSender<ProgressUpdate>,
    ) -> RunOutcome {
        tracing::info!(topic = %ticket.topic, "research run started");

        let mut run = Run {
            ticket: &ticket,
            tx: &tx,
            progress: ResearchProgress::started(),
        };
        let delays = self.delays;

        if !run.pause(delays.decomposition).await {
            return run.cancelled();
        }
        let sub_questions = generate_sub_questions(&ticket.topic);
        if !run.transition(ProgressEvent::Decomposed {
            sub_questions: sub_questions.clone(),
        }) || !run.pause(delays.question_listing).await
        {
            return run.cancelled();
        }

        for (index, question) in sub_questions.iter().enumerate() {
            if !run.transition(ProgressEvent::QuestionStarted { index })
                || !run.pause(delays.research).await
            {
                return run.cancelled();
            }
            let finding = conduct_research(question, &mut self.rng);
            if !run.transition(ProgressEvent::FindingRecorded { finding })
                || !run.pause(delays.finding_pause).await
            {
                return run.cancelled();
            }
        }

        let closing = [
            (ProgressEvent::VerificationStarted, delays.verification),
            (ProgressEvent::SynthesisStarted, delays.synthesis),
            (ProgressEvent::GapAnalysisStarted, delays.gap),
        ];
        for (event, delay) in closing {
            if !run.transition(event) || !run.pause(delay).await {
                return run.cancelled();
            }
        }

        let report = synthesize_report(&ticket.topic, run.progress.findings(), &mut self.rng);
        if !run.transition(ProgressEvent::Completed { report }) {
            return run.cancelled();
        }
        tracing::info!(
            findings = run.progress.findings().len(),
            "research run complete"
        );
        RunOutcome::Completed(run.progress)
    }
}

/// Spawn a run onto the tokio runtime.
pub fn spawn_run<R>(
    runner: ResearchRunner<R>,
    ticket: RunTicket,
    tx: mpsc::UnboundedSender<ProgressUpdate>,
) -> JoinHandle<RunOutcome>
where
    R: Rng + Send + 'static,
{
    tokio::spawn(runner.run(ticket, tx))
}

/// Per-run working state.
struct Run<'a> {
    ticket: &'a RunTicket,
    tx: &'a mpsc::UnboundedSender<ProgressUpdate>,
    progress: ResearchProgress,
}

impl Run<'_> {
    /// Sleep for `delay` unless the run is cancelled first. Returns false on cancel.
    async fn pause(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.ticket.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    /// Advance the snapshot and publish it. Returns false if the run should stop.
    fn transition(&mut self, event: ProgressEvent) -> bool {
        if self.ticket.cancel.is_cancelled() {
            return false;
        }
        self.progress = advance(Some(&self.progress), event);
        tracing::debug!(
            step = %self.progress.step,
            current_question = ?self.progress.current_question,
            findings = self.progress.findings().len(),
            "phase transition"
        );
        self.tx
            .send(ProgressUpdate {
                run_id: self.ticket.run_id,
                generation: self.ticket.generation,
                progress: self.progress.clone(),
            })
            .is_ok()
    }

    fn cancelled(&self) -> RunOutcome {
        tracing::info!(step = %self.progress.step, "research run cancelled");
        RunOutcome::Cancelled
    }
}
