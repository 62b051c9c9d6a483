//! Form state, run generations, and the live progress snapshot.
//!
//! The controller is the one place the front-ends read from. Runs write to it
//! only through `apply`, which checks each update against the live run
//! generation.

use super::progress::ResearchProgress;
use super::runner::{ProgressUpdate, RunTicket};
use crate::config::StaleUpdatePolicy;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// The research form as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResearchForm {
    pub topic: String,
    /// Collected and shown back to the user, but never read by any phase.
    pub additional_context: String,
}

impl ResearchForm {
    /// Submission is only possible with a non-blank topic.
    pub fn can_submit(&self) -> bool {
        !self.topic.trim().is_empty()
    }
}

/// Holds everything one research screen needs.
#[derive(Debug)]
pub struct ResearchController {
    form: ResearchForm,
    is_researching: bool,
    progress: Option<ResearchProgress>,
    generation: u64,
    run_id: Option<Uuid>,
    cancel: Option<CancellationToken>,
    policy: StaleUpdatePolicy,
}

impl Default for ResearchController {
    fn default() -> Self {
        Self::new(StaleUpdatePolicy::default())
    }
}

impl ResearchController {
    pub fn new(policy: StaleUpdatePolicy) -> Self {
        Self {
            form: ResearchForm::default(),
            is_researching: false,
            progress: None,
            generation: 0,
            run_id: None,
            cancel: None,
            policy,
        }
    }

    pub fn form(&self) -> &ResearchForm {
        &self.form
    }

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.form.topic = topic.into();
    }

    pub fn set_additional_context(&mut self, context: impl Into<String>) {
        self.form.additional_context = context.into();
    }

    pub fn is_researching(&self) -> bool {
        self.is_researching
    }

    pub fn progress(&self) -> Option<&ResearchProgress> {
        self.progress.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    pub fn policy(&self) -> StaleUpdatePolicy {
        self.policy
    }

    /// Whether nothing is running and nothing is on screen.
    pub fn is_idle(&self) -> bool {
        !self.is_researching && self.progress.is_none()
    }

    /// Whether the start action is enabled right now.
    pub fn can_submit(&self) -> bool {
        self.is_idle() && self.form.can_submit()
    }

    /// Accept the form and open a new run.
    ///
    /// Returns `None` when submission is disabled. The returned ticket is
    /// handed to a `ResearchRunner`; the controller already shows the first
    /// `decomposition` snapshot.
    pub fn submit(&mut self) -> Option<RunTicket> {
        if !self.can_submit() {
            return None;
        }

        self.generation += 1;
        let run_id = Uuid::new_v4();
        let cancel = CancellationToken::new();
        self.run_id = Some(run_id);
        self.cancel = Some(cancel.clone());
        self.is_researching = true;
        self.progress = Some(ResearchProgress::started());

        tracing::info!(%run_id, generation = self.generation, "research submitted");

        Some(RunTicket {
            run_id,
            generation: self.generation,
            topic: self.form.topic.clone(),
            cancel,
        })
    }

    /// Install a snapshot from a run. Returns whether it was applied.
    pub fn apply(&mut self, update: ProgressUpdate) -> bool {
        let live = update.generation == self.generation;
        if !live && self.policy == StaleUpdatePolicy::Discard {
            tracing::debug!(
                generation = update.generation,
                live_generation = self.generation,
                step = %update.progress.step,
                "dropping stale progress update"
            );
            return false;
        }

        if update.progress.is_complete() {
            self.is_researching = false;
        }
        self.progress = Some(update.progress);
        true
    }

    /// Return to the empty form.
    ///
    /// Under `StaleUpdatePolicy::Discard` the in-flight run is cancelled and
    /// anything it already queued is dropped by `apply`. Under `Apply` the run
    /// keeps going and its updates still land.
    pub fn reset(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            if self.policy == StaleUpdatePolicy::Discard {
                cancel.cancel();
            }
        }
        self.generation += 1;
        self.form = ResearchForm::default();
        self.progress = None;
        self.is_researching = false;
        self.run_id = None;
        tracing::info!(generation = self.generation, policy = %self.policy, "research reset");
    }
}
