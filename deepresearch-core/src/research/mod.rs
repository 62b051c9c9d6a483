//! Simulated deep research: a linear, timed walk through canned phases.
//!
//! 1. **Decomposition**: the topic becomes five sub-questions
//! 2. **Research**: each sub-question gets a canned finding and three sources
//! 3. **Verification**, **Synthesis**, **Gap analysis**: timed pauses
//! 4. **Complete**: the report is assembled from the findings
//!
//! Nothing here touches the network. The tables in `decomposition`,
//! `findings` and `synthesis` are the whole knowledge base.

pub mod controller;
pub mod decomposition;
pub mod export;
pub mod findings;
pub mod machine;
pub mod progress;
pub mod runner;
pub mod synthesis;

pub use controller::{ResearchController, ResearchForm};
pub use decomposition::generate_sub_questions;
pub use export::{ExportFormat, ReportEnvelope};
pub use findings::conduct_research;
pub use machine::{ProgressEvent, advance};
pub use progress::{DisplayPhase, Finding, PhaseStatus, Report, ResearchProgress, ResearchStep};
pub use runner::{
    PhaseDelays, ProgressUpdate, ResearchRunner, RunOutcome, RunTicket, run_rng, spawn_run,
};
pub use synthesis::synthesize_report;
