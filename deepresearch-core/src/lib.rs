//! # Deep Research Orchestrator Core
//!
//! Core library for the Deep Research Orchestrator.
//! Provides the progress state machine, the canned research tables, report
//! assembly and export, the run controller, configuration, and error types.

pub mod config;
pub mod error;
pub mod research;

// Re-export commonly used types at the crate root.
pub use config::{AppConfig, StaleUpdatePolicy, TimingConfig, UiConfig, load_config};
pub use error::{ConfigError, DeepResearchError, ExportError, Result};
pub use research::{
    DisplayPhase, ExportFormat, Finding, PhaseDelays, PhaseStatus, ProgressUpdate, Report,
    ResearchController, ResearchForm, ResearchProgress, ResearchRunner, ResearchStep, RunOutcome,
    RunTicket,
};
