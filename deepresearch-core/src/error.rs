//! Error types for the Deep Research Orchestrator core.
//!
//! The progress state machine itself is total and never fails. Errors only
//! arise at the edges: loading configuration and exporting finished reports.

use std::path::PathBuf;

/// Top-level error type for the core library.
#[derive(Debug, thiserror::Error)]
pub enum DeepResearchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::ParseError {
            message: err.to_string(),
        }
    }
}

/// Errors from rendering or writing a finished report.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Research has not completed yet (current step: {step})")]
    NotComplete { step: String },

    #[error("Nothing to export: no research run is active")]
    NoProgress,

    #[error("Unknown export format: {format}")]
    UnknownFormat { format: String },
}

/// A type alias for results using the top-level `DeepResearchError`.
pub type Result<T> = std::result::Result<T, DeepResearchError>;
