//! Configuration system for the Deep Research Orchestrator.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> CLI args.
//! Configuration is loaded from `~/.config/deepresearch/config.toml` and/or
//! `.deepresearch/config.toml` in the workspace directory.

use crate::error::ConfigError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest delay any single phase may be configured to wait.
pub const MAX_PHASE_DELAY_MS: u64 = 60_000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub ui: UiConfig,
    pub run: RunConfig,
}

/// Fixed delays between phase transitions, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Wait after entering decomposition, before sub-questions appear.
    pub decomposition_ms: u64,
    /// Wait after the sub-questions are listed.
    pub question_listing_ms: u64,
    /// Wait while a single sub-question is being researched.
    pub research_ms: u64,
    /// Pause after each finding is recorded.
    pub finding_pause_ms: u64,
    pub verification_ms: u64,
    pub synthesis_ms: u64,
    pub gap_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            decomposition_ms: 2000,
            question_listing_ms: 1500,
            research_ms: 2000,
            finding_pause_ms: 1000,
            verification_ms: 2000,
            synthesis_ms: 2500,
            gap_ms: 2000,
        }
    }
}

impl TimingConfig {
    /// Zero-length delays, for headless runs that only want the report.
    pub fn instant() -> Self {
        Self {
            decomposition_ms: 0,
            question_listing_ms: 0,
            research_ms: 0,
            finding_pause_ms: 0,
            verification_ms: 0,
            synthesis_ms: 0,
            gap_ms: 0,
        }
    }

    fn entries(&self) -> [(&'static str, u64); 7] {
        [
            ("decomposition_ms", self.decomposition_ms),
            ("question_listing_ms", self.question_listing_ms),
            ("research_ms", self.research_ms),
            ("finding_pause_ms", self.finding_pause_ms),
            ("verification_ms", self.verification_ms),
            ("synthesis_ms", self.synthesis_ms),
            ("gap_ms", self.gap_ms),
        ]
    }

    /// Total wall time of one full run over `questions` sub-questions.
    pub fn total_run_time(&self, questions: usize) -> Duration {
        let per_question = self.research_ms + self.finding_pause_ms;
        let ms = self.decomposition_ms
            + self.question_listing_ms
            + per_question * questions as u64
            + self.verification_ms
            + self.synthesis_ms
            + self.gap_ms;
        Duration::from_millis(ms)
    }

    /// Validate the timing configuration. Returns a list of warnings.
    pub fn validate(&self) -> Vec<String> {
        self.entries()
            .iter()
            .filter(|(_, ms)| *ms > MAX_PHASE_DELAY_MS)
            .map(|(name, ms)| {
                format!("timing.{name} is {ms}ms; the maximum is {MAX_PHASE_DELAY_MS}ms")
            })
            .collect()
    }
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Color theme name.
    pub theme: String,
    /// Redraw interval for spinners, in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            tick_rate_ms: 100,
        }
    }
}

/// What to do with phase updates that arrive after the run they belong to was reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleUpdatePolicy {
    /// Reset cancels the in-flight run and late updates are dropped.
    #[default]
    Discard,
    /// Reset leaves timers running and late updates still land, so a reset
    /// run can reappear on screen.
    Apply,
}

impl std::fmt::Display for StaleUpdatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaleUpdatePolicy::Discard => write!(f, "discard"),
            StaleUpdatePolicy::Apply => write!(f, "apply"),
        }
    }
}

/// Per-run behavior.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub stale_updates: StaleUpdatePolicy,
    /// Fixed RNG seed. When unset each run draws from OS entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl AppConfig {
    /// Validate the whole configuration, failing on the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = self.timing.validate();
        if self.ui.tick_rate_ms == 0 {
            problems.push("ui.tick_rate_ms must be greater than zero".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid {
                message: problems.join("; "),
            })
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("dev", "deepresearch", "deepresearch")
}

/// Path of the user-level config file, if a home directory can be resolved.
pub fn user_config_path() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".deepresearch").join("config.toml")
}

/// Directory for rolling log files.
pub fn log_dir() -> PathBuf {
    project_dirs()
        .map(|d| d.data_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `DEEPRESEARCH_`)
/// 3. Workspace-local config (`.deepresearch/config.toml`)
/// 4. User config (`~/.config/deepresearch/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&AppConfig>,
) -> Result<AppConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // DEEPRESEARCH_TIMING__RESEARCH_MS, DEEPRESEARCH_RUN__STALE_UPDATES, etc.
    figment = figment.merge(Env::prefixed("DEEPRESEARCH_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    let config: AppConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from one explicit file on top of the defaults.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .extract()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.timing.decomposition_ms, 2000);
        assert_eq!(config.timing.question_listing_ms, 1500);
        assert_eq!(config.timing.synthesis_ms, 2500);
        assert_eq!(config.ui.theme, "dark");
        assert_eq!(config.run.stale_updates, StaleUpdatePolicy::Discard);
        assert!(config.run.seed.is_none());
    }

    #[test]
    fn test_total_run_time() {
        let timing = TimingConfig::default();
        // 2000 + 1500 + 5 * (2000 + 1000) + 2000 + 2500 + 2000
        assert_eq!(timing.total_run_time(5), Duration::from_millis(25_000));
        assert_eq!(TimingConfig::instant().total_run_time(5), Duration::ZERO);
    }

    #[test]
    fn test_timing_validation() {
        let mut timing = TimingConfig::default();
        assert!(timing.validate().is_empty());

        timing.synthesis_ms = 90_000;
        let warnings = timing.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("synthesis_ms"));
    }

    #[test]
    fn test_zero_tick_rate_rejected() {
        let mut config = AppConfig::default();
        config.ui.tick_rate_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_stale_policy_display() {
        assert_eq!(StaleUpdatePolicy::Discard.to_string(), "discard");
        assert_eq!(StaleUpdatePolicy::Apply.to_string(), "apply");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.run.seed = Some(7);
        config.run.stale_updates = StaleUpdatePolicy::Apply;
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("stale_updates = \"apply\""));
        let deserialized: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_load_config_with_overrides() {
        let mut overrides = AppConfig::default();
        overrides.timing = TimingConfig::instant();
        overrides.run.seed = Some(42);

        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.timing, TimingConfig::instant());
        assert_eq!(config.run.seed, Some(42));
    }

    #[test]
    fn test_load_config_from_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".deepresearch");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[timing]\nresearch_ms = 500\n\n[ui]\ntheme = \"light\"\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.timing.research_ms, 500);
        assert_eq!(config.timing.gap_ms, 2000);
        assert_eq!(config.ui.theme, "light");
    }

    #[test]
    fn test_load_config_rejects_invalid_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".deepresearch");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            "[timing]\nverification_ms = 120000\n",
        )
        .unwrap();

        let err = load_config(Some(dir.path()), None).unwrap_err();
        assert!(err.to_string().contains("verification_ms"));
    }

    #[test]
    fn test_load_config_file_missing() {
        let err = load_config_file(Path::new("/nonexistent/deepresearch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_load_config_file_explicit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[run]\nstale_updates = \"apply\"\nseed = 9\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.run.stale_updates, StaleUpdatePolicy::Apply);
        assert_eq!(config.run.seed, Some(9));
    }

    #[test]
    fn test_workspace_config_path() {
        let path = workspace_config_path(Path::new("/tmp/ws"));
        assert_eq!(path, PathBuf::from("/tmp/ws/.deepresearch/config.toml"));
    }
}
