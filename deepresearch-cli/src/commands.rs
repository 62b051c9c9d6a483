//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use deepresearch_core::config::{self, AppConfig, TimingConfig};
use deepresearch_core::research::decomposition::SUB_QUESTION_COUNT;
use deepresearch_core::research::export::{ExportFormat, render};
use deepresearch_core::research::runner::{
    PhaseDelays, ResearchRunner, RunOutcome, run_rng, spawn_run,
};
use deepresearch_core::{ExportError, ResearchController, ResearchProgress, ResearchStep};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config_path: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            topic,
            context,
            format,
            output,
            instant,
            seed,
        } => {
            let config = load_effective_config(workspace, config_path)?;
            let request = RunRequest {
                topic,
                context: context.unwrap_or_default(),
                format: format.parse()?,
                output,
                instant,
                seed,
            };
            handle_run(request, config, quiet).await
        }
        Commands::Config { action } => handle_config(action, workspace, config_path),
    }
}

/// Load the configuration the way every entry point does.
pub fn load_effective_config(
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(Some(workspace), None),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
}

/// Parsed arguments of `deepresearch run`.
#[derive(Debug)]
pub struct RunRequest {
    pub topic: String,
    pub context: String,
    pub format: ExportFormat,
    pub output: Option<PathBuf>,
    pub instant: bool,
    pub seed: Option<u64>,
}

async fn handle_run(request: RunRequest, config: AppConfig, quiet: bool) -> anyhow::Result<()> {
    let mut controller = ResearchController::new(config.run.stale_updates);
    controller.set_topic(request.topic.as_str());
    controller.set_additional_context(request.context.as_str());

    let ticket = controller
        .submit()
        .ok_or_else(|| anyhow::anyhow!("Research topic must not be blank"))?;
    let run_id = ticket.run_id;
    let cancel = ticket.cancel.clone();

    let timing = if request.instant {
        TimingConfig::instant()
    } else {
        config.timing.clone()
    };
    tracing::info!(
        %run_id,
        expected_secs = timing.total_run_time(SUB_QUESTION_COUNT).as_secs_f64(),
        "starting headless research run"
    );

    let rng = run_rng(request.seed.or(config.run.seed));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let handle = spawn_run(ResearchRunner::new(PhaseDelays::from(&timing), rng), ticket, tx);

    let mut last_line = String::new();
    loop {
        tokio::select! {
            update = rx.recv() => {
                let Some(update) = update else { break };
                if !quiet {
                    let line = describe_progress(&update.progress);
                    if line != last_line {
                        eprintln!("{}", line);
                        if update.progress.step == ResearchStep::Decomposition {
                            for (i, question) in update.progress.sub_questions().iter().enumerate() {
                                eprintln!("  {}. {}", i + 1, question);
                            }
                        }
                        last_line = line;
                    }
                }
                controller.apply(update);
            }
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                controller.reset();
                anyhow::bail!("Research cancelled");
            }
        }
    }

    match handle.await? {
        RunOutcome::Completed(_) => {}
        RunOutcome::Cancelled => anyhow::bail!("Research run was cancelled"),
    }

    let progress = controller.progress().ok_or(ExportError::NoProgress)?;
    let rendered = render(request.format, &request.topic, Some(run_id), progress)?;

    match request.output {
        Some(path) => {
            std::fs::write(&path, &rendered)?;
            if !quiet {
                eprintln!("Report written to {}", path.display());
            }
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

/// One status line for the phase a snapshot is in.
pub fn describe_progress(progress: &ResearchProgress) -> String {
    let Some((phase, _)) = progress.visible_phases().last().copied() else {
        return progress.step.to_string();
    };

    if progress.is_complete() {
        return match progress.completed_status_line() {
            Some(done) => format!("Research complete: {}", done),
            None => "Research complete".to_string(),
        };
    }

    match (
        progress.research_status_line(),
        progress.completed_status_line(),
    ) {
        (Some(current), Some(done)) => format!("{}: {} ({})", phase.title(), current, done),
        (Some(current), None) => format!("{}: {}", phase.title(), current),
        _ if progress.step == ResearchStep::Decomposition && !progress.sub_questions().is_empty() => {
            format!("{}: {} sub-questions", phase.title(), progress.sub_questions().len())
        }
        _ => format!("{}: {}", phase.title(), phase.description()),
    }
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let toml_str = toml::to_string_pretty(&AppConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_effective_config(workspace, config_path)?;
            let toml_str = toml::to_string_pretty(&config)?;
            println!("{}", toml_str);
            Ok(())
        }
        ConfigAction::Path => {
            match config::user_config_path() {
                Some(path) => println!("User config:      {}", path.display()),
                None => println!("User config:      (no home directory)"),
            }
            println!(
                "Workspace config: {}",
                config::workspace_config_path(workspace).display()
            );
            if let Some(path) = config_path {
                println!("Explicit config:  {}", path.display());
            }
            println!("Logs:             {}", config::log_dir().display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepresearch_core::research::machine::{ProgressEvent, advance};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn decomposed() -> ResearchProgress {
        advance(
            Some(&ResearchProgress::started()),
            ProgressEvent::Decomposed {
                sub_questions: vec!["q1".into(), "q2".into()],
            },
        )
    }

    #[test]
    fn test_describe_started() {
        assert_eq!(
            describe_progress(&ResearchProgress::started()),
            format!(
                "1. Query Decomposition: {}",
                deepresearch_core::DisplayPhase::QueryDecomposition.description()
            )
        );
    }

    #[test]
    fn test_describe_decomposed() {
        assert_eq!(
            describe_progress(&decomposed()),
            "1. Query Decomposition: 2 sub-questions"
        );
    }

    #[test]
    fn test_describe_research() {
        let progress = advance(Some(&decomposed()), ProgressEvent::QuestionStarted { index: 0 });
        assert_eq!(
            describe_progress(&progress),
            "2. Multi-Step Research: Researching question 1 of 2"
        );
    }

    #[test]
    fn test_config_init_creates_file() {
        let dir = TempDir::new().unwrap();
        handle_config(ConfigAction::Init, dir.path(), None).unwrap();

        let path = config::workspace_config_path(dir.path());
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: AppConfig = toml::from_str(&content).unwrap();
        assert_eq!(parsed, AppConfig::default());
    }

    #[test]
    fn test_config_init_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = config::workspace_config_path(dir.path());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "[timing]\nresearch_ms = 10\n").unwrap();

        handle_config(ConfigAction::Init, dir.path(), None).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "[timing]\nresearch_ms = 10\n"
        );
    }

    #[test]
    fn test_load_explicit_config_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_effective_config(dir.path(), Some(&missing)).is_err());
    }

    #[tokio::test]
    async fn test_instant_run_writes_json() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("report.json");
        let request = RunRequest {
            topic: "bees".into(),
            context: String::new(),
            format: ExportFormat::Json,
            output: Some(out.clone()),
            instant: true,
            seed: Some(11),
        };
        handle_run(request, AppConfig::default(), true).await.unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("\"topic\": \"bees\""));
        assert!(content.contains("\"keyFindings\""));
    }

    #[tokio::test]
    async fn test_blank_topic_is_rejected() {
        let request = RunRequest {
            topic: "   ".into(),
            context: String::new(),
            format: ExportFormat::Markdown,
            output: None,
            instant: true,
            seed: None,
        };
        let err = handle_run(request, AppConfig::default(), true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("must not be blank"));
    }
}
