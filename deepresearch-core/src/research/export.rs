//! Rendering a finished run as Markdown or JSON.

use super::progress::{Finding, Report, ResearchProgress};
use crate::error::{ExportError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Output format for exported reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            other => Err(ExportError::UnknownFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// JSON document for a finished run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEnvelope {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    pub sub_questions: Vec<String>,
    pub findings: Vec<Finding>,
    pub report: Report,
}

fn completed_report(progress: &ResearchProgress) -> std::result::Result<&Report, ExportError> {
    progress.report.as_ref().ok_or_else(|| ExportError::NotComplete {
        step: progress.step.to_string(),
    })
}

/// Render the report view as Markdown.
pub fn render_markdown(
    topic: &str,
    progress: &ResearchProgress,
) -> std::result::Result<String, ExportError> {
    let report = completed_report(progress)?;

    let mut out = format!("# Research Report: {topic}\n\n");

    out.push_str("## Executive Summary\n\n");
    out.push_str(&report.summary);
    out.push_str("\n\n");

    out.push_str("## Key Findings\n\n");
    for finding in &report.key_findings {
        out.push_str(&format!("- {finding}\n"));
    }

    out.push_str("\n## Detailed Analysis\n\n");
    for finding in progress.findings() {
        out.push_str(&format!("### {}\n\n{}\n\n", finding.question, finding.answer));
        out.push_str("**Sources:**\n\n");
        for source in &finding.sources {
            out.push_str(&format!("- <{source}>\n"));
        }
        out.push('\n');
    }

    out.push_str("## Gap Analysis\n\n");
    out.push_str(
        "Areas identified that require additional research or have limited information:\n\n",
    );
    for gap in &report.gaps {
        out.push_str(&format!("- {gap}\n"));
    }

    Ok(out)
}

/// Build the JSON envelope for a finished run.
pub fn envelope(
    topic: &str,
    run_id: Option<Uuid>,
    progress: &ResearchProgress,
) -> std::result::Result<ReportEnvelope, ExportError> {
    let report = completed_report(progress)?;
    Ok(ReportEnvelope {
        topic: topic.to_string(),
        run_id,
        generated_at: Utc::now(),
        sub_questions: progress.sub_questions().to_vec(),
        findings: progress.findings().to_vec(),
        report: report.clone(),
    })
}

/// Render a finished run in the requested format.
pub fn render(
    format: ExportFormat,
    topic: &str,
    run_id: Option<Uuid>,
    progress: &ResearchProgress,
) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(topic, progress)?),
        ExportFormat::Json => {
            let doc = envelope(topic, run_id, progress)?;
            Ok(serde_json::to_string_pretty(&doc)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeepResearchError;
    use crate::research::progress::ResearchStep;

    fn finished() -> ResearchProgress {
        let findings = vec![Finding {
            question: "What is X?".into(),
            answer: "X is a thing.".into(),
            sources: vec!["https://www.cell.com/research/abc12".into()],
        }];
        ResearchProgress {
            step: ResearchStep::Complete,
            sub_questions: Some(vec!["What is X?".into()]),
            current_question: None,
            findings: Some(findings),
            report: Some(Report {
                summary: "Summary text.".into(),
                key_findings: vec!["X is a thing....".into()],
                detailed_analysis: "X is a thing.".into(),
                sources: vec!["https://www.cell.com/research/abc12".into()],
                gaps: vec!["Gap one".into(), "Gap two".into()],
            }),
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "pdf".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat { .. })
        ));
    }

    #[test]
    fn test_markdown_sections() {
        let md = render_markdown("X", &finished()).unwrap();
        assert!(md.starts_with("# Research Report: X\n"));
        assert!(md.contains("## Executive Summary\n\nSummary text."));
        assert!(md.contains("- X is a thing...."));
        assert!(md.contains("### What is X?"));
        assert!(md.contains("- <https://www.cell.com/research/abc12>"));
        assert!(md.contains("- Gap two"));
    }

    #[test]
    fn test_markdown_requires_complete() {
        let progress = ResearchProgress::started();
        let err = render_markdown("X", &progress).unwrap_err();
        assert!(matches!(err, ExportError::NotComplete { ref step } if step == "decomposition"));
    }

    #[test]
    fn test_json_envelope() {
        let run_id = Uuid::new_v4();
        let json = render(ExportFormat::Json, "X", Some(run_id), &finished()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["topic"], "X");
        assert_eq!(value["runId"], run_id.to_string());
        assert_eq!(value["report"]["keyFindings"][0], "X is a thing....");
        assert_eq!(value["findings"][0]["sources"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_render_incomplete_is_export_error() {
        let err = render(ExportFormat::Json, "X", None, &ResearchProgress::started()).unwrap_err();
        assert!(matches!(err, DeepResearchError::Export(_)));
    }
}
