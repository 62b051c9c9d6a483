//! The progress state machine as a pure reducer.
//!
//! `advance` takes the previous snapshot and one event and returns a brand-new
//! snapshot. Events that would break the data-model invariants leave the
//! snapshot as it was: questions are researched strictly in order, and each
//! one records at most one finding.

use super::progress::{Finding, Report, ResearchProgress, ResearchStep};

/// Something that happened during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Submission accepted; decomposition begins.
    Started,
    /// Sub-questions are known.
    Decomposed { sub_questions: Vec<String> },
    /// Research on question `index` begins.
    QuestionStarted { index: usize },
    /// The in-flight question produced its finding.
    FindingRecorded { finding: Finding },
    VerificationStarted,
    SynthesisStarted,
    GapAnalysisStarted,
    /// The report is ready.
    Completed { report: Report },
}

impl ProgressEvent {
    /// The step the resulting snapshot will be in.
    pub fn step(&self) -> ResearchStep {
        match self {
            ProgressEvent::Started | ProgressEvent::Decomposed { .. } => {
                ResearchStep::Decomposition
            }
            ProgressEvent::QuestionStarted { .. } | ProgressEvent::FindingRecorded { .. } => {
                ResearchStep::Research
            }
            ProgressEvent::VerificationStarted => ResearchStep::Verification,
            ProgressEvent::SynthesisStarted => ResearchStep::Synthesis,
            ProgressEvent::GapAnalysisStarted => ResearchStep::Gap,
            ProgressEvent::Completed { .. } => ResearchStep::Complete,
        }
    }
}

/// Produce the next snapshot.
pub fn advance(previous: Option<&ResearchProgress>, event: ProgressEvent) -> ResearchProgress {
    let base = previous.cloned().unwrap_or_else(ResearchProgress::started);
    let step = event.step();

    match event {
        ProgressEvent::Started => ResearchProgress::started(),
        ProgressEvent::Decomposed { sub_questions } => ResearchProgress {
            step,
            sub_questions: Some(sub_questions),
            current_question: None,
            findings: None,
            report: None,
        },
        ProgressEvent::QuestionStarted { index } => {
            if index >= base.sub_questions().len() {
                tracing::warn!(index, "ignoring research start for unknown sub-question");
                return base;
            }
            let answered = base.findings().len();
            if index != answered {
                tracing::warn!(index, answered, "ignoring out-of-order research start");
                return base;
            }
            ResearchProgress {
                step,
                current_question: Some(index),
                findings: Some(base.findings().to_vec()),
                report: None,
                ..base
            }
        }
        ProgressEvent::FindingRecorded { finding } => {
            // The question in flight is the next unanswered one.
            if base.current_question != Some(base.findings().len())
                || base.findings().len() >= base.sub_questions().len()
            {
                tracing::warn!("ignoring finding with no sub-question in flight");
                return base;
            }
            let mut findings = base.findings().to_vec();
            findings.push(finding);
            ResearchProgress {
                step,
                findings: Some(findings),
                report: None,
                ..base
            }
        }
        ProgressEvent::VerificationStarted
        | ProgressEvent::SynthesisStarted
        | ProgressEvent::GapAnalysisStarted => ResearchProgress {
            step,
            current_question: None,
            report: None,
            ..base
        },
        ProgressEvent::Completed { report } => ResearchProgress {
            step,
            current_question: None,
            report: Some(report),
            ..base
        },
    }
}
