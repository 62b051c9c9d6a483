//! Research progress snapshots and the display model derived from them.
//!
//! A `ResearchProgress` value is never edited in place: every phase
//! transition produces a new snapshot (see `machine::advance`).

use serde::{Deserialize, Serialize};

/// Current step of a research run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStep {
    /// Breaking the topic into sub-questions.
    Decomposition,
    /// Researching sub-questions one at a time.
    Research,
    /// Validating sources.
    Verification,
    /// Assembling the report.
    Synthesis,
    /// Listing knowledge gaps.
    Gap,
    /// Report available.
    Complete,
}

impl ResearchStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResearchStep::Decomposition => "decomposition",
            ResearchStep::Research => "research",
            ResearchStep::Verification => "verification",
            ResearchStep::Synthesis => "synthesis",
            ResearchStep::Gap => "gap",
            ResearchStep::Complete => "complete",
        }
    }
}

impl std::fmt::Display for ResearchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The simulated result of researching one sub-question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub question: String,
    pub answer: String,
    pub sources: Vec<String>,
}

/// The final synthesized report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub summary: String,
    pub key_findings: Vec<String>,
    pub detailed_analysis: String,
    pub sources: Vec<String>,
    pub gaps: Vec<String>,
}

/// One immutable snapshot of a research run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProgress {
    pub step: ResearchStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_questions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_question: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub findings: Option<Vec<Finding>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
}

impl ResearchProgress {
    /// The first snapshot of every run.
    pub fn started() -> Self {
        Self {
            step: ResearchStep::Decomposition,
            sub_questions: None,
            current_question: None,
            findings: None,
            report: None,
        }
    }

    pub fn sub_questions(&self) -> &[String] {
        self.sub_questions.as_deref().unwrap_or_default()
    }

    pub fn findings(&self) -> &[Finding] {
        self.findings.as_deref().unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.step == ResearchStep::Complete
    }

    /// Check the data-model invariants of a snapshot.
    pub fn is_consistent(&self) -> bool {
        let total = self.sub_questions().len();
        let findings_ok = self.findings().len() <= total;
        let cursor_ok = match self.current_question {
            Some(i) => self.step == ResearchStep::Research && i < total,
            None => true,
        };
        let report_ok = self.report.is_some() == self.is_complete();
        findings_ok && cursor_ok && report_ok
    }

    /// "Researching question 3 of 5", only while a question is in flight.
    pub fn research_status_line(&self) -> Option<String> {
        self.current_question.map(|i| {
            format!(
                "Researching question {} of {}",
                i + 1,
                self.sub_questions().len()
            )
        })
    }

    /// "Completed 2 of 5 sub-questions", once at least one finding exists.
    pub fn completed_status_line(&self) -> Option<String> {
        let done = self.findings().len();
        (done > 0).then(|| {
            format!(
                "Completed {} of {} sub-questions",
                done,
                self.sub_questions().len()
            )
        })
    }

    /// The phase cards to show, in order, with their status.
    pub fn visible_phases(&self) -> Vec<(DisplayPhase, PhaseStatus)> {
        DisplayPhase::ALL
            .iter()
            .filter(|phase| self.step >= phase.step())
            .map(|phase| {
                let status = if self.step == phase.step() {
                    PhaseStatus::Active
                } else {
                    PhaseStatus::Completed
                };
                (*phase, status)
            })
            .collect()
    }
}

/// Whether a phase card is the one currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Active,
    Completed,
}

/// The five phase cards of the progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayPhase {
    QueryDecomposition,
    MultiStepResearch,
    SourceVerification,
    ReportSynthesis,
    GapAnalysis,
}

impl DisplayPhase {
    pub const ALL: [DisplayPhase; 5] = [
        DisplayPhase::QueryDecomposition,
        DisplayPhase::MultiStepResearch,
        DisplayPhase::SourceVerification,
        DisplayPhase::ReportSynthesis,
        DisplayPhase::GapAnalysis,
    ];

    /// The step at which this card first appears.
    pub fn step(&self) -> ResearchStep {
        match self {
            DisplayPhase::QueryDecomposition => ResearchStep::Decomposition,
            DisplayPhase::MultiStepResearch => ResearchStep::Research,
            DisplayPhase::SourceVerification => ResearchStep::Verification,
            DisplayPhase::ReportSynthesis => ResearchStep::Synthesis,
            DisplayPhase::GapAnalysis => ResearchStep::Gap,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DisplayPhase::QueryDecomposition => "1. Query Decomposition",
            DisplayPhase::MultiStepResearch => "2. Multi-Step Research",
            DisplayPhase::SourceVerification => "3. Source Verification",
            DisplayPhase::ReportSynthesis => "4. Report Synthesis",
            DisplayPhase::GapAnalysis => "5. Gap Analysis",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DisplayPhase::QueryDecomposition => {
                "Breaking down the main topic into specific sub-questions for targeted research..."
            }
            DisplayPhase::MultiStepResearch => {
                "Conducting deep research on each sub-question and gathering sources..."
            }
            DisplayPhase::SourceVerification => {
                "Validating sources for credibility, recency, and relevance..."
            }
            DisplayPhase::ReportSynthesis => {
                "Synthesizing findings into a comprehensive, cohesive report..."
            }
            DisplayPhase::GapAnalysis => {
                "Identifying knowledge gaps and areas requiring further research..."
            }
        }
    }

    /// Note shown under a finished card.
    ///
    /// Decomposition and research report their own detail lines instead, and
    /// the gap card only shows its note once the report exists.
    pub fn completion_note(&self, current: ResearchStep) -> Option<&'static str> {
        match self {
            DisplayPhase::QueryDecomposition | DisplayPhase::MultiStepResearch => None,
            DisplayPhase::SourceVerification if current > ResearchStep::Verification => {
                Some("All sources verified and cross-referenced")
            }
            DisplayPhase::ReportSynthesis if current > ResearchStep::Synthesis => {
                Some("Report synthesized with key insights")
            }
            DisplayPhase::GapAnalysis if current == ResearchStep::Complete => {
                Some("Gap analysis completed")
            }
            _ => None,
        }
    }
}
