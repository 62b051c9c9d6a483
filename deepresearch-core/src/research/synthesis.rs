//! Report synthesis: merges accumulated findings into the final report.

use super::progress::{Finding, Report};
use rand::Rng;

/// Characters of an answer kept in its key-finding bullet.
pub const KEY_FINDING_CHARS: usize = 150;

/// Marker appended to every key finding.
pub const ELLIPSIS: &str = "...";

/// Knowledge-gap descriptions, always reported as a prefix of this list.
pub const GAP_TEMPLATES: [&str; 4] = [
    "Long-term longitudinal studies tracking outcomes over extended periods",
    "Comparative analysis across different geographic regions and demographics",
    "Detailed cost-benefit analyses with real-world implementation data",
    "Independent verification of results from diverse research groups",
];

/// Executive summary for a topic.
pub fn summary(topic: &str) -> String {
    format!(
        "This comprehensive research report on \"{topic}\" synthesizes findings from multiple \
         authoritative sources and expert perspectives. The analysis reveals a complex landscape \
         with significant developments, ongoing challenges, and important implications for \
         stakeholders. Through systematic examination of peer-reviewed literature and expert \
         opinions, this report provides evidence-based insights while acknowledging areas \
         requiring further investigation."
    )
}

/// Cut an answer to its first 150 characters and append the ellipsis marker.
///
/// The cut is a raw character count, not word-aware, and the marker is added
/// even when nothing was removed.
pub fn key_finding(answer: &str) -> String {
    let mut out: String = answer.chars().take(KEY_FINDING_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Build the final report from the topic and the findings, in order.
pub fn synthesize_report<R: Rng + ?Sized>(topic: &str, findings: &[Finding], rng: &mut R) -> Report {
    let gap_count = rng.gen_range(2..=3);

    Report {
        summary: summary(topic),
        key_findings: findings.iter().map(|f| key_finding(&f.answer)).collect(),
        detailed_analysis: findings
            .iter()
            .map(|f| f.answer.as_str())
            .collect::<Vec<_>>()
            .join("\n\n"),
        sources: findings
            .iter()
            .flat_map(|f| f.sources.iter().cloned())
            .collect(),
        gaps: GAP_TEMPLATES[..gap_count]
            .iter()
            .map(|g| g.to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn finding(answer: &str, sources: &[&str]) -> Finding {
        Finding {
            question: "Q?".into(),
            answer: answer.into(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_summary_contains_topic() {
        let s = summary("bees");
        assert!(s.starts_with("This comprehensive research report on \"bees\" synthesizes"));
        assert!(s.ends_with("requiring further investigation."));
    }

    #[test]
    fn test_key_finding_long_answer_is_cut() {
        let answer = "x".repeat(200);
        let key = key_finding(&answer);
        assert_eq!(key.len(), KEY_FINDING_CHARS + ELLIPSIS.len());
        assert!(key.ends_with("..."));
    }

    #[test]
    fn test_key_finding_short_answer_still_marked() {
        assert_eq!(key_finding("short"), "short...");
    }

    #[test]
    fn test_key_finding_cut_is_not_word_aware() {
        let answer = format!("{} tail", "word ".repeat(30));
        let key = key_finding(&answer);
        let body = key.strip_suffix(ELLIPSIS).unwrap();
        assert_eq!(body, &answer[..KEY_FINDING_CHARS]);
    }

    #[test]
    fn test_report_fields() {
        let findings = vec![
            finding("first answer", &["a", "b", "c"]),
            finding("second answer", &["d", "e", "f"]),
        ];
        let report = synthesize_report("topic", &findings, &mut StdRng::seed_from_u64(5));

        assert_eq!(report.key_findings, vec!["first answer...", "second answer..."]);
        assert_eq!(report.detailed_analysis, "first answer\n\nsecond answer");
        assert_eq!(report.sources, vec!["a", "b", "c", "d", "e", "f"]);
        assert!(report.gaps.len() == 2 || report.gaps.len() == 3);
    }

    #[test]
    fn test_gaps_are_prefix_of_templates() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let report = synthesize_report("t", &[], &mut rng);
            for (i, gap) in report.gaps.iter().enumerate() {
                assert_eq!(gap, GAP_TEMPLATES[i]);
            }
            seen.insert(report.gaps.len());
        }
        assert_eq!(seen, std::collections::HashSet::from([2, 3]));
    }

    #[test]
    fn test_empty_findings() {
        let report = synthesize_report("t", &[], &mut StdRng::seed_from_u64(0));
        assert!(report.key_findings.is_empty());
        assert!(report.detailed_analysis.is_empty());
        assert!(report.sources.is_empty());
    }
}
