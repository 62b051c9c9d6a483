//! Property-based tests for the research tables and reducer.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use deepresearch_core::research::decomposition::{
    KEYWORD_GROUPS, SUB_QUESTION_COUNT, generate_sub_questions, match_group,
};
use deepresearch_core::research::findings::{
    SOURCE_DOMAINS, SOURCES_PER_FINDING, conduct_research, parse_source_url,
};
use deepresearch_core::research::machine::{ProgressEvent, advance};
use deepresearch_core::research::synthesis::{ELLIPSIS, GAP_TEMPLATES, synthesize_report};

fn findings_for(topic: &str, seed: u64) -> Vec<deepresearch_core::Finding> {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_sub_questions(topic)
        .iter()
        .map(|q| conduct_research(q, &mut rng))
        .collect()
}

// --- Decomposition ---

proptest! {
    #[test]
    fn decomposition_is_total_and_pure(topic in ".{1,80}") {
        let first = generate_sub_questions(&topic);
        let second = generate_sub_questions(&topic);
        prop_assert_eq!(first.len(), SUB_QUESTION_COUNT);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ai_wins_over_climate(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
        let topic = format!("{prefix}AI and CLIMATE{suffix}");
        let questions = generate_sub_questions(&topic);
        let expected: Vec<String> = KEYWORD_GROUPS[0].questions.iter().map(|q| q.to_string()).collect();
        prop_assert_eq!(questions, expected);
    }

    #[test]
    fn default_templates_contain_topic(topic in "[b-hj-z0-9 ]{1,30}") {
        // No 'a' or 'i' in the alphabet, so no keyword can match.
        prop_assume!(match_group(&topic).is_none());
        for question in generate_sub_questions(&topic) {
            prop_assert!(question.contains(&topic));
        }
    }
}

// --- Findings ---

proptest! {
    #[test]
    fn every_question_gets_three_wellformed_sources(topic in "[a-z ]{1,30}", seed in any::<u64>()) {
        let findings = findings_for(&topic, seed);
        prop_assert_eq!(findings.len(), SUB_QUESTION_COUNT);
        for finding in &findings {
            prop_assert_eq!(finding.sources.len(), SOURCES_PER_FINDING);
            for source in &finding.sources {
                let parsed = parse_source_url(source);
                prop_assert!(parsed.is_some(), "malformed source {}", source);
                let (domain, _) = parsed.unwrap();
                prop_assert!(SOURCE_DOMAINS.contains(&domain));
            }
        }
    }
}

// --- Synthesis ---

proptest! {
    #[test]
    fn key_findings_are_answer_prefixes(topic in "[a-z ]{1,30}", seed in any::<u64>()) {
        let findings = findings_for(&topic, seed);
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        let report = synthesize_report(&topic, &findings, &mut rng);

        prop_assert_eq!(report.key_findings.len(), findings.len());
        for (key, finding) in report.key_findings.iter().zip(&findings) {
            prop_assert!(key.chars().count() <= 153);
            let body = key.strip_suffix(ELLIPSIS).unwrap();
            prop_assert!(finding.answer.starts_with(body));
        }
    }

    #[test]
    fn report_sources_concatenate_in_order(topic in "[a-z ]{1,30}", seed in any::<u64>()) {
        let findings = findings_for(&topic, seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let report = synthesize_report(&topic, &findings, &mut rng);
        let expected: Vec<String> = findings.iter().flat_map(|f| f.sources.clone()).collect();
        prop_assert_eq!(report.sources, expected);
    }

    #[test]
    fn gaps_are_a_short_prefix(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let report = synthesize_report("topic", &[], &mut rng);
        prop_assert!(report.gaps.len() == 2 || report.gaps.len() == 3);
        for (gap, template) in report.gaps.iter().zip(GAP_TEMPLATES.iter()) {
            prop_assert_eq!(gap.as_str(), *template);
        }
    }
}

// --- Reducer ---

proptest! {
    #[test]
    fn reducer_keeps_snapshots_consistent(topic in "[a-z ]{1,30}", seed in any::<u64>()) {
        let questions = generate_sub_questions(&topic);
        let mut rng = StdRng::seed_from_u64(seed);

        let mut progress = advance(None, ProgressEvent::Started);
        prop_assert!(progress.is_consistent());
        progress = advance(Some(&progress), ProgressEvent::Decomposed { sub_questions: questions.clone() });
        for (index, question) in questions.iter().enumerate() {
            progress = advance(Some(&progress), ProgressEvent::QuestionStarted { index });
            prop_assert!(progress.is_consistent());
            let finding = conduct_research(question, &mut rng);
            progress = advance(Some(&progress), ProgressEvent::FindingRecorded { finding });
            prop_assert!(progress.is_consistent());
            prop_assert_eq!(progress.findings().len(), index + 1);
        }
        for event in [
            ProgressEvent::VerificationStarted,
            ProgressEvent::SynthesisStarted,
            ProgressEvent::GapAnalysisStarted,
        ] {
            let before = progress.step;
            progress = advance(Some(&progress), event);
            prop_assert!(progress.step > before);
            prop_assert!(progress.current_question.is_none());
        }
        let report = synthesize_report(&topic, progress.findings(), &mut rng);
        progress = advance(Some(&progress), ProgressEvent::Completed { report });
        prop_assert!(progress.is_complete());
        prop_assert!(progress.is_consistent());
    }
}
