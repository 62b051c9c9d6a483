//! Topic decomposition into a fixed set of sub-questions.
//!
//! Matching is a case-insensitive substring test against an ordered list of
//! keyword groups. The first group with any hit decides the questions; topics
//! that match nothing get generic templates with the topic spliced in.

/// Number of sub-questions every decomposition produces.
pub const SUB_QUESTION_COUNT: usize = 5;

/// A keyword group and the questions it maps to.
#[derive(Debug)]
pub struct KeywordGroup {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub questions: [&'static str; SUB_QUESTION_COUNT],
}

/// Keyword groups in match order.
pub const KEYWORD_GROUPS: [KeywordGroup; 3] = [
    KeywordGroup {
        name: "ai",
        keywords: &["ai", "artificial intelligence"],
        questions: [
            "What are the current applications and implementations of this technology?",
            "What are the documented benefits and success stories?",
            "What are the challenges, limitations, and risks identified?",
            "What do experts and research studies say about future implications?",
            "What regulatory, ethical, or societal considerations exist?",
        ],
    },
    KeywordGroup {
        name: "climate",
        keywords: &["climate", "environment"],
        questions: [
            "What is the current state and recent trends in this area?",
            "What are the primary contributing factors and causes?",
            "What solutions and interventions have been proposed or implemented?",
            "What is the scientific consensus and evidence base?",
            "What are the economic and policy implications?",
        ],
    },
    KeywordGroup {
        name: "economy",
        keywords: &["economy", "economic"],
        questions: [
            "What are the current economic indicators and trends?",
            "What are the primary drivers and influencing factors?",
            "How do different stakeholders and experts view this issue?",
            "What are the historical precedents and patterns?",
            "What are the potential future scenarios and projections?",
        ],
    },
];

/// Find the first keyword group the topic falls into.
pub fn match_group(topic: &str) -> Option<&'static KeywordGroup> {
    let lower = topic.to_lowercase();
    KEYWORD_GROUPS
        .iter()
        .find(|group| group.keywords.iter().any(|kw| lower.contains(kw)))
}

/// Break a topic into exactly five sub-questions.
///
/// Pure: the same topic always yields the same questions. The raw topic text
/// (not the lowercased form) is used when filling the default templates.
pub fn generate_sub_questions(topic: &str) -> Vec<String> {
    match match_group(topic) {
        Some(group) => group.questions.iter().map(|q| q.to_string()).collect(),
        None => vec![
            format!("What is the current state and recent developments in {topic}?"),
            format!("What are the key benefits and advantages of {topic}?"),
            format!("What challenges and criticisms exist regarding {topic}?"),
            format!("What do experts and authoritative sources say about {topic}?"),
            format!("What are the future trends and implications for {topic}?"),
        ],
    }
}
