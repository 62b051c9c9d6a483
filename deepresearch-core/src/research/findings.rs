//! Simulated research: canned insights and fabricated source URLs.
//!
//! Every function takes its random source explicitly so tests can seed it.

use super::progress::Finding;
use rand::Rng;
use rand::seq::SliceRandom;

/// Canned analytical sentences a finding's answer is drawn from.
pub const INSIGHTS: [&str; 5] = [
    "Recent studies have shown significant advancements in this area, with multiple peer-reviewed publications highlighting breakthrough discoveries.",
    "Experts in the field emphasize that while progress has been substantial, there remain important considerations regarding implementation and scalability.",
    "Analysis of available data indicates both promising opportunities and notable challenges that require careful attention from stakeholders.",
    "Cross-sectional research reveals diverse perspectives, with general consensus on fundamental principles but ongoing debate about specific approaches.",
    "Evidence from multiple sources suggests that this aspect has far-reaching implications that extend beyond the immediate scope of initial inquiry.",
];

/// Domain and path prefixes used to build source URLs.
pub const SOURCE_DOMAINS: [&str; 8] = [
    "nature.com/articles",
    "science.org/doi",
    "ncbi.nlm.nih.gov/pmc",
    "academic.oup.com",
    "ieee.org/document",
    "thelancet.com/journals",
    "jama.jamanetwork.com",
    "cell.com/research",
];

/// Sources attached to every finding.
pub const SOURCES_PER_FINDING: usize = 3;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A random base-36 token of 5 or 6 characters.
pub fn source_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    let len = rng.gen_range(5..=6);
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// A fabricated `https://www.{domain}/{token}` source URL.
pub fn source_url<R: Rng + ?Sized>(rng: &mut R) -> String {
    let domain = SOURCE_DOMAINS.choose(rng).copied().unwrap_or(SOURCE_DOMAINS[0]);
    format!("https://www.{}/{}", domain, source_token(rng))
}

/// Produce the finding for one sub-question.
///
/// Sources are drawn independently; duplicates are possible and left alone.
pub fn conduct_research<R: Rng + ?Sized>(question: &str, rng: &mut R) -> Finding {
    let answer = INSIGHTS.choose(rng).copied().unwrap_or(INSIGHTS[0]);
    let sources = (0..SOURCES_PER_FINDING).map(|_| source_url(rng)).collect();

    Finding {
        question: question.to_string(),
        answer: answer.to_string(),
        sources,
    }
}

/// Split a source URL into its domain entry and token, if it has the expected shape.
pub fn parse_source_url(url: &str) -> Option<(&'static str, &str)> {
    let rest = url.strip_prefix("https://www.")?;
    SOURCE_DOMAINS.iter().find_map(|domain| {
        let token = rest.strip_prefix(domain)?.strip_prefix('/')?;
        let valid = (5..=6).contains(&token.len())
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase());
        valid.then_some((*domain, token))
    })
}
