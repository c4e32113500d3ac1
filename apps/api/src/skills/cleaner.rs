//! Text Cleaner — strips parentheticals, boilerplate lead-ins and trailing punctuation
//! from a raw skill string before it is filtered or normalized.

use once_cell::sync::Lazy;
use regex::Regex;

/// `(...)` and `[...]` spans. Unclosed brackets are left alone.
static BRACKETED_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)|\[[^\]]*\]").expect("bracketed span regex"));

/// Lead-in phrases that wrap a skill without being part of it.
/// Matched only as whole words at the start of the string; applied repeatedly,
/// so "strong experience with rust" loses both "strong" and "experience with".
const BOILERPLATE_PREFIXES: &[&str] = &[
    "hands-on experience with",
    "hands-on experience in",
    "working knowledge of",
    "proficiency in",
    "proficiency with",
    "proficient in",
    "proficient with",
    "experience with",
    "experience in",
    "experience using",
    "knowledge of",
    "expertise in",
    "expertise with",
    "familiarity with",
    "familiar with",
    "understanding of",
    "ability to",
    "excellent",
    "advanced",
    "strong",
    "solid",
];

const BULLET_MARKERS: &[char] = &['-', '*', '•', '·', '>'];

/// Cleans a raw skill string. Empty input yields an empty string.
///
/// Steps, in order:
/// 1. lowercase + trim, drop leading bullet markers
/// 2. remove bracketed spans, collapse whitespace
/// 3. strip boilerplate lead-ins (repeatedly)
/// 4. strip trailing sentence punctuation (`#` and `+` are kept: "c#", "c++")
pub fn clean_skill(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let unbulleted = lowered
        .trim()
        .trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c.is_whitespace());

    let without_spans = BRACKETED_SPAN_RE.replace_all(unbulleted, " ");
    let mut cleaned = collapse_whitespace(&without_spans);

    while let Some(rest) = strip_boilerplate_prefix(&cleaned) {
        cleaned = rest.to_string();
    }

    cleaned
        .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | '!' | '?') || c.is_whitespace())
        .to_string()
}

fn strip_boilerplate_prefix(text: &str) -> Option<&str> {
    BOILERPLATE_PREFIXES.iter().find_map(|prefix| {
        let rest = text.strip_prefix(prefix)?;
        // "strong" must not eat the front of "strongswan"
        if rest.is_empty() || rest.starts_with(' ') {
            Some(rest.trim_start())
        } else {
            None
        }
    })
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
