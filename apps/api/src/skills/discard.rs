//! Discard Filter — flags cleaned strings that are not skills at all.
//!
//! Heuristic and advisory: false positives and negatives are expected. The goal is to
//! keep experience-duration phrases, sentences and hiring boilerplate out of the buckets.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const MIN_SKILL_CHARS: usize = 2;
const MAX_SKILL_WORDS: usize = 6;

/// "5+ years", "3 yrs", "minimum 2 years", "at least five years".
static EXPERIENCE_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\d+\s*\+?\s*(?:years?|yrs?)\b|\b(?:minimum|at least)\s+(?:of\s+)?(?:\d+|one|two|three|four|five|six|seven|eight|nine|ten)\+?\s+(?:years?|yrs?)\b",
    )
    .expect("experience duration regex")
});

const NON_SKILL_PHRASES: &[&str] = &[
    "years of experience",
    "year of experience",
    "years experience",
    "bachelor",
    "degree",
    "diploma",
    "valid driver",
    "ability to",
    "knowledge of",
    "understanding of",
    "legally able to work",
    "eligible to work",
    "must be able to",
    "equal opportunity",
];

/// Why a string was discarded. Exposed for the diagnostic classify endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    TooShort,
    Sentence,
    ExperienceDuration,
    Boilerplate,
}

/// Returns the first discard rule the cleaned string trips, if any.
pub fn discard_reason(cleaned: &str) -> Option<DiscardReason> {
    if cleaned.chars().count() < MIN_SKILL_CHARS {
        return Some(DiscardReason::TooShort);
    }
    if cleaned.split_whitespace().count() > MAX_SKILL_WORDS {
        return Some(DiscardReason::Sentence);
    }
    if EXPERIENCE_DURATION_RE.is_match(cleaned) {
        return Some(DiscardReason::ExperienceDuration);
    }
    if NON_SKILL_PHRASES.iter().any(|p| cleaned.contains(p)) {
        return Some(DiscardReason::Boilerplate);
    }
    None
}

/// True when the cleaned string should be dropped before grouping.
pub fn should_discard(cleaned: &str) -> bool {
    discard_reason(cleaned).is_some()
}
