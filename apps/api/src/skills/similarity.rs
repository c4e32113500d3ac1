//! Similarity Judge — decides whether two skills denote the same thing.
//!
//! Rules are evaluated in priority order and the first hit wins; there is no score
//! blending. The relation is NOT transitive: "aws" ~ "aws lambda" and
//! "aws lambda" ~ "lambda" does not make "aws" ~ "lambda". The grouping engine's
//! first-fit policy is what gives that its practical meaning.

use serde::{Deserialize, Serialize};

use crate::skills::normalizer::{MatchStrictness, Normalizer};

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Both keys must be at most this long for the shared-prefix rule to apply.
const SHORT_KEY_MAX_LEN: usize = 6;
const SHARED_PREFIX_LEN: usize = 4;
/// Both keys must be longer than this for the ratio rule to apply.
const RATIO_MIN_LEN: usize = 6;

/// Which rule matched two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    Exact,
    Containment,
    ShortPrefix,
    Ratio,
}

#[derive(Debug, Clone)]
pub struct SimilarityJudge {
    normalizer: Normalizer,
    containment: MatchStrictness,
    threshold: f64,
}

impl SimilarityJudge {
    pub fn new(normalizer: Normalizer, containment: MatchStrictness, threshold: f64) -> Self {
        Self {
            normalizer,
            containment,
            threshold,
        }
    }

    /// Normalizes both strings and checks every rule.
    pub fn should_group(&self, a: &str, b: &str) -> bool {
        let a_key = self.normalizer.normalize(a);
        let b_key = self.normalizer.normalize(b);
        self.match_rule(&a_key, &b_key).is_some()
    }

    /// Rule check on keys that are already normalized.
    pub fn keys_match(&self, a_key: &str, b_key: &str) -> bool {
        self.match_rule(a_key, b_key).is_some()
    }

    /// Returns the first rule that holds for two normalized keys.
    pub fn match_rule(&self, a_key: &str, b_key: &str) -> Option<MatchRule> {
        if a_key.is_empty() || b_key.is_empty() {
            return None;
        }
        if a_key == b_key {
            return Some(MatchRule::Exact);
        }
        if self.contains_either(a_key, b_key) {
            return Some(MatchRule::Containment);
        }

        let a_len = a_key.chars().count();
        let b_len = b_key.chars().count();

        if a_len <= SHORT_KEY_MAX_LEN
            && b_len <= SHORT_KEY_MAX_LEN
            && a_len >= SHARED_PREFIX_LEN
            && b_len >= SHARED_PREFIX_LEN
            && a_key.chars().take(SHARED_PREFIX_LEN).eq(b_key.chars().take(SHARED_PREFIX_LEN))
        {
            return Some(MatchRule::ShortPrefix);
        }

        if a_len > RATIO_MIN_LEN
            && b_len > RATIO_MIN_LEN
            && similarity_ratio(a_key, b_key) >= self.threshold
        {
            return Some(MatchRule::Ratio);
        }

        None
    }

    fn contains_either(&self, a: &str, b: &str) -> bool {
        match self.containment {
            MatchStrictness::WordBoundary => contains_words(a, b) || contains_words(b, a),
            MatchStrictness::Substring => a.contains(b) || b.contains(a),
        }
    }
}

/// Whole-word containment on space-separated keys: "go" is in "go lang" but not in
/// "django".
pub fn contains_words(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

/// Symmetric LCS ratio in `[0, 1]`: `2 * lcs(a, b) / (len(a) + len(b))`.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    // two-row DP over the shorter string
    let (long, short) = if a.len() >= b.len() { (&a, &b) } else { (&b, &a) };
    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for lc in long.iter() {
        for (j, sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (2 * prev[short.len()]) as f64 / total as f64
}
