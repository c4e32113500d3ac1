//! Taxonomy Matcher — resolves a skill to exactly one category path.
//!
//! Keywords are normalized with the same `Normalizer` as the skills, once, when the
//! matcher is built. A lookup walks the entries in the taxonomy's priority order and
//! returns the first path with a whole-word keyword hit. Ties go to declaration order,
//! never to keyword length. No hit → `GENERAL_TECH`.

use crate::skills::normalizer::Normalizer;
use crate::skills::similarity::contains_words;
use crate::taxonomy::Taxonomy;

pub const FALLBACK_CATEGORY: &str = "GENERAL_TECH";

#[derive(Debug, Clone)]
struct MatcherEntry {
    path: String,
    keyword_keys: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    normalizer: Normalizer,
    entries: Vec<MatcherEntry>,
}

impl CategoryMatcher {
    pub fn new(taxonomy: &Taxonomy, normalizer: Normalizer) -> Self {
        let entries = taxonomy
            .entries()
            .iter()
            .map(|entry| {
                let mut keyword_keys: Vec<String> = entry
                    .keywords
                    .iter()
                    .map(|k| normalizer.normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect();
                keyword_keys.dedup();
                MatcherEntry {
                    path: entry.path.clone(),
                    keyword_keys,
                }
            })
            .collect();

        Self {
            normalizer,
            entries,
        }
    }

    /// Normalizes the skill, then resolves its category. Total: never fails.
    pub fn categorize(&self, skill: &str) -> &str {
        self.categorize_key(&self.normalizer.normalize(skill))
    }

    /// Resolves the category for an already-normalized key.
    pub fn categorize_key(&self, key: &str) -> &str {
        if key.is_empty() {
            return FALLBACK_CATEGORY;
        }
        self.entries
            .iter()
            .find(|entry| entry.keyword_keys.iter().any(|kw| contains_words(key, kw)))
            .map(|entry| entry.path.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }
}
