//! Rollup Projector — re-derives a record's per-category relevance from the final
//! category map and the record's own `{Name, RelevancePercentage}` entries.
//!
//! Pure aggregation: weights are summed per category (never replaced), rounded to two
//! decimals, then sorted by relevance descending. Equal relevance sorts by category name
//! so the output stays byte-stable.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::skills::engine::CategoryMap;

/// Bucket for record skills that are absent from the category map (discarded or
/// never seen by the run).
pub const UNCATEGORIZED: &str = "UNCATEGORIZED";

/// One skill entry of a record, as far as the rollup cares.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSkill {
    pub name: String,
    /// 0–100. Missing weights count as zero.
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRelevance {
    pub category: String,
    pub relevance: f64,
}

/// Reverse index: raw skill string → bucket it ended up in.
#[derive(Debug, Clone, Default)]
pub struct RollupIndex {
    by_skill: HashMap<String, String>,
}

impl RollupIndex {
    pub fn new(categories: &CategoryMap) -> Self {
        let by_skill = categories
            .iter()
            .flat_map(|(category, skills)| {
                skills
                    .iter()
                    .map(move |skill| (skill.clone(), category.clone()))
            })
            .collect();
        Self { by_skill }
    }

    pub fn category_of(&self, raw_skill: &str) -> &str {
        self.by_skill
            .get(raw_skill)
            .map(String::as_str)
            .unwrap_or(UNCATEGORIZED)
    }

    /// Sums one record's weights per category.
    pub fn project(&self, skills: &[WeightedSkill]) -> Vec<CategoryRelevance> {
        let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
        for skill in skills {
            *totals.entry(self.category_of(&skill.name)).or_default() +=
                skill.relevance.unwrap_or(0.0);
        }

        let mut rollup: Vec<CategoryRelevance> = totals
            .into_iter()
            .map(|(category, total)| CategoryRelevance {
                category: category.to_string(),
                relevance: round2(total),
            })
            .collect();

        rollup.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.category.cmp(&b.category))
        });
        rollup
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
