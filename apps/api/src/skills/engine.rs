//! Grouping Engine — raw skill strings in, category buckets out.
//!
//! # Stages
//! 0. prepare: clean, discard-filter, normalize, resolve each skill's own category
//! 1. cluster: longest-first, first-fit against group representatives, in creation order
//! 2. consolidate: undersized groups fold into their representative's taxonomy bucket;
//!    large groups either keep their own bucket or fold too, per settings
//! 3. reclassify (optional): re-check the discard filter and move each member of a
//!    taxonomy-derived bucket to its own category
//!
//! A large group kept as its own bucket is keyed by its raw representative. When that
//! text equals a taxonomy path (say a group led by "AWS" next to an `AWS` category) the
//! two share one bucket. That is accepted; `RunStats::merged_buckets` lists where it
//! happened.
//!
//! Single-threaded and deterministic. Clustering is first-fit over an ordered `Vec`, so
//! the result depends on input order and on the non-transitive similarity relation.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::skills::cleaner::clean_skill;
use crate::skills::discard::{discard_reason, should_discard, DiscardReason};
use crate::skills::normalizer::{MatchStrictness, Normalizer};
use crate::skills::similarity::{SimilarityJudge, DEFAULT_SIMILARITY_THRESHOLD};
use crate::taxonomy::{CategoryMatcher, Taxonomy, FALLBACK_CATEGORY};

pub const DEFAULT_MIN_GROUP_SIZE: usize = 5;

/// Final output: category path (or large-group representative) → sorted raw skills.
pub type CategoryMap = BTreeMap<String, Vec<String>>;

// ────────────────────────────────────────────────────────────────────────────
// Settings
// ────────────────────────────────────────────────────────────────────────────

/// Every knob of a run. One run uses one settings value throughout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Groups with fewer members fold into a taxonomy bucket.
    pub min_group_size: usize,
    /// Groups of at least `min_group_size` keep a bucket keyed by their representative
    /// and are exempt from per-member reclassification. When false they are routed
    /// through the taxonomy like any other group.
    pub keep_large_groups_as_own_category: bool,
    /// Run stage 3.
    pub reclassify: bool,
    pub alias_matching: MatchStrictness,
    pub containment_matching: MatchStrictness,
    pub similarity_threshold: f64,
    /// Stage 1 only joins a group when both sides resolve to the same category, or the
    /// incoming skill resolves to the fallback.
    pub category_gate: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            keep_large_groups_as_own_category: true,
            reclassify: false,
            alias_matching: MatchStrictness::WordBoundary,
            containment_matching: MatchStrictness::WordBoundary,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            category_gate: false,
        }
    }
}

/// Partial settings supplied per request; unset fields keep the service defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineOverrides {
    pub min_group_size: Option<usize>,
    pub keep_large_groups_as_own_category: Option<bool>,
    pub reclassify: Option<bool>,
    pub alias_matching: Option<MatchStrictness>,
    pub containment_matching: Option<MatchStrictness>,
    pub similarity_threshold: Option<f64>,
    pub category_gate: Option<bool>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("min_group_size must be at least 1")]
    MinGroupSize,

    #[error("similarity_threshold must be within [0, 1], got {0}")]
    SimilarityThreshold(f64),
}

impl EngineSettings {
    pub fn with_overrides(&self, overrides: &EngineOverrides) -> Self {
        Self {
            min_group_size: overrides.min_group_size.unwrap_or(self.min_group_size),
            keep_large_groups_as_own_category: overrides
                .keep_large_groups_as_own_category
                .unwrap_or(self.keep_large_groups_as_own_category),
            reclassify: overrides.reclassify.unwrap_or(self.reclassify),
            alias_matching: overrides.alias_matching.unwrap_or(self.alias_matching),
            containment_matching: overrides
                .containment_matching
                .unwrap_or(self.containment_matching),
            similarity_threshold: overrides
                .similarity_threshold
                .unwrap_or(self.similarity_threshold),
            category_gate: overrides.category_gate.unwrap_or(self.category_gate),
        }
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.min_group_size == 0 {
            return Err(SettingsError::MinGroupSize);
        }
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SettingsError::SimilarityThreshold(self.similarity_threshold));
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Run data
// ────────────────────────────────────────────────────────────────────────────

/// A raw skill plus everything derived from it for this run.
#[derive(Debug, Clone)]
struct PreparedSkill {
    raw: String,
    cleaned: String,
    key: String,
    category: String,
}

/// First-fit cluster. `members[0]` is the representative; membership is append-only.
#[derive(Debug)]
struct SkillGroup {
    members: Vec<PreparedSkill>,
}

impl SkillGroup {
    fn new(representative: PreparedSkill) -> Self {
        Self {
            members: vec![representative],
        }
    }

    fn representative(&self) -> &PreparedSkill {
        &self.members[0]
    }

    fn len(&self) -> usize {
        self.members.len()
    }
}

/// A skill's bucket after stage 2. Pinned members came from a large group kept as
/// its own category; stage 3 leaves their bucket alone.
#[derive(Debug)]
struct Assignment {
    bucket: String,
    skill: PreparedSkill,
    pinned: bool,
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub input_skills: usize,
    pub duplicate_skills: usize,
    pub discarded_skills: usize,
    pub groups: usize,
    pub large_groups: usize,
    pub buckets: usize,
    /// Bucket → representative of the largest group consolidated into it.
    pub representatives: BTreeMap<String, String>,
    /// Buckets holding both a kept large group and taxonomy-routed skills.
    pub merged_buckets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupingOutcome {
    pub categories: CategoryMap,
    pub stats: RunStats,
}

/// Per-skill trace through the leaf components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillDiagnosis {
    pub skill: String,
    pub cleaned: String,
    pub normalized: String,
    pub discard_reason: Option<DiscardReason>,
    pub category: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

pub struct GroupingEngine {
    settings: EngineSettings,
    normalizer: Normalizer,
    judge: SimilarityJudge,
    matcher: CategoryMatcher,
}

impl GroupingEngine {
    pub fn new(taxonomy: &Taxonomy, settings: EngineSettings) -> Self {
        let normalizer = Normalizer::new(settings.alias_matching);
        let judge = SimilarityJudge::new(
            normalizer.clone(),
            settings.containment_matching,
            settings.similarity_threshold,
        );
        let matcher = CategoryMatcher::new(taxonomy, normalizer.clone());
        Self {
            settings,
            normalizer,
            judge,
            matcher,
        }
    }

    /// Runs all stages over the raw skills.
    pub fn run(&self, raw_skills: &[String]) -> GroupingOutcome {
        let mut stats = RunStats {
            input_skills: raw_skills.len(),
            ..RunStats::default()
        };

        let prepared = self.prepare(raw_skills, &mut stats);
        let groups = self.cluster(prepared);
        stats.groups = groups.len();
        stats.large_groups = groups
            .iter()
            .filter(|g| g.len() >= self.settings.min_group_size)
            .count();
        debug!(
            "Stage 1: {} groups ({} at or above {})",
            stats.groups, stats.large_groups, self.settings.min_group_size
        );

        let (assignments, representatives) = self.consolidate(groups);
        debug!("Stage 2: {} assignments", assignments.len());

        let assignments = if self.settings.reclassify {
            let reclassified = self.reclassify(assignments);
            debug!("Stage 3: {} reclassified", reclassified.len());
            reclassified
        } else {
            assignments
        };

        stats.merged_buckets = merged_buckets(&assignments);
        if !stats.merged_buckets.is_empty() {
            debug!("Large groups share buckets with taxonomy paths: {:?}", stats.merged_buckets);
        }

        let categories = collect_buckets(assignments);
        stats.buckets = categories.len();
        stats.representatives = representatives
            .into_iter()
            .filter(|(bucket, _)| categories.contains_key(bucket))
            .collect();

        info!(
            "Grouped {} skills into {} buckets ({} discarded, {} duplicates)",
            stats.input_skills, stats.buckets, stats.discarded_skills, stats.duplicate_skills
        );

        GroupingOutcome { categories, stats }
    }

    /// Traces one skill through cleaner, filter, normalizer and matcher.
    pub fn diagnose(&self, raw: &str) -> SkillDiagnosis {
        let cleaned = clean_skill(raw);
        let reason = discard_reason(&cleaned);
        let normalized = self.normalizer.normalize(&cleaned);
        let category = reason
            .is_none()
            .then(|| self.matcher.categorize_key(&normalized).to_string());
        SkillDiagnosis {
            skill: raw.to_string(),
            cleaned,
            normalized,
            discard_reason: reason,
            category,
        }
    }

    fn prepare(&self, raw_skills: &[String], stats: &mut RunStats) -> Vec<PreparedSkill> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut prepared = Vec::with_capacity(raw_skills.len());

        for raw in raw_skills {
            if !seen.insert(raw.as_str()) {
                stats.duplicate_skills += 1;
                continue;
            }
            let cleaned = clean_skill(raw);
            if should_discard(&cleaned) {
                stats.discarded_skills += 1;
                continue;
            }
            let key = self.normalizer.normalize(&cleaned);
            let category = self.matcher.categorize_key(&key).to_string();
            prepared.push(PreparedSkill {
                raw: raw.clone(),
                cleaned,
                key,
                category,
            });
        }

        // stable: equal lengths keep input order
        prepared.sort_by_key(|s| std::cmp::Reverse(s.raw.chars().count()));
        prepared
    }

    /// Stage 1. O(skills × groups); first matching group wins.
    fn cluster(&self, skills: Vec<PreparedSkill>) -> Vec<SkillGroup> {
        let mut groups: Vec<SkillGroup> = Vec::new();

        for skill in skills {
            match groups.iter_mut().find(|g| self.joins(&skill, g.representative())) {
                Some(group) => group.members.push(skill),
                None => groups.push(SkillGroup::new(skill)),
            }
        }

        groups
    }

    fn joins(&self, skill: &PreparedSkill, representative: &PreparedSkill) -> bool {
        if !self.judge.keys_match(&skill.key, &representative.key) {
            return false;
        }
        !self.settings.category_gate
            || skill.category == representative.category
            || skill.category == FALLBACK_CATEGORY
    }

    /// Stage 2. Returns assignments plus bucket → representative of its largest group.
    fn consolidate(
        &self,
        groups: Vec<SkillGroup>,
    ) -> (Vec<Assignment>, BTreeMap<String, String>) {
        let mut assignments = Vec::new();
        let mut largest: BTreeMap<String, (usize, String)> = BTreeMap::new();

        for group in groups {
            let keep_own = self.settings.keep_large_groups_as_own_category
                && group.len() >= self.settings.min_group_size;
            let bucket = if keep_own {
                group.representative().raw.clone()
            } else {
                group.representative().category.clone()
            };

            let size = group.len();
            let representative = group.representative().raw.clone();
            largest
                .entry(bucket.clone())
                .and_modify(|(best, rep)| {
                    if size > *best {
                        *best = size;
                        *rep = representative.clone();
                    }
                })
                .or_insert((size, representative));

            assignments.extend(group.members.into_iter().map(|skill| Assignment {
                bucket: bucket.clone(),
                skill,
                pinned: keep_own,
            }));
        }

        let representatives = largest
            .into_iter()
            .map(|(bucket, (_, rep))| (bucket, rep))
            .collect();
        (assignments, representatives)
    }

    /// Stage 3. The discard filter is re-applied so this is safe on any stage-2 output,
    /// but after `prepare` it never removes anything; discards are counted there.
    fn reclassify(&self, assignments: Vec<Assignment>) -> Vec<Assignment> {
        assignments
            .into_iter()
            .filter(|a| !should_discard(&a.skill.cleaned))
            .map(|a| {
                if a.pinned {
                    a
                } else {
                    Assignment {
                        bucket: a.skill.category.clone(),
                        ..a
                    }
                }
            })
            .collect()
    }
}

/// Buckets that received pinned and unpinned members alike, sorted.
fn merged_buckets(assignments: &[Assignment]) -> Vec<String> {
    let mut kinds: BTreeMap<&str, (bool, bool)> = BTreeMap::new();
    for a in assignments {
        let (pinned, routed) = kinds.entry(a.bucket.as_str()).or_default();
        if a.pinned {
            *pinned = true;
        } else {
            *routed = true;
        }
    }
    kinds
        .into_iter()
        .filter(|(_, (pinned, routed))| *pinned && *routed)
        .map(|(bucket, _)| bucket.to_string())
        .collect()
}

fn collect_buckets(assignments: Vec<Assignment>) -> CategoryMap {
    let mut buckets: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for a in assignments {
        buckets.entry(a.bucket).or_default().insert(a.skill.raw);
    }
    buckets
        .into_iter()
        .map(|(bucket, skills)| (bucket, skills.into_iter().collect()))
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn settings(min_group_size: usize) -> EngineSettings {
        EngineSettings {
            min_group_size,
            ..EngineSettings::default()
        }
    }

    fn scenario_taxonomy() -> Taxonomy {
        Taxonomy::from_json_str(
            r#"{".NET": ["dotnet", "csharp"], "CLOUD_AWS": ["aws", "lambda"], "FRONTEND": ["react"]}"#,
        )
        .unwrap()
    }

    fn bucket<'a>(outcome: &'a GroupingOutcome, name: &str) -> Vec<&'a str> {
        outcome.categories[name].iter().map(String::as_str).collect()
    }

    #[test]
    fn test_scenario_dotnet_aws_react() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        let outcome = engine.run(&skills(&["C#", ".NET Core", "AWS Lambda", "React.js", "react"]));

        assert_eq!(outcome.categories.len(), 3);
        assert_eq!(bucket(&outcome, ".NET"), vec![".NET Core", "C#"]);
        assert_eq!(bucket(&outcome, "CLOUD_AWS"), vec!["AWS Lambda"]);
        assert_eq!(bucket(&outcome, "FRONTEND"), vec!["React.js", "react"]);
    }

    #[test]
    fn test_scenario_all_discarded_yields_empty_map() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), EngineSettings::default());
        let outcome = engine.run(&skills(&["5+ years of experience", "Bachelor's degree required"]));

        assert!(outcome.categories.is_empty());
        assert_eq!(outcome.stats.discarded_skills, 2);
    }

    #[test]
    fn test_scenario_unmatched_skills_fall_back_sorted() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        let outcome = engine.run(&skills(&["Kafka", "RabbitMQ", "NATS"]));

        assert_eq!(outcome.categories.len(), 1);
        assert_eq!(
            bucket(&outcome, FALLBACK_CATEGORY),
            vec!["Kafka", "NATS", "RabbitMQ"]
        );
    }

    #[test]
    fn test_no_taxonomy_means_everything_is_general_tech() {
        let engine = GroupingEngine::new(&Taxonomy::empty(), settings(3));
        let outcome = engine.run(&skills(&["Rust", "Sales", "Docker"]));
        assert_eq!(outcome.categories.keys().collect::<Vec<_>>(), vec![FALLBACK_CATEGORY]);
        assert_eq!(outcome.categories[FALLBACK_CATEGORY].len(), 3);
    }

    #[test]
    fn test_group_one_below_threshold_is_folded() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        // "react" group has 2 members: folded into FRONTEND
        let outcome = engine.run(&skills(&["React", "React.js"]));
        assert_eq!(bucket(&outcome, "FRONTEND"), vec!["React", "React.js"]);
        assert_eq!(outcome.stats.large_groups, 0);
    }

    #[test]
    fn test_group_at_threshold_keeps_own_bucket() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        let outcome = engine.run(&skills(&["React", "React.js", "ReactJS"]));

        // longest-first: "React.js" (8) is the representative
        assert_eq!(outcome.categories.len(), 1);
        assert_eq!(
            bucket(&outcome, "React.js"),
            vec!["React", "React.js", "ReactJS"]
        );
        assert_eq!(outcome.stats.large_groups, 1);
        assert_eq!(outcome.stats.representatives["React.js"], "React.js");
    }

    #[test]
    fn test_large_groups_routed_through_taxonomy_when_not_kept() {
        let s = EngineSettings {
            keep_large_groups_as_own_category: false,
            ..settings(3)
        };
        let engine = GroupingEngine::new(&scenario_taxonomy(), s);
        let outcome = engine.run(&skills(&["React", "React.js", "ReactJS"]));
        assert_eq!(
            bucket(&outcome, "FRONTEND"),
            vec!["React", "React.js", "ReactJS"]
        );
    }

    /// "aws lambda" claims both "aws" and "lambda" by containment, so the group's
    /// members are not all similar to each other. Known and intended.
    #[test]
    fn test_first_fit_absorbs_non_transitive_members() {
        let taxonomy = Taxonomy::from_json_str(r#"{"AWS": ["aws"], "SERVERLESS": ["lambda"]}"#)
            .unwrap();
        let engine = GroupingEngine::new(&taxonomy, settings(3));
        let outcome = engine.run(&skills(&["AWS", "Lambda", "AWS Lambda"]));

        // the group reached the threshold, so it keeps a bucket named after the
        // representative even though "AWS" and "Lambda" never match each other
        assert_eq!(
            bucket(&outcome, "AWS Lambda"),
            vec!["AWS", "AWS Lambda", "Lambda"]
        );
    }

    #[test]
    fn test_reclassify_redistributes_contaminated_group_members() {
        let taxonomy = Taxonomy::from_json_str(r#"{"AWS": ["aws"], "SERVERLESS": ["lambda"]}"#)
            .unwrap();
        let s = EngineSettings {
            keep_large_groups_as_own_category: false,
            reclassify: true,
            ..settings(5)
        };
        let engine = GroupingEngine::new(&taxonomy, s);
        let outcome = engine.run(&skills(&["AWS", "Lambda", "AWS Lambda"]));

        // without stage 3 all three would sit in AWS (the representative's category)
        assert_eq!(bucket(&outcome, "AWS"), vec!["AWS", "AWS Lambda"]);
        assert_eq!(bucket(&outcome, "SERVERLESS"), vec!["Lambda"]);
    }

    #[test]
    fn test_reclassify_leaves_kept_large_groups_alone() {
        let taxonomy = Taxonomy::from_json_str(r#"{"AWS": ["aws"], "SERVERLESS": ["lambda"]}"#)
            .unwrap();
        let s = EngineSettings {
            reclassify: true,
            ..settings(3)
        };
        let engine = GroupingEngine::new(&taxonomy, s);
        let outcome = engine.run(&skills(&["AWS", "Lambda", "AWS Lambda"]));
        assert_eq!(outcome.categories.len(), 1);
        assert!(outcome.categories.contains_key("AWS Lambda"));
    }

    #[test]
    fn test_reclassify_keeps_discard_count_from_prepare() {
        let s = EngineSettings {
            reclassify: true,
            ..settings(3)
        };
        let engine = GroupingEngine::new(&scenario_taxonomy(), s);
        let outcome = engine.run(&skills(&["C#", "5+ years of experience", "React"]));

        assert_eq!(outcome.stats.discarded_skills, 1);
        let total: usize = outcome.categories.values().map(Vec::len).sum();
        assert_eq!(total, 2);
    }

    /// A large group led by "AWS" and the `AWS` taxonomy path land in one bucket.
    #[test]
    fn test_kept_group_named_like_taxonomy_path_shares_bucket() {
        let taxonomy = Taxonomy::from_json_str(r#"{"AWS": ["aws", "ec2"]}"#).unwrap();
        let engine = GroupingEngine::new(&taxonomy, settings(3));
        let outcome = engine.run(&skills(&["AWS", "aws", "Aws", "EC2"]));

        assert_eq!(outcome.categories.len(), 1);
        assert_eq!(bucket(&outcome, "AWS"), vec!["AWS", "Aws", "EC2", "aws"]);
        assert_eq!(outcome.stats.merged_buckets, vec!["AWS".to_string()]);
        assert_eq!(outcome.stats.representatives["AWS"], "AWS");
    }

    #[test]
    fn test_no_merged_buckets_when_names_differ() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        let outcome = engine.run(&skills(&["React", "React.js", "ReactJS", "C#"]));
        assert!(outcome.stats.merged_buckets.is_empty());
    }

    #[test]
    fn test_category_gate_blocks_cross_category_joins() {
        let taxonomy = Taxonomy::from_json_str(r#"{"AWS": ["aws"], "SERVERLESS": ["lambda"]}"#)
            .unwrap();
        let s = EngineSettings {
            category_gate: true,
            ..settings(3)
        };
        let engine = GroupingEngine::new(&taxonomy, s);
        let outcome = engine.run(&skills(&["AWS", "Lambda", "AWS Lambda"]));

        // "Lambda" resolves to SERVERLESS, the representative to AWS: no join
        assert_eq!(bucket(&outcome, "AWS"), vec!["AWS", "AWS Lambda"]);
        assert_eq!(bucket(&outcome, "SERVERLESS"), vec!["Lambda"]);
    }

    #[test]
    fn test_every_surviving_skill_lands_in_exactly_one_bucket() {
        let input = skills(&[
            "Python", "Django", "React", "React.js", "AWS", "Kubernetes", "k8s", "Kafka",
            "Sales", "Leadership", "5 years of Java", "Docker", "Terraform",
        ]);
        let taxonomy = crate::taxonomy::provider::builtin_taxonomy().unwrap();

        for keep in [true, false] {
            for reclassify in [true, false] {
                let s = EngineSettings {
                    keep_large_groups_as_own_category: keep,
                    reclassify,
                    ..settings(2)
                };
                let outcome = GroupingEngine::new(&taxonomy, s).run(&input);

                let mut all: Vec<&str> = outcome
                    .categories
                    .values()
                    .flatten()
                    .map(String::as_str)
                    .collect();
                let total = all.len();
                all.sort_unstable();
                all.dedup();
                assert_eq!(all.len(), total, "a skill appeared in two buckets");

                let mut expected: Vec<&str> = input
                    .iter()
                    .map(String::as_str)
                    .filter(|s| *s != "5 years of Java")
                    .collect();
                expected.sort_unstable();
                assert_eq!(all, expected);
            }
        }
    }

    #[test]
    fn test_run_is_deterministic() {
        let input = skills(&["Go", "Golang", "Go development", "Rust", "C++", "c/c++", "CI/CD"]);
        let taxonomy = crate::taxonomy::provider::builtin_taxonomy().unwrap();
        let engine = GroupingEngine::new(&taxonomy, settings(2));

        let first = serde_json::to_string(&engine.run(&input)).unwrap();
        let second = serde_json::to_string(&engine.run(&input)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_exact_duplicates_counted_once() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), settings(3));
        let outcome = engine.run(&skills(&["react", "react", "C#"]));
        assert_eq!(bucket(&outcome, "FRONTEND"), vec!["react"]);
        assert_eq!(outcome.stats.duplicate_skills, 1);
        assert_eq!(outcome.stats.input_skills, 3);
    }

    #[test]
    fn test_diagnose_traces_leaf_components() {
        let engine = GroupingEngine::new(&scenario_taxonomy(), EngineSettings::default());

        let d = engine.diagnose("Strong experience with C#.");
        assert_eq!(d.cleaned, "c#");
        assert_eq!(d.normalized, "csharp");
        assert_eq!(d.discard_reason, None);
        assert_eq!(d.category.as_deref(), Some(".NET"));

        let d = engine.diagnose("3+ years");
        assert_eq!(d.discard_reason, Some(DiscardReason::ExperienceDuration));
        assert_eq!(d.category, None);
    }

    #[test]
    fn test_overrides_apply_only_set_fields() {
        let base = EngineSettings::default();
        let merged = base.with_overrides(&EngineOverrides {
            min_group_size: Some(3),
            reclassify: Some(true),
            ..EngineOverrides::default()
        });
        assert_eq!(merged.min_group_size, 3);
        assert!(merged.reclassify);
        assert_eq!(
            merged.keep_large_groups_as_own_category,
            base.keep_large_groups_as_own_category
        );
    }

    #[test]
    fn test_settings_validation() {
        assert!(EngineSettings::default().validate().is_ok());
        assert_eq!(
            settings(0).validate(),
            Err(SettingsError::MinGroupSize)
        );
        let s = EngineSettings {
            similarity_threshold: 1.5,
            ..EngineSettings::default()
        };
        assert_eq!(s.validate(), Err(SettingsError::SimilarityThreshold(1.5)));
    }
}
