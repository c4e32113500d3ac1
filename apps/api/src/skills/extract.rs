//! Skill extraction from loosely-typed job records.
//!
//! Records are kept as `serde_json::Value` so unknown fields survive annotation.
//! Malformed entries (non-object record, non-array field, missing or blank `Name`,
//! non-string `Name`) are skipped without failing the run.

use serde_json::Value;

use crate::skills::rollup::{RollupIndex, WeightedSkill};

pub const NAME_FIELD: &str = "Name";
pub const RELEVANCE_FIELD: &str = "RelevancePercentage";
/// Field the rollup is written to on annotated records.
pub const ROLLUP_OUTPUT_FIELD: &str = "Skills";

pub const DEFAULT_SKILL_FIELDS: &[&str] = &["KeySkillsRequired", "EssentialQualifications"];
pub const DEFAULT_ROLLUP_FIELD: &str = "KeySkillsRequired";

fn entries<'a>(record: &'a Value, field: &str) -> impl Iterator<Item = &'a Value> + 'a {
    record
        .get(field)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

fn entry_name(entry: &Value) -> Option<&str> {
    entry
        .get(NAME_FIELD)
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
}

/// Accepts numbers and numeric strings ("80").
fn entry_relevance(entry: &Value) -> Option<f64> {
    match entry.get(RELEVANCE_FIELD)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Every `Name` across the given array fields of every record, in record order.
pub fn collect_skill_names(records: &[Value], fields: &[String]) -> Vec<String> {
    records
        .iter()
        .flat_map(|record| {
            fields
                .iter()
                .flat_map(move |field| entries(record, field).filter_map(entry_name))
        })
        .map(str::to_string)
        .collect()
}

/// `(Name, RelevancePercentage)` pairs of one record's designated array.
pub fn weighted_skills(record: &Value, field: &str) -> Vec<WeightedSkill> {
    entries(record, field)
        .filter_map(|entry| {
            entry_name(entry).map(|name| WeightedSkill {
                name: name.to_string(),
                relevance: entry_relevance(entry),
            })
        })
        .collect()
}

/// Writes each record's rollup into its `Skills` field. Non-object records pass
/// through untouched.
pub fn annotate_records(records: Vec<Value>, index: &RollupIndex, rollup_field: &str) -> Vec<Value> {
    records
        .into_iter()
        .map(|mut record| {
            let rollup = index.project(&weighted_skills(&record, rollup_field));
            if let Some(obj) = record.as_object_mut() {
                obj.insert(
                    ROLLUP_OUTPUT_FIELD.to_string(),
                    serde_json::to_value(rollup).unwrap_or(Value::Array(Vec::new())),
                );
            }
            record
        })
        .collect()
}
