use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::skills::engine::EngineSettings;
use crate::skills::extract::{DEFAULT_ROLLUP_FIELD, DEFAULT_SKILL_FIELDS};

/// Application configuration loaded from environment variables.
/// Every variable is optional; a present but unparsable value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON taxonomy file. Unset → bundled default taxonomy.
    pub taxonomy_path: Option<PathBuf>,
    /// Service-wide engine defaults; requests may override any subset.
    pub engine: EngineSettings,
    /// Record arrays whose `Name` values feed the engine.
    pub skill_fields: Vec<String>,
    /// Record array used for the relevance rollup.
    pub rollup_field: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            taxonomy_path: None,
            engine: EngineSettings::default(),
            skill_fields: DEFAULT_SKILL_FIELDS.iter().map(|f| f.to_string()).collect(),
            rollup_field: DEFAULT_ROLLUP_FIELD.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let engine_defaults = defaults.engine.clone();

        let engine = EngineSettings {
            min_group_size: parse_var(&lookup, "MIN_GROUP_SIZE")?
                .unwrap_or(engine_defaults.min_group_size),
            keep_large_groups_as_own_category: parse_flag(&lookup, "KEEP_LARGE_GROUPS")?
                .unwrap_or(engine_defaults.keep_large_groups_as_own_category),
            reclassify: parse_flag(&lookup, "RECLASSIFY")?.unwrap_or(engine_defaults.reclassify),
            alias_matching: parse_var(&lookup, "ALIAS_MATCHING")?
                .unwrap_or(engine_defaults.alias_matching),
            containment_matching: parse_var(&lookup, "CONTAINMENT_MATCHING")?
                .unwrap_or(engine_defaults.containment_matching),
            similarity_threshold: parse_var(&lookup, "SIMILARITY_THRESHOLD")?
                .unwrap_or(engine_defaults.similarity_threshold),
            category_gate: parse_flag(&lookup, "CATEGORY_GATE")?
                .unwrap_or(engine_defaults.category_gate),
        };
        engine.validate().context("Invalid engine settings")?;

        let skill_fields = match lookup("SKILL_FIELDS") {
            Some(raw) => {
                let fields: Vec<String> = raw
                    .split(',')
                    .map(str::trim)
                    .filter(|f| !f.is_empty())
                    .map(str::to_string)
                    .collect();
                if fields.is_empty() {
                    anyhow::bail!("SKILL_FIELDS must name at least one field");
                }
                fields
            }
            None => defaults.skill_fields,
        };

        Ok(Config {
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            taxonomy_path: lookup("TAXONOMY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            engine,
            skill_fields,
            rollup_field: lookup("ROLLUP_FIELD").unwrap_or(defaults.rollup_field),
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("{e}"))
                .with_context(|| format!("{key} has an invalid value '{raw}'"))
        })
        .transpose()
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<bool>> {
    lookup(key)
        .map(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(anyhow::anyhow!("{key} must be a boolean, got '{raw}'")),
        })
        .transpose()
}
