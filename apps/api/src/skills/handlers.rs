//! Axum route handlers for the Skills API.

use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::skills::engine::{
    CategoryMap, EngineOverrides, EngineSettings, GroupingEngine, RunStats, SkillDiagnosis,
};
use crate::skills::extract::{annotate_records, collect_skill_names};
use crate::skills::rollup::RollupIndex;
use crate::skills::summary::render_summary;
use crate::state::AppState;
use crate::taxonomy::{Taxonomy, TaxonomyInput};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub records: Vec<Value>,
    /// Replaces the service taxonomy for this run only. Decoded straight into the tree
    /// so declaration order survives.
    #[serde(default)]
    pub taxonomy: Option<TaxonomyInput>,
    #[serde(default)]
    pub settings: EngineOverrides,
    /// Return the records with a `Skills` rollup attached.
    #[serde(default)]
    pub annotate: bool,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub categories: CategoryMap,
    pub summary: String,
    pub stats: RunStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub records: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub skills: Vec<String>,
    #[serde(default)]
    pub settings: EngineOverrides,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub skills: Vec<SkillDiagnosis>,
}

/// Everything a normalize run produces apart from the envelope metadata.
#[derive(Debug)]
pub struct PipelineOutput {
    pub categories: CategoryMap,
    pub summary: String,
    pub stats: RunStats,
    pub records: Option<Vec<Value>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Extraction → grouping → summary → optional rollup annotation. CPU-bound.
pub fn run_pipeline(
    records: Vec<Value>,
    taxonomy: &Taxonomy,
    settings: EngineSettings,
    skill_fields: &[String],
    rollup_field: &str,
    annotate: bool,
) -> PipelineOutput {
    let raw_skills = collect_skill_names(&records, skill_fields);
    let outcome = GroupingEngine::new(taxonomy, settings).run(&raw_skills);
    let summary = render_summary(&outcome.categories);

    let records = annotate.then(|| {
        let index = RollupIndex::new(&outcome.categories);
        annotate_records(records, &index, rollup_field)
    });

    PipelineOutput {
        categories: outcome.categories,
        summary,
        stats: outcome.stats,
        records,
    }
}

/// Builds the matcher once and runs every skill through it. CPU-bound.
pub fn diagnose_skills(
    taxonomy: &Taxonomy,
    settings: EngineSettings,
    skills: &[String],
) -> Vec<SkillDiagnosis> {
    let engine = GroupingEngine::new(taxonomy, settings);
    skills.iter().map(|skill| engine.diagnose(skill)).collect()
}

fn resolve_settings(
    defaults: &EngineSettings,
    overrides: &EngineOverrides,
) -> Result<EngineSettings, AppError> {
    let settings = defaults.with_overrides(overrides);
    settings
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(settings)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/skills/normalize
///
/// Groups every skill name in the records into category buckets.
pub async fn handle_normalize(
    State(state): State<AppState>,
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let settings = resolve_settings(&state.config.engine, &request.settings)?;

    let taxonomy = match request.taxonomy {
        Some(input) => Arc::new(Taxonomy::from_input(input)?),
        None => Arc::clone(&state.taxonomy),
    };

    let run_id = Uuid::new_v4();
    info!(
        "Normalize run {run_id}: {} records, {} categories",
        request.records.len(),
        taxonomy.entries().len()
    );

    let skill_fields = state.config.skill_fields.clone();
    let rollup_field = state.config.rollup_field.clone();
    let records = request.records;
    let annotate = request.annotate;

    let output = tokio::task::spawn_blocking(move || {
        run_pipeline(
            records,
            &taxonomy,
            settings,
            &skill_fields,
            &rollup_field,
            annotate,
        )
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in normalize run: {e}")))?;

    Ok(Json(NormalizeResponse {
        run_id,
        generated_at: Utc::now(),
        categories: output.categories,
        summary: output.summary,
        stats: output.stats,
        records: output.records,
    }))
}

/// POST /api/v1/skills/classify
///
/// Diagnostic view: how each skill is cleaned, filtered, normalized and categorized.
pub async fn handle_classify(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    if request.skills.is_empty() {
        return Err(AppError::Validation("skills cannot be empty".to_string()));
    }
    let settings = resolve_settings(&state.config.engine, &request.settings)?;

    let taxonomy = Arc::clone(&state.taxonomy);
    let skills = tokio::task::spawn_blocking(move || {
        diagnose_skills(&taxonomy, settings, &request.skills)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in classify: {e}")))?;

    Ok(Json(ClassifyResponse { skills }))
}
