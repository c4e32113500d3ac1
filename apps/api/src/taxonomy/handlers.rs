//! Axum route handlers for the Taxonomy API.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::state::AppState;
use crate::taxonomy::{Taxonomy, TaxonomyDocument};

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub taxonomy: TaxonomyDocument,
    /// Flattened category paths in lookup order.
    pub paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateTaxonomyResponse {
    pub valid: bool,
    pub paths: Vec<String>,
}

/// GET /api/v1/taxonomy
///
/// The active snapshot, in the same nested shape an editor submits back.
pub async fn handle_get_taxonomy(State(state): State<AppState>) -> Json<TaxonomyResponse> {
    Json(TaxonomyResponse {
        taxonomy: state.taxonomy.document().clone(),
        paths: state.taxonomy.paths(),
    })
}

/// POST /api/v1/taxonomy/validate
///
/// Accepts a bare tree or `{priority, categories}`. Invalid input → 400.
/// The body is parsed as text so malformed JSON gets the same error envelope and key
/// order reaches the tree intact.
pub async fn handle_validate_taxonomy(
    body: String,
) -> Result<Json<ValidateTaxonomyResponse>, AppError> {
    let taxonomy = Taxonomy::from_json_str(&body)?;
    Ok(Json(ValidateTaxonomyResponse {
        valid: true,
        paths: taxonomy.paths(),
    }))
}
