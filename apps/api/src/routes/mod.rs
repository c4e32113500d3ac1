pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::taxonomy::handlers as taxonomy;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Skills API
        .route("/api/v1/skills/normalize", post(skills::handle_normalize))
        .route("/api/v1/skills/classify", post(skills::handle_classify))
        // Taxonomy API
        .route("/api/v1/taxonomy", get(taxonomy::handle_get_taxonomy))
        .route(
            "/api/v1/taxonomy/validate",
            post(taxonomy::handle_validate_taxonomy),
        )
        .with_state(state)
}
