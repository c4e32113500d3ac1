use std::sync::Arc;

use crate::config::Config;
use crate::taxonomy::Taxonomy;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Immutable taxonomy snapshot loaded at startup. Requests may bring their own
    /// tree; the shared one is never mutated.
    pub taxonomy: Arc<Taxonomy>,
}

impl AppState {
    pub fn new(config: Config, taxonomy: Taxonomy) -> Self {
        Self {
            config,
            taxonomy: Arc::new(taxonomy),
        }
    }
}
