mod config;
mod errors;
mod routes;
mod skills;
mod state;
mod taxonomy;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::taxonomy::provider::{
    load_or_degrade, BuiltinTaxonomyProvider, FileTaxonomyProvider, TaxonomyProvider,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on unparsable env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting skillmap v{}", env!("CARGO_PKG_VERSION"));

    // Load the taxonomy snapshot (never fatal: degrades to all-GENERAL_TECH)
    let provider: Box<dyn TaxonomyProvider> = match &config.taxonomy_path {
        Some(path) => Box::new(FileTaxonomyProvider::new(path.clone())),
        None => Box::new(BuiltinTaxonomyProvider),
    };
    let taxonomy = load_or_degrade(provider.as_ref()).await;

    info!(
        "Engine defaults: min_group_size={} keep_large_groups={} reclassify={} alias_matching={:?}",
        config.engine.min_group_size,
        config.engine.keep_large_groups_as_own_category,
        config.engine.reclassify,
        config.engine.alias_matching
    );

    let state = AppState::new(config.clone(), taxonomy);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
