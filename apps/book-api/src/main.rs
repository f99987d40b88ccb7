use std::sync::Arc;

use axum_helpers::server::{create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_books::{ingest_summaries, QdrantSummaryStore, RetrievalService};
use domain_recommendation::RecommendationService;
use domain_usage::{PgUsageRepository, UsageService};
use openai_client::OpenAIClient;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // Connect to PostgreSQL with retry and bring the schema up to date
    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
    database::postgres::run_migrations::<migration::Migrator>(&db, "book_api")
        .await
        .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;

    // Usage recording sits behind the OpenAI client so every successful call
    // is captured
    let usage = UsageService::new(PgUsageRepository::new(db.clone()));
    let openai = Arc::new(
        OpenAIClient::new(config.openai.clone(), Arc::new(usage))
            .map_err(|e| eyre::eyre!("Failed to build OpenAI client: {}", e))?,
    );

    info!("Connecting to Qdrant at {}", config.qdrant.url);
    let store = Arc::new(
        QdrantSummaryStore::new(config.qdrant.clone())
            .map_err(|e| eyre::eyre!("Failed to build Qdrant client: {}", e))?,
    );

    // One-time guarded ingestion. Failure is not fatal: the server still
    // starts and recommendation requests surface the store error instead.
    match ingest_summaries(store.as_ref(), openai.as_ref(), &config.summaries_path).await {
        Ok(0) => info!("Summary ingestion skipped (collection already loaded)"),
        Ok(count) => info!(count, "Summary ingestion complete"),
        Err(e) => warn!("Summary ingestion failed: {}", e),
    }

    let retrieval = Arc::new(RetrievalService::new(store.clone(), openai.clone()));
    let recommendations = Arc::new(RecommendationService::new(openai.clone(), retrieval));

    let state = AppState {
        config,
        db,
        store,
        recommendations,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check with actual db/vector-store health checks
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    create_app(app, &state.config.server).await?;

    info!("Shutting down: closing database connection");
    if let Err(e) = state.db.close().await {
        tracing::error!("Error closing PostgreSQL: {}", e);
    }

    info!("book API shutdown complete");
    Ok(())
}
