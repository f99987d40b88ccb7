//! Readiness handler with real database and vector store checks.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_helpers::{run_health_checks, HealthCheckFuture};
use domain_books::SummaryStore;

use crate::state::AppState;

/// Readiness check endpoint verifying Postgres and Qdrant connectivity.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![
        (
            "database",
            Box::pin(async {
                database::postgres::check_health(&state.db)
                    .await
                    .map_err(|e| format!("Database ping failed: {}", e))
            }),
        ),
        (
            "vector_store",
            Box::pin(async {
                state
                    .store
                    .health()
                    .await
                    .map_err(|e| format!("Vector store ping failed: {}", e))
            }),
        ),
    ];

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
