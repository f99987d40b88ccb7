pub mod health;
pub mod recommendation;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

/// API routes with state applied.
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .route(
            "/book-recommendation",
            post(recommendation::book_recommendation),
        )
        .with_state(state.clone())
}

/// Readiness route with real dependency checks.
pub fn ready_router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
