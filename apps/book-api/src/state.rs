//! Application state management.
//!
//! The shared state handed to every request handler. Cloning is cheap: the
//! contained handles are connection pools and `Arc`s.

use std::sync::Arc;

use domain_books::QdrantSummaryStore;
use domain_recommendation::RecommendationService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool (usage records)
    pub db: database::postgres::DatabaseConnection,
    /// Vector store handle, kept for readiness checks
    pub store: Arc<QdrantSummaryStore>,
    /// The recommendation orchestrator
    pub recommendations: Arc<RecommendationService>,
}
