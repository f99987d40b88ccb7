use async_trait::async_trait;

use crate::error::BookResult;
use crate::models::{ScoredSummary, StoredSummary};

/// Repository trait for the vector store backing the book summaries.
///
/// Abstracts the underlying vector database (Qdrant). Reads are safe to run
/// concurrently; writes happen only through the one-time ingestion path.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Create the collection if it does not exist yet
    async fn ensure_collection(&self, dimension: u64) -> BookResult<()>;

    /// Number of summaries currently stored
    async fn count(&self) -> BookResult<u64>;

    /// Insert or replace a batch of summaries with their embeddings
    async fn upsert_batch(&self, summaries: Vec<StoredSummary>) -> BookResult<()>;

    /// Nearest-neighbor search, ordered by decreasing similarity
    async fn search(&self, vector: Vec<f32>, limit: u64) -> BookResult<Vec<ScoredSummary>>;

    /// Liveness probe against the store
    async fn health(&self) -> BookResult<()>;
}
