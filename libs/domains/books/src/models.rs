use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored book summary: title, author, and the summary text itself.
///
/// Produced by the retrieval service; the core never persists these outside
/// the vector store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub title: String,
    pub author: String,
    pub summary: String,
}

impl BookSummary {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            summary: summary.into(),
        }
    }
}

/// A summary paired with its embedding, ready for upsert.
#[derive(Debug, Clone)]
pub struct StoredSummary {
    pub id: Uuid,
    pub vector: Vec<f32>,
    pub book: BookSummary,
}

/// A search hit: summary plus its similarity score (higher is nearer).
#[derive(Debug, Clone)]
pub struct ScoredSummary {
    pub score: f32,
    pub book: BookSummary,
}
