use std::sync::Arc;

use async_trait::async_trait;
use openai_client::TextEmbedder;
use tracing::{instrument, warn};

use crate::error::{BookError, BookResult};
use crate::models::BookSummary;
use crate::repository::SummaryStore;

/// Default number of summaries returned when the caller does not override it.
pub const DEFAULT_TOP_N: u64 = 3;

/// Thematic similarity lookup, as consumed by the recommendation
/// orchestrator.
#[async_trait]
pub trait SummaryRetriever: Send + Sync {
    /// Top `top_n` stored summaries nearest to the given themes, nearest
    /// first.
    async fn find_similar(&self, themes: &[String], top_n: u64) -> BookResult<Vec<BookSummary>>;
}

/// Retrieval service combining the vector store with query-side embedding.
pub struct RetrievalService {
    store: Arc<dyn SummaryStore>,
    embedder: Arc<dyn TextEmbedder>,
}

impl RetrievalService {
    pub fn new(store: Arc<dyn SummaryStore>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { store, embedder }
    }
}

#[async_trait]
impl SummaryRetriever for RetrievalService {
    /// Themes are flattened into one query string (joined with a single
    /// space) before embedding, so nuance between multiple themes collapses
    /// into one vector. Read-only; an empty store yields an empty result.
    #[instrument(skip(self, themes), fields(theme_count = themes.len()))]
    async fn find_similar(&self, themes: &[String], top_n: u64) -> BookResult<Vec<BookSummary>> {
        if top_n == 0 {
            return Err(BookError::Validation(
                "top_n must be a positive integer".to_string(),
            ));
        }

        let query = themes.join(" ");

        let outcome = self.embedder.embed(&[query]).await;
        if outcome.is_degraded() {
            // Degrade-and-continue: the zero-vector query still completes,
            // results are just not meaningful.
            warn!("Embedding provider degraded; querying with zero vector");
        }
        let vector = outcome
            .into_vectors()
            .into_iter()
            .next()
            .ok_or_else(|| BookError::Internal("No embedding returned".to_string()))?;

        let hits = self.store.search(vector, top_n).await?;

        Ok(hits.into_iter().map(|hit| hit.book).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScoredSummary;
    use crate::repository::MockSummaryStore;
    use openai_client::{EmbeddingOutcome, TokenUsage};

    struct FakeEmbedder {
        degraded: bool,
    }

    #[async_trait]
    impl TextEmbedder for FakeEmbedder {
        fn dimension(&self) -> usize {
            4
        }

        async fn embed(&self, texts: &[String]) -> EmbeddingOutcome {
            if self.degraded {
                EmbeddingOutcome::Degraded {
                    vectors: vec![vec![0.0; 4]; texts.len()],
                    reason: "connection refused".to_string(),
                }
            } else {
                EmbeddingOutcome::Embedded {
                    vectors: vec![vec![0.1, 0.2, 0.3, 0.4]; texts.len()],
                    usage: TokenUsage::default(),
                }
            }
        }
    }

    fn hit(title: &str, score: f32) -> ScoredSummary {
        ScoredSummary {
            score,
            book: BookSummary::new(title, "Author", "Summary"),
        }
    }

    fn service(store: MockSummaryStore, degraded: bool) -> RetrievalService {
        RetrievalService::new(Arc::new(store), Arc::new(FakeEmbedder { degraded }))
    }

    #[tokio::test]
    async fn returns_at_most_top_n_nearest_first() {
        let mut store = MockSummaryStore::new();
        store
            .expect_search()
            .withf(|_vector, limit| *limit == 3)
            .returning(|_, _| {
                Ok(vec![hit("First", 0.9), hit("Second", 0.7), hit("Third", 0.5)])
            });

        let books = service(store, false)
            .find_similar(&["courage".to_string()], 3)
            .await
            .unwrap();

        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn joins_themes_with_single_space() {
        // The fake embedder receives the joined query; assert via a spy
        struct SpyEmbedder;

        #[async_trait]
        impl TextEmbedder for SpyEmbedder {
            fn dimension(&self) -> usize {
                4
            }

            async fn embed(&self, texts: &[String]) -> EmbeddingOutcome {
                assert_eq!(texts, ["courage friendship"]);
                EmbeddingOutcome::Embedded {
                    vectors: vec![vec![0.0; 4]],
                    usage: TokenUsage::default(),
                }
            }
        }

        let mut store = MockSummaryStore::new();
        store.expect_search().returning(|_, _| Ok(vec![]));

        let service = RetrievalService::new(Arc::new(store), Arc::new(SpyEmbedder));
        service
            .find_similar(&["courage".to_string(), "friendship".to_string()], 3)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_store_returns_empty_sequence() {
        let mut store = MockSummaryStore::new();
        store.expect_search().returning(|_, _| Ok(vec![]));

        let books = service(store, false)
            .find_similar(&["anything".to_string()], 3)
            .await
            .unwrap();

        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn unreachable_store_surfaces_store_unavailable() {
        let mut store = MockSummaryStore::new();
        store
            .expect_search()
            .returning(|_, _| Err(BookError::StoreUnavailable("connection refused".to_string())));

        let err = service(store, false)
            .find_similar(&["courage".to_string()], 3)
            .await
            .unwrap_err();

        assert!(matches!(err, BookError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn degraded_embedding_still_queries_the_store() {
        let mut store = MockSummaryStore::new();
        store
            .expect_search()
            .withf(|vector, _| vector.iter().all(|v| *v == 0.0))
            .returning(|_, _| Ok(vec![hit("Whatever", 0.0)]));

        let books = service(store, true)
            .find_similar(&["courage".to_string()], 3)
            .await
            .unwrap();

        assert_eq!(books.len(), 1);
    }

    #[tokio::test]
    async fn zero_top_n_is_rejected() {
        let store = MockSummaryStore::new();
        let err = service(store, false)
            .find_similar(&["courage".to_string()], 0)
            .await
            .unwrap_err();

        assert!(matches!(err, BookError::Validation(_)));
    }
}
