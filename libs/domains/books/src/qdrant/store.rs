use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    value::Kind, CountPointsBuilder, CreateCollectionBuilder, Distance, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::Qdrant;

use super::QdrantConfig;
use crate::error::{BookError, BookResult};
use crate::models::{BookSummary, ScoredSummary, StoredSummary};
use crate::repository::SummaryStore;

/// Qdrant-backed implementation of [`SummaryStore`].
///
/// One collection, cosine distance, payload keys `title`/`author`/`summary`.
pub struct QdrantSummaryStore {
    client: Qdrant,
    collection: String,
}

impl QdrantSummaryStore {
    pub fn new(config: QdrantConfig) -> BookResult<Self> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(api_key) = config.api_key {
            builder = builder.api_key(api_key);
        }

        builder = builder.timeout(Duration::from_secs(config.timeout_secs));

        let client = builder
            .build()
            .map_err(|e| BookError::StoreUnavailable(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            collection: config.collection,
        })
    }

    fn summary_to_payload(book: &BookSummary) -> HashMap<String, QdrantValue> {
        let mut payload = HashMap::new();
        payload.insert("title".to_string(), QdrantValue::from(book.title.clone()));
        payload.insert("author".to_string(), QdrantValue::from(book.author.clone()));
        payload.insert(
            "summary".to_string(),
            QdrantValue::from(book.summary.clone()),
        );
        payload
    }

    fn payload_str(payload: &HashMap<String, QdrantValue>, key: &str, fallback: &str) -> String {
        match payload.get(key).and_then(|value| value.kind.as_ref()) {
            Some(Kind::StringValue(s)) => s.clone(),
            _ => fallback.to_string(),
        }
    }

    fn payload_to_summary(payload: &HashMap<String, QdrantValue>) -> BookSummary {
        BookSummary {
            title: Self::payload_str(payload, "title", "Unknown Title"),
            author: Self::payload_str(payload, "author", "Unknown Author"),
            summary: Self::payload_str(payload, "summary", ""),
        }
    }
}

#[async_trait]
impl SummaryStore for QdrantSummaryStore {
    async fn ensure_collection(&self, dimension: u64) -> BookResult<()> {
        if self.client.collection_exists(&self.collection).await? {
            return Ok(());
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(VectorParamsBuilder::new(dimension, Distance::Cosine)),
            )
            .await?;

        tracing::info!(collection = %self.collection, dimension, "Created Qdrant collection");
        Ok(())
    }

    async fn count(&self) -> BookResult<u64> {
        let response = self
            .client
            .count(CountPointsBuilder::new(&self.collection).exact(true))
            .await?;

        Ok(response.result.map(|r| r.count).unwrap_or(0))
    }

    async fn upsert_batch(&self, summaries: Vec<StoredSummary>) -> BookResult<()> {
        let points: Vec<PointStruct> = summaries
            .into_iter()
            .map(|entry| {
                PointStruct::new(
                    entry.id.to_string(),
                    entry.vector,
                    Self::summary_to_payload(&entry.book),
                )
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await?;

        Ok(())
    }

    async fn search(&self, vector: Vec<f32>, limit: u64) -> BookResult<Vec<ScoredSummary>> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, vector, limit).with_payload(true),
            )
            .await?;

        Ok(results
            .result
            .into_iter()
            .map(|point| ScoredSummary {
                score: point.score,
                book: Self::payload_to_summary(&point.payload),
            })
            .collect())
    }

    async fn health(&self) -> BookResult<()> {
        self.client.health_check().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_round_trips_summary_fields() {
        let book = BookSummary::new("Dune", "Frank Herbert", "A desert planet.");
        let payload = QdrantSummaryStore::summary_to_payload(&book);
        assert_eq!(QdrantSummaryStore::payload_to_summary(&payload), book);
    }

    #[test]
    fn missing_payload_keys_fall_back() {
        let payload = HashMap::new();
        let book = QdrantSummaryStore::payload_to_summary(&payload);
        assert_eq!(book.title, "Unknown Title");
        assert_eq!(book.author, "Unknown Author");
        assert_eq!(book.summary, "");
    }
}
