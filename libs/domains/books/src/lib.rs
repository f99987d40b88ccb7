//! Books Domain
//!
//! Domain implementation for book summary storage and thematic retrieval,
//! wrapping Qdrant with embedding generation at the query side.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ RetrievalService │  ← joins themes, embeds, searches
//! └────────┬─────────┘
//!          │
//! ┌────────▼─────────┐     ┌──────────────────┐
//! │   SummaryStore   │     │   TextEmbedder   │
//! │     (trait)      │     │ (openai-client)  │
//! └────────┬─────────┘     └──────────────────┘
//!          │
//! ┌────────▼─────────┐
//! │QdrantSummaryStore│
//! └──────────────────┘
//! ```
//!
//! Ingestion (`ingest`) loads the summaries file into the collection once at
//! process startup, guarded by a best-effort count check.

pub mod error;
pub mod ingest;
pub mod models;
pub mod qdrant;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{BookError, BookResult};
pub use ingest::{ingest_summaries, parse_summaries};
pub use models::{BookSummary, ScoredSummary, StoredSummary};
pub use qdrant::{QdrantConfig, QdrantSummaryStore};
pub use repository::SummaryStore;
pub use service::{RetrievalService, SummaryRetriever, DEFAULT_TOP_N};
