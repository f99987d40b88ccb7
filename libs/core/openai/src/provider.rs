use async_trait::async_trait;

use crate::types::{CompletionOutcome, CompletionRequest, EmbeddingOutcome, UsageEvent};

/// Trait for text-generation providers.
///
/// Implementations never fail: provider outages surface as the `Degraded`
/// outcome variant. Injected into services at construction time so tests can
/// substitute fakes.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a conversation and get the model's output turns
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome;
}

/// Trait for text-embedding providers.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Width of the vectors this embedder produces
    fn dimension(&self) -> usize;

    /// Embed each input text, in order
    async fn embed(&self, texts: &[String]) -> EmbeddingOutcome;
}

/// Sink for per-call usage statistics.
///
/// Recording is best-effort by contract: implementations must absorb their
/// own failures (log and continue) so cost accounting can never abort a
/// user-facing call.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, event: UsageEvent);
}

/// Sink that discards all events; for tests and one-off scripts.
pub struct NullUsageSink;

#[async_trait]
impl UsageSink for NullUsageSink {
    async fn record(&self, _event: UsageEvent) {}
}
