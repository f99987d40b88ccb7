//! OpenAI API Client
//!
//! Shared client for the OpenAI Responses and Embeddings APIs, used by the
//! recommendation orchestrator (completions with tool calling) and the
//! retrieval domain (text embeddings).
//!
//! # Design
//!
//! - **Typed conversation turns**: requests and responses are modeled as an
//!   ordered list of [`Turn`]s (user text, assistant text, tool calls, tool
//!   results) rather than raw JSON.
//! - **Graceful degradation**: transport or provider failures never surface
//!   as errors from [`LanguageModel::complete`] or [`TextEmbedder::embed`].
//!   They return the tagged `Degraded` variant of [`CompletionOutcome`] /
//!   [`EmbeddingOutcome`] so callers can keep serving while still being able
//!   to tell a placeholder from real output.
//! - **Usage capture**: every successful API call records one event through
//!   the injected [`UsageSink`] before returning.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use openai_client::{CompletionRequest, LanguageModel, NullUsageSink, OpenAIClient, OpenAIConfig, Turn};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = OpenAIConfig::from_env()?;
//! let client = OpenAIClient::new(config, Arc::new(NullUsageSink))?;
//!
//! let request = CompletionRequest::new(
//!     vec![Turn::user("Send me ONE unicorn emoji")],
//!     "Answer briefly.",
//!     100,
//! );
//! let outcome = client.complete(request).await;
//! println!("{}", outcome.text());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod provider;
mod types;

pub use client::OpenAIClient;
pub use config::OpenAIConfig;
pub use provider::{LanguageModel, NullUsageSink, TextEmbedder, UsageSink};
pub use types::{
    Completion, CompletionOutcome, CompletionRequest, EmbeddingOutcome, TokenUsage,
    ToolCallRequest, ToolCallResult, ToolDeclaration, Turn, UsageEvent,
    DEGRADED_PLACEHOLDER_PREFIX,
};
