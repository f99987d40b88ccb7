//! Recommendation Domain
//!
//! The retrieval-augmented orchestration flow: a user prompt goes to the
//! language model with a single retrieval tool declared, every tool call the
//! model issues is executed against the vector store, and a second model call
//! formats the retrieved summaries into the final answer.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────┐
//! │ RecommendationService │  ← turn list, tool-call loop, two model calls
//! └─────┬───────────┬─────┘
//!       │           │
//! ┌─────▼─────┐ ┌───▼──────────────┐
//! │LanguageMod│ │ SummaryRetriever │
//! │el (trait) │ │     (trait)      │
//! └───────────┘ └──────────────────┘
//! ```
//!
//! Provider outages degrade to marked placeholder text; violations of the
//! declared tool contract (unknown tool name, malformed arguments) abort the
//! orchestration.

pub mod error;
pub mod prompts;
pub mod service;
pub mod tools;

// Re-export commonly used types
pub use error::{RecommendationError, RecommendationResult};
pub use service::RecommendationService;
pub use tools::{recommendation_tool, ToolArguments, RECOMMENDATION_TOOL_NAME};
