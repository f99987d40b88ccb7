use serde::{Deserialize, Serialize};

/// Prefix carried by every placeholder produced on a degraded completion.
///
/// Callers (and tests) can rely on this marker to tell a placeholder from
/// real model output even after the text has left the typed outcome.
pub const DEGRADED_PLACEHOLDER_PREFIX: &str = "[model unavailable]";

/// One turn of a model conversation.
///
/// Order is significant: the sequence reconstructs the dialogue the model
/// reasons over. Turn lists live for a single orchestration call and are not
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    /// Text authored by the end user
    User { content: String },
    /// Text produced by the model
    Assistant { content: String },
    /// A tool invocation the model wants performed
    ToolCall(ToolCallRequest),
    /// The result fed back for a prior tool invocation
    ToolResult(ToolCallResult),
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: content.into(),
        }
    }

    pub fn tool_result(call_id: impl Into<String>, output: impl Into<String>) -> Self {
        Turn::ToolResult(ToolCallResult {
            call_id: call_id.into(),
            output: output.into(),
        })
    }
}

/// A model-initiated request to invoke a declared tool.
///
/// `call_id` correlates the request with the [`ToolCallResult`] that answers
/// it; the pairing must be 1:1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub call_id: String,
    pub name: String,
    /// JSON-encoded argument payload, exactly as produced by the model
    pub arguments: String,
}

/// The executed result for one tool call, correlated by `call_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub call_id: String,
    /// JSON-encoded result payload
    pub output: String,
}

/// Static description of a callable tool, declared once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON-schema-like parameter spec with required fields
    pub parameters: serde_json::Value,
}

impl ToolDeclaration {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// A single completion request against the Responses API.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub turns: Vec<Turn>,
    pub instructions: String,
    pub tools: Vec<ToolDeclaration>,
    /// Hard cap on generated tokens; bounds resource consumption per call
    pub max_output_tokens: u32,
}

impl CompletionRequest {
    pub fn new(turns: Vec<Turn>, instructions: impl Into<String>, max_output_tokens: u32) -> Self {
        Self {
            turns,
            instructions: instructions.into(),
            tools: Vec::new(),
            max_output_tokens,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDeclaration>) -> Self {
        self.tools = tools;
        self
    }
}

/// Token statistics for one model call.
///
/// Counts are split the way the billing tiers split them: cached vs uncached
/// input, reasoning vs non-reasoning output. Embedding calls only ever set
/// `uncached_input_tokens`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub model: String,
    pub cached_input_tokens: u32,
    pub uncached_input_tokens: u32,
    pub reasoning_output_tokens: u32,
    pub nonreasoning_output_tokens: u32,
}

/// One usage event handed to a [`crate::UsageSink`] after a successful call.
#[derive(Debug, Clone)]
pub struct UsageEvent {
    pub instructions: Option<String>,
    pub input: Option<String>,
    pub output: Option<String>,
    pub usage: TokenUsage,
    /// Whether the call went through the Batch API
    pub batch: bool,
}

/// A successful completion: the model's output turns plus usage statistics.
#[derive(Debug, Clone)]
pub struct Completion {
    pub turns: Vec<Turn>,
    pub usage: TokenUsage,
}

impl Completion {
    /// Concatenated assistant text across all output turns
    pub fn output_text(&self) -> String {
        let parts: Vec<&str> = self
            .turns
            .iter()
            .filter_map(|turn| match turn {
                Turn::Assistant { content } => Some(content.as_str()),
                _ => None,
            })
            .collect();
        parts.join("\n")
    }

    /// Tool calls in the order the model issued them
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallRequest> {
        self.turns.iter().filter_map(|turn| match turn {
            Turn::ToolCall(request) => Some(request),
            _ => None,
        })
    }
}

/// Outcome of a completion call.
///
/// Provider failures produce `Degraded` rather than an error so the
/// surrounding orchestration can keep functioning during outages; the variant
/// keeps placeholders distinguishable from real output.
#[derive(Debug, Clone)]
pub enum CompletionOutcome {
    Completed(Completion),
    Degraded { reason: String, placeholder: String },
}

impl CompletionOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, CompletionOutcome::Degraded { .. })
    }

    /// Final text: the assistant output, or the placeholder when degraded
    pub fn text(&self) -> String {
        match self {
            CompletionOutcome::Completed(completion) => completion.output_text(),
            CompletionOutcome::Degraded { placeholder, .. } => placeholder.clone(),
        }
    }
}

/// Outcome of an embedding call.
///
/// On failure each input text gets a deterministic zero vector of the
/// configured dimension, tagged `Degraded`.
#[derive(Debug, Clone)]
pub enum EmbeddingOutcome {
    Embedded {
        vectors: Vec<Vec<f32>>,
        usage: TokenUsage,
    },
    Degraded {
        vectors: Vec<Vec<f32>>,
        reason: String,
    },
}

impl EmbeddingOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, EmbeddingOutcome::Degraded { .. })
    }

    pub fn vectors(&self) -> &[Vec<f32>] {
        match self {
            EmbeddingOutcome::Embedded { vectors, .. } => vectors,
            EmbeddingOutcome::Degraded { vectors, .. } => vectors,
        }
    }

    pub fn into_vectors(self) -> Vec<Vec<f32>> {
        match self {
            EmbeddingOutcome::Embedded { vectors, .. } => vectors,
            EmbeddingOutcome::Degraded { vectors, .. } => vectors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completion_with(turns: Vec<Turn>) -> Completion {
        Completion {
            turns,
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn output_text_joins_assistant_turns_only() {
        let completion = completion_with(vec![
            Turn::assistant("first"),
            Turn::ToolCall(ToolCallRequest {
                call_id: "call_1".to_string(),
                name: "get_books_by_themes".to_string(),
                arguments: "{}".to_string(),
            }),
            Turn::assistant("second"),
        ]);

        assert_eq!(completion.output_text(), "first\nsecond");
    }

    #[test]
    fn tool_calls_preserve_order() {
        let completion = completion_with(vec![
            Turn::ToolCall(ToolCallRequest {
                call_id: "call_1".to_string(),
                name: "a".to_string(),
                arguments: "{}".to_string(),
            }),
            Turn::assistant("text"),
            Turn::ToolCall(ToolCallRequest {
                call_id: "call_2".to_string(),
                name: "b".to_string(),
                arguments: "{}".to_string(),
            }),
        ]);

        let ids: Vec<&str> = completion
            .tool_calls()
            .map(|c| c.call_id.as_str())
            .collect();
        assert_eq!(ids, vec!["call_1", "call_2"]);
    }

    #[test]
    fn degraded_outcome_exposes_placeholder_text() {
        let outcome = CompletionOutcome::Degraded {
            reason: "connection refused".to_string(),
            placeholder: format!("{} connection refused", DEGRADED_PLACEHOLDER_PREFIX),
        };

        assert!(outcome.is_degraded());
        assert!(outcome.text().starts_with(DEGRADED_PLACEHOLDER_PREFIX));
    }
}
