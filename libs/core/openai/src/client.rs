use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::OpenAIConfig;
use crate::provider::{LanguageModel, TextEmbedder, UsageSink};
use crate::types::{
    Completion, CompletionOutcome, CompletionRequest, EmbeddingOutcome, TokenUsage,
    ToolCallRequest, Turn, UsageEvent, DEGRADED_PLACEHOLDER_PREFIX,
};

/// Client for the OpenAI Responses and Embeddings APIs.
///
/// Holds a pooled HTTP client with a per-request timeout and the injected
/// usage sink. Cheap to clone.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    config: OpenAIConfig,
    usage: Arc<dyn UsageSink>,
}

impl OpenAIClient {
    pub fn new(config: OpenAIConfig, usage: Arc<dyn UsageSink>) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            config,
            usage,
        })
    }

    fn degraded_completion(&self, reason: String) -> CompletionOutcome {
        warn!("Completion call degraded: {}", reason);
        let placeholder = format!(
            "{} Could not reach the model: {}",
            DEGRADED_PLACEHOLDER_PREFIX, reason
        );
        CompletionOutcome::Degraded {
            reason,
            placeholder,
        }
    }

    fn degraded_embedding(&self, texts: &[String], reason: String) -> EmbeddingOutcome {
        warn!("Embedding call degraded: {}", reason);
        EmbeddingOutcome::Degraded {
            vectors: vec![vec![0.0; self.config.embedding_dimension]; texts.len()],
            reason,
        }
    }

    async fn send_completion(
        &self,
        request: &CompletionRequest,
    ) -> Result<ResponsesApiResponse, String> {
        let input: Vec<serde_json::Value> = request.turns.iter().map(turn_to_wire).collect();

        let mut body = json!({
            "model": self.config.model,
            "instructions": request.instructions,
            "input": input,
            "max_output_tokens": request.max_output_tokens,
        });
        if !request.tools.is_empty() {
            let tools: Vec<serde_json::Value> = request
                .tools
                .iter()
                .map(|tool| {
                    json!({
                        "type": "function",
                        "name": tool.name,
                        "description": tool.description,
                        "parameters": tool.parameters,
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }

        let response = self
            .http
            .post(format!("{}/responses", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("OpenAI API error ({}): {}", status, error_text));
        }

        response
            .json::<ResponsesApiResponse>()
            .await
            .map_err(|e| format!("Failed to parse response: {}", e))
    }
}

#[async_trait]
impl LanguageModel for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> CompletionOutcome {
        let response = match self.send_completion(&request).await {
            Ok(response) => response,
            Err(reason) => return self.degraded_completion(reason),
        };

        let usage = completion_usage(&response);
        let turns = output_to_turns(response.output);

        let completion = Completion { turns, usage };

        // Record before returning so the statistics survive even if the
        // surrounding orchestration fails at a later step.
        let input_log = request
            .turns
            .iter()
            .map(render_turn)
            .collect::<Vec<_>>()
            .join("\n");
        self.usage
            .record(UsageEvent {
                instructions: Some(request.instructions.clone()),
                input: Some(input_log),
                output: Some(completion.output_text()),
                usage: completion.usage.clone(),
                batch: false,
            })
            .await;
        debug!(model = %completion.usage.model, "Recorded completion usage");

        CompletionOutcome::Completed(completion)
    }
}

#[async_trait]
impl TextEmbedder for OpenAIClient {
    fn dimension(&self) -> usize {
        self.config.embedding_dimension
    }

    async fn embed(&self, texts: &[String]) -> EmbeddingOutcome {
        if texts.is_empty() {
            return EmbeddingOutcome::Embedded {
                vectors: vec![],
                usage: TokenUsage::default(),
            };
        }

        let body = json!({
            "model": self.config.embedding_model,
            "input": texts,
        });

        let result = async {
            let response = self
                .http
                .post(format!("{}/embeddings", self.config.base_url))
                .header("Authorization", format!("Bearer {}", self.config.api_key))
                .json(&body)
                .send()
                .await
                .map_err(|e| format!("HTTP request failed: {}", e))?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                return Err(format!("OpenAI API error ({}): {}", status, error_text));
            }

            response
                .json::<EmbeddingsApiResponse>()
                .await
                .map_err(|e| format!("Failed to parse response: {}", e))
        }
        .await;

        let response = match result {
            Ok(response) => response,
            Err(reason) => return self.degraded_embedding(texts, reason),
        };

        // Sort by index to maintain input order
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|d| d.embedding).collect();

        // Embeddings have no output or cached/reasoning split; all prompt
        // tokens count as uncached input.
        let usage = TokenUsage {
            model: response.model,
            uncached_input_tokens: response.usage.prompt_tokens,
            ..TokenUsage::default()
        };

        self.usage
            .record(UsageEvent {
                instructions: None,
                input: Some(texts.join("\n")),
                output: None,
                usage: usage.clone(),
                batch: false,
            })
            .await;
        debug!(model = %usage.model, "Recorded embedding usage");

        EmbeddingOutcome::Embedded { vectors, usage }
    }
}

// ===== Wire conversion =====

fn turn_to_wire(turn: &Turn) -> serde_json::Value {
    match turn {
        Turn::User { content } => json!({"role": "user", "content": content}),
        Turn::Assistant { content } => json!({"role": "assistant", "content": content}),
        Turn::ToolCall(request) => json!({
            "type": "function_call",
            "call_id": request.call_id,
            "name": request.name,
            "arguments": request.arguments,
        }),
        Turn::ToolResult(result) => json!({
            "type": "function_call_output",
            "call_id": result.call_id,
            "output": result.output,
        }),
    }
}

fn render_turn(turn: &Turn) -> String {
    match turn {
        Turn::User { content } => format!("user: {}", content),
        Turn::Assistant { content } => format!("assistant: {}", content),
        Turn::ToolCall(request) => format!("tool_call {}: {}", request.name, request.arguments),
        Turn::ToolResult(result) => format!("tool_result: {}", result.output),
    }
}

fn output_to_turns(output: Vec<OutputItem>) -> Vec<Turn> {
    output
        .into_iter()
        .filter_map(|item| match item {
            OutputItem::Message { content, .. } => {
                let text: Vec<String> = content
                    .into_iter()
                    .filter_map(|part| match part {
                        ContentPart::OutputText { text } => Some(text),
                        ContentPart::Other => None,
                    })
                    .collect();
                Some(Turn::assistant(text.join("")))
            }
            OutputItem::FunctionCall {
                call_id,
                name,
                arguments,
            } => Some(Turn::ToolCall(ToolCallRequest {
                call_id,
                name,
                arguments,
            })),
            OutputItem::Other => None,
        })
        .collect()
}

fn completion_usage(response: &ResponsesApiResponse) -> TokenUsage {
    let cached = response
        .usage
        .input_tokens_details
        .as_ref()
        .map(|d| d.cached_tokens)
        .unwrap_or(0);
    let reasoning = response
        .usage
        .output_tokens_details
        .as_ref()
        .map(|d| d.reasoning_tokens)
        .unwrap_or(0);

    TokenUsage {
        model: response.model.clone(),
        cached_input_tokens: cached,
        uncached_input_tokens: response.usage.input_tokens.saturating_sub(cached),
        reasoning_output_tokens: reasoning,
        nonreasoning_output_tokens: response.usage.output_tokens.saturating_sub(reasoning),
    }
}

// ===== Wire DTOs =====

#[derive(Debug, Deserialize)]
struct ResponsesApiResponse {
    model: String,
    output: Vec<OutputItem>,
    usage: ResponseUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[allow(dead_code)]
        role: Option<String>,
        content: Vec<ContentPart>,
    },
    #[serde(rename = "function_call")]
    FunctionCall {
        call_id: String,
        name: String,
        arguments: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    input_tokens: u32,
    output_tokens: u32,
    input_tokens_details: Option<InputTokensDetails>,
    output_tokens_details: Option<OutputTokensDetails>,
}

#[derive(Debug, Deserialize)]
struct InputTokensDetails {
    cached_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OutputTokensDetails {
    reasoning_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsApiResponse {
    model: String,
    data: Vec<EmbeddingData>,
    usage: EmbeddingUsage,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Debug, Deserialize)]
struct EmbeddingUsage {
    prompt_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::NullUsageSink;
    use crate::types::{ToolCallResult, ToolDeclaration};

    fn test_client(base_url: &str) -> OpenAIClient {
        let config = OpenAIConfig::new("sk-test".to_string())
            .with_base_url(base_url.to_string())
            .with_timeout(2);
        OpenAIClient::new(config, Arc::new(NullUsageSink)).unwrap()
    }

    #[test]
    fn user_and_tool_turns_serialize_to_wire_items() {
        let user = turn_to_wire(&Turn::user("hello"));
        assert_eq!(user["role"], "user");
        assert_eq!(user["content"], "hello");

        let call = turn_to_wire(&Turn::ToolCall(ToolCallRequest {
            call_id: "call_42".to_string(),
            name: "get_books_by_themes".to_string(),
            arguments: r#"{"themes":["courage"]}"#.to_string(),
        }));
        assert_eq!(call["type"], "function_call");
        assert_eq!(call["call_id"], "call_42");

        let result = turn_to_wire(&Turn::ToolResult(ToolCallResult {
            call_id: "call_42".to_string(),
            output: r#"{"recommended_books":[]}"#.to_string(),
        }));
        assert_eq!(result["type"], "function_call_output");
        assert_eq!(result["call_id"], "call_42");
    }

    #[test]
    fn tool_declaration_keeps_parameter_schema() {
        let declaration = ToolDeclaration::new(
            "get_books_by_themes",
            "Get book summaries based on thematic similarity.",
            json!({
                "type": "object",
                "properties": {"themes": {"type": "array", "items": {"type": "string"}}},
                "required": ["themes"],
            }),
        );
        assert_eq!(declaration.parameters["required"][0], "themes");
    }

    #[test]
    fn response_output_parses_messages_and_function_calls() {
        let body = r#"{
            "model": "gpt-4.1-nano-2025-04-14",
            "output": [
                {"type": "reasoning", "summary": []},
                {"type": "message", "role": "assistant", "content": [
                    {"type": "output_text", "text": "Looking for themes."}
                ]},
                {"type": "function_call", "call_id": "call_1", "name": "get_books_by_themes",
                 "arguments": "{\"themes\": [\"courage\"]}"}
            ],
            "usage": {
                "input_tokens": 120,
                "output_tokens": 30,
                "input_tokens_details": {"cached_tokens": 20},
                "output_tokens_details": {"reasoning_tokens": 10}
            }
        }"#;

        let response: ResponsesApiResponse = serde_json::from_str(body).unwrap();
        let usage = completion_usage(&response);
        assert_eq!(usage.model, "gpt-4.1-nano-2025-04-14");
        assert_eq!(usage.cached_input_tokens, 20);
        assert_eq!(usage.uncached_input_tokens, 100);
        assert_eq!(usage.reasoning_output_tokens, 10);
        assert_eq!(usage.nonreasoning_output_tokens, 20);

        let turns = output_to_turns(response.output);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::assistant("Looking for themes."));
        match &turns[1] {
            Turn::ToolCall(call) => {
                assert_eq!(call.call_id, "call_1");
                assert_eq!(call.name, "get_books_by_themes");
            }
            other => panic!("expected tool call, got {:?}", other),
        }
    }

    #[test]
    fn usage_defaults_when_details_missing() {
        let body = r#"{
            "model": "gpt-4.1-nano",
            "output": [],
            "usage": {"input_tokens": 50, "output_tokens": 8}
        }"#;

        let response: ResponsesApiResponse = serde_json::from_str(body).unwrap();
        let usage = completion_usage(&response);
        assert_eq!(usage.cached_input_tokens, 0);
        assert_eq!(usage.uncached_input_tokens, 50);
        assert_eq!(usage.reasoning_output_tokens, 0);
        assert_eq!(usage.nonreasoning_output_tokens, 8);
    }

    #[tokio::test]
    async fn unreachable_api_degrades_completion_with_marked_placeholder() {
        let client = test_client("http://127.0.0.1:9");

        let outcome = client
            .complete(CompletionRequest::new(
                vec![Turn::user("hello")],
                "Answer briefly.",
                100,
            ))
            .await;

        assert!(outcome.is_degraded());
        assert!(outcome.text().starts_with(DEGRADED_PLACEHOLDER_PREFIX));
    }

    #[tokio::test]
    async fn unreachable_api_degrades_embedding_to_zero_vectors() {
        let client = test_client("http://127.0.0.1:9");

        let outcome = client.embed(&["x".to_string()]).await;

        assert!(outcome.is_degraded());
        let vectors = outcome.vectors();
        assert_eq!(vectors.len(), 1);
        assert_eq!(vectors[0].len(), 1536);
        assert!(vectors[0].iter().all(|v| *v == 0.0));
    }

    #[tokio::test]
    async fn empty_embedding_input_short_circuits() {
        let client = test_client("http://127.0.0.1:9");

        let outcome = client.embed(&[]).await;

        assert!(!outcome.is_degraded());
        assert!(outcome.vectors().is_empty());
    }
}
