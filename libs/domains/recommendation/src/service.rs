use std::sync::Arc;

use domain_books::{SummaryRetriever, DEFAULT_TOP_N};
use openai_client::{
    CompletionOutcome, CompletionRequest, LanguageModel, ToolCallRequest, Turn,
};
use serde_json::json;
use tracing::{debug, instrument};

use crate::error::{RecommendationError, RecommendationResult};
use crate::prompts::{
    FORMAT_MAX_OUTPUT_TOKENS, FORMAT_RECOMMENDATIONS_INSTRUCTIONS, IDENTIFY_MAX_OUTPUT_TOKENS,
    IDENTIFY_THEMES_INSTRUCTIONS,
};
use crate::tools::{recommendation_tool, ToolArguments, RECOMMENDATION_TOOL_NAME};

/// The recommendation orchestrator.
///
/// One `recommend` call walks the conversation through a fixed protocol:
/// the prompt goes to the model with the retrieval tool declared, every tool
/// call in the reply is executed and answered under its correlation id, and
/// a final tool-free model call formats the result. The turn list lives only
/// for the duration of the call.
pub struct RecommendationService {
    model: Arc<dyn LanguageModel>,
    retriever: Arc<dyn SummaryRetriever>,
}

impl RecommendationService {
    pub fn new(model: Arc<dyn LanguageModel>, retriever: Arc<dyn SummaryRetriever>) -> Self {
        Self { model, retriever }
    }

    /// Produce a formatted recommendation for a free-text prompt.
    ///
    /// A reply without any tool calls is not an error: the formatting call
    /// then runs over whatever turns exist and may mention no books at all.
    /// Degraded model calls contribute their marked placeholder text instead
    /// of aborting.
    #[instrument(skip(self, prompt))]
    pub async fn recommend(&self, prompt: &str) -> RecommendationResult<String> {
        let mut turns = vec![Turn::user(prompt)];

        let request = CompletionRequest::new(
            turns.clone(),
            IDENTIFY_THEMES_INSTRUCTIONS,
            IDENTIFY_MAX_OUTPUT_TOKENS,
        )
        .with_tools(vec![recommendation_tool()]);

        match self.model.complete(request).await {
            CompletionOutcome::Completed(completion) => {
                turns.extend(completion.turns.iter().cloned());

                for request in completion.tool_calls() {
                    debug!(call_id = %request.call_id, tool = %request.name, "Tool requested");
                    let result = self.execute_tool_call(request).await?;
                    turns.push(result);
                }
            }
            CompletionOutcome::Degraded { placeholder, .. } => {
                // Keep going with the placeholder; the formatting call will
                // pass it through.
                turns.push(Turn::assistant(placeholder));
            }
        }

        let request = CompletionRequest::new(
            turns,
            FORMAT_RECOMMENDATIONS_INSTRUCTIONS,
            FORMAT_MAX_OUTPUT_TOKENS,
        );

        Ok(self.model.complete(request).await.text())
    }

    /// Execute one tool call and build the matching result turn.
    async fn execute_tool_call(&self, request: &ToolCallRequest) -> RecommendationResult<Turn> {
        if request.name != RECOMMENDATION_TOOL_NAME {
            return Err(RecommendationError::UnsupportedToolCall(
                request.name.clone(),
            ));
        }

        let arguments = ToolArguments::parse(&request.arguments).map_err(|e| {
            RecommendationError::MalformedToolArguments {
                call_id: request.call_id.clone(),
                details: e.to_string(),
            }
        })?;

        let top_n = arguments.n_results.unwrap_or(DEFAULT_TOP_N);
        let books = self.retriever.find_similar(&arguments.themes, top_n).await?;
        debug!(call_id = %request.call_id, count = books.len(), "Tool executed");

        let output = json!({ "recommended_books": books }).to_string();

        Ok(Turn::tool_result(request.call_id.clone(), output))
    }
}
