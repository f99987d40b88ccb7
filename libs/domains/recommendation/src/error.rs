use axum_helpers::AppError;
use domain_books::BookError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecommendationError {
    /// The model called a tool that was never declared. The system supports
    /// exactly one tool; anything else is a contract violation.
    #[error("Unexpected function call: {0}")]
    UnsupportedToolCall(String),

    /// The model's tool arguments failed structured decoding.
    #[error("Malformed tool arguments for call {call_id}: {details}")]
    MalformedToolArguments { call_id: String, details: String },

    /// Retrieval failed (vector store unreachable, invalid arguments).
    #[error(transparent)]
    Retrieval(#[from] BookError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type RecommendationResult<T> = Result<T, RecommendationError>;

/// Convert RecommendationError to AppError for standardized HTTP responses
impl From<RecommendationError> for AppError {
    fn from(err: RecommendationError) -> Self {
        match err {
            RecommendationError::UnsupportedToolCall(name) => {
                AppError::InternalServerError(format!("Unexpected function call: {}", name))
            }
            RecommendationError::MalformedToolArguments { call_id, details } => {
                AppError::InternalServerError(format!(
                    "Malformed tool arguments for call {}: {}",
                    call_id, details
                ))
            }
            RecommendationError::Retrieval(BookError::StoreUnavailable(msg)) => {
                AppError::ServiceUnavailable(format!("Vector store unavailable: {}", msg))
            }
            RecommendationError::Retrieval(BookError::Validation(msg)) => {
                AppError::BadRequest(msg)
            }
            RecommendationError::Retrieval(err) => AppError::InternalServerError(err.to_string()),
            RecommendationError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}
