//! The book recommendation endpoint.

use axum::{extract::State, Json};
use axum_helpers::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PromptRequest {
    /// Free-text description of what the user wants to read
    pub prompt: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationResponse {
    /// Formatted recommendation text
    pub response: String,
}

/// Recommend books for a free-text prompt.
#[utoipa::path(
    post,
    path = "/book-recommendation",
    tag = "recommendations",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Formatted book recommendations", body = RecommendationResponse),
        (status = 400, description = "Empty prompt"),
        (status = 503, description = "Vector store unavailable"),
    )
)]
pub async fn book_recommendation(
    State(state): State<AppState>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    if request.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("prompt must not be empty".to_string()));
    }

    let response = state
        .recommendations
        .recommend(&request.prompt)
        .await
        .map_err(AppError::from)?;

    Ok(Json(RecommendationResponse { response }))
}
