use utoipa::OpenApi;

use crate::api::recommendation;

#[derive(OpenApi)]
#[openapi(
    paths(recommendation::book_recommendation),
    components(schemas(
        recommendation::PromptRequest,
        recommendation::RecommendationResponse,
    )),
    tags(
        (name = "recommendations", description = "Retrieval-augmented book recommendations")
    )
)]
pub struct ApiDoc;
