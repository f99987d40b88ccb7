use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    /// The vector store is unreachable or not initialized
    #[error("Vector store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type BookResult<T> = Result<T, BookError>;

impl From<qdrant_client::QdrantError> for BookError {
    fn from(err: qdrant_client::QdrantError) -> Self {
        BookError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> Self {
        BookError::Internal(format!("JSON error: {}", err))
    }
}
