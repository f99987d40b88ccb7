use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UsageResult<T> = Result<T, UsageError>;
