use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("invalid contact details: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("result for {email} can be updated again in {retry_after}")]
    Cooldown {
        email: String,
        retry_after: chrono::Duration,
    },
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("failed to encode session state: {0}")]
    Session(#[from] serde_json::Error),
}

impl QuizError {
    pub(crate) fn not_found(entity: &'static str, id: i64) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| match err {
            sqlx::Error::RowNotFound => QuizError::NotFound { entity, id },
            other => QuizError::Database(other),
        }
    }
}
