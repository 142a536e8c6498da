mod categories;
mod quiz;
mod results;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::quiz::QuizError;

pub use categories::category_router;
pub use quiz::quiz_router;
pub use results::results_router;

pub type ApiResponse<T> = Result<T, QuizError>;

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = match &self {
            QuizError::NotFound { .. } | QuizError::Database(sqlx::Error::RowNotFound) => {
                tracing::info!("{self}");
                return (StatusCode::NOT_FOUND, "Object not found").into_response();
            }
            QuizError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            QuizError::Cooldown { .. } => StatusCode::TOO_MANY_REQUESTS,
            other => {
                tracing::error!("Request failed: {other:#?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
