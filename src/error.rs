use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before touching storage.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    pub fn task_not_found() -> Self {
        AppError::NotFound("Task not found".into())
    }

    /// Maps a referential-integrity failure on `tasks.user_id` to a client error.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_foreign_key_violation() {
                return AppError::Validation("userId does not reference an existing user".into());
            }
        }
        AppError::Database(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::Database(e) => {
                error!("Failed to execute query: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            message,
        })
    }
}
