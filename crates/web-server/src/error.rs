use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::ValidationError;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(DbError),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub const DUPLICATE_PROJECT: &str = "Project with this ID already exists";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

impl From<DbError> for AppError {
    /// A primary-key clash that slipped past the existence check is still a conflict, not a fault.
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConstraintViolation(project_id) => {
                tracing::warn!(project_id, "Insert lost a race on the primary key.");
                AppError::Conflict(DUPLICATE_PROJECT.to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::MalformedBody(rejection.body_text()))
    }
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every error body has the shape `{"success": false, "error": "..."}`; server
/// faults are logged here and reach the client only as a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
            }
            AppError::Internal(detail) => {
                tracing::error!(%detail, "Internal error.");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR.to_string())
            }
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}
