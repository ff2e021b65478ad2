use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use worklog::{AuthError, WorklogError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Uniform rejection for every failed authentication, whatever the
    /// internal reason.
    #[error("Invalid credentials")]
    AuthenticationFailed,

    #[error("Username already registered")]
    UsernameTaken,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl From<WorklogError> for ApiError {
    fn from(err: WorklogError) -> Self {
        if err.is_credential_rejection() {
            // Blocked, cooling down, bad password, and unknown user must be
            // indistinguishable on the wire. The logs keep the distinction.
            tracing::info!(outcome = %err, "authentication rejected");
            return ApiError::AuthenticationFailed;
        }

        match err {
            WorklogError::Auth(AuthError::UserAlreadyExists) => ApiError::UsernameTaken,
            WorklogError::Validation(msg) => ApiError::BadRequest(msg),
            err => ApiError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::UsernameTaken => (
                StatusCode::CONFLICT,
                "Username already registered".to_string(),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
