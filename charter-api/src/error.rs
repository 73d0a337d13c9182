use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use charter_core::{RemoteError, GENERIC_FAILURE};
use charter_order::LifecycleError;

#[derive(Debug)]
pub enum AppError {
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// The backing service answered with an error
    BadGateway(String),
    /// The backing service could not be reached
    ServiceUnavailable(String),
}

impl AppError {
    /// Collaborator failures, already worded for the user
    pub fn remote(err: &RemoteError, message: String) -> Self {
        match err {
            RemoteError::NotFound => AppError::NotFoundError(message),
            RemoteError::Rejected { .. } => AppError::BadGateway(message),
            RemoteError::Transport(_) => AppError::ServiceUnavailable(message),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::ServiceUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        let message = err.user_message();
        match err {
            LifecycleError::Unauthorized(_) => AppError::AuthorizationError(message),
            LifecycleError::Schedule(_) | LifecycleError::Validation(_) => AppError::ValidationError(message),
            LifecycleError::NotFound(_) => AppError::NotFoundError(message),
            LifecycleError::InvalidTransition { .. } => AppError::ConflictError(message),
            LifecycleError::Remote { source, .. } => AppError::remote(&source, message),
        }
    }
}

impl From<RemoteError> for AppError {
    fn from(err: RemoteError) -> Self {
        let message = err.user_message(GENERIC_FAILURE);
        AppError::remote(&err, message)
    }
}
