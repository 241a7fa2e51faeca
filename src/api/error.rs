use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;
use crate::db::RepositoryError;

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No verified caller identity accompanied the request
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    /// The application does not exist or was deleted
    #[error("job application not found: {0}")]
    NotFound(String),

    /// The caller does not own the application
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Request payload rejected before reaching storage
    #[error("validation error: {0}")]
    Validation(String),

    /// Storage operation failed
    #[error(transparent)]
    Storage(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // A save that lost a race with a delete is reported like any
            // other missing application.
            RepositoryError::NotFound(id) => ServiceError::NotFound(id),
            other => ServiceError::Storage(other),
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error, message) = match self {
            ServiceError::Storage(e) => {
                // Never leak storage details to the caller.
                error!("Storage error: {}", e);
                ("Failed to process request", "Database error occurred".to_string())
            }
            ServiceError::Unauthenticated(msg) => {
                warn!("Unauthenticated request: {}", msg);
                ("Unauthenticated", msg.clone())
            }
            ServiceError::NotFound(id) => {
                warn!("Job application not found: {}", id);
                ("Not found", format!("Job application with id {} not found", id))
            }
            ServiceError::PermissionDenied(msg) => {
                warn!("Permission denied: {}", msg);
                ("Permission denied", msg.clone())
            }
            ServiceError::Validation(msg) => {
                warn!("Validation error: {}", msg);
                ("Validation failed", msg.clone())
            }
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: error.to_string(),
            fields: serde_json::json!({ "message": message }),
        })
    }
}
