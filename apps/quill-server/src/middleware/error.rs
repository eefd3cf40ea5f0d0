//! Error handling middleware - RFC 7807 compliant responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use quill_core::auth::LoginError;
use quill_core::{DomainError, PlatformError};
use quill_shared::ErrorResponse;
use thiserror::Error;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized(detail) => ErrorResponse::unauthorized(detail),
            AppError::Forbidden => ErrorResponse::forbidden(),
            AppError::Conflict(detail) => ErrorResponse::conflict(detail),
            AppError::Unavailable(detail) => ErrorResponse::service_unavailable(detail),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { .. } => AppError::NotFound(err.to_string()),
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Conflict(msg) => AppError::Conflict(msg),
            DomainError::Unauthorized(msg) => AppError::Unauthorized(msg),
            DomainError::Unavailable(msg) => AppError::Unavailable(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<LoginError> for AppError {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::Invalid(msg) => AppError::BadRequest(msg),
            LoginError::Rejected(msg) => AppError::Unauthorized(msg),
        }
    }
}

impl From<PlatformError> for AppError {
    fn from(err: PlatformError) -> Self {
        DomainError::from_platform(err, "session", "current").into()
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let not_found: AppError = DomainError::NotFound {
            entity: "post",
            key: "hello-world".to_string(),
        }
        .into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let unavailable: AppError = DomainError::Unavailable("timed out".to_string()).into();
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let conflict: AppError = DomainError::Conflict("exists".to_string()).into();
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_rejected_login_is_unauthorized() {
        let err: AppError = LoginError::Rejected("Invalid credentials".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let err: AppError = LoginError::Invalid("Email is required".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
