//! Domain-level error types.

use thiserror::Error;

/// Coarse failure category, stable across error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Conflict,
    Unauthorized,
    Unavailable,
    Internal,
}

/// Domain errors returned by the blog façade.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Platform unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Only transport failures are worth repeating; everything else is permanent.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Map a platform failure onto the domain taxonomy for the given entity.
    pub fn from_platform(err: PlatformError, entity: &'static str, key: &str) -> Self {
        match err {
            PlatformError::NotFound(_) => Self::NotFound {
                entity,
                key: key.to_string(),
            },
            PlatformError::Conflict(msg) => Self::Conflict(msg),
            PlatformError::Unauthorized(msg) => Self::Unauthorized(msg),
            PlatformError::Invalid(msg) => Self::Validation(msg),
            PlatformError::Transport(msg) => Self::Unavailable(msg),
            PlatformError::Platform { status, message } => {
                Self::Internal(format!("platform returned {status}: {message}"))
            }
        }
    }
}

/// Errors raised by platform adapters (document, storage and account ports).
#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid request: {0}")]
    Invalid(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Platform error ({status}): {message}")]
    Platform { status: u16, message: String },
}

impl PlatformError {
    /// The message reported by the platform, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Unauthorized(msg)
            | Self::Invalid(msg)
            | Self::Transport(msg) => msg,
            Self::Platform { message, .. } => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_not_found_maps_to_entity_key() {
        let err = DomainError::from_platform(
            PlatformError::NotFound("Document not found".to_string()),
            "post",
            "hello-world",
        );

        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "post not found: hello-world");
    }

    #[test]
    fn test_only_transport_is_retryable() {
        let transport =
            DomainError::from_platform(PlatformError::Transport("reset".into()), "post", "a");
        let conflict =
            DomainError::from_platform(PlatformError::Conflict("exists".into()), "post", "a");

        assert!(transport.is_retryable());
        assert_eq!(transport.kind(), ErrorKind::Unavailable);
        assert!(!conflict.is_retryable());
        assert_eq!(conflict.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_platform_message_is_raw() {
        let err = PlatformError::Unauthorized("Invalid credentials".to_string());
        assert_eq!(err.message(), "Invalid credentials");
    }
}
