use codeoj_core::AppError;
use thiserror::Error;

/// Failures of the session token issuer/verifier.
///
/// Token failures share one client-facing message so a caller cannot tell a
/// forged token from an expired one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect username or password")]
    InvalidCredentials,
    #[error("Missing or malformed authorization header")]
    MissingToken,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Invalid or expired token")]
    TokenExpired,
    #[error("Invalid or expired token")]
    RefreshWindowExceeded,
    #[error("Token processing failed: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(message) => AppError::internal_error(message),
            other => AppError::unauthorized(other.to_string()),
        }
    }
}
