//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! User-visible messages are deliberately generic: "user not found" and
//! "wrong password" must be indistinguishable, and store failures must
//! not leak internal detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Sign-in rejected; collapses unknown user and wrong password
    #[error("Invalid user name or password")]
    InvalidCredentials,

    /// No refresh token was supplied
    #[error("No session token provided")]
    TokenMissing,

    /// Refresh token is not in the active set (logged out or revoked)
    #[error("Session has been revoked")]
    TokenRevoked,

    /// Token failed signature or expiry checks
    #[error("Session token is invalid")]
    TokenInvalid,

    /// Protected resource accessed without a credential
    #[error("Authentication required")]
    Unauthenticated,

    /// Protected resource accessed with a bad credential
    #[error("Access denied")]
    Forbidden,

    /// The shared session store could not be reached in time.
    /// The only variant callers may retry; never substituted for a
    /// revocation verdict.
    #[error("Session store unavailable")]
    StoreUnavailable,

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// Input validation failed (user name or password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::TokenMissing
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::TokenRevoked | AuthError::TokenInvalid | AuthError::Forbidden => {
                StatusCode::FORBIDDEN
            }
            AuthError::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::UserNameTaken => StatusCode::CONFLICT,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::TokenMissing
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::TokenRevoked | AuthError::TokenInvalid | AuthError::Forbidden => {
                ErrorKind::Forbidden
            }
            AuthError::StoreUnavailable => ErrorKind::ServiceUnavailable,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::StoreUnavailable => {
                tracing::error!("Session store unavailable");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::TokenRevoked => {
                tracing::warn!("Refresh attempted with a revoked token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::jwt::TokenError> for AuthError {
    fn from(err: platform::jwt::TokenError) -> Self {
        use platform::jwt::TokenError;
        match err {
            // Expired and forged tokens are one outcome at the boundary
            TokenError::Expired | TokenError::Invalid => AuthError::TokenInvalid,
            TokenError::Creation(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
