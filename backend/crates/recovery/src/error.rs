//! Recovery Error Types
//!
//! Recovery-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Recovery-specific result type alias
pub type RecoveryResult<T> = Result<T, RecoveryError>;

/// Recovery-specific error variants
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// No account exists for the submitted email
    #[error("No account found for this email address")]
    UnknownEmail,

    /// Flow id does not reference a live flow
    #[error("Recovery flow not found")]
    FlowNotFound,

    /// Flow exists but its overall lifetime has elapsed
    #[error("Recovery flow has expired, please start over")]
    FlowExpired,

    /// Operation is not valid for the flow's current step
    #[error("This step is not available yet")]
    InvalidStep,

    /// Submitted code is malformed or does not match
    #[error("The code you entered is incorrect")]
    CodeInvalid,

    /// Code was correct in form but past its validity window
    #[error("The code has expired, request a new one")]
    CodeExpired,

    /// Too many wrong codes entered for this flow
    #[error("Too many incorrect attempts, please start over")]
    TooManyAttempts,

    /// Resend requested before the cooldown elapsed
    #[error("Please wait {retry_in_secs} seconds before requesting a new code")]
    ResendThrottled { retry_in_secs: i64 },

    /// Per-client request rate limit exceeded
    #[error("Too many recovery requests, please try again later")]
    RateLimited,

    /// New password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// New password fails the password policy
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Field-level validation error
    #[error("{0}")]
    Validation(String),

    /// Flow was started by a different client
    #[error("Recovery flow not found")]
    FingerprintMismatch,

    /// Mail delivery API call failed
    #[error("Could not send the recovery email, please try again")]
    DeliveryFailed(String),

    /// Missing required header
    #[error("Missing required header: {0}")]
    MissingHeader(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RecoveryError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RecoveryError::Validation(_)
            | RecoveryError::PasswordMismatch
            | RecoveryError::PasswordValidation(_)
            | RecoveryError::CodeInvalid
            | RecoveryError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            RecoveryError::FingerprintMismatch => StatusCode::FORBIDDEN,
            RecoveryError::UnknownEmail | RecoveryError::FlowNotFound => StatusCode::NOT_FOUND,
            RecoveryError::InvalidStep => StatusCode::CONFLICT,
            RecoveryError::FlowExpired | RecoveryError::CodeExpired => StatusCode::GONE,
            RecoveryError::TooManyAttempts
            | RecoveryError::ResendThrottled { .. }
            | RecoveryError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            RecoveryError::DeliveryFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            RecoveryError::Database(_) | RecoveryError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RecoveryError::Validation(_)
            | RecoveryError::PasswordMismatch
            | RecoveryError::PasswordValidation(_)
            | RecoveryError::CodeInvalid
            | RecoveryError::MissingHeader(_) => ErrorKind::BadRequest,
            RecoveryError::FingerprintMismatch => ErrorKind::Forbidden,
            RecoveryError::UnknownEmail | RecoveryError::FlowNotFound => ErrorKind::NotFound,
            RecoveryError::InvalidStep => ErrorKind::Conflict,
            RecoveryError::FlowExpired | RecoveryError::CodeExpired => ErrorKind::Gone,
            RecoveryError::TooManyAttempts
            | RecoveryError::ResendThrottled { .. }
            | RecoveryError::RateLimited => ErrorKind::TooManyRequests,
            RecoveryError::DeliveryFailed(_) => ErrorKind::ServiceUnavailable,
            RecoveryError::Database(_) | RecoveryError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            RecoveryError::Database(e) => {
                tracing::error!(error = %e, "Recovery database error");
            }
            RecoveryError::Internal(msg) => {
                tracing::error!(message = %msg, "Recovery internal error");
            }
            RecoveryError::DeliveryFailed(detail) => {
                tracing::error!(detail = %detail, "Recovery mail delivery failed");
            }
            RecoveryError::FingerprintMismatch => {
                tracing::warn!("Recovery flow fingerprint mismatch");
            }
            RecoveryError::TooManyAttempts | RecoveryError::RateLimited => {
                tracing::warn!(error = %self, "Recovery abuse threshold hit");
            }
            _ => {
                tracing::debug!(error = %self, "Recovery error");
            }
        }
    }
}

impl IntoResponse for RecoveryError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<platform::client::FingerprintError> for RecoveryError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                RecoveryError::MissingHeader(header)
            }
        }
    }
}
