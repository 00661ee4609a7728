//! Account Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required registration field is empty
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Password and confirmation differ
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Terms and conditions were not accepted
    #[error("You must accept the terms and conditions")]
    TermsNotAccepted,

    /// Requested role cannot be self-assigned at registration
    #[error("Invalid account role: {0}")]
    InvalidRole(String),

    /// Field-level validation error (email, phone, ...)
    #[error("{0}")]
    Validation(String),

    /// Password validation error
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Email already registered
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is locked (too many failed attempts)
    #[error("Account is temporarily locked")]
    AccountLocked,

    /// Account is disabled
    #[error("Account is disabled")]
    AccountDisabled,

    /// Session not found or expired
    #[error("Session not found or expired")]
    SessionInvalid,

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

impl AccountError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountError::MissingField(_)
            | AccountError::PasswordMismatch
            | AccountError::TermsNotAccepted
            | AccountError::InvalidRole(_)
            | AccountError::Validation(_)
            | AccountError::PasswordValidation(_)
            | AccountError::MissingHeader(_) => StatusCode::BAD_REQUEST,
            AccountError::EmailTaken => StatusCode::CONFLICT,
            AccountError::InvalidCredentials | AccountError::SessionInvalid => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::AccountLocked | AccountError::AccountDisabled => StatusCode::FORBIDDEN,
            AccountError::Database(_) | AccountError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::MissingField(_)
            | AccountError::PasswordMismatch
            | AccountError::TermsNotAccepted
            | AccountError::InvalidRole(_)
            | AccountError::Validation(_)
            | AccountError::PasswordValidation(_)
            | AccountError::MissingHeader(_) => ErrorKind::BadRequest,
            AccountError::EmailTaken => ErrorKind::Conflict,
            AccountError::InvalidCredentials | AccountError::SessionInvalid => {
                ErrorKind::Unauthorized
            }
            AccountError::AccountLocked | AccountError::AccountDisabled => ErrorKind::Forbidden,
            AccountError::Database(_) | AccountError::Internal(_) => {
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
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AccountError::AccountLocked => {
                tracing::warn!("Login attempt on locked account");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountError {
    fn from(err: AppError) -> Self {
        AccountError::Validation(err.message().to_string())
    }
}

impl From<platform::client::FingerprintError> for AccountError {
    fn from(err: platform::client::FingerprintError) -> Self {
        match err {
            platform::client::FingerprintError::MissingHeader(header) => {
                AccountError::MissingHeader(header)
            }
        }
    }
}
