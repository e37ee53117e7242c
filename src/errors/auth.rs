//! Authentication error types
//!
//! # Examples
//!
//! ```rust
//! use farmsync::errors::AuthError;
//!
//! let err = AuthError::InvalidToken;
//! assert!(err.is_authentication_error());
//!
//! let err = AuthError::UsernameTaken;
//! assert!(err.is_conflict());
//! ```

use thiserror::Error;

/// Authentication errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// No `Authorization` header, or one we cannot parse
    #[error("Authentication credentials were not provided")]
    MissingCredentials,

    /// Token does not match any issued key
    #[error("Invalid authentication token")]
    InvalidToken,

    /// Username/password pair rejected
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Input failed validation (username, email, password rules)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Email already exists")]
    EmailTaken,

    /// Token resolved but its user row is gone
    #[error("User not found")]
    UserNotFound,

    /// bcrypt failure
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl AuthError {
    /// Check if this is an authentication error (401)
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            AuthError::MissingCredentials
                | AuthError::InvalidToken
                | AuthError::InvalidCredentials
                | AuthError::UserNotFound
        )
    }

    /// Check if this is a conflict with an existing account (409)
    pub fn is_conflict(&self) -> bool {
        matches!(self, AuthError::UsernameTaken | AuthError::EmailTaken)
    }

    /// Check if this is a validation error (400)
    pub fn is_validation_error(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "AUTHENTICATION_REQUIRED",
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Validation(_) => "VALIDATION_FAILED",
            AuthError::UsernameTaken => "USERNAME_TAKEN",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Hashing(_) => "INTERNAL_ERROR",
            AuthError::Database(_) => "DATABASE_ERROR",
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        AuthError::Hashing(err.to_string())
    }
}
