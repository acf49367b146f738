//! Authentication error types.

use thiserror::Error;

use minimart_core::{EmailError, UsernameError};

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username/password combination is wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An account with this username already exists.
    #[error("An account with this username already exists")]
    UserAlreadyExists,

    /// Password doesn't meet requirements.
    #[error("{0}")]
    WeakPassword(String),

    /// Email format is invalid.
    #[error("Invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Username format is invalid.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// Verification code is wrong or no verification is pending.
    #[error("Invalid verification code")]
    InvalidCode,

    /// Password hashing failed.
    #[error("Password hashing failed")]
    PasswordHash,

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}
