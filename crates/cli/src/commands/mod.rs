//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;
use sqlx::SqlitePool;
use thiserror::Error;

use minimart_core::UsernameError;

use minimart_server::db::{self, RepositoryError};
use minimart_server::services::AuthError;

/// Errors that can occur while running CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration error.
    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Authentication helper failed (password hashing).
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Invalid username.
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// No account with the given username.
    #[error("No such account: {0}")]
    NoSuchAccount(String),
}

/// Connect to the store database named by the environment.
///
/// Reads `MINIMART_DATABASE_URL`, falling back to `DATABASE_URL`, the same
/// resolution the server uses.
pub(crate) async fn connect() -> Result<SqlitePool, CommandError> {
    dotenvy::dotenv().ok();

    let url = std::env::var("MINIMART_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("MINIMART_DATABASE_URL"))?;

    Ok(db::create_pool(&SecretString::from(url)).await?)
}
