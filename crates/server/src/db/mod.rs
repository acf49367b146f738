//! Database operations for the Minimart store.
//!
//! The store keeps everything in a single `SQLite` database:
//!
//! ## Tables
//!
//! - `account` - identities, credentials, admin/verified flags
//! - `product` - catalog with stock counts
//! - `cart` / `cart_line` - one cart per account, reserved quantities
//! - `purchase_order` - completed or pending purchases
//! - `tower_sessions` - session storage (created by the session store)
//!
//! # Migrations
//!
//! Migrations live in `crates/server/migrations/` and are embedded via
//! [`MIGRATOR`]. They run on server startup and via:
//! ```bash
//! cargo run -p minimart-cli -- migrate
//! ```

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;

pub mod accounts;
pub mod carts;
pub mod orders;
pub mod products;

pub use accounts::AccountRepository;
pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Embedded migrations for the store schema.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g. unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `SQLite` connection pool with sensible defaults.
///
/// The database file is created if missing; foreign key enforcement is on.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url.expose_secret())?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await
}

/// Parse a TEXT money column into a `Decimal`.
///
/// `SQLite` has no decimal type, so prices and amounts are stored as strings.
pub(crate) fn parse_money(value: &str, column: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value).map_err(|e| {
        RepositoryError::DataCorruption(format!("invalid decimal in {column}: {e}"))
    })
}

/// Parse a TEXT JSON-array column into category labels.
pub(crate) fn parse_categories(value: &str) -> Result<Vec<String>, RepositoryError> {
    serde_json::from_str(value)
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid categories json: {e}")))
}
