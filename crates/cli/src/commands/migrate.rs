//! Database migration command.

use minimart_server::db::MIGRATOR;

use super::CommandError;

/// Apply all pending migrations to the store database.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running store migrations...");
    MIGRATOR.run(&pool).await?;
    tracing::info!("Migrations applied");

    Ok(())
}
