//! Minimart CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! minimart-cli migrate
//!
//! # Seed demo catalog and accounts
//! minimart-cli seed
//!
//! # Grant or revoke the admin flag
//! minimart-cli admin grant -u some_user
//! minimart-cli admin revoke -u some_user
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the database with the demo catalog and accounts
//! - `admin grant` / `admin revoke` - Manage the admin flag

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "minimart-cli")]
#[command(author, version, about = "Minimart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database with the demo catalog and accounts
    Seed,
    /// Manage the admin flag of accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin flag to an account
    Grant {
        /// Username of the account
        #[arg(short, long)]
        username: String,
    },
    /// Revoke the admin flag from an account
    Revoke {
        /// Username of the account
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { username } => commands::admin::set_admin(&username, true).await?,
            AdminAction::Revoke { username } => {
                commands::admin::set_admin(&username, false).await?;
            }
        },
    }
    Ok(())
}
