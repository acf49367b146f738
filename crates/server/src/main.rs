//! Minimart API server.
//!
//! Serves the store API: catalog, carts, checkout, direct purchases, orders,
//! and admin management, with session-cookie authentication.

use minimart_server::config::ServerConfig;
use minimart_server::db::{self, MIGRATOR};
use minimart_server::{AppState, app};

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "minimart_server=info,tower_http=debug".into());

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env().expect("Failed to load configuration");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let addr = config.socket_addr();
    let state = AppState::new(config, pool);

    let app = app(state).await.expect("Failed to build application");

    tracing::info!("minimart listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
