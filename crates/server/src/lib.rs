//! Minimart server library.
//!
//! Exposes the whole application as a library so the router can be exercised
//! in-process by tests and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the application router with sessions and request tracing wired in.
///
/// # Errors
///
/// Returns `sqlx::Error` if the session store cannot set up its table.
pub async fn app(state: AppState) -> Result<Router, sqlx::Error> {
    let session_layer = middleware::create_session_layer(state.pool(), state.config()).await?;

    Ok(routes::router()
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
