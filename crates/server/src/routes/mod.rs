//! HTTP route handlers for the store API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Liveness check
//! GET    /health/ready           - Readiness check (pings the database)
//!
//! # Auth
//! POST   /api/signup             - Create account (auto-login)
//! POST   /api/login              - Login
//! POST   /api/logout             - Logout
//! POST   /api/verify             - Redeem verification code
//! GET    /api/user               - Current account profile
//!
//! # Catalog
//! GET    /api/products           - Product listing (public)
//! POST   /api/products           - Create product (admin)
//! PATCH  /api/products/{id}      - Partial update (admin)
//! DELETE /api/products/{id}      - Delete product (admin)
//!
//! # Cart & checkout
//! GET    /api/cart               - Current cart
//! POST   /api/cart               - Add one unit (reserves stock)
//! DELETE /api/cart/{productId}   - Remove line (restores stock)
//! POST   /api/cart/checkout      - Cart -> orders
//!
//! # Orders
//! POST   /api/purchase           - Direct one-unit purchase
//! GET    /api/user/orders        - Caller's order history
//! GET    /api/orders             - All orders (admin)
//! GET    /api/report             - CSV export (admin)
//!
//! # Admin users
//! GET    /api/admin/users        - List accounts (admin)
//! PATCH  /api/admin/users/{id}   - Toggle admin/verified flags (admin)
//! DELETE /api/admin/users/{id}   - Delete account (admin)
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, patch, post},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Assemble the full API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/verify", post(auth::verify))
        .route("/api/user", get(auth::current_user))
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            patch(products::update).delete(products::remove),
        )
        .route("/api/cart", get(cart::show).post(cart::add))
        .route("/api/cart/checkout", post(cart::checkout))
        .route("/api/cart/{productId}", delete(cart::remove))
        .route("/api/purchase", post(orders::purchase))
        .route("/api/user/orders", get(orders::my_orders))
        .route("/api/orders", get(orders::all_orders))
        .route("/api/report", get(orders::report))
        .route("/api/admin/users", get(admin::list_users))
        .route(
            "/api/admin/users/{id}",
            patch(admin::update_user).delete(admin::remove_user),
        )
}

/// Liveness health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity; 503 if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
