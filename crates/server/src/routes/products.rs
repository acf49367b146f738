//! Catalog route handlers.
//!
//! Listing is public; create/update/delete require the admin flag.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

use minimart_core::ProductId;

use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// `GET /api/products`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;

    Ok(Json(products))
}

/// `POST /api/products` (admin)
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Json(new): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    if new.price.is_sign_negative() {
        return Err(AppError::BadRequest("Price cannot be negative".to_owned()));
    }
    if new.stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_owned()));
    }

    let product = ProductRepository::new(state.pool()).create(&new).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PATCH /api/products/{id}` (admin) — only the provided fields change.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<Product>> {
    if patch.price.is_some_and(|price| price.is_sign_negative()) {
        return Err(AppError::BadRequest("Price cannot be negative".to_owned()));
    }
    if patch.stock.is_some_and(|stock| stock < 0) {
        return Err(AppError::BadRequest("Stock cannot be negative".to_owned()));
    }

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &patch)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Product"),
            other => AppError::Database(other),
        })?;

    Ok(Json(product))
}

/// `DELETE /api/products/{id}` (admin)
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("Product"));
    }

    Ok(Json(json!({ "message": "Product deleted successfully" })))
}
