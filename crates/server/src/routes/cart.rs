//! Cart and checkout route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use minimart_core::ProductId;

use crate::error::Result;
use crate::middleware::AuthContext;
use crate::models::Cart;
use crate::services::{CartService, CheckoutService};
use crate::state::AppState;

/// Add-to-cart request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i64,
}

/// Checkout request payload.
///
/// `payment_data` comes from the simulated client-side payment widget; only
/// its `status` field matters here. Anything other than `"confirmed"` leaves
/// the orders pending.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_data: Option<PaymentData>,
}

/// The slice of the payment widget's result we care about.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    #[serde(default)]
    pub status: Option<String>,
}

/// `GET /api/cart`
pub async fn show(State(state): State<AppState>, ctx: AuthContext) -> Result<Json<Cart>> {
    let cart = CartService::new(state.pool()).get(ctx.account_id).await?;

    Ok(Json(cart))
}

/// `POST /api/cart` — add one unit, reserving it from stock.
pub async fn add(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<Cart>> {
    let cart = CartService::new(state.pool())
        .add_item(ctx.account_id, ProductId::new(req.product_id))
        .await?;

    Ok(Json(cart))
}

/// `DELETE /api/cart/{productId}` — drop the line, restore its stock.
pub async fn remove(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(product_id): Path<i64>,
) -> Result<Json<Cart>> {
    let cart = CartService::new(state.pool())
        .remove_item(ctx.account_id, ProductId::new(product_id))
        .await?;

    Ok(Json(cart))
}

/// `POST /api/cart/checkout`
pub async fn checkout(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CheckoutRequest>,
) -> Result<Json<Value>> {
    let confirmed = req
        .payment_data
        .and_then(|p| p.status)
        .is_some_and(|status| status == "confirmed");

    let orders = CheckoutService::new(state.pool())
        .checkout(ctx.account_id, confirmed)
        .await?;

    Ok(Json(
        json!({ "message": "Checkout successful", "orders": orders }),
    ))
}
