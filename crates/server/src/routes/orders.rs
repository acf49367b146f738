//! Order route handlers: direct purchase, history, admin listing, CSV export.

use axum::{
    Json,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use minimart_core::ProductId;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AuthContext, RequireAdmin};
use crate::models::{AccountOrder, AdminOrder};
use crate::services::PurchaseService;
use crate::state::AppState;

/// Direct purchase request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub product_id: i64,
}

/// `POST /api/purchase` — buy one unit directly, skipping the cart.
pub async fn purchase(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<Value>> {
    let (_, product_name) = PurchaseService::new(state.pool())
        .purchase(ctx.account_id, ctx.is_verified, ProductId::new(req.product_id))
        .await?;

    Ok(Json(
        json!({ "message": "Purchase successful", "productName": product_name }),
    ))
}

/// `GET /api/user/orders` — caller's order history, newest first.
pub async fn my_orders(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<Vec<AccountOrder>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_account(ctx.account_id)
        .await?;

    Ok(Json(orders))
}

/// `GET /api/orders` (admin) — every order with account/product summaries.
pub async fn all_orders(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<AdminOrder>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}

/// `GET /api/report` (admin) — CSV download of all orders.
///
/// Deleted accounts and products render as "Unknown"; the orders themselves
/// are kept forever.
pub async fn report(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Response> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    let csv_error = |e: csv::Error| AppError::Internal(format!("csv encode: {e}"));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record([
            "OrderID", "Username", "Email", "Product", "Price", "Date", "Status",
        ])
        .map_err(csv_error)?;

    for order in &orders {
        writer
            .write_record([
                order.id.to_string(),
                order.username.clone().unwrap_or_else(unknown),
                order.email.clone().unwrap_or_else(unknown),
                order.product_name.clone().unwrap_or_else(unknown),
                order.amount.to_string(),
                order.created_at.to_rfc3339(),
                order.status.to_string(),
            ])
            .map_err(csv_error)?;
    }

    let body = writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("csv encode: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"orders_report.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

fn unknown() -> String {
    "Unknown".to_owned()
}
