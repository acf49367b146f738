//! Order models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use minimart_core::{AccountId, OrderId, OrderStatus, ProductId};

use super::Product;

/// A purchase record.
///
/// `amount` snapshots `price * quantity` at creation time; later price edits
/// do not affect it. Immutable once created except for status transitions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub account_id: AccountId,
    pub product_id: ProductId,
    /// Amount charged, as a decimal string (e.g. `"299.99"`).
    pub amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// Payload for inserting an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub account_id: AccountId,
    pub product_id: ProductId,
    pub amount: Decimal,
    pub status: OrderStatus,
}

/// An order with its product resolved, for the account order history.
///
/// `product` is `None` when the product has since been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOrder {
    pub id: OrderId,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub product: Option<Product>,
}

/// An order joined with account and product summaries, for admin views and
/// the CSV report. Deleted accounts/products leave `None` fields that render
/// as "Unknown".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    pub id: OrderId,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub product_name: Option<String>,
}
