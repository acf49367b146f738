//! Cart model.

use serde::Serialize;

use minimart_core::{AccountId, CartId};

use super::Product;

/// One line in a cart: a reserved product and how many units are held.
///
/// Invariant: `quantity` units have already been decremented from the
/// product's stock when the line was created or bumped (reservation).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
}

/// A cart with product details resolved for display.
///
/// Lines whose product no longer exists are dropped on read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub account_id: AccountId,
    pub items: Vec<CartLine>,
}
