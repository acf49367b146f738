//! Catalog product model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use minimart_core::ProductId;

/// A product in the catalog.
///
/// `stock` is the number of units available for reservation. It is the only
/// field mutated by non-admin flows (cart add/remove, checkout, direct
/// purchase), always through an atomic conditional decrement so it can never
/// go negative.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Image URL for display; never interpreted server-side.
    pub image: String,
    /// Unit price. Serialized as a decimal string (e.g. `"299.99"`).
    pub price: Decimal,
    pub stock: i64,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a product (admin).
///
/// The id is assigned by the store and is monotonic: ids of deleted products
/// are never reused.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub price: Decimal,
    pub stock: i64,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Partial update for a product (admin). Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    pub categories: Option<Vec<String>>,
}

impl ProductPatch {
    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.image.is_none()
            && self.price.is_none()
            && self.stock.is_none()
            && self.categories.is_none()
    }
}
