//! Cart service.
//!
//! Adding to the cart reserves stock: each unit in a cart line has already
//! been taken out of the product's stock count. Removing a line gives the
//! units back. Both paths go through the repository's transactional
//! reserve/restore operations, so stock can never go negative and reserved
//! units are never double-counted.

use sqlx::SqlitePool;

use minimart_core::{AccountId, ProductId};

use crate::db::{CartRepository, ProductRepository};
use crate::error::AppError;
use crate::models::Cart;

/// Cart service.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            products: ProductRepository::new(pool),
            carts: CartRepository::new(pool),
        }
    }

    /// Get the account's cart, creating an empty one on first access.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` if the cart cannot be loaded.
    pub async fn get(&self, account_id: AccountId) -> Result<Cart, AppError> {
        Ok(self.carts.load(account_id).await?)
    }

    /// Add one unit of a product to the cart, reserving it from stock.
    ///
    /// An existing line for the product is bumped by one; otherwise a new
    /// line is created.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the product doesn't exist.
    /// Returns `AppError::OutOfStock` if no unit is left to reserve.
    pub async fn add_item(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<Cart, AppError> {
        // Missing product and exhausted stock are reported differently, so
        // look the product up before the conditional reserve.
        self.products
            .get(product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        if !self.carts.add_item_reserving(account_id, product_id).await? {
            return Err(AppError::OutOfStock);
        }

        Ok(self.carts.load(account_id).await?)
    }

    /// Remove a cart line entirely, returning its reserved units to stock.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the account has no cart or no line
    /// for the product.
    pub async fn remove_item(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<Cart, AppError> {
        if !self
            .carts
            .remove_item_restoring(account_id, product_id)
            .await?
        {
            return Err(AppError::NotFound("Cart item"));
        }

        Ok(self.carts.load(account_id).await?)
    }
}
