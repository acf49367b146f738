//! Direct purchase service.
//!
//! "Buy now" without a cart: one unit, one pending order. Limited to one
//! active order per (account, product) pair, and to verified accounts.

use sqlx::SqlitePool;

use minimart_core::{AccountId, OrderStatus, ProductId};

use crate::db::{OrderRepository, ProductRepository, RepositoryError, orders, products};
use crate::error::AppError;
use crate::models::{NewOrder, Order};

/// Direct purchase service.
pub struct PurchaseService<'a> {
    pool: &'a SqlitePool,
    products: ProductRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> PurchaseService<'a> {
    /// Create a new purchase service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            products: ProductRepository::new(pool),
            orders: OrderRepository::new(pool),
        }
    }

    /// Buy one unit of a product directly.
    ///
    /// Reserving the unit and recording the order happen in one
    /// transaction. The order starts `pending`; a cancelled order frees the
    /// slot for buying the product again.
    ///
    /// Returns the order together with the product name for the
    /// confirmation message.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unverified` if the account hasn't been verified.
    /// Returns `AppError::NotFound` if the product doesn't exist.
    /// Returns `AppError::OutOfStock` if no unit is left.
    /// Returns `AppError::AlreadyPurchased` if a non-cancelled order for
    /// this product already exists.
    pub async fn purchase(
        &self,
        account_id: AccountId,
        is_verified: bool,
        product_id: ProductId,
    ) -> Result<(Order, String), AppError> {
        if !is_verified {
            return Err(AppError::Unverified);
        }

        let product = self
            .products
            .get(product_id)
            .await?
            .ok_or(AppError::NotFound("Product"))?;

        if product.stock <= 0 {
            return Err(AppError::OutOfStock);
        }

        if self.orders.has_active(account_id, product_id).await? {
            return Err(AppError::AlreadyPurchased);
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::Database)?;

        // The earlier stock read was only a fast path; this is the
        // authoritative conditional decrement.
        if !products::reserve_one(&mut tx, product_id).await? {
            return Err(AppError::OutOfStock);
        }

        let order = orders::insert(
            &mut tx,
            &NewOrder {
                account_id,
                product_id,
                amount: product.price,
                status: OrderStatus::Pending,
            },
        )
        .await?;

        tx.commit().await.map_err(RepositoryError::Database)?;

        Ok((order, product.name))
    }
}
