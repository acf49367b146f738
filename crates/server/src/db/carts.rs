//! Cart repository.
//!
//! The multi-step reserve-then-append and remove-then-restore sequences run
//! inside a single transaction so a failure between steps cannot leave the
//! cart and the product stock inconsistent.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};

use minimart_core::{AccountId, CartId, ProductId};

use super::products::{self, ProductRow};
use super::RepositoryError;
use crate::models::{Cart, CartLine};

/// Clear all lines of a cart.
pub(crate) async fn clear_lines(
    conn: &mut SqliteConnection,
    cart_id: CartId,
) -> Result<(), RepositoryError> {
    sqlx::query("DELETE FROM cart_line WHERE cart_id = ?")
        .bind(cart_id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

async fn get_or_create_id(
    conn: &mut SqliteConnection,
    account_id: AccountId,
) -> Result<CartId, RepositoryError> {
    sqlx::query("INSERT INTO cart (account_id, created_at) VALUES (?, ?) ON CONFLICT(account_id) DO NOTHING")
        .bind(account_id.as_i64())
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;

    let id: i64 = sqlx::query_scalar("SELECT id FROM cart WHERE account_id = ?")
        .bind(account_id.as_i64())
        .fetch_one(conn)
        .await?;

    Ok(CartId::new(id))
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Get the account's cart id, creating the cart lazily.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, account_id: AccountId) -> Result<CartId, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        get_or_create_id(&mut conn, account_id).await
    }

    /// Load a cart with product details resolved.
    ///
    /// Lines whose product has been deleted do not appear (the join drops
    /// them), matching the defensive filtering of the read path.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn load(&self, account_id: AccountId) -> Result<Cart, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct LineRow {
            #[sqlx(flatten)]
            product: ProductRow,
            quantity: i64,
        }

        let cart_id = self.get_or_create(account_id).await?;

        let rows = sqlx::query_as::<_, LineRow>(
            "SELECT p.id, p.name, p.description, p.image, p.price, p.stock, p.categories,
                    p.created_at, cl.quantity
             FROM cart_line cl
             JOIN product p ON p.id = cl.product_id
             WHERE cl.cart_id = ?
             ORDER BY cl.added_at ASC, p.id ASC",
        )
        .bind(cart_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(CartLine {
                product: row.product.into_product()?,
                quantity: row.quantity,
            });
        }

        Ok(Cart {
            id: cart_id,
            account_id,
            items,
        })
    }

    /// Reserve one unit of stock and add it to the account's cart, as one
    /// atomic unit.
    ///
    /// Returns `false` without touching anything when the product is out of
    /// stock (or vanished since the caller looked it up).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any step fails; the
    /// transaction rolls back.
    pub async fn add_item_reserving(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if !products::reserve_one(&mut tx, product_id).await? {
            return Ok(false);
        }

        let cart_id = get_or_create_id(&mut tx, account_id).await?;

        sqlx::query(
            "INSERT INTO cart_line (cart_id, product_id, quantity, added_at)
             VALUES (?, ?, 1, ?)
             ON CONFLICT(cart_id, product_id) DO UPDATE SET quantity = quantity + 1",
        )
        .bind(cart_id.as_i64())
        .bind(product_id.as_i64())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Remove a cart line and return its full reserved quantity to stock, as
    /// one atomic unit.
    ///
    /// Returns `false` when the account has no cart or no line for the
    /// product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any step fails; the
    /// transaction rolls back.
    pub async fn remove_item_restoring(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<i64> = sqlx::query_scalar("SELECT id FROM cart WHERE account_id = ?")
            .bind(account_id.as_i64())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(cart_id) = cart_id else {
            return Ok(false);
        };

        let quantity: Option<i64> = sqlx::query_scalar(
            "DELETE FROM cart_line WHERE cart_id = ? AND product_id = ? RETURNING quantity",
        )
        .bind(cart_id)
        .bind(product_id.as_i64())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(quantity) = quantity else {
            return Ok(false);
        };

        products::restore(&mut tx, product_id, quantity).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Clear all lines of a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn clear(&self, cart_id: CartId) -> Result<(), RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        clear_lines(&mut conn, cart_id).await
    }
}
