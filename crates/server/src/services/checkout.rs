//! Checkout service.
//!
//! Turns the cart into one order per line. All order inserts and the cart
//! clear happen in a single transaction, so a crash mid-checkout leaves
//! either the untouched cart or the complete set of orders, never half of
//! each.

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use minimart_core::{AccountId, OrderStatus};

use crate::db::{CartRepository, RepositoryError, carts, orders};
use crate::error::AppError;
use crate::models::{NewOrder, Order};

/// Checkout service.
pub struct CheckoutService<'a> {
    pool: &'a SqlitePool,
    carts: CartRepository<'a>,
}

impl<'a> CheckoutService<'a> {
    /// Create a new checkout service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            pool,
            carts: CartRepository::new(pool),
        }
    }

    /// Check out the account's cart.
    ///
    /// Each line becomes one order for `price * quantity`, `confirmed` when
    /// the payment went through and `pending` otherwise. Lines whose product
    /// has fewer free units left than the line quantity are skipped with a
    /// per-line failure message.
    ///
    /// When at least one line goes through, the whole cart is cleared —
    /// including skipped lines, whose reserved units are not returned to
    /// stock. That loss is a known quirk of the checkout flow, kept
    /// deliberately; see DESIGN.md.
    ///
    /// # Errors
    ///
    /// Returns `AppError::EmptyCart` if the cart has no lines.
    /// Returns `AppError::CheckoutFailed` with the joined per-line messages
    /// if every line was skipped; the cart and its reservations are left
    /// untouched.
    pub async fn checkout(
        &self,
        account_id: AccountId,
        payment_confirmed: bool,
    ) -> Result<Vec<Order>, AppError> {
        let cart = self.carts.load(account_id).await?;

        if cart.items.is_empty() {
            return Err(AppError::EmptyCart);
        }

        let status = if payment_confirmed {
            OrderStatus::Confirmed
        } else {
            OrderStatus::Pending
        };

        let mut tx = self.pool.begin().await.map_err(RepositoryError::Database)?;

        let mut placed = Vec::new();
        let mut failures = Vec::new();

        for line in &cart.items {
            // Free stock is re-checked against the full line quantity even
            // though the line's units are already reserved.
            if line.product.stock < line.quantity {
                failures.push(format!("Not enough stock for {}", line.product.name));
                continue;
            }

            let order = orders::insert(
                &mut tx,
                &NewOrder {
                    account_id,
                    product_id: line.product.id,
                    amount: line.product.price * Decimal::from(line.quantity),
                    status,
                },
            )
            .await?;

            placed.push(order);
        }

        if placed.is_empty() {
            // Nothing sellable: roll back, keep the cart as it was.
            drop(tx);
            return Err(AppError::CheckoutFailed(failures.join(", ")));
        }

        carts::clear_lines(&mut tx, cart.id).await?;

        tx.commit().await.map_err(RepositoryError::Database)?;

        Ok(placed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use minimart_core::ProductId;

    use crate::db::ProductRepository;
    use crate::models::ProductPatch;
    use crate::services::CartService;
    use crate::test_support::{seed_account, seed_product, test_pool};

    async fn set_stock(pool: &SqlitePool, id: ProductId, stock: i64) {
        ProductRepository::new(pool)
            .update(
                id,
                &ProductPatch {
                    stock: Some(stock),
                    ..ProductPatch::default()
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn empty_cart_cannot_be_checked_out() {
        let pool = test_pool().await;
        let account = seed_account(&pool, "alice", true).await;

        let err = CheckoutService::new(&pool)
            .checkout(account.id, true)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::EmptyCart));
    }

    #[tokio::test]
    async fn checkout_places_one_order_per_line() {
        let pool = test_pool().await;
        let account = seed_account(&pool, "alice", true).await;
        let widget = seed_product(&pool, "Widget", "9.99", 5).await;
        let gadget = seed_product(&pool, "Gadget", "4.50", 5).await;

        let carts = CartService::new(&pool);
        carts.add_item(account.id, widget.id).await.unwrap();
        carts.add_item(account.id, widget.id).await.unwrap();
        carts.add_item(account.id, gadget.id).await.unwrap();

        let orders = CheckoutService::new(&pool)
            .checkout(account.id, true)
            .await
            .unwrap();

        assert_eq!(orders.len(), 2);

        let widget_order = orders.iter().find(|o| o.product_id == widget.id).unwrap();
        assert_eq!(widget_order.amount, "19.98".parse().unwrap());
        assert_eq!(widget_order.status, OrderStatus::Confirmed);

        let gadget_order = orders.iter().find(|o| o.product_id == gadget.id).unwrap();
        assert_eq!(gadget_order.amount, "4.50".parse().unwrap());

        // The cart is emptied; the reserved units stay sold.
        let cart = carts.get(account.id).await.unwrap();
        assert!(cart.items.is_empty());

        let widget = ProductRepository::new(&pool)
            .get(widget.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(widget.stock, 3);
    }

    #[tokio::test]
    async fn unconfirmed_payment_leaves_orders_pending() {
        let pool = test_pool().await;
        let account = seed_account(&pool, "alice", true).await;
        let widget = seed_product(&pool, "Widget", "9.99", 5).await;

        let carts = CartService::new(&pool);
        carts.add_item(account.id, widget.id).await.unwrap();

        let orders = CheckoutService::new(&pool)
            .checkout(account.id, false)
            .await
            .unwrap();

        assert_eq!(orders[0].status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn fully_failed_checkout_keeps_the_cart() {
        let pool = test_pool().await;
        let account = seed_account(&pool, "alice", true).await;
        let widget = seed_product(&pool, "Widget", "9.99", 5).await;

        let carts = CartService::new(&pool);
        carts.add_item(account.id, widget.id).await.unwrap();

        // Stock drained after the line was reserved.
        set_stock(&pool, widget.id, 0).await;

        let err = CheckoutService::new(&pool)
            .checkout(account.id, true)
            .await
            .unwrap_err();

        match err {
            AppError::CheckoutFailed(msg) => assert_eq!(msg, "Not enough stock for Widget"),
            other => panic!("expected CheckoutFailed, got {other:?}"),
        }

        // The cart still holds the line; nothing was ordered.
        let cart = carts.get(account.id).await.unwrap();
        assert_eq!(cart.items.len(), 1);
    }

    #[tokio::test]
    async fn partially_failed_checkout_clears_skipped_lines() {
        let pool = test_pool().await;
        let account = seed_account(&pool, "alice", true).await;
        let widget = seed_product(&pool, "Widget", "9.99", 5).await;
        let gadget = seed_product(&pool, "Gadget", "4.50", 5).await;

        let carts = CartService::new(&pool);
        carts.add_item(account.id, widget.id).await.unwrap();
        carts.add_item(account.id, gadget.id).await.unwrap();

        set_stock(&pool, gadget.id, 0).await;

        let orders = CheckoutService::new(&pool)
            .checkout(account.id, true)
            .await
            .unwrap();

        // Only the sellable line became an order.
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].product_id, widget.id);

        // The skipped line is gone from the cart, and its reserved unit was
        // not returned: pins the known reservation loss of this flow.
        let cart = carts.get(account.id).await.unwrap();
        assert!(cart.items.is_empty());

        let gadget = ProductRepository::new(&pool)
            .get(gadget.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gadget.stock, 0);
    }
}
