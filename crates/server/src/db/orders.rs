//! Order repository.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use minimart_core::{AccountId, OrderId, OrderStatus, ProductId};

use super::products::ProductRow;
use super::{RepositoryError, parse_money};
use crate::models::{AccountOrder, AdminOrder, NewOrder, Order};

/// Raw order row as stored in `SQLite`.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    account_id: i64,
    product_id: i64,
    amount: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self) -> Result<Order, RepositoryError> {
        Ok(Order {
            id: OrderId::new(self.id),
            account_id: AccountId::new(self.account_id),
            product_id: ProductId::new(self.product_id),
            amount: parse_money(&self.amount, "purchase_order.amount")?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

fn parse_status(value: &str) -> Result<OrderStatus, RepositoryError> {
    value
        .parse()
        .map_err(|e| RepositoryError::DataCorruption(format!("invalid status in database: {e}")))
}

/// Insert an order on an existing connection, so checkout can batch several
/// inserts and the cart clear into one transaction.
pub(crate) async fn insert(
    conn: &mut SqliteConnection,
    new: &NewOrder,
) -> Result<Order, RepositoryError> {
    let row = sqlx::query_as::<_, OrderRow>(
        "INSERT INTO purchase_order (account_id, product_id, amount, status, created_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING id, account_id, product_id, amount, status, created_at",
    )
    .bind(new.account_id.as_i64())
    .bind(new.product_id.as_i64())
    .bind(new.amount.to_string())
    .bind(new.status.as_str())
    .bind(Utc::now())
    .fetch_one(conn)
    .await?;

    row.into_order()
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a single order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, new: &NewOrder) -> Result<Order, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        insert(&mut conn, new).await
    }

    /// Whether a non-cancelled order already exists for this (account,
    /// product) pair. Backs the one-per-product direct-purchase limit.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn has_active(
        &self,
        account_id: AccountId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM purchase_order
             WHERE account_id = ? AND product_id = ? AND status != 'cancelled'",
        )
        .bind(account_id.as_i64())
        .bind(product_id.as_i64())
        .fetch_one(self.pool)
        .await?;

        Ok(count > 0)
    }

    /// List an account's orders, newest first, with product details resolved
    /// where the product still exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_account(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountOrder>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            amount: String,
            status: String,
            created_at: DateTime<Utc>,
            product_name: Option<String>,
            product_description: Option<String>,
            product_image: Option<String>,
            product_price: Option<String>,
            product_stock: Option<i64>,
            product_categories: Option<String>,
            product_created_at: Option<DateTime<Utc>>,
            product_id: i64,
        }

        let rows = sqlx::query_as::<_, Row>(
            "SELECT o.id, o.amount, o.status, o.created_at, o.product_id,
                    p.name AS product_name,
                    p.description AS product_description,
                    p.image AS product_image,
                    p.price AS product_price,
                    p.stock AS product_stock,
                    p.categories AS product_categories,
                    p.created_at AS product_created_at
             FROM purchase_order o
             LEFT JOIN product p ON p.id = o.product_id
             WHERE o.account_id = ?
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .bind(account_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let product = match (
                row.product_name,
                row.product_description,
                row.product_image,
                row.product_price,
                row.product_stock,
                row.product_categories,
                row.product_created_at,
            ) {
                (
                    Some(name),
                    Some(description),
                    Some(image),
                    Some(price),
                    Some(stock),
                    Some(categories),
                    Some(created_at),
                ) => Some(
                    ProductRow {
                        id: row.product_id,
                        name,
                        description,
                        image,
                        price,
                        stock,
                        categories,
                        created_at,
                    }
                    .into_product()?,
                ),
                _ => None,
            };

            orders.push(AccountOrder {
                id: OrderId::new(row.id),
                amount: parse_money(&row.amount, "purchase_order.amount")?,
                status: parse_status(&row.status)?,
                created_at: row.created_at,
                product,
            });
        }

        Ok(orders)
    }

    /// List every order with account and product summaries, for the admin
    /// view and the CSV report.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<AdminOrder>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i64,
            amount: String,
            status: String,
            created_at: DateTime<Utc>,
            username: Option<String>,
            email: Option<String>,
            product_name: Option<String>,
        }

        let rows = sqlx::query_as::<_, Row>(
            "SELECT o.id, o.amount, o.status, o.created_at,
                    a.username AS username,
                    a.email AS email,
                    p.name AS product_name
             FROM purchase_order o
             LEFT JOIN account a ON a.id = o.account_id
             LEFT JOIN product p ON p.id = o.product_id
             ORDER BY o.created_at DESC, o.id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(AdminOrder {
                id: OrderId::new(row.id),
                amount: parse_money(&row.amount, "purchase_order.amount")?,
                status: parse_status(&row.status)?,
                created_at: row.created_at,
                username: row.username,
                email: row.email,
                product_name: row.product_name,
            });
        }

        Ok(orders)
    }
}
