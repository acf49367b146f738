//! Product repository for catalog and stock operations.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};

use minimart_core::ProductId;

use super::{RepositoryError, parse_categories, parse_money};
use crate::models::{NewProduct, Product, ProductPatch};

/// Raw product row as stored in `SQLite`.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    pub stock: i64,
    pub categories: String,
    pub created_at: DateTime<Utc>,
}

impl ProductRow {
    pub(crate) fn into_product(self) -> Result<Product, RepositoryError> {
        Ok(Product {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            image: self.image,
            price: parse_money(&self.price, "product.price")?,
            stock: self.stock,
            categories: parse_categories(&self.categories)?,
            created_at: self.created_at,
        })
    }
}

/// Atomically reserve one unit of stock.
///
/// This is the conditional decrement that keeps `stock >= 0` under
/// concurrent cart adds and direct purchases: the filter and the decrement
/// are a single statement, so two callers can never both take the last unit.
///
/// Returns `false` if the product is missing or out of stock.
pub(crate) async fn reserve_one(
    conn: &mut SqliteConnection,
    product_id: ProductId,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query("UPDATE product SET stock = stock - 1 WHERE id = ? AND stock > 0")
        .bind(product_id.as_i64())
        .execute(conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Return reserved units to stock.
///
/// A no-op if the product has been deleted in the meantime.
pub(crate) async fn restore(
    conn: &mut SqliteConnection,
    product_id: ProductId,
    quantity: i64,
) -> Result<(), RepositoryError> {
    sqlx::query("UPDATE product SET stock = stock + ? WHERE id = ?")
        .bind(quantity)
        .bind(product_id.as_i64())
        .execute(conn)
        .await?;

    Ok(())
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List the whole catalog, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, image, price, stock, categories, created_at
             FROM product ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ProductRow::into_product).collect()
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, name, description, image, price, stock, categories, created_at
             FROM product WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product).transpose()
    }

    /// Create a product. The id is assigned by the store and never reused.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including the
    /// `stock >= 0` check constraint).
    pub async fn create(&self, new: &NewProduct) -> Result<Product, RepositoryError> {
        let categories = serde_json::to_string(&new.categories)
            .map_err(|e| RepositoryError::DataCorruption(format!("categories encode: {e}")))?;

        let row = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO product (name, description, image, price, stock, categories, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING id, name, description, image, price, stock, categories, created_at",
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.price.to_string())
        .bind(new.stock)
        .bind(categories)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        row.into_product()
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &patch.name {
            product.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            product.description.clone_from(description);
        }
        if let Some(image) = &patch.image {
            product.image.clone_from(image);
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(categories) = &patch.categories {
            product.categories.clone_from(categories);
        }

        let categories = serde_json::to_string(&product.categories)
            .map_err(|e| RepositoryError::DataCorruption(format!("categories encode: {e}")))?;

        let result = sqlx::query(
            "UPDATE product
             SET name = ?, description = ?, image = ?, price = ?, stock = ?, categories = ?
             WHERE id = ?",
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.price.to_string())
        .bind(product.stock)
        .bind(categories)
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(product)
    }

    /// Delete a product.
    ///
    /// Cart lines referencing it are removed by the schema; orders keep the
    /// dangling id for reporting.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM product WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Atomically reserve one unit of stock (see [`reserve_one`]).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn reserve_one(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        reserve_one(&mut conn, id).await
    }

    /// Return reserved units to stock (see [`restore`]).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn restore(&self, id: ProductId, quantity: i64) -> Result<(), RepositoryError> {
        let mut conn = self.pool.acquire().await?;
        restore(&mut conn, id, quantity).await
    }
}
