//! Shared helpers for unit tests: in-memory database and seed data.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use minimart_core::{Email, Username};

use crate::db::accounts::NewAccount;
use crate::db::{AccountRepository, MIGRATOR, ProductRepository};
use crate::models::{Account, NewProduct, Product};

/// Fresh in-memory database with the schema applied.
///
/// A single connection, so every handle sees the same in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();

    MIGRATOR.run(&pool).await.unwrap();

    pool
}

/// Insert an account directly, bypassing password hashing.
pub async fn seed_account(pool: &SqlitePool, username: &str, verified: bool) -> Account {
    let repo = AccountRepository::new(pool);

    let username = Username::parse(username).unwrap();
    let email = Email::parse(&format!("{username}@example.com")).unwrap();

    let account = repo
        .create(&NewAccount {
            username: &username,
            email: &email,
            password_hash: "not-a-real-hash",
            phone: None,
            verification_code: "123456",
        })
        .await
        .unwrap();

    if verified {
        repo.mark_verified(account.id).await.unwrap();
        return repo.get(account.id).await.unwrap().unwrap();
    }

    account
}

/// Insert a catalog product.
pub async fn seed_product(pool: &SqlitePool, name: &str, price: &str, stock: i64) -> Product {
    ProductRepository::new(pool)
        .create(&NewProduct {
            name: name.to_owned(),
            description: String::new(),
            image: String::new(),
            price: price.parse::<Decimal>().unwrap(),
            stock,
            categories: Vec::new(),
        })
        .await
        .unwrap()
}
