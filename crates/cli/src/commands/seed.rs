//! Demo data seeding command.
//!
//! Seeds the five-product demo catalog and two known accounts:
//! `admin_user / Admin123!` and `regular_user / User123!`, both verified.
//! Safe to re-run; existing data is left alone.

use rust_decimal::Decimal;
use sqlx::SqlitePool;

use minimart_server::db::{AccountRepository, MIGRATOR, ProductRepository};
use minimart_server::models::NewProduct;
use minimart_server::services::{AuthError, AuthService};

use super::CommandError;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    image: &'static str,
    price: Decimal,
    stock: i64,
}

struct SeedAccount {
    username: &'static str,
    email: &'static str,
    password: &'static str,
    phone: &'static str,
    is_admin: bool,
}

fn catalog() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Premium Wireless Headphones",
            description: "High-fidelity sound with active noise cancellation.",
            image: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500&q=80",
            price: Decimal::new(299_99, 2),
            stock: 10,
        },
        SeedProduct {
            name: "Smart Fitness Watch",
            description: "Track your health metrics with precision.",
            image: "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500&q=80",
            price: Decimal::new(199_99, 2),
            stock: 15,
        },
        SeedProduct {
            name: "Portable Bluetooth Speaker",
            description: "360-degree sound in a compact design.",
            image: "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=500&q=80",
            price: Decimal::new(79_99, 2),
            stock: 20,
        },
        SeedProduct {
            name: "4K Action Camera",
            description: "Capture your adventures in stunning detail.",
            image: "https://images.unsplash.com/photo-1526170375885-4d8ecf77b99f?w=500&q=80",
            price: Decimal::new(349_99, 2),
            stock: 5,
        },
        SeedProduct {
            name: "Mechanical Gaming Keyboard",
            description: "RGB backlighting with tactile switches.",
            image: "https://images.unsplash.com/photo-1511467687858-23d96c32e4ae?w=500&q=80",
            price: Decimal::new(129_99, 2),
            stock: 8,
        },
    ]
}

const ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        username: "admin_user",
        email: "admin@example.com",
        password: "Admin123!",
        phone: "1234567890",
        is_admin: true,
    },
    SeedAccount {
        username: "regular_user",
        email: "user@example.com",
        password: "User123!",
        phone: "0987654321",
        is_admin: false,
    },
];

/// Seed the demo catalog and accounts.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    // Make sure the schema is in place before touching it.
    MIGRATOR.run(&pool).await?;

    seed_products(&pool).await?;
    seed_accounts(&pool).await?;

    tracing::info!("Admin: admin_user / Admin123!");
    tracing::info!("User:  regular_user / User123!");

    Ok(())
}

async fn seed_products(pool: &SqlitePool) -> Result<(), CommandError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        tracing::info!("Catalog already has {count} products, skipping");
        return Ok(());
    }

    let repo = ProductRepository::new(pool);
    for seed in catalog() {
        let product = repo
            .create(&NewProduct {
                name: seed.name.to_owned(),
                description: seed.description.to_owned(),
                image: seed.image.to_owned(),
                price: seed.price,
                stock: seed.stock,
                categories: Vec::new(),
            })
            .await?;

        tracing::info!("Seeded product {} ({})", product.name, product.id);
    }

    Ok(())
}

async fn seed_accounts(pool: &SqlitePool) -> Result<(), CommandError> {
    let auth = AuthService::new(pool);
    let accounts = AccountRepository::new(pool);

    for seed in ACCOUNTS {
        match auth
            .signup(seed.username, seed.email, seed.password, Some(seed.phone))
            .await
        {
            Ok(account) => {
                // Demo accounts come pre-verified; admin_user gets the flag.
                accounts
                    .set_flags(account.id, Some(seed.is_admin), Some(true))
                    .await?;
                tracing::info!("Seeded account {}", seed.username);
            }
            Err(AuthError::UserAlreadyExists) => {
                tracing::info!("Account {} already exists, skipping", seed.username);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
