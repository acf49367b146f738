//! Integration test harness for Minimart.
//!
//! Runs the whole application in-process against an in-memory `SQLite`
//! database: requests go through the real router, session layer, and
//! repositories via `tower::ServiceExt::oneshot`, no listening socket
//! needed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderValue, Request, Response, StatusCode, header};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower::ServiceExt;

use minimart_server::config::ServerConfig;
use minimart_server::db::{MIGRATOR, ProductRepository};
use minimart_server::models::NewProduct;
use minimart_server::{AppState, app};

/// The password used for all test accounts.
pub const TEST_PASSWORD: &str = "Password1!";

/// An in-process instance of the application plus a cookie jar, acting as
/// one browser session.
pub struct TestApp {
    router: Router,
    /// Direct database access for seeding and assertions.
    pub pool: SqlitePool,
    cookie: Option<HeaderValue>,
}

impl TestApp {
    /// Boot the application on a fresh in-memory database.
    pub async fn spawn() -> Self {
        // One connection keeps every handle on the same in-memory database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");

        MIGRATOR.run(&pool).await.expect("failed to run migrations");

        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:".to_owned()),
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            base_url: "http://localhost".to_owned(),
        };

        let state = AppState::new(config, pool.clone());
        let router = app(state).await.expect("failed to build application");

        Self {
            router,
            pool,
            cookie: None,
        }
    }

    /// A second, independent session against the same application.
    #[must_use]
    pub fn another_session(&self) -> Self {
        Self {
            router: self.router.clone(),
            pool: self.pool.clone(),
            cookie: None,
        }
    }

    /// Send a request, replaying and capturing the session cookie.
    pub async fn send(&mut self, method: &str, uri: &str, body: Option<&Value>) -> Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie.clone());
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie
                .to_str()
                .unwrap()
                .split(';')
                .next()
                .unwrap()
                .to_owned();
            self.cookie = Some(HeaderValue::from_str(&pair).unwrap());
        }

        response
    }

    /// Send a request and decode the JSON response body.
    pub async fn json(
        &mut self,
        method: &str,
        uri: &str,
        body: Option<&Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, body).await;
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not JSON")
        };

        (status, value)
    }

    /// Sign up (and thereby log in) a fresh account with [`TEST_PASSWORD`].
    pub async fn signup(&mut self, username: &str) -> Value {
        let (status, body) = self
            .json(
                "POST",
                "/api/signup",
                Some(&json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": TEST_PASSWORD,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body
    }

    /// Redeem the pending verification code of the logged-in account.
    pub async fn verify(&mut self, username: &str) {
        let code = self.verification_code(username).await;

        let (status, body) = self
            .json("POST", "/api/verify", Some(&json!({ "code": code })))
            .await;

        assert_eq!(status, StatusCode::OK, "verify failed: {body}");
    }

    /// Read the pending verification code straight from the database.
    pub async fn verification_code(&self, username: &str) -> String {
        sqlx::query_scalar("SELECT verification_code FROM account WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .expect("no such account")
    }

    /// Flip the admin flag directly in the database.
    pub async fn promote_to_admin(&self, username: &str) {
        sqlx::query("UPDATE account SET is_admin = 1, is_verified = 1 WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .expect("failed to promote account");
    }

    /// Seed a catalog product directly, returning its id.
    pub async fn seed_product(&self, name: &str, price: &str, stock: i64) -> i64 {
        let product = ProductRepository::new(&self.pool)
            .create(&NewProduct {
                name: name.to_owned(),
                description: String::new(),
                image: String::new(),
                price: price.parse::<Decimal>().unwrap(),
                stock,
                categories: Vec::new(),
            })
            .await
            .expect("failed to seed product");

        product.id.as_i64()
    }

    /// Current stock of a product, read straight from the database.
    pub async fn stock_of(&self, product_id: i64) -> i64 {
        sqlx::query_scalar("SELECT stock FROM product WHERE id = ?")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await
            .expect("no such product")
    }
}
