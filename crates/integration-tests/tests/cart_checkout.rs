//! Cart reservation and checkout flows.

use axum::http::StatusCode;
use serde_json::json;

use minimart_integration_tests::TestApp;

#[tokio::test]
async fn cart_requires_authentication() {
    let mut app = TestApp::spawn().await;

    let (status, body) = app.json("GET", "/api/cart", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn adding_to_cart_reserves_stock() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 3).await;
    app.signup("alice").await;

    let (status, cart) = app
        .json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], 1);
    assert_eq!(cart["items"][0]["product"]["name"], "Widget");

    // The reservation is visible in the public catalog.
    assert_eq!(app.stock_of(widget).await, 2);

    // Second add bumps the same line.
    let (_, cart) = app
        .json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(app.stock_of(widget).await, 1);
}

#[tokio::test]
async fn add_rejects_unknown_product_and_empty_stock() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 1).await;
    app.signup("alice").await;

    let (status, body) = app
        .json("POST", "/api/cart", Some(&json!({ "productId": 999 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;

    let (status, body) = app
        .json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Out of stock");
    assert_eq!(app.stock_of(widget).await, 0);
}

#[tokio::test]
async fn removing_a_line_restores_stock() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 3).await;
    app.signup("alice").await;

    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(app.stock_of(widget).await, 1);

    let (status, cart) = app
        .json("DELETE", &format!("/api/cart/{widget}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert_eq!(app.stock_of(widget).await, 3);

    // Removing again: nothing left to remove.
    let (status, _) = app
        .json("DELETE", &format!("/api/cart/{widget}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn checkout_requires_a_non_empty_cart() {
    let mut app = TestApp::spawn().await;
    app.signup("alice").await;

    let (status, body) = app
        .json("POST", "/api/cart/checkout", Some(&json!({})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Cart is empty");
}

#[tokio::test]
async fn checkout_turns_lines_into_orders() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 5).await;
    let gadget = app.seed_product("Gadget", "4.50", 5).await;
    app.signup("alice").await;

    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;
    app.json("POST", "/api/cart", Some(&json!({ "productId": gadget })))
        .await;

    let (status, body) = app
        .json(
            "POST",
            "/api/cart/checkout",
            Some(&json!({ "paymentData": { "status": "confirmed" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Checkout successful");

    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    // Amounts snapshot price * quantity; prices travel as decimal strings.
    let amounts: Vec<&str> = orders
        .iter()
        .map(|o| o["amount"].as_str().unwrap())
        .collect();
    assert!(amounts.contains(&"19.98"));
    assert!(amounts.contains(&"4.50"));
    assert!(orders.iter().all(|o| o["status"] == "confirmed"));

    // The cart is now empty and the history shows both orders.
    let (_, cart) = app.json("GET", "/api/cart", None).await;
    assert!(cart["items"].as_array().unwrap().is_empty());

    let (status, history) = app.json("GET", "/api/user/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unconfirmed_payment_leaves_orders_pending() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 5).await;
    app.signup("alice").await;

    app.json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;

    let (status, body) = app
        .json(
            "POST",
            "/api/cart/checkout",
            Some(&json!({ "paymentData": { "status": "declined" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"][0]["status"], "pending");
}

#[tokio::test]
async fn checkout_with_drained_stock_fails_and_keeps_the_cart() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 1).await;
    app.signup("alice").await;
    app.signup("admin1").await;
    app.promote_to_admin("admin1").await;

    let mut alice = app.another_session();
    alice
        .json(
            "POST",
            "/api/login",
            Some(&json!({ "username": "alice", "password": minimart_integration_tests::TEST_PASSWORD })),
        )
        .await;
    alice
        .json("POST", "/api/cart", Some(&json!({ "productId": widget })))
        .await;

    // Admin zeroes the remaining stock after the reservation.
    let (status, _) = app
        .json(
            "PATCH",
            &format!("/api/products/{widget}"),
            Some(&json!({ "stock": 0 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = alice
        .json(
            "POST",
            "/api/cart/checkout",
            Some(&json!({ "paymentData": { "status": "confirmed" } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Not enough stock for Widget");

    let (_, cart) = alice.json("GET", "/api/cart", None).await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
}
