//! Direct purchase flow.

use axum::http::StatusCode;
use serde_json::json;

use minimart_integration_tests::TestApp;

#[tokio::test]
async fn purchase_requires_a_verified_account() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 5).await;
    app.signup("alice").await;

    let (status, body) = app
        .json("POST", "/api/purchase", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["error"],
        "Please verify your email/phone before purchasing."
    );
}

#[tokio::test]
async fn purchase_creates_a_pending_order() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 5).await;
    app.signup("alice").await;
    app.verify("alice").await;

    let (status, body) = app
        .json("POST", "/api/purchase", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Purchase successful");
    assert_eq!(body["productName"], "Widget");

    assert_eq!(app.stock_of(widget).await, 4);

    let (_, history) = app.json("GET", "/api/user/orders", None).await;
    let orders = history.as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["status"], "pending");
    assert_eq!(orders[0]["amount"], "9.99");
    assert_eq!(orders[0]["product"]["name"], "Widget");
}

#[tokio::test]
async fn purchase_is_limited_to_one_per_product() {
    let mut app = TestApp::spawn().await;
    let widget = app.seed_product("Widget", "9.99", 5).await;
    app.signup("alice").await;
    app.verify("alice").await;

    app.json("POST", "/api/purchase", Some(&json!({ "productId": widget })))
        .await;

    let (status, body) = app
        .json("POST", "/api/purchase", Some(&json!({ "productId": widget })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "You can only buy one item of each type.");

    // The failed attempt reserved nothing.
    assert_eq!(app.stock_of(widget).await, 4);
}

#[tokio::test]
async fn purchase_rejects_missing_or_drained_products() {
    let mut app = TestApp::spawn().await;
    let gone = app.seed_product("Sold Out", "9.99", 0).await;
    app.signup("alice").await;
    app.verify("alice").await;

    let (status, body) = app
        .json("POST", "/api/purchase", Some(&json!({ "productId": 999 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");

    let (status, body) = app
        .json("POST", "/api/purchase", Some(&json!({ "productId": gone })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Out of stock");
}
