//! Signup, login, logout, and verification flows.

use axum::http::StatusCode;
use serde_json::json;

use minimart_integration_tests::{TEST_PASSWORD, TestApp};

#[tokio::test]
async fn signup_logs_the_account_in() {
    let mut app = TestApp::spawn().await;

    let body = app.signup("alice").await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["isVerified"], false);
    assert_eq!(body["user"]["isAdmin"], false);

    // The signup response carried a session cookie.
    let (status, profile) = app.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
    assert_eq!(profile["email"], "alice@example.com");
}

#[tokio::test]
async fn signup_rejects_duplicates_and_weak_passwords() {
    let mut app = TestApp::spawn().await;
    app.signup("alice").await;

    let (status, body) = app
        .json(
            "POST",
            "/api/signup",
            Some(&json!({
                "username": "alice",
                "email": "other@example.com",
                "password": TEST_PASSWORD,
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already exists"));

    let (status, body) = app
        .json(
            "POST",
            "/api/signup",
            Some(&json!({
                "username": "bob",
                "email": "bob@example.com",
                "password": "short",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least"));
}

#[tokio::test]
async fn login_and_logout_round_trip() {
    let mut app = TestApp::spawn().await;
    app.signup("alice").await;

    // Fresh session: not authenticated.
    let mut session = app.another_session();
    let (status, _) = session.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = session
        .json(
            "POST",
            "/api/login",
            Some(&json!({ "username": "alice", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let (status, profile) = session.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");

    let (status, body) = session.json("POST", "/api/logout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Logged out successfully");

    let (status, _) = session.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let mut app = TestApp::spawn().await;
    app.signup("alice").await;

    let mut session = app.another_session();

    let (status, body) = session
        .json(
            "POST",
            "/api/login",
            Some(&json!({ "username": "alice", "password": "wrong password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");

    let (status, _) = session
        .json(
            "POST",
            "/api/login",
            Some(&json!({ "username": "nobody", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verification_flips_the_flag() {
    let mut app = TestApp::spawn().await;
    app.signup("alice").await;

    // Wrong code first.
    let (status, _) = app
        .json("POST", "/api/verify", Some(&json!({ "code": "wrong" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.verify("alice").await;

    let (status, profile) = app.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["isVerified"], true);
}

#[tokio::test]
async fn stale_session_is_unauthenticated() {
    let mut app = TestApp::spawn().await;
    app.signup("admin1").await;
    app.promote_to_admin("admin1").await;

    let mut victim = app.another_session();
    let body = victim.signup("alice").await;
    let victim_id = body["user"]["id"].as_i64().unwrap();

    // Admin deletes the account while its session is still live.
    let (status, _) = app
        .json("DELETE", &format!("/api/admin/users/{victim_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = victim.json("GET", "/api/user", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
