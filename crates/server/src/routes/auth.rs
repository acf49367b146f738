//! Auth route handlers: signup, login, logout, verification, profile.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_sessions::Session;

use crate::db::AccountRepository;
use crate::error::{AppError, Result};
use crate::middleware::{AuthContext, clear_account, set_account};
use crate::models::Account;
use crate::services::AuthService;
use crate::state::AppState;

/// Signup request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Login request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Verification request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub code: String,
}

fn session_error(err: tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session write failed: {err}"))
}

/// `POST /api/signup` — create an account and log it in right away.
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>)> {
    let account = AuthService::new(state.pool())
        .signup(&req.username, &req.email, &req.password, req.phone.as_deref())
        .await?;

    set_account(&session, account.id)
        .await
        .map_err(session_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "user": account })),
    ))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>> {
    let account = AuthService::new(state.pool())
        .login(&req.username, &req.password)
        .await?;

    set_account(&session, account.id)
        .await
        .map_err(session_error)?;

    Ok(Json(
        json!({ "message": "Login successful", "user": account }),
    ))
}

/// `POST /api/logout`
pub async fn logout(session: Session) -> Result<Json<Value>> {
    clear_account(&session).await.map_err(session_error)?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

/// `POST /api/verify` — redeem the one-time code for the logged-in account.
pub async fn verify(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<Value>> {
    AuthService::new(state.pool())
        .verify(ctx.account_id, &req.code)
        .await?;

    Ok(Json(json!({ "message": "Verification successful" })))
}

/// `GET /api/user` — profile of the logged-in account.
pub async fn current_user(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<Account>> {
    let account = AccountRepository::new(state.pool())
        .get(ctx.account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(Json(account))
}
