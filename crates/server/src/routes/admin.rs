//! Admin account-management route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use minimart_core::AccountId;

use crate::db::{AccountRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Account;
use crate::state::AppState;

/// Flag patch for an account. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFlagsPatch {
    pub is_admin: Option<bool>,
    pub is_verified: Option<bool>,
}

/// `GET /api/admin/users`
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
) -> Result<Json<Vec<Account>>> {
    let accounts = AccountRepository::new(state.pool()).list().await?;

    Ok(Json(accounts))
}

/// `PATCH /api/admin/users/{id}` — toggle the admin/verified flags.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
    Json(patch): Json<UserFlagsPatch>,
) -> Result<Json<Account>> {
    let account = AccountRepository::new(state.pool())
        .set_flags(AccountId::new(id), patch.is_admin, patch.is_verified)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("User"),
            other => AppError::Database(other),
        })?;

    Ok(Json(account))
}

/// `DELETE /api/admin/users/{id}` — the cart goes with the account; orders
/// stay for reporting.
pub async fn remove_user(
    State(state): State<AppState>,
    RequireAdmin(_): RequireAdmin,
    Path(id): Path<i64>,
) -> Result<Json<Value>> {
    let deleted = AccountRepository::new(state.pool())
        .delete(AccountId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound("User"));
    }

    Ok(Json(json!({ "message": "User deleted successfully" })))
}
