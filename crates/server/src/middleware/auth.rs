//! Authentication extractors.
//!
//! The session carries only the account id; the extractor resolves it to an
//! [`AuthContext`] on every request, so admin/verified flag changes take
//! effect immediately. Core operations receive the context as an opaque
//! capability token and never touch the session themselves.

use axum::{extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

use minimart_core::AccountId;

use crate::db::AccountRepository;
use crate::error::AppError;
use crate::middleware::session_keys;
use crate::state::AppState;

/// The authenticated caller: everything a core operation is allowed to know
/// about the session.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub account_id: AccountId,
    pub is_verified: bool,
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for AuthContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AppError::Unauthorized)?;

        let account_id: i64 = session
            .get(session_keys::ACCOUNT_ID)
            .await
            .ok()
            .flatten()
            .ok_or(AppError::Unauthorized)?;

        // Stale sessions (account deleted since login) are treated as
        // unauthenticated rather than 500s.
        let account = AccountRepository::new(state.pool())
            .get(AccountId::new(account_id))
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Self {
            account_id: account.id,
            is_verified: account.is_verified,
            is_admin: account.is_admin,
        })
    }
}

/// Extractor that additionally requires the admin flag.
///
/// Missing session: 401. Valid session without the flag: 403.
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin(pub AuthContext);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = AuthContext::from_request_parts(parts, state).await?;

        if !ctx.is_admin {
            return Err(AppError::Forbidden);
        }

        Ok(Self(ctx))
    }
}

/// Store the logged-in account in the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_account(
    session: &Session,
    account_id: AccountId,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::ACCOUNT_ID, account_id.as_i64())
        .await
}

/// Clear the logged-in account from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_account(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
