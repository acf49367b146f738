//! Account model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use minimart_core::{AccountId, Email, Username};

/// A store account.
///
/// The password hash is deliberately not part of this struct; it only
/// travels through [`crate::db::accounts::AccountRepository`] methods that
/// need it for credential checks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: Email,
    pub phone: Option<String>,
    pub is_admin: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}
