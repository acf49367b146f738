//! Account repository for identity and flag operations.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use minimart_core::{AccountId, Email, Username};

use super::RepositoryError;
use crate::models::Account;

/// Raw account row as stored in `SQLite`.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    username: String,
    email: String,
    phone: Option<String>,
    is_admin: bool,
    is_verified: bool,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Result<Account, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Account {
            id: AccountId::new(self.id),
            username,
            email,
            phone: self.phone,
            is_admin: self.is_admin,
            is_verified: self.is_verified,
            created_at: self.created_at,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, username, email, phone, is_admin, is_verified, created_at";

/// Payload for creating an account.
#[derive(Debug)]
pub struct NewAccount<'n> {
    pub username: &'n Username,
    pub email: &'n Email,
    pub password_hash: &'n str,
    pub phone: Option<&'n str>,
    pub verification_code: &'n str,
}

/// Repository for account database operations.
pub struct AccountRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an account with a pending verification code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewAccount<'_>) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO account
                 (username, email, password_hash, phone, is_admin, is_verified,
                  verification_code, created_at)
             VALUES (?, ?, ?, ?, 0, 0, ?, ?)
             RETURNING id, username, email, phone, is_admin, is_verified, created_at",
        )
        .bind(new.username.as_str())
        .bind(new.email.as_str())
        .bind(new.password_hash)
        .bind(new.phone)
        .bind(new.verification_code)
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_account()
    }

    /// Get an account by its id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if stored identity data is invalid.
    pub async fn get(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?"
        ))
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Get an account and its password hash by username, for login.
    ///
    /// Returns `None` if no such account exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        username: &Username,
    ) -> Result<Option<(Account, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct AuthRow {
            #[sqlx(flatten)]
            account: AccountRow,
            password_hash: String,
        }

        let row = sqlx::query_as::<_, AuthRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS}, password_hash FROM account WHERE username = ?"
        ))
        .bind(username.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => Ok(Some((r.account.into_account()?, r.password_hash))),
            None => Ok(None),
        }
    }

    /// List all accounts, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Account>, RepositoryError> {
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account ORDER BY id ASC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    /// Update the admin/verified flags of an account. `None` leaves a flag
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    pub async fn set_flags(
        &self,
        id: AccountId,
        is_admin: Option<bool>,
        is_verified: Option<bool>,
    ) -> Result<Account, RepositoryError> {
        let row = sqlx::query_as::<_, AccountRow>(
            "UPDATE account
             SET is_admin = COALESCE(?, is_admin),
                 is_verified = COALESCE(?, is_verified)
             WHERE id = ?
             RETURNING id, username, email, phone, is_admin, is_verified, created_at",
        )
        .bind(is_admin)
        .bind(is_verified)
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.ok_or(RepositoryError::NotFound)?.into_account()
    }

    /// Delete an account. The cart goes with it; orders are kept for
    /// reporting.
    ///
    /// # Returns
    ///
    /// Returns `true` if the account was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: AccountId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM account WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get the pending verification code for an account.
    ///
    /// Returns `None` if the account doesn't exist or is already verified.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn verification_code(
        &self,
        id: AccountId,
    ) -> Result<Option<String>, RepositoryError> {
        let code: Option<Option<String>> =
            sqlx::query_scalar("SELECT verification_code FROM account WHERE id = ?")
                .bind(id.as_i64())
                .fetch_optional(self.pool)
                .await?;

        Ok(code.flatten())
    }

    /// Mark an account as verified and clear its code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the account doesn't exist.
    pub async fn mark_verified(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE account SET is_verified = 1, verification_code = NULL WHERE id = ?",
        )
        .bind(id.as_i64())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
