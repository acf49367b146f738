//! Authentication service.
//!
//! Password signup/login with Argon2id hashing, plus the one-time
//! verification code flow that gates direct purchases.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;
use sqlx::SqlitePool;

use minimart_core::{AccountId, Email, Username};

use crate::db::RepositoryError;
use crate::db::accounts::{AccountRepository, NewAccount};
use crate::models::Account;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles account registration, login, and verification.
pub struct AuthService<'a> {
    accounts: AccountRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool),
        }
    }

    /// Register a new account with username, email, and password.
    ///
    /// The account starts unverified with a pending one-time code. There is
    /// no delivery channel wired up, so the code is written to the log where
    /// an operator can relay it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` / `AuthError::InvalidEmail` if
    /// the identity fields don't parse.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
    ) -> Result<Account, AuthError> {
        let username = Username::parse(username)?;
        let email = Email::parse(email)?;

        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let code = generate_verification_code();

        let account = self
            .accounts
            .create(&NewAccount {
                username: &username,
                email: &email,
                password_hash: &password_hash,
                phone,
                verification_code: &code,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        tracing::info!(
            account_id = %account.id,
            code = %code,
            "verification code issued"
        );

        Ok(account)
    }

    /// Login with username and password.
    ///
    /// A username that doesn't even parse is reported the same way as a
    /// wrong password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<Account, AuthError> {
        let username = Username::parse(username).map_err(|_| AuthError::InvalidCredentials)?;

        let (account, password_hash) = self
            .accounts
            .get_with_password_hash(&username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(account)
    }

    /// Redeem the one-time code and mark the account verified.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCode` if the code doesn't match or no
    /// verification is pending (already verified, or no such account).
    pub async fn verify(&self, account_id: AccountId, code: &str) -> Result<(), AuthError> {
        let pending = self
            .accounts
            .verification_code(account_id)
            .await?
            .ok_or(AuthError::InvalidCode)?;

        if pending != code {
            return Err(AuthError::InvalidCode);
        }

        self.accounts.mark_verified(account_id).await?;

        Ok(())
    }
}

/// Generate a 6-digit one-time verification code.
fn generate_verification_code() -> String {
    let code: u32 = rand::rng().random_range(0..1_000_000);
    format!("{code:06}")
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// Also used by the CLI seed command, hence public.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_support::test_pool;

    #[test]
    fn short_password_is_rejected() {
        let err = validate_password("short").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));

        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn verification_code_is_six_digits() {
        for _ in 0..32 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("correct horse").unwrap();

        assert!(verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            verify_password("battery staple", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn signup_creates_unverified_account() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        let account = auth
            .signup("alice", "alice@example.com", "Password1!", None)
            .await
            .unwrap();

        assert_eq!(account.username.as_str(), "alice");
        assert!(!account.is_verified);
        assert!(!account.is_admin);
    }

    #[tokio::test]
    async fn signup_rejects_duplicate_username() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.signup("alice", "alice@example.com", "Password1!", None)
            .await
            .unwrap();

        let err = auth
            .signup("alice", "other@example.com", "Password2!", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn login_checks_credentials() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);

        auth.signup("alice", "alice@example.com", "Password1!", None)
            .await
            .unwrap();

        let account = auth.login("alice", "Password1!").await.unwrap();
        assert_eq!(account.username.as_str(), "alice");

        assert!(matches!(
            auth.login("alice", "wrong password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "Password1!").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn verify_redeems_the_pending_code() {
        let pool = test_pool().await;
        let auth = AuthService::new(&pool);
        let accounts = AccountRepository::new(&pool);

        let account = auth
            .signup("alice", "alice@example.com", "Password1!", None)
            .await
            .unwrap();

        let code = accounts
            .verification_code(account.id)
            .await
            .unwrap()
            .unwrap();

        assert!(matches!(
            auth.verify(account.id, "not-the-code").await,
            Err(AuthError::InvalidCode)
        ));

        auth.verify(account.id, &code).await.unwrap();

        let account = accounts.get(account.id).await.unwrap().unwrap();
        assert!(account.is_verified);

        // The code is single-use.
        assert!(matches!(
            auth.verify(account.id, &code).await,
            Err(AuthError::InvalidCode)
        ));
    }
}
