//! Admin flag management commands.

use minimart_core::Username;

use minimart_server::db::AccountRepository;

use super::CommandError;

/// Grant or revoke the admin flag of an account, looked up by username.
pub async fn set_admin(username: &str, is_admin: bool) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let username = Username::parse(username)?;
    let repo = AccountRepository::new(&pool);

    let (account, _) = repo
        .get_with_password_hash(&username)
        .await?
        .ok_or_else(|| CommandError::NoSuchAccount(username.as_str().to_owned()))?;

    repo.set_flags(account.id, Some(is_admin), None).await?;

    tracing::info!(
        "Account {} is {} an admin",
        username.as_str(),
        if is_admin { "now" } else { "no longer" }
    );

    Ok(())
}
