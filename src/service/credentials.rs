use crate::db::Storage;
use crate::error::PaygateError;
use crate::service::password::{hash_password, verify_password};
use tracing::{info, warn};

/// Check a login attempt. Unknown usernames and wrong passwords both yield
/// [`PaygateError::InvalidCredentials`].
pub async fn authenticate(
    storage: &Storage,
    username: &str,
    password: &str,
) -> Result<(), PaygateError> {
    let Some(cred) = storage.find_credential(username).await? else {
        warn!(username, "login rejected: unknown username");
        return Err(PaygateError::InvalidCredentials);
    };

    let password = password.to_owned();
    let hash = cred.password_hash;
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
    if !valid {
        warn!(username, "login rejected: password mismatch");
        return Err(PaygateError::InvalidCredentials);
    }

    info!(username, credential_id = cred.id, "login accepted");
    Ok(())
}

/// Hash `password` and store a new credential. Existing rows with the same
/// username are left alone, so repeated seeding creates duplicates.
pub async fn seed_credential(
    storage: &Storage,
    username: &str,
    password: &str,
) -> Result<i64, PaygateError> {
    let password = password.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
    let id = storage.insert_credential(username, &hash).await?;
    info!(username, credential_id = id, "credential created");
    Ok(id)
}
