//! Startup helpers that run before the server accepts requests.

use crate::{
    error::AppError,
    models::user::{NewUser, Role},
    state::AppState,
    store::StoreError,
};

/// Create the configured admin account unless a user with that email exists.
///
/// Registration only ever creates authors, so this is how the first admin
/// comes into being. An existing account is left untouched, whatever its role.
pub async fn ensure_admin(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    if let Some(existing) = state.store.find_user_by_email(email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(user_id = %existing.id, "bootstrap admin email belongs to a non-admin user");
        }
        return Ok(());
    }

    let password_hash = state.passwords.hash(password).await?;
    let created = state
        .store
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await;

    match created {
        Ok(admin) => tracing::info!(user_id = %admin.id, "bootstrap admin created"),
        // Another instance created it first
        Err(StoreError::Conflict) => {}
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
