//! User management HTTP handlers.
//!
//! - GET /api/users - List users (admin)
//! - GET /api/users/{id} - Get one user (self or admin)
//! - PUT /api/users/{id} - Partially update a user (self or admin)
//! - DELETE /api/users/{id} - Delete a user (admin)

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use super::{AppJson, Message};
use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::user::{Role, UpdateUserRequest, UserChanges, UserResponse},
    state::AppState,
    store::ConflictExt,
    validation::{Checks, parse_path_id},
};

/// List every user. Password hashes are never serialized.
///
/// # Response
///
/// - **Success (200 OK)**: Array of users
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.store.list_users().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Get one user.
///
/// # Response
///
/// - **Success (200 OK)**: The user
/// - **Error (404)**: `{ "msg": "User not found" }`
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = parse_path_id(&id, "User")?;

    let user = state
        .store
        .find_user(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.into()))
}

/// Update a user.
///
/// # Request Body
///
/// Every field is optional; absent fields keep their stored value.
///
/// ```json
/// { "name": "Ada L.", "email": "ada@example.org", "password": "secret2", "role": "admin" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The updated user
/// - **Error (400)**: Field violations, or `{ "msg": "Email already taken" }`
/// - **Error (403)**: A non-admin tried to change a role
/// - **Error (404)**: No such user
pub async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let mut checks = Checks::new();
    if let Some(name) = request.name.as_deref() {
        checks.required("name", Some(name), "Name is required");
    }
    if let Some(email) = request.email.as_deref() {
        checks.email("email", Some(email), "Please include a valid email");
    }
    if let Some(password) = request.password.as_deref() {
        checks.min_len(
            "password",
            Some(password),
            6,
            "Please enter a password with 6 or more characters",
        );
    }
    let role = match request.role.as_deref() {
        Some(role) => checks
            .one_of("role", Some(role), &Role::NAMES, "Invalid role")
            .and_then(Role::parse),
        None => None,
    };
    checks.finish()?;

    let id = parse_path_id(&id, "User")?;
    let current = state
        .store
        .find_user(id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    if let Some(role) = role {
        if role != current.role && !caller.is_admin() {
            return Err(AppError::Forbidden(
                "Only admins can change roles".to_string(),
            ));
        }
    }

    let email_taken = || AppError::Duplicate("Email already taken".to_string());

    if let Some(email) = request.email.as_deref() {
        if let Some(owner) = state.store.find_user_by_email(email).await? {
            if owner.id != id {
                return Err(email_taken());
            }
        }
    }

    let password_hash = match request.password.as_deref() {
        Some(password) => Some(state.passwords.hash(password).await?),
        None => None,
    };

    let changes = UserChanges {
        name: request.name,
        email: request.email,
        password_hash,
        role,
    };

    let user = state
        .store
        .update_user(id, changes)
        .await
        .on_conflict(email_taken)?
        .ok_or(AppError::NotFound("User"))?;

    Ok(Json(user.into()))
}

/// Delete a user. Their blogs remain with a `null` author.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "msg": "User deleted" }`
/// - **Error (404)**: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let id = parse_path_id(&id, "User")?;

    if !state.store.delete_user(id).await? {
        return Err(AppError::NotFound("User"));
    }

    tracing::info!(user_id = %id, "user deleted");
    Ok(Json(Message { msg: "User deleted" }))
}
