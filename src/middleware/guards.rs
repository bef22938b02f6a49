//! Role and ownership guards.
//!
//! Each guard runs after [`auth_middleware`](super::auth::auth_middleware)
//! and either lets the request through or short-circuits it with 401/403/404.
//! The checks themselves are plain functions so they can be tested without
//! a router.

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::auth::{AuthUser, current_user};
use crate::{
    error::AppError, models::blog::Blog, models::user::Role, state::AppState,
    validation::parse_path_id,
};

/// 403 unless the caller's role is in `allowed`.
pub fn ensure_role(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, role = %user.role, "role not permitted");
        Err(AppError::Forbidden(format!(
            "User role {} is not authorized to access this route",
            user.role
        )))
    }
}

/// 403 unless the caller is the target user or an admin.
pub fn ensure_self_or_admin(user: &AuthUser, target: Option<Uuid>) -> Result<(), AppError> {
    if user.is_admin() || target == Some(user.id) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Not authorized".to_string()))
    }
}

/// 403 unless the caller wrote `blog` or is an admin.
pub fn ensure_owner_or_admin(user: &AuthUser, blog: &Blog) -> Result<(), AppError> {
    if user.is_admin() || blog.is_authored_by(user.id) {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, blog_id = %blog.id, "blog ownership check failed");
        Err(AppError::Forbidden(
            "Not authorized to update/delete this blog".to_string(),
        ))
    }
}

/// Shared body of the role middleware below.
pub async fn authorize_role(
    allowed: &[Role],
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    ensure_role(&user, allowed)?;
    Ok(next.run(request).await)
}

pub async fn admin_only(request: Request, next: Next) -> Result<Response, AppError> {
    authorize_role(&[Role::Admin], request, next).await
}

pub async fn authors_only(request: Request, next: Next) -> Result<Response, AppError> {
    authorize_role(&[Role::Author], request, next).await
}

/// User self-service routes: the caller must be `{id}` or an admin.
pub async fn self_or_admin(
    Path(id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    ensure_self_or_admin(&user, Uuid::parse_str(&id).ok())?;
    Ok(next.run(request).await)
}

/// Blog mutation routes: `{id}` must exist and belong to the caller, unless
/// the caller is an admin.
pub async fn check_blog_ownership(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = current_user(&request)?;
    let blog_id = parse_path_id(&id, "Blog")?;

    let blog = state
        .store
        .find_blog(blog_id)
        .await?
        .ok_or(AppError::NotFound("Blog"))?;

    ensure_owner_or_admin(&user, &blog)?;
    Ok(next.run(request).await)
}
