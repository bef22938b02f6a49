//! Category HTTP handlers.
//!
//! - POST /api/categories - Create (admin)
//! - GET /api/categories - List (public)
//! - GET /api/categories/{id} - Get one (public)
//! - PUT /api/categories/{id} - Rename (admin)
//! - DELETE /api/categories/{id} - Delete (admin)

use axum::{
    Json,
    extract::{Path, State},
};

use super::{AppJson, Message};
use crate::{
    error::AppError,
    models::category::{Category, CategoryRequest},
    state::AppState,
    store::ConflictExt,
    validation::{Checks, parse_path_id},
};

fn category_exists() -> AppError {
    AppError::Duplicate("Category already exists".to_string())
}

fn validated_name(request: &CategoryRequest) -> Result<&str, AppError> {
    let mut checks = Checks::new();
    match checks.required("name", request.name.as_deref(), "Name is required") {
        Some(name) => Ok(name),
        None => Err(checks.into_error()),
    }
}

/// Create a new category.
///
/// Names are compared case-sensitively, so "Rust" and "rust" may coexist.
///
/// # Response
///
/// - **Success (200 OK)**: The created category
/// - **Error (400)**: Missing name, or `{ "msg": "Category already exists" }`
pub async fn create_category(
    State(state): State<AppState>,
    AppJson(request): AppJson<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let name = validated_name(&request)?;

    if state.store.find_category_by_name(name).await?.is_some() {
        return Err(category_exists());
    }

    let category = state
        .store
        .create_category(name)
        .await
        .on_conflict(category_exists)?;

    tracing::info!(category_id = %category.id, "category created");
    Ok(Json(category))
}

/// List every category.
///
/// # Response
///
/// - **Success (200 OK)**: Array of categories
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.store.list_categories().await?))
}

/// Get one category.
///
/// # Response
///
/// - **Success (200 OK)**: The category
/// - **Error (404)**: `{ "msg": "Category not found" }`
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let id = parse_path_id(&id, "Category")?;

    let category = state
        .store
        .find_category(id)
        .await?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(Json(category))
}

/// Rename a category.
///
/// # Response
///
/// - **Success (200 OK)**: The renamed category
/// - **Error (400)**: Missing name, or `{ "msg": "Category already exists" }`
/// - **Error (404)**: No such category
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CategoryRequest>,
) -> Result<Json<Category>, AppError> {
    let name = validated_name(&request)?;
    let id = parse_path_id(&id, "Category")?;

    let category = state
        .store
        .rename_category(id, name)
        .await
        .on_conflict(category_exists)?
        .ok_or(AppError::NotFound("Category"))?;

    Ok(Json(category))
}

/// Delete a category.
///
/// Blogs filed under it are kept; their category becomes `null`.
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let id = parse_path_id(&id, "Category")?;

    if !state.store.delete_category(id).await? {
        return Err(AppError::NotFound("Category"));
    }

    tracing::info!(category_id = %id, "category deleted");
    Ok(Json(Message {
        msg: "Category deleted",
    }))
}
