//! Blog HTTP handlers.
//!
//! - POST /api/blogs - Create (authors)
//! - GET /api/blogs - List with author and category names (public)
//! - GET /api/blogs/{id} - Get one (public)
//! - GET /api/blogs/category/{category_id} - List one category's blogs (public)
//! - PUT /api/blogs/{id} - Partially update (owner or admin)
//! - DELETE /api/blogs/{id} - Delete (owner or admin)
//!
//! Ownership for the mutating routes is enforced by
//! [`check_blog_ownership`](crate::middleware::guards::check_blog_ownership)
//! before these handlers run.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use super::{AppJson, Message};
use crate::{
    error::AppError,
    middleware::auth::AuthUser,
    models::blog::{Blog, BlogChanges, BlogView, CreateBlogRequest, NewBlog, UpdateBlogRequest},
    state::AppState,
    store::{Reference, StoreError},
    validation::{Checks, parse_path_id},
};

fn category_not_found() -> AppError {
    AppError::BadRequest("Category not found".to_string())
}

/// 400 unless `category_id` names an existing category.
async fn ensure_category_exists(state: &AppState, category_id: Uuid) -> Result<(), AppError> {
    match state.store.find_category(category_id).await? {
        Some(_) => Ok(()),
        None => Err(category_not_found()),
    }
}

/// A reference that vanished between the checks and the write.
///
/// The author case is a token that outlived its user.
fn blog_write_error(err: StoreError) -> AppError {
    match err {
        StoreError::MissingReference(Reference::Category) => category_not_found(),
        StoreError::MissingReference(Reference::Author) => {
            AppError::Unauthorized("Not authorized".to_string())
        }
        other => AppError::Store(other),
    }
}

/// Create a new blog owned by the caller.
///
/// # Request Body
///
/// ```json
/// { "title": "Ownership", "content": "...", "category": "660e8400-..." }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: The stored blog, references as ids
/// - **Error (400)**: Field violations, or `{ "msg": "Category not found" }`
/// - **Error (401)**: The caller's account no longer exists
pub async fn create_blog(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    AppJson(request): AppJson<CreateBlogRequest>,
) -> Result<Json<Blog>, AppError> {
    let mut checks = Checks::new();
    let title = checks.required("title", request.title.as_deref(), "Title is required");
    let content = checks.required(
        "content",
        request.content.as_deref(),
        "Content is required",
    );
    let category_id = checks.id(
        "category",
        request.category.as_deref(),
        "Category is required",
    );
    let (Some(title), Some(content), Some(category_id)) = (title, content, category_id) else {
        return Err(checks.into_error());
    };

    ensure_category_exists(&state, category_id).await?;

    let blog = state
        .store
        .create_blog(NewBlog {
            title: title.to_string(),
            content: content.to_string(),
            author_id: caller.id,
            category_id,
        })
        .await
        .map_err(blog_write_error)?;

    tracing::info!(blog_id = %blog.id, author_id = %caller.id, "blog created");
    Ok(Json(blog))
}

/// List every blog, newest last.
///
/// # Response
///
/// - **Success (200 OK)**: Blogs with `{ id, name }` for author and category,
///   or `null` where the referenced row was deleted
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogView>>, AppError> {
    Ok(Json(state.store.list_blog_views(None).await?))
}

/// Get one blog with author and category names.
///
/// # Response
///
/// - **Success (200 OK)**: The blog
/// - **Error (404)**: `{ "msg": "Blog not found" }`
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogView>, AppError> {
    let id = parse_path_id(&id, "Blog")?;

    let blog = state
        .store
        .find_blog_view(id)
        .await?
        .ok_or(AppError::NotFound("Blog"))?;

    Ok(Json(blog))
}

/// List blogs filed under one category.
///
/// An unknown category yields an empty list; an unparseable id yields 404.
pub async fn list_blogs_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Vec<BlogView>>, AppError> {
    let category_id = parse_path_id(&category_id, "Category")?;
    Ok(Json(state.store.list_blog_views(Some(category_id)).await?))
}

/// Update a blog.
///
/// Only fields present in the body change. A present field must be
/// non-blank, and a present category must exist.
///
/// # Response
///
/// - **Success (200 OK)**: The updated blog with author and category names
/// - **Error (400)**: Field violations, or `{ "msg": "Category not found" }`
/// - **Error (404)**: No such blog
pub async fn update_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateBlogRequest>,
) -> Result<Json<BlogView>, AppError> {
    let mut checks = Checks::new();
    if let Some(title) = request.title.as_deref() {
        checks.required("title", Some(title), "Title is required");
    }
    if let Some(content) = request.content.as_deref() {
        checks.required("content", Some(content), "Content is required");
    }
    let category_id = match request.category.as_deref() {
        Some(category) => checks.id("category", Some(category), "Category is required"),
        None => None,
    };
    checks.finish()?;

    let id = parse_path_id(&id, "Blog")?;

    if let Some(category_id) = category_id {
        ensure_category_exists(&state, category_id).await?;
    }

    let changes = BlogChanges {
        title: request.title,
        content: request.content,
        category_id,
    };

    let blog = state
        .store
        .update_blog(id, changes)
        .await
        .map_err(blog_write_error)?
        .ok_or(AppError::NotFound("Blog"))?;

    Ok(Json(blog))
}

/// Delete a blog.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "msg": "Blog deleted" }`
/// - **Error (404)**: No such blog
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Message>, AppError> {
    let id = parse_path_id(&id, "Blog")?;

    if !state.store.delete_blog(id).await? {
        return Err(AppError::NotFound("Blog"));
    }

    tracing::info!(blog_id = %id, "blog deleted");
    Ok(Json(Message { msg: "Blog deleted" }))
}
