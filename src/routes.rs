//! HTTP route table.
//!
//! Each protected route is a method router wrapped in `route_layer`s. The
//! layer added last runs first, so every chain below reads bottom-up as
//! "authenticate, then guard, then handler".

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::{
    handlers::{auth, blogs, categories, health, users},
    middleware::{auth::auth_middleware, guards},
    state::AppState,
};

pub fn router(state: AppState) -> Router {
    let authenticated = || from_fn_with_state(state.clone(), auth_middleware);

    let app = Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health_check))
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        // Users
        .route(
            "/api/users",
            get(users::list_users)
                .route_layer(from_fn(guards::admin_only))
                .route_layer(authenticated()),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .route_layer(from_fn(guards::self_or_admin))
                .merge(delete(users::delete_user).route_layer(from_fn(guards::admin_only)))
                .route_layer(authenticated()),
        )
        // Blogs
        .route(
            "/api/blogs",
            get(blogs::list_blogs).merge(
                post(blogs::create_blog)
                    .route_layer(from_fn(guards::authors_only))
                    .route_layer(authenticated()),
            ),
        )
        .route(
            "/api/blogs/{id}",
            get(blogs::get_blog).merge(
                put(blogs::update_blog)
                    .delete(blogs::delete_blog)
                    .route_layer(from_fn_with_state(
                        state.clone(),
                        guards::check_blog_ownership,
                    ))
                    .route_layer(authenticated()),
            ),
        )
        .route(
            "/api/blogs/category/{category_id}",
            get(blogs::list_blogs_by_category),
        )
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories).merge(
                post(categories::create_category)
                    .route_layer(from_fn(guards::admin_only))
                    .route_layer(authenticated()),
            ),
        )
        .route(
            "/api/categories/{id}",
            get(categories::get_category).merge(
                put(categories::update_category)
                    .delete(categories::delete_category)
                    .route_layer(from_fn(guards::admin_only))
                    .route_layer(authenticated()),
            ),
        )
        .layer(TraceLayer::new_for_http());

    app.with_state(state)
}
