//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, caller identity)
//! 2. Validates the body and checks referenced entities
//! 3. Calls the store
//! 4. Returns a JSON response or an `AppError`

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Registration and login
pub mod auth;
/// Blog CRUD
pub mod blogs;
/// Category CRUD
pub mod categories;
/// Liveness endpoints
pub mod health;
/// User management
pub mod users;

/// JSON body extractor whose rejection is an [`AppError`], so malformed
/// bodies get the same `{ "msg": ... }` shape as every other error.
#[derive(Debug)]
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Body of acknowledgement responses such as `{ "msg": "Blog deleted" }`.
#[derive(Debug, serde::Serialize)]
pub struct Message {
    pub msg: &'static str,
}
