//! Registration and login handlers.
//!
//! - POST /api/auth/register - Create an author account and return a token
//! - POST /api/auth/login - Exchange credentials for a token

use axum::{Json, extract::State};

use super::AppJson;
use crate::{
    error::AppError,
    models::user::{LoginRequest, NewUser, RegisterRequest, Role, TokenResponse},
    state::AppState,
    store::ConflictExt,
    validation::Checks,
};

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// Register a new user.
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "secret1" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "token": "..." }`
/// - **Error (400)**: Field violations, or `{ "msg": "User already exists" }`
///
/// Every registration gets the `author` role.
pub async fn register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let mut checks = Checks::new();
    let name = checks.required("name", request.name.as_deref(), "Name is required");
    let email = checks.email(
        "email",
        request.email.as_deref(),
        "Please include a valid email",
    );
    let password = checks.min_len(
        "password",
        request.password.as_deref(),
        6,
        "Please enter a password with 6 or more characters",
    );
    let (Some(name), Some(email), Some(password)) = (name, email, password) else {
        return Err(checks.into_error());
    };

    let duplicate = || AppError::Duplicate("User already exists".to_string());

    if state.store.find_user_by_email(email).await?.is_some() {
        return Err(duplicate());
    }

    let password_hash = state.passwords.hash(password).await?;

    // The unique index still decides a concurrent registration race
    let user = state
        .store
        .create_user(NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Author,
        })
        .await
        .on_conflict(duplicate)?;

    tracing::info!(user_id = %user.id, "user registered");

    let token = state.tokens.issue(user.id, user.role)?;
    Ok(Json(TokenResponse { token }))
}

/// Authenticate and get a token.
///
/// # Response
///
/// - **Success (200 OK)**: `{ "token": "..." }`
/// - **Error (400)**: Field violations, or `{ "msg": "Invalid Credentials" }`
///   for both an unknown email and a wrong password
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let mut checks = Checks::new();
    let email = checks.email(
        "email",
        request.email.as_deref(),
        "Please include a valid email",
    );
    let password = checks.required(
        "password",
        request.password.as_deref(),
        "Password is required",
    );
    let (Some(email), Some(password)) = (email, password) else {
        return Err(checks.into_error());
    };

    let Some(user) = state.store.find_user_by_email(email).await? else {
        tracing::debug!("login for unknown email");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    };

    if !state.passwords.verify(password, &user.password_hash).await? {
        tracing::debug!(user_id = %user.id, "login with wrong password");
        return Err(AppError::BadRequest(INVALID_CREDENTIALS.to_string()));
    }

    let token = state.tokens.issue(user.id, user.role)?;
    Ok(Json(TokenResponse { token }))
}
