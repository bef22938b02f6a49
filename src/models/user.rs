//! User data models and API request/response types.
//!
//! This module defines:
//! - `User`: Stored user account (carries the bcrypt password hash)
//! - `Role`: Coarse capability tag governing authorization
//! - Request bodies for registration, login and profile updates
//! - `UserResponse`: Response body returned to clients (never includes the password hash)

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role attached to every user and embedded in bearer tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Author,
    Admin,
}

impl Role {
    /// All role names accepted on input.
    pub const NAMES: [&'static str; 2] = ["author", "admin"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "author",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "author" => Some(Role::Author),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Role::parse(&value).ok_or_else(|| format!("unknown role: {value}"))
    }
}

/// Represents a user record.
///
/// # Database Table
///
/// Maps to the `users` table. `email` carries a unique index, which is what
/// settles two concurrent registrations for the same address.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: Uuid,

    pub name: String,

    pub email: String,

    /// bcrypt hash, never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sqlx(try_from = "String")]
    pub role: Role,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Values for a user insert. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Partial update of a user. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

/// Request body for `POST /api/auth/register`.
///
/// Fields are optional at the serde level so that a missing field is
/// reported as a validation error alongside every other violation.
///
/// ```json
/// { "name": "Ada", "email": "ada@example.com", "password": "secret1" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for `PUT /api/users/{id}`.
///
/// Every field is optional; only the fields present are changed.
/// `role` is kept as a string so an unknown value becomes a field error.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Token returned by register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Response body for user endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "name": "Ada",
///   "email": "ada@example.com",
///   "role": "author",
///   "created_at": "2025-12-20T10:00:00Z",
///   "updated_at": "2025-12-20T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Drops the password hash.
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
