//! Category data model and request body.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a category record.
///
/// Maps to the `categories` table. `name` is unique and compared case-sensitively.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or renaming a category.
///
/// ```json
/// { "name": "Rust" }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CategoryRequest {
    pub name: Option<String>,
}
