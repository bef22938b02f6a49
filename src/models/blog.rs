//! Blog data models and API request/response types.
//!
//! This module defines:
//! - `Blog`: Stored blog post holding plain references to its author and category
//! - `BlogView`: Read view with the author and category names resolved
//! - Request bodies for creating and updating blogs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a blog record.
///
/// # Database Table
///
/// Maps to the `blogs` table. Both references are nullable: deleting the
/// author or the category leaves the post in place with a null reference.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Blog {
    pub id: Uuid,

    pub title: String,

    pub content: String,

    /// Owning user
    #[serde(rename = "author")]
    pub author_id: Option<Uuid>,

    #[serde(rename = "category")]
    pub category_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Blog {
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == Some(user_id)
    }
}

/// Values for a blog insert.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub author_id: Uuid,
    pub category_id: Uuid,
}

/// Partial update of a blog. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct BlogChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category_id: Option<Uuid>,
}

/// A referenced entity reduced to its id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedRef {
    pub id: Uuid,
    pub name: String,
}

/// Blog with its author and category resolved.
///
/// ```json
/// {
///   "id": "770e8400-...",
///   "title": "Ownership",
///   "content": "...",
///   "author": { "id": "550e8400-...", "name": "Ada" },
///   "category": { "id": "660e8400-...", "name": "Rust" },
///   "created_at": "2025-12-21T16:00:00Z",
///   "updated_at": "2025-12-21T16:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BlogView {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: Option<NamedRef>,
    pub category: Option<NamedRef>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by joining `blogs` with `users` and `categories`.
#[derive(Debug, sqlx::FromRow)]
pub struct BlogViewRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author_id: Option<Uuid>,
    pub author_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BlogViewRow> for BlogView {
    fn from(row: BlogViewRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            author: row
                .author_id
                .zip(row.author_name)
                .map(|(id, name)| NamedRef { id, name }),
            category: row
                .category_id
                .zip(row.category_name)
                .map(|(id, name)| NamedRef { id, name }),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request body for `POST /api/blogs`.
///
/// ```json
/// { "title": "Ownership", "content": "...", "category": "660e8400-..." }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

/// Request body for `PUT /api/blogs/{id}`. Only present fields are changed.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_row_with_missing_join_yields_null_reference() {
        let now = Utc::now();
        let author_id = Uuid::new_v4();
        let row = BlogViewRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            author_id: Some(author_id),
            author_name: Some("Ada".to_string()),
            category_id: None,
            category_name: None,
            created_at: now,
            updated_at: now,
        };

        let view = BlogView::from(row);
        assert_eq!(
            view.author,
            Some(NamedRef {
                id: author_id,
                name: "Ada".to_string()
            })
        );
        assert!(view.category.is_none());
    }

    #[test]
    fn stored_blog_serializes_references_by_id() {
        let now = Utc::now();
        let category_id = Uuid::new_v4();
        let blog = Blog {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            content: "c".to_string(),
            author_id: None,
            category_id: Some(category_id),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&blog).unwrap();
        assert_eq!(json["category"], category_id.to_string());
        assert!(json["author"].is_null());
    }
}
