//! PostgreSQL-backed store.
//!
//! Partial updates bind `Option` values and merge them with `COALESCE`, so a
//! `NULL` parameter keeps the column's current value.

use async_trait::async_trait;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::{
    db::DbPool,
    models::{
        blog::{Blog, BlogChanges, BlogView, BlogViewRow, NewBlog},
        category::Category,
        user::{NewUser, User, UserChanges},
    },
};

/// Foreign key names from the blogs migration.
pub(super) const BLOG_AUTHOR_FK: &str = "blogs_author_id_fkey";
pub(super) const BLOG_CATEGORY_FK: &str = "blogs_category_id_fkey";

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at, updated_at";

const BLOG_VIEW_SELECT: &str = r#"
    SELECT b.id, b.title, b.content,
           b.author_id, u.name AS author_name,
           b.category_id, c.name AS category_name,
           b.created_at, b.updated_at
    FROM blogs b
    LEFT JOIN users u ON u.id = b.author_id
    LEFT JOIN categories c ON c.id = b.category_id
"#;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let created = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE($2, name),
                 email = COALESCE($3, email),
                 password_hash = COALESCE($4, password_hash),
                 role = COALESCE($5, role),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.email)
        .bind(changes.password_hash)
        .bind(changes.role.map(|role| role.as_str()))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn create_category(&self, name: &str) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (id, name) VALUES ($1, $2)
             RETURNING id, name, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING id, name, created_at, updated_at",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<bool> {
        // blogs.category_id is ON DELETE SET NULL
        let deleted = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn create_blog(&self, blog: NewBlog) -> StoreResult<Blog> {
        let created = sqlx::query_as::<_, Blog>(
            r#"
            INSERT INTO blogs (id, title, content, author_id, category_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, content, author_id, category_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(blog.title)
        .bind(blog.content)
        .bind(blog.author_id)
        .bind(blog.category_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let blog = sqlx::query_as::<_, Blog>(
            "SELECT id, title, content, author_id, category_id, created_at, updated_at
             FROM blogs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(blog)
    }

    async fn find_blog_view(&self, id: Uuid) -> StoreResult<Option<BlogView>> {
        let row = sqlx::query_as::<_, BlogViewRow>(&format!("{BLOG_VIEW_SELECT} WHERE b.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_blog_views(&self, category: Option<Uuid>) -> StoreResult<Vec<BlogView>> {
        let rows = sqlx::query_as::<_, BlogViewRow>(&format!(
            "{BLOG_VIEW_SELECT} WHERE ($1::uuid IS NULL OR b.category_id = $1) ORDER BY b.created_at"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> StoreResult<Option<BlogView>> {
        // Update and re-read the joined view in one round trip
        let row = sqlx::query_as::<_, BlogViewRow>(
            r#"
            WITH b AS (
                UPDATE blogs
                SET title = COALESCE($2, title),
                    content = COALESCE($3, content),
                    category_id = COALESCE($4, category_id),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT b.id, b.title, b.content,
                   b.author_id, u.name AS author_name,
                   b.category_id, c.name AS category_name,
                   b.created_at, b.updated_at
            FROM b
            LEFT JOIN users u ON u.id = b.author_id
            LEFT JOIN categories c ON c.id = b.category_id
            "#,
        )
        .bind(id)
        .bind(changes.title)
        .bind(changes.content)
        .bind(changes.category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool> {
        let deleted = sqlx::query("DELETE FROM blogs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}
