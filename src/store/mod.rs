//! Persistence seam.
//!
//! Handlers talk to a [`Store`] instead of a concrete database. Two
//! implementations exist:
//! - [`postgres::PgStore`]: PostgreSQL through sqlx (production)
//! - [`memory::MemoryStore`]: in-process tables (tests, and runs without `DATABASE_URL`)
//!
//! Both enforce the same rules: unique user emails, unique category names,
//! blogs that only point at existing users and categories, and nulling of
//! blog references when a user or category is deleted.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        blog::{Blog, BlogChanges, BlogView, NewBlog},
        category::Category,
        user::{NewUser, User, UserChanges},
    },
};

pub mod memory;
pub mod postgres;

/// Shared handle used in application state.
pub type DynStore = Arc<dyn Store>;

/// A row a blog points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Author,
    Category,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("unique constraint violated")]
    Conflict,

    /// The write referenced a user or category that does not exist.
    #[error("referenced {0:?} does not exist")]
    MissingReference(Reference),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict;
            }
            if db.is_foreign_key_violation() {
                match db.constraint() {
                    Some(postgres::BLOG_AUTHOR_FK) => {
                        return StoreError::MissingReference(Reference::Author);
                    }
                    Some(postgres::BLOG_CATEGORY_FK) => {
                        return StoreError::MissingReference(Reference::Category);
                    }
                    _ => {}
                }
            }
        }
        StoreError::Database(err)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Maps a store conflict onto a caller-chosen error; everything else becomes `AppError::Store`.
pub trait ConflictExt<T> {
    fn on_conflict(self, err: impl FnOnce() -> AppError) -> Result<T, AppError>;
}

impl<T> ConflictExt<T> for StoreResult<T> {
    fn on_conflict(self, err: impl FnOnce() -> AppError) -> Result<T, AppError> {
        match self {
            Ok(value) => Ok(value),
            Err(StoreError::Conflict) => Err(err()),
            Err(other) => Err(AppError::Store(other)),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;

    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn list_users(&self) -> StoreResult<Vec<User>>;
    /// `None` if no user has this id.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>>;
    /// `false` if no user has this id.
    async fn delete_user(&self, id: Uuid) -> StoreResult<bool>;

    async fn create_category(&self, name: &str) -> StoreResult<Category>;
    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>>;
    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
    async fn rename_category(&self, id: Uuid, name: &str) -> StoreResult<Option<Category>>;
    async fn delete_category(&self, id: Uuid) -> StoreResult<bool>;

    /// `MissingReference` if the author or category does not exist.
    async fn create_blog(&self, blog: NewBlog) -> StoreResult<Blog>;
    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>>;
    async fn find_blog_view(&self, id: Uuid) -> StoreResult<Option<BlogView>>;
    /// All blogs, or only those filed under `category`.
    async fn list_blog_views(&self, category: Option<Uuid>) -> StoreResult<Vec<BlogView>>;
    /// `MissingReference` if a new category does not exist.
    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> StoreResult<Option<BlogView>>;
    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool>;
}
