//! In-process store.
//!
//! Tables live behind a single `RwLock`, so every write sees a consistent
//! snapshot and the uniqueness checks cannot race each other.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Reference, Store, StoreError, StoreResult};
use crate::models::{
    blog::{Blog, BlogChanges, BlogView, NamedRef, NewBlog},
    category::Category,
    user::{NewUser, User, UserChanges},
};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    categories: Vec<Category>,
    blogs: Vec<Blog>,
}

impl Tables {
    fn ensure_user(&self, id: Uuid) -> StoreResult<()> {
        if self.users.iter().any(|u| u.id == id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(Reference::Author))
        }
    }

    fn ensure_category(&self, id: Uuid) -> StoreResult<()> {
        if self.categories.iter().any(|c| c.id == id) {
            Ok(())
        } else {
            Err(StoreError::MissingReference(Reference::Category))
        }
    }

    fn view(&self, blog: &Blog) -> BlogView {
        let author = blog.author_id.and_then(|id| {
            self.users
                .iter()
                .find(|u| u.id == id)
                .map(|u| NamedRef {
                    id,
                    name: u.name.clone(),
                })
        });
        let category = blog.category_id.and_then(|id| {
            self.categories
                .iter()
                .find(|c| c.id == id)
                .map(|c| NamedRef {
                    id,
                    name: c.name.clone(),
                })
        });

        BlogView {
            id: blog.id,
            title: blog.title.clone(),
            content: blog.content.clone(),
            author,
            category,
            created_at: blog.created_at,
            updated_at: blog.updated_at,
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(created.clone());

        Ok(created)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut tables = self.tables.write().await;

        if let Some(email) = &changes.email {
            if tables.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(StoreError::Conflict);
            }
        }

        let Some(user) = tables.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables.users.retain(|u| u.id != id);
        if tables.users.len() == before {
            return Ok(false);
        }

        for blog in tables.blogs.iter_mut().filter(|b| b.author_id == Some(id)) {
            blog.author_id = None;
        }
        Ok(true)
    }

    async fn create_category(&self, name: &str) -> StoreResult<Category> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.name == name) {
            return Err(StoreError::Conflict);
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.push(category.clone());

        Ok(category)
    }

    async fn find_category(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.iter().find(|c| c.name == name).cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        Ok(self.tables.read().await.categories.clone())
    }

    async fn rename_category(&self, id: Uuid, name: &str) -> StoreResult<Option<Category>> {
        let mut tables = self.tables.write().await;
        if tables.categories.iter().any(|c| c.id != id && c.name == name) {
            return Err(StoreError::Conflict);
        }

        let Some(category) = tables.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        category.name = name.to_string();
        category.updated_at = Utc::now();

        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.categories.len();
        tables.categories.retain(|c| c.id != id);
        if tables.categories.len() == before {
            return Ok(false);
        }

        for blog in tables.blogs.iter_mut().filter(|b| b.category_id == Some(id)) {
            blog.category_id = None;
        }
        Ok(true)
    }

    async fn create_blog(&self, blog: NewBlog) -> StoreResult<Blog> {
        let mut tables = self.tables.write().await;
        tables.ensure_user(blog.author_id)?;
        tables.ensure_category(blog.category_id)?;

        let now = Utc::now();
        let created = Blog {
            id: Uuid::new_v4(),
            title: blog.title,
            content: blog.content,
            author_id: Some(blog.author_id),
            category_id: Some(blog.category_id),
            created_at: now,
            updated_at: now,
        };
        tables.blogs.push(created.clone());

        Ok(created)
    }

    async fn find_blog(&self, id: Uuid) -> StoreResult<Option<Blog>> {
        let tables = self.tables.read().await;
        Ok(tables.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn find_blog_view(&self, id: Uuid) -> StoreResult<Option<BlogView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .blogs
            .iter()
            .find(|b| b.id == id)
            .map(|b| tables.view(b)))
    }

    async fn list_blog_views(&self, category: Option<Uuid>) -> StoreResult<Vec<BlogView>> {
        let tables = self.tables.read().await;
        Ok(tables
            .blogs
            .iter()
            .filter(|b| category.is_none() || b.category_id == category)
            .map(|b| tables.view(b))
            .collect())
    }

    async fn update_blog(&self, id: Uuid, changes: BlogChanges) -> StoreResult<Option<BlogView>> {
        let mut tables = self.tables.write().await;
        if let Some(category_id) = changes.category_id {
            tables.ensure_category(category_id)?;
        }

        let Some(blog) = tables.blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            blog.title = title;
        }
        if let Some(content) = changes.content {
            blog.content = content;
        }
        if let Some(category_id) = changes.category_id {
            blog.category_id = Some(category_id);
        }
        blog.updated_at = Utc::now();

        let updated = blog.clone();
        Ok(Some(tables.view(&updated)))
    }

    async fn delete_blog(&self, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.blogs.len();
        tables.blogs.retain(|b| b.id != id);
        Ok(tables.blogs.len() < before)
    }
}
