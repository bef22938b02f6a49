#![allow(dead_code)]

use std::sync::Arc;

use reqwest::StatusCode;
use rust_blog_web_server::{
    auth::{jwt::TokenService, password::PasswordHasher},
    bootstrap, db, routes,
    state::AppState,
    store::{DynStore, memory::MemoryStore, postgres::PgStore},
};
use serde_json::{Value, json};
use sqlx::{
    Connection,
    postgres::{PgConnectOptions, PgConnection, PgPoolOptions},
};
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass";

/// A fresh, empty store.
///
/// With `TEST_DATABASE_URL` (or `DATABASE_URL`) set this is a [`PgStore`]
/// migrated into its own `blog_test_*` schema, so parallel tests never see
/// each other's rows. Otherwise it is a [`MemoryStore`].
pub async fn test_store() -> DynStore {
    let url = std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"));
    match url {
        Ok(url) => postgres_store(&url).await,
        Err(_) => Arc::new(MemoryStore::new()),
    }
}

async fn postgres_store(url: &str) -> DynStore {
    let schema = format!("blog_test_{}", Uuid::new_v4().simple());

    let mut conn = PgConnection::connect(url)
        .await
        .expect("failed to connect to test database");
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&mut conn)
        .await
        .expect("failed to create test schema");
    conn.close().await.ok();

    let options = url
        .parse::<PgConnectOptions>()
        .expect("invalid database url")
        .options([("search_path", schema.as_str())]);
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("failed to open test pool");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    Arc::new(PgStore::new(pool))
}

/// The production router on an ephemeral port, backed by a fresh [`test_store`].
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let state = AppState::new(
            test_store().await,
            TokenService::new("integration-test-secret", 3600),
            // Lowest bcrypt cost keeps the suite fast
            PasswordHasher::new(4),
        );

        bootstrap::ensure_admin(&state, "Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .expect("failed to create admin");

        let app = routes::router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            state,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn user_id(&self, email: &str) -> Uuid {
        self.state
            .store
            .find_user_by_email(email)
            .await
            .unwrap()
            .expect("user exists")
            .id
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> String {
        let res = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": password }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "register {email}");

        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn admin_token(&self) -> String {
        let res = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    /// Create a category as admin and return its id.
    pub async fn category(&self, name: &str) -> String {
        let admin = self.admin_token().await;
        let res = self
            .client
            .post(self.url("/api/categories"))
            .bearer_auth(&admin)
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "create category {name}");

        let body: Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    /// Create a blog as the token's owner and return its id.
    pub async fn blog(&self, token: &str, title: &str, category_id: &str) -> String {
        let res = self
            .client
            .post(self.url("/api/blogs"))
            .bearer_auth(token)
            .json(&json!({ "title": title, "content": "body", "category": category_id }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK, "create blog {title}");

        let body: Value = res.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }
}
