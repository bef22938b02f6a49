//! Blog Service
//!
//! A REST API for blogs, categories and users with JWT bearer authentication
//! and author/admin role checks.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Storage**: PostgreSQL with sqlx, or an in-memory store
//! - **Authentication**: HS256 JWT bearer tokens, bcrypt password hashes
//! - **Format**: JSON requests/responses

pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod validation;
