//! Data models representing stored entities and API request/response bodies.

/// Blog posts and their populated read views
pub mod blog;
/// Blog categories
pub mod category;
/// User accounts and roles
pub mod user;
