//! HTTP middleware components.
//!
//! Middleware run before route handlers and can short-circuit a request:
//! - `auth` verifies the bearer token and attaches the caller's identity
//! - `guards` enforce role membership and resource ownership

/// Bearer token authentication middleware
pub mod auth;
/// Role and ownership guards
pub mod guards;
