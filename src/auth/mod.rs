//! Credentials: bearer token signing/verification and password hashing.

/// JWT issue and verify
pub mod jwt;
/// bcrypt password hashing
pub mod password;
