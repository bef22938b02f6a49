//! Password hashing.
//!
//! bcrypt is CPU-bound; both operations run on the blocking pool.

use crate::error::AppError;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, AppError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hash task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
    }

    /// `false` on mismatch. A malformed stored hash is an internal error.
    pub async fn verify(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let password = password.to_owned();
        let hash = hash.to_owned();

        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("verify task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("failed to verify password: {e}")))
    }
}
