//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use std::ops::RangeInclusive;

use serde::Deserialize;

/// Work factors the bcrypt crate accepts.
const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("BCRYPT_COST must be between 4 and 31, got {0}")]
    BcryptCost(u32),

    #[error("TOKEN_TTL_SECS must be positive, got {0}")]
    TokenTtl(i64),
}

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `JWT_SECRET` (required): HMAC secret used to sign bearer tokens
/// - `DATABASE_URL` (optional): PostgreSQL connection string; the in-memory store is used when unset
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 5000
/// - `TOKEN_TTL_SECS` (optional): bearer token lifetime, defaults to one hour
/// - `BCRYPT_COST` (optional): bcrypt work factor, defaults to 10
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `ADMIN_NAME`, `ADMIN_EMAIL`, `ADMIN_PASSWORD` (optional): bootstrap admin account
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jwt_secret: String,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub admin_password: Option<String>,
}

fn default_port() -> u16 {
    5000
}

fn default_token_ttl() -> i64 {
    3600
}

fn default_bcrypt_cost() -> u32 {
    10
}

fn default_max_connections() -> u32 {
    5
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `JWT_SECRET` is missing, a value cannot be parsed,
    /// or [`Config::validate`] rejects a value.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        // Field names map to upper case: jwt_secret -> JWT_SECRET
        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, per request.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !BCRYPT_COSTS.contains(&self.bcrypt_cost) {
            return Err(ConfigError::BcryptCost(self.bcrypt_cost));
        }
        if self.token_ttl_secs <= 0 {
            return Err(ConfigError::TokenTtl(self.token_ttl_secs));
        }
        Ok(())
    }

    /// Credentials for the bootstrap admin, if both halves are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }
}
