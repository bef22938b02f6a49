//! Shared application state handed to every handler and middleware.

use std::sync::Arc;

use crate::{
    auth::{jwt::TokenService, password::PasswordHasher},
    config::Config,
    store::DynStore,
};

#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub tokens: Arc<TokenService>,
    pub passwords: PasswordHasher,
}

impl AppState {
    pub fn new(store: DynStore, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
            passwords,
        }
    }

    pub fn from_config(config: &Config, store: DynStore) -> Self {
        Self::new(
            store,
            TokenService::new(&config.jwt_secret, config.token_ttl_secs),
            PasswordHasher::new(config.bcrypt_cost),
        )
    }
}
