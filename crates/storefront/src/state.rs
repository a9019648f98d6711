//! Application state shared across handlers.

use std::sync::Arc;

use chrono::Duration;

use crate::config::StorefrontConfig;
use crate::db::Databases;
use crate::services::auth::TokenSigner;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    databases: Databases,
    tokens: TokenSigner,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The token signer is keyed from the configured secret and lifetime.
    #[must_use]
    pub fn new(config: StorefrontConfig, databases: Databases) -> Self {
        let tokens = TokenSigner::new(
            config.jwt_secret.clone(),
            Duration::hours(config.token_ttl_hours),
        );

        Self {
            inner: Arc::new(AppStateInner {
                config,
                databases,
                tokens,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the store connection pools.
    #[must_use]
    pub fn db(&self) -> &Databases {
        &self.inner.databases
    }

    /// Get a reference to the session token signer.
    #[must_use]
    pub fn tokens(&self) -> &TokenSigner {
        &self.inner.tokens
    }
}
