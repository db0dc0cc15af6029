//! # State Module
//!
//! Shared state handed to every handler.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      axum Router                                │   │
//! │  │  Router::new()...with_state(app_state)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │          ┌──────────────────┼──────────────────┐                       │
//! │          ▼                  ▼                  ▼                        │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐              │
//! │  │  StoreState  │  │ AuthService  │  │  ServerConfig    │              │
//! │  │              │  │              │  │                  │              │
//! │  │  Ready(Store)│  │  JWT + IdP   │  │  shop profile    │              │
//! │  │  Unavailable │  │  lockout     │  │  tax rate        │              │
//! │  └──────────────┘  └──────────────┘  └──────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • StoreState: Store is a cloneable Arc around the backend             │
//! │  • AuthService: lockout counters behind a Mutex                        │
//! │  • ServerConfig: read-only after startup                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod store;

pub use config::{AuthSettings, ConfigError, ServerConfig, ShopSettings, StoreBackend, StoreSettings};
pub use store::StoreState;

use std::sync::Arc;

use crate::auth::{AuthError, AuthService};
use crate::error::ApiResult;
use loom_store::Store;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: StoreState,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Hashes the configured password and prepares the session manager.
    pub fn new(config: ServerConfig, store: StoreState) -> Result<Self, AuthError> {
        let auth = AuthService::from_settings(&config.auth)?;
        Ok(AppState {
            config: Arc::new(config),
            store,
            auth: Arc::new(auth),
        })
    }

    /// Shorthand for `self.store.get()`.
    pub fn store(&self) -> ApiResult<&Store> {
        self.store.get()
    }
}
