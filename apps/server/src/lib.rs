//! # Loom Server
//!
//! JSON API for the Loom back office and POS screens.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Request Path                                  │
//! │                                                                         │
//! │  HTTP ──► axum Router ──► require_auth ──► handler ──► service          │
//! │                                                           │             │
//! │                                          loom-core rules ◄┤             │
//! │                                                           ▼             │
//! │                                                 loom-store Collection   │
//! │                                                           │             │
//! │  SSE  ◄── /api/live/{collection} ◄── change events ◄──────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (all optional except the account credentials):
//! - `LOOM_CONFIG` - path to a TOML config file
//! - `LOOM_BIND` - listen address (default: 127.0.0.1:8080)
//! - `LOOM_STORE_BACKEND` - `sqlite` (default) or `memory`
//! - `LOOM_SQLITE_PATH` - database file
//! - `LOOM_AUTH_EMAIL` / `LOOM_AUTH_PASSWORD` - the one authorized account
//! - `LOOM_JWT_SECRET` - session signing key
//! - `LOOM_TAX_RATE_BPS` - sales tax in basis points (default: 0)
//! - `RUST_LOG` - log filter

pub mod auth;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::{AppState, ServerConfig, StoreState};

use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,loom_server=debug,loom_store=debug,sqlx=warn";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default
/// filter.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
