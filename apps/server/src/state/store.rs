//! # Store State
//!
//! The document store handle, or the reason there is none.
//!
//! The server still boots when the store cannot be opened (bad path, disk
//! full). `/health` reports the degraded state and every data endpoint
//! answers `503 STORE_UNAVAILABLE` instead of the process exiting.

use std::time::Duration;

use tracing::{error, info};

use loom_store::{SqliteConfig, Store};

use super::config::{StoreBackend, StoreSettings};
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone)]
pub enum StoreState {
    Ready(Store),
    Unavailable { reason: String },
}

impl StoreState {
    /// Opens the configured backend. Failure is logged and kept as
    /// [`StoreState::Unavailable`].
    pub async fn connect(settings: &StoreSettings) -> Self {
        match settings.backend {
            StoreBackend::Memory => {
                info!("Using in-memory document store; data is lost on restart");
                StoreState::Ready(Store::memory())
            }
            StoreBackend::Sqlite => {
                if let Some(parent) = settings.sqlite_path.parent() {
                    if !parent.as_os_str().is_empty() {
                        if let Err(e) = std::fs::create_dir_all(parent) {
                            error!(path = %parent.display(), error = %e, "Cannot create data directory");
                        }
                    }
                }

                let config = SqliteConfig::new(&settings.sqlite_path)
                    .max_connections(settings.max_connections)
                    .connect_timeout(Duration::from_secs(10));

                match Store::sqlite(config).await {
                    Ok(store) => StoreState::Ready(store),
                    Err(e) => {
                        error!(error = %e, "Document store unavailable, starting in degraded mode");
                        StoreState::Unavailable {
                            reason: e.to_string(),
                        }
                    }
                }
            }
        }
    }

    /// The store, or `503 STORE_UNAVAILABLE`.
    pub fn get(&self) -> ApiResult<&Store> {
        match self {
            StoreState::Ready(store) => Ok(store),
            StoreState::Unavailable { .. } => Err(ApiError::store_unavailable()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, StoreState::Ready(_))
    }

    /// Called once the server has drained its connections.
    pub async fn close(&self) {
        if let StoreState::Ready(store) = self {
            store.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_memory_backend_is_ready() {
        let settings = StoreSettings {
            backend: StoreBackend::Memory,
            ..StoreSettings::default()
        };
        let state = StoreState::connect(&settings).await;
        assert!(state.is_ready());
        assert_eq!(state.get().unwrap().backend_kind(), "memory");
    }

    #[test]
    fn test_unavailable_answers_503() {
        let state = StoreState::Unavailable {
            reason: "disk full".to_string(),
        };
        let err = state.get().unwrap_err();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
    }
}
