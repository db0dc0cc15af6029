use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::{AppState, StoreState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Health {
    /// `ok` or `degraded`.
    status: &'static str,
    store: StoreHealth,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoreHealth {
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

/// Always 200 so a degraded server can still be reached and inspected.
pub(crate) async fn health(State(state): State<AppState>) -> Json<Health> {
    let store = match &state.store {
        StoreState::Ready(store) => StoreHealth {
            available: store.health_check().await,
            backend: Some(store.backend_kind()),
            reason: None,
        },
        StoreState::Unavailable { reason } => StoreHealth {
            available: false,
            backend: None,
            reason: Some(reason.clone()),
        },
    };

    Json(Health {
        status: if store.available { "ok" } else { "degraded" },
        store,
        version: env!("CARGO_PKG_VERSION"),
    })
}
