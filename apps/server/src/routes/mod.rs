//! # HTTP Routes
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Route Table                                  │
//! │                                                                         │
//! │  public          GET  /health                                           │
//! │                  POST /api/auth/login                                   │
//! │  ─────────────────────────────── require_auth ──────────────────────── │
//! │  session         POST /api/auth/logout      GET /api/auth/me            │
//! │  catalogue       /api/products[/{id}|/import]  /api/employees[/{id}]    │
//! │  inventory       /api/inventory[/{id}/adjust|/movements]                │
//! │  pos             POST /api/pos/checkout                                 │
//! │  staff           /api/attendance  /api/salaries[/{id}/pay]              │
//! │  ledger          /api/ledger/{kind}[/{id}[/payments]|/summary]          │
//! │  tracker         /api/bargains[/stats|/{id}/approve|/{id}/reject]       │
//! │                  /api/disposals[/stats]                                 │
//! │  sales           /api/sales[/{id}[/status|/invoice|/whatsapp]]          │
//! │  reports         /api/dashboard  /api/reports                           │
//! │  live            GET /api/live/{collection}   (SSE)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers extract, call one service or store method and wrap the result.
//! Every error leaves as an [`ApiError`] JSON body.

mod auth;
mod catalogue;
mod health;
mod inventory;
mod ledger;
mod live;
mod pos;
mod reports;
mod sales;
mod staff;
mod tracker;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::Serialize;

use crate::auth::require_auth;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(auth::routes())
        .merge(catalogue::routes())
        .merge(inventory::routes())
        .merge(pos::routes())
        .merge(staff::routes())
        .merge(ledger::routes())
        .merge(tracker::routes())
        .merge(sales::routes())
        .merge(reports::routes())
        .merge(live::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state)
}

/// `201 Created` with the stored document.
pub(crate) fn created<T: Serialize>(value: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(value))
}

/// `Json<T>` whose rejection is an [`ApiError`] rather than axum's plain
/// text body.
pub(crate) struct Body<T>(pub T);

impl<S, T> FromRequest<S> for Body<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;
        Ok(Body(value))
    }
}
