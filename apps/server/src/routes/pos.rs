use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use chrono::Utc;

use loom_core::checkout::CheckoutRequest;

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::checkout;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/pos/checkout", post(complete_sale))
}

async fn complete_sale(
    State(state): State<AppState>,
    Body(request): Body<CheckoutRequest>,
) -> ApiResult<impl IntoResponse> {
    let receipt = checkout::checkout(
        state.store()?,
        request,
        state.config.tax_rate(),
        &state.config.store_profile(),
        Utc::now(),
    )
    .await?;
    Ok(created(receipt))
}
