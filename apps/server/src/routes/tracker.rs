//! Bargaining tracker and disposals.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use loom_core::reports::{self, BargainStats, DisposalStats};
use loom_core::{BargainRecord, DisposalRecord};

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::{bargain, inventory};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bargains", get(list_bargains).post(create_bargain))
        .route("/api/bargains/stats", get(bargain_stats))
        .route("/api/bargains/{id}/approve", post(approve_bargain))
        .route("/api/bargains/{id}/reject", post(reject_bargain))
        .route("/api/disposals", get(list_disposals).post(create_disposal))
        .route("/api/disposals/stats", get(disposal_stats))
}

// =============================================================================
// Bargains
// =============================================================================

async fn list_bargains(State(state): State<AppState>) -> ApiResult<Json<Vec<BargainRecord>>> {
    let mut records = state.store()?.bargains().get_all().await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(records))
}

async fn create_bargain(
    State(state): State<AppState>,
    Body(record): Body<BargainRecord>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(bargain::create(state.store()?, record).await?))
}

async fn approve_bargain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BargainRecord>> {
    Ok(Json(bargain::decide(state.store()?, &id, true).await?))
}

async fn reject_bargain(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<BargainRecord>> {
    Ok(Json(bargain::decide(state.store()?, &id, false).await?))
}

async fn bargain_stats(State(state): State<AppState>) -> ApiResult<Json<BargainStats>> {
    let records = state.store()?.bargains().get_all().await?;
    Ok(Json(reports::bargain_stats(&records)))
}

// =============================================================================
// Disposals
// =============================================================================

async fn list_disposals(State(state): State<AppState>) -> ApiResult<Json<Vec<DisposalRecord>>> {
    let mut records = state.store()?.disposals().get_all().await?;
    records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(records))
}

async fn create_disposal(
    State(state): State<AppState>,
    Body(record): Body<DisposalRecord>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(inventory::create_disposal(state.store()?, record).await?))
}

async fn disposal_stats(State(state): State<AppState>) -> ApiResult<Json<DisposalStats>> {
    let records = state.store()?.disposals().get_all().await?;
    Ok(Json(reports::disposal_stats(&records)))
}
