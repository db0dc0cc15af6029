use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use loom_core::{InventoryItem, StockMovement};

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::inventory::{self, StockAdjustment};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/inventory", get(list_items).post(create_item))
        .route("/api/inventory/movements", get(list_movements))
        .route("/api/inventory/{id}", get(get_item))
        .route("/api/inventory/{id}/adjust", post(adjust_item))
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<InventoryItem>>> {
    let mut items = state.store()?.inventory().get_all().await?;
    items.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    Ok(Json(items))
}

async fn create_item(
    State(state): State<AppState>,
    Body(item): Body<InventoryItem>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(inventory::create_item(state.store()?, item).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryItem>> {
    Ok(Json(state.store()?.inventory().require(&id).await?))
}

async fn adjust_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Body(adjustment): Body<StockAdjustment>,
) -> ApiResult<Json<InventoryItem>> {
    let item = inventory::adjust(state.store()?, &id, &adjustment, Utc::now()).await?;
    Ok(Json(item))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovementQuery {
    product_id: Option<String>,
}

async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> ApiResult<Json<Vec<StockMovement>>> {
    let movements = inventory::movements(state.store()?, query.product_id.as_deref()).await?;
    Ok(Json(movements))
}
