//! Sales ledger, status changes and invoice delivery.

use axum::extract::{Path, Query, State};
use axum::response::Html;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use loom_core::invoice;
use loom_core::reports::{self, SalesFilter, SalesTotals};
use loom_core::SaleRecord;
use loom_store::SaleStatusPatch;

use super::Body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sales", get(list_sales))
        .route("/api/sales/{id}", get(get_sale))
        .route("/api/sales/{id}/status", patch(update_status))
        .route("/api/sales/{id}/invoice", get(invoice_html))
        .route("/api/sales/{id}/whatsapp", get(whatsapp))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SalesPage {
    sales: Vec<SaleRecord>,
    totals: SalesTotals,
}

async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<SalesFilter>,
) -> ApiResult<Json<SalesPage>> {
    let all = state.store()?.sales().get_all().await?;
    let sales = reports::filter_sales(&all, &filter);
    let totals = reports::sales_totals(&sales);
    Ok(Json(SalesPage { sales, totals }))
}

async fn get_sale(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleRecord>> {
    Ok(Json(state.store()?.sales().require(&id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Body(change): Body<SaleStatusPatch>,
) -> ApiResult<Json<SaleRecord>> {
    if change.is_empty() {
        return Err(ApiError::validation(
            "Provide paymentStatus, deliveryStatus or both",
        ));
    }
    let sale = state.store()?.sales().update_status(&id, &change).await?;
    info!(
        id = %id,
        payment_status = ?sale.payment_status,
        delivery_status = ?sale.delivery_status,
        "Sale status updated"
    );
    Ok(Json(sale))
}

async fn invoice_html(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Html<String>> {
    let sale = state.store()?.sales().require(&id).await?;
    Ok(Html(invoice::render_html(
        &sale,
        &state.config.store_profile(),
    )))
}

#[derive(Debug, Deserialize)]
struct WhatsAppQuery {
    phone: Option<String>,
}

#[derive(Debug, Serialize)]
struct WhatsAppLink {
    link: String,
    message: String,
}

/// Defaults to the phone number captured at checkout.
async fn whatsapp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<WhatsAppQuery>,
) -> ApiResult<Json<WhatsAppLink>> {
    let sale = state.store()?.sales().require(&id).await?;
    let phone = query
        .phone
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| sale.customer_phone.clone());

    let message = invoice::invoice_message(&sale, &state.config.store_profile());
    let link = invoice::whatsapp_link(&phone, &message)?;
    Ok(Json(WhatsAppLink { link, message }))
}
