//! `/api/ledger/{kind}` where kind is `credit` (receivables) or `debit`
//! (payables).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use loom_core::ledger::NewPayment;
use loom_core::reports::{self, LedgerSummary};
use loom_core::{LedgerEntry, LedgerKind};

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::ledger;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ledger/{kind}", get(list_entries).post(create_entry))
        .route("/api/ledger/{kind}/summary", get(summary))
        .route("/api/ledger/{kind}/{id}", get(get_entry).delete(delete_entry))
        .route("/api/ledger/{kind}/{id}/payments", post(record_payment))
}

fn parse_kind(kind: &str) -> ApiResult<LedgerKind> {
    Ok(kind.parse::<LedgerKind>()?)
}

async fn list_entries(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<Vec<LedgerEntry>>> {
    let kind = parse_kind(&kind)?;
    let entries = ledger::list_entries(state.store()?, kind, reports::today(Utc::now())).await?;
    Ok(Json(entries))
}

async fn create_entry(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Body(entry): Body<LedgerEntry>,
) -> ApiResult<impl IntoResponse> {
    let kind = parse_kind(&kind)?;
    Ok(created(ledger::create_entry(state.store()?, kind, entry).await?))
}

async fn get_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<Json<LedgerEntry>> {
    let kind = parse_kind(&kind)?;
    let mut entry = state.store()?.ledger(kind).require(&id).await?;
    entry.status = entry.effective_status(reports::today(Utc::now()));
    Ok(Json(entry))
}

async fn delete_entry(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let kind = parse_kind(&kind)?;
    state.store()?.ledger(kind).delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn record_payment(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Body(payment): Body<NewPayment>,
) -> ApiResult<Json<LedgerEntry>> {
    let kind = parse_kind(&kind)?;
    let entry = ledger::record_payment(state.store()?, kind, &id, &payment, Utc::now()).await?;
    Ok(Json(entry))
}

async fn summary(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> ApiResult<Json<LedgerSummary>> {
    let kind = parse_kind(&kind)?;
    let summary = ledger::summary(state.store()?, kind, reports::today(Utc::now())).await?;
    Ok(Json(summary))
}
