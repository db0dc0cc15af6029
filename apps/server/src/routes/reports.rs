use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use loom_core::reports::{self, DashboardInput, DashboardSummary, ReportBundle};
use loom_core::LedgerKind;

use crate::error::ApiResult;
use crate::state::AppState;

const DEFAULT_DAYS: u32 = 7;
const MAX_DAYS: u32 = 366;
const DEFAULT_TOP: usize = 5;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .route("/api/reports", get(report))
}

/// Reads every collection it summarises; there is no cached aggregate.
async fn dashboard(State(state): State<AppState>) -> ApiResult<Json<DashboardSummary>> {
    let store = state.store()?;
    let products = store.products().get_all().await?;
    let sales = store.sales().get_all().await?;
    let employees = store.employees().get_all().await?;
    let credits = store.ledger(LedgerKind::Credit).get_all().await?;
    let debits = store.ledger(LedgerKind::Debit).get_all().await?;

    let input = DashboardInput {
        products: &products,
        sales: &sales,
        employees: &employees,
        credits: &credits,
        debits: &debits,
    };
    Ok(Json(reports::dashboard_summary(
        &input,
        reports::today(Utc::now()),
    )))
}

#[derive(Debug, Default, Deserialize)]
struct ReportQuery {
    days: Option<u32>,
    top: Option<usize>,
}

async fn report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> ApiResult<Json<ReportBundle>> {
    let store = state.store()?;
    let sales = store.sales().get_all().await?;
    let products = store.products().get_all().await?;

    let days = query.days.unwrap_or(DEFAULT_DAYS).clamp(1, MAX_DAYS);
    let top = query.top.unwrap_or(DEFAULT_TOP).max(1);

    Ok(Json(reports::report_bundle(
        &sales,
        &products,
        reports::today(Utc::now()),
        days,
        top,
    )))
}
