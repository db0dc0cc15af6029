//! Attendance, payroll and the monthly reset.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;

use loom_core::{AttendanceRecord, Employee, SalaryRecord};

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::staff::{self, SalaryRequest};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/employees/{id}/reset-monthly", post(reset_monthly))
        .route("/api/attendance", get(list_attendance).post(record_attendance))
        .route("/api/salaries", get(list_salaries).post(generate_salary))
        .route("/api/salaries/{id}/pay", post(pay_salary))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StaffQuery {
    employee_id: Option<String>,
    period: Option<String>,
}

async fn list_attendance(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    let attendance = state.store()?.attendance();
    let mut records = match query.employee_id.as_deref() {
        Some(employee_id) => attendance.for_employee(employee_id).await?,
        None => attendance.get_all().await?,
    };
    records.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(Json(records))
}

async fn record_attendance(
    State(state): State<AppState>,
    Body(record): Body<AttendanceRecord>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(staff::record_attendance(state.store()?, record).await?))
}

async fn list_salaries(
    State(state): State<AppState>,
    Query(query): Query<StaffQuery>,
) -> ApiResult<Json<Vec<SalaryRecord>>> {
    let mut slips: Vec<SalaryRecord> = state
        .store()?
        .salaries()
        .get_all()
        .await?
        .into_iter()
        .filter(|s| query.employee_id.as_deref().map_or(true, |e| s.employee_id == e))
        .filter(|s| query.period.as_deref().map_or(true, |p| s.period == p))
        .collect();
    slips.sort_by(|a, b| b.period.cmp(&a.period).then(a.employee_name.cmp(&b.employee_name)));
    Ok(Json(slips))
}

async fn generate_salary(
    State(state): State<AppState>,
    Body(request): Body<SalaryRequest>,
) -> ApiResult<impl IntoResponse> {
    Ok(created(staff::generate_salary(state.store()?, &request).await?))
}

async fn pay_salary(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SalaryRecord>> {
    Ok(Json(staff::pay_salary(state.store()?, &id, Utc::now()).await?))
}

async fn reset_monthly(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(staff::reset_monthly(state.store()?, &id).await?))
}
