//! Products and employees.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Map, Value};

use loom_core::{Employee, Product};

use super::{created, Body};
use crate::error::ApiResult;
use crate::services::catalogue::{self, ImportOutcome};
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route("/api/products/import", post(import_products))
        .route(
            "/api/products/{id}",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/{id}",
            get(get_employee).patch(update_employee).delete(delete_employee),
        )
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let mut products = state.store()?.products().get_all().await?;
    products.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(Json(products))
}

async fn create_product(
    State(state): State<AppState>,
    Body(product): Body<Product>,
) -> ApiResult<impl IntoResponse> {
    let product = catalogue::create_product(state.store()?, product).await?;
    Ok(created(product))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    Ok(Json(state.store()?.products().require(&id).await?))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Body(patch): Body<Map<String, Value>>,
) -> ApiResult<Json<Product>> {
    Ok(Json(
        catalogue::update_product(state.store()?, &id, &patch).await?,
    ))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store()?.products().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Raw CSV in the request body.
async fn import_products(
    State(state): State<AppState>,
    csv: String,
) -> ApiResult<Json<ImportOutcome>> {
    Ok(Json(catalogue::import_products(state.store()?, &csv).await?))
}

// =============================================================================
// Employees
// =============================================================================

async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Employee>>> {
    let mut employees = state.store()?.employees().get_all().await?;
    employees.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(employees))
}

async fn create_employee(
    State(state): State<AppState>,
    Body(employee): Body<Employee>,
) -> ApiResult<impl IntoResponse> {
    let employee = catalogue::create_employee(state.store()?, employee).await?;
    Ok(created(employee))
}

async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(state.store()?.employees().require(&id).await?))
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Body(patch): Body<Map<String, Value>>,
) -> ApiResult<Json<Employee>> {
    Ok(Json(
        catalogue::update_employee(state.store()?, &id, &patch).await?,
    ))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.store()?.employees().delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
