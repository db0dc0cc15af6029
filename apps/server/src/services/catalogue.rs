//! # Catalogue
//!
//! Products and employees: validated create / update, and CSV import.
//!
//! Updates are shallow merges. The merged document is validated before it
//! is written, so a patch cannot leave a product with `currentPrice`
//! outside its price ladder.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use loom_core::import::{self, RowError};
use loom_core::{Employee, Product};
use loom_store::Store;

use super::preview_patch;
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Products
// =============================================================================

/// Product codes are unique, compared case-insensitively.
async fn ensure_code_free(store: &Store, code: &str, except: Option<&str>) -> ApiResult<()> {
    if let Some(existing) = store.products().find_by_code(code).await? {
        if Some(existing.id.as_str()) != except {
            return Err(ApiError::validation(format!(
                "Product code {} is already used by {}",
                existing.code, existing.name
            )));
        }
    }
    Ok(())
}

pub async fn create_product(store: &Store, product: Product) -> ApiResult<Product> {
    product.validate()?;
    ensure_code_free(store, &product.code, None).await?;

    let (id, created) = store.products().insert(&product).await?;
    info!(id = %id, code = %created.code, stock = created.stock, "Product created");
    Ok(created)
}

pub async fn update_product(
    store: &Store,
    id: &str,
    patch: &Map<String, Value>,
) -> ApiResult<Product> {
    let products = store.products();
    let current = products.require(id).await?;

    let preview = preview_patch(&current, patch)?;
    preview.validate()?;
    if !preview.code.eq_ignore_ascii_case(&current.code) {
        ensure_code_free(store, &preview.code, Some(id)).await?;
    }

    Ok(products.update(id, patch).await?)
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub created: Vec<String>,
    pub errors: Vec<RowError>,
}

/// Creates one product per valid row. Rows that fail to parse are reported
/// with their line number; the rest are still imported. Codes are not
/// checked against the catalogue.
pub async fn import_products(store: &Store, csv: &str) -> ApiResult<ImportOutcome> {
    let report = import::parse_products(csv);
    if report.products.is_empty() && report.errors.is_empty() {
        return Err(ApiError::validation("CSV file has no product rows"));
    }

    let mut created = Vec::with_capacity(report.products.len());
    for product in &report.products {
        created.push(store.products().create(product).await?);
    }

    if !report.errors.is_empty() {
        warn!(rejected = report.errors.len(), "Some CSV rows were not imported");
    }
    info!(created = created.len(), "Products imported");

    Ok(ImportOutcome {
        created,
        errors: report.errors,
    })
}

// =============================================================================
// Employees
// =============================================================================

pub async fn create_employee(store: &Store, employee: Employee) -> ApiResult<Employee> {
    employee.validate()?;
    let (id, created) = store.employees().insert(&employee).await?;
    info!(id = %id, name = %created.name, "Employee created");
    Ok(created)
}

pub async fn update_employee(
    store: &Store,
    id: &str,
    patch: &Map<String, Value>,
) -> ApiResult<Employee> {
    let employees = store.employees();
    let current = employees.require(id).await?;
    preview_patch(&current, patch)?.validate()?;
    Ok(employees.update(id, patch).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::{employee, product};
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_code_is_rejected() {
        let store = Store::memory();
        create_product(&store, product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();

        let err = create_product(&store, product("Other Suit", "lwn-01", 900, 5))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(store.products().get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_validates_merged_document() {
        let store = Store::memory();
        let created = create_product(&store, product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();

        // Ladder is 500..=2000
        let err = update_product(&store, &created.id, &patch(json!({"currentPrice": 2500})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let updated = update_product(&store, &created.id, &patch(json!({"currentPrice": 1500})))
            .await
            .unwrap();
        assert_eq!(updated.current_price.units(), 1500);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_product_is_not_found() {
        let store = Store::memory();
        let err = update_product(&store, "missing", &patch(json!({"stock": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_import_reports_bad_rows() {
        let store = Store::memory();
        let csv = "name,code,fabricType,size,color,purchaseCost,minSalePrice,maxSalePrice,currentPrice,stock,minStock\n\
                   Lawn Suit,LWN-01,Lawn,M,Blue,900,1200,2000,1500,10,2\n\
                   Broken,BRK-01,Lawn,M,Red,abc,1200,2000,1500,10,2\n";

        let outcome = import_products(&store, csv).await.unwrap();
        assert_eq!(outcome.created.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line, 3);
        assert_eq!(store.products().get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_employee_update_rejects_bad_email() {
        let store = Store::memory();
        let created = create_employee(&store, employee("Ayesha", 50.0, 50000, 0))
            .await
            .unwrap();
        let err = update_employee(&store, &created.id, &patch(json!({"email": "not-an-email"})))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
