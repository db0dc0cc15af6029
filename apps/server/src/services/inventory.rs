//! # Inventory
//!
//! Stock levels tracked per inventory item, manual stock movements and
//! write-offs (disposals).
//!
//! ```text
//! adjust(item, In 20)        ──► item.currentStock += 20 ─► movement(In)
//! create_disposal(p, 3)      ──► disposal record
//!                                 └─► product.stock −= 3 ─► movement(Disposal)
//! ```
//!
//! Inventory items carry their own counters; they are not kept in step with
//! `product.stock`, which checkout and disposals decrement.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use loom_core::validation;
use loom_core::{CoreError, DisposalRecord, InventoryItem, MovementType, StockMovement};
use loom_store::Store;

use crate::error::{ApiError, ApiResult, ErrorCode};

/// A manual change to an inventory item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub movement_type: MovementType,
    pub quantity: i64,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub performed_by: String,
}

pub async fn create_item(store: &Store, mut item: InventoryItem) -> ApiResult<InventoryItem> {
    item.validate()?;

    if let Some(product) = store.products().get_by_id(&item.product_id).await? {
        if item.product_name.is_empty() {
            item.product_name = product.name;
        }
        if item.product_code.is_empty() {
            item.product_code = product.code;
        }
    }
    item.recompute();

    let (id, created) = store.inventory().insert(&item).await?;
    info!(id = %id, product_id = %created.product_id, stock = created.current_stock, "Inventory item created");
    Ok(created)
}

/// Applies a manual movement to an item and logs it.
///
/// `Sale` and `Disposal` movements come from checkout and write-offs only.
pub async fn adjust(
    store: &Store,
    id: &str,
    adjustment: &StockAdjustment,
    now: DateTime<Utc>,
) -> ApiResult<InventoryItem> {
    if matches!(
        adjustment.movement_type,
        MovementType::Sale | MovementType::Disposal
    ) {
        return Err(ApiError::validation(
            "Sale and disposal movements cannot be entered by hand",
        ));
    }
    validation::validate_count("quantity", adjustment.quantity)?;

    let items = store.inventory();
    let mut item = items.require(id).await?;

    let previous = item.current_stock;
    let next = adjustment.movement_type.apply(previous, adjustment.quantity);
    if next < 0 {
        return Err(ApiError::new(
            ErrorCode::InsufficientStock,
            format!(
                "Cannot remove {} of {}: only {} in stock",
                adjustment.quantity, item.product_name, previous
            ),
        ));
    }

    item.current_stock = next;
    if adjustment.movement_type == MovementType::In {
        item.last_restocked = Some(now);
    }
    item.recompute();
    let updated = items.update_level(&item).await?;

    let movement = StockMovement {
        id: String::new(),
        product_id: item.product_id.clone(),
        product_name: item.product_name.clone(),
        movement_type: adjustment.movement_type,
        quantity: adjustment.quantity,
        previous_stock: previous,
        new_stock: next,
        reason: adjustment.reason.clone(),
        reference: adjustment.reference.clone(),
        performed_by: adjustment.performed_by.clone(),
        created_at: None,
    };
    store.stock_movements().create(&movement).await?;

    info!(
        id = %id,
        movement = ?adjustment.movement_type,
        previous,
        new = next,
        status = ?updated.status,
        "Inventory adjusted"
    );
    Ok(updated)
}

/// Movements newest first, optionally for one product.
pub async fn movements(store: &Store, product_id: Option<&str>) -> ApiResult<Vec<StockMovement>> {
    let mut movements: Vec<StockMovement> = store
        .stock_movements()
        .get_all()
        .await?
        .into_iter()
        .filter(|m| product_id.map_or(true, |p| m.product_id == p))
        .collect();
    movements.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(movements)
}

/// Writes a disposal record and takes the units out of product stock.
///
/// A disposal for a product that no longer exists is still recorded, with
/// no stock change.
pub async fn create_disposal(store: &Store, mut record: DisposalRecord) -> ApiResult<DisposalRecord> {
    record.validate()?;

    let product = store.products().get_by_id(&record.product_id).await?;
    if let Some(product) = &product {
        if record.quantity > product.stock {
            return Err(CoreError::DisposalExceedsStock {
                product: product.name.clone(),
                requested: record.quantity,
                available: product.stock,
            }
            .into());
        }
        if record.product_name.is_empty() {
            record.product_name = product.name.clone();
        }
    } else {
        warn!(product_id = %record.product_id, "Disposal for unknown product; stock unchanged");
    }
    record.compute_loss();

    let (id, created) = store.disposals().insert(&record).await?;

    if let Some(product) = product {
        let new_stock = MovementType::Disposal.apply(product.stock, created.quantity);
        store.products().update_stock(&product.id, new_stock).await?;

        let movement = StockMovement {
            id: String::new(),
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            movement_type: MovementType::Disposal,
            quantity: created.quantity,
            previous_stock: product.stock,
            new_stock,
            reason: created.reason.clone(),
            reference: id.clone(),
            performed_by: created.disposed_by.clone(),
            created_at: None,
        };
        store.stock_movements().create(&movement).await?;
    }

    info!(
        id = %id,
        product_id = %created.product_id,
        quantity = created.quantity,
        loss = created.loss_amount.units(),
        "Disposal recorded"
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::product;
    use loom_core::{DisposalCondition, DisposalMethod, Money, StockStatus};

    fn item(product_id: &str, current: i64) -> InventoryItem {
        InventoryItem {
            id: String::new(),
            product_id: product_id.to_string(),
            product_name: String::new(),
            product_code: String::new(),
            current_stock: current,
            min_stock: 5,
            max_stock: 100,
            reserved_stock: 2,
            available_stock: 0,
            status: StockStatus::InStock,
            location: "Shelf A".to_string(),
            last_restocked: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn adjustment(movement_type: MovementType, quantity: i64) -> StockAdjustment {
        StockAdjustment {
            movement_type,
            quantity,
            reason: "Count".to_string(),
            reference: String::new(),
            performed_by: "Owner".to_string(),
        }
    }

    fn disposal(product_id: &str, quantity: i64, value: i64) -> DisposalRecord {
        DisposalRecord {
            id: String::new(),
            product_id: product_id.to_string(),
            product_name: String::new(),
            quantity,
            original_price: Money::from_units(1000),
            disposal_value: Money::from_units(value),
            loss_amount: Money::zero(),
            condition: DisposalCondition::Stained,
            method: DisposalMethod::SoldAsScrap,
            reason: "Water damage".to_string(),
            disposed_by: "Owner".to_string(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_item_fills_product_details() {
        let store = Store::memory();
        let pid = store
            .products()
            .create(&product("Lawn Suit", "LWN-01", 1000, 10))
            .await
            .unwrap();

        let created = create_item(&store, item(&pid, 4)).await.unwrap();
        assert_eq!(created.product_name, "Lawn Suit");
        assert_eq!(created.product_code, "LWN-01");
        assert_eq!(created.available_stock, 2);
        assert_eq!(created.status, StockStatus::LowStock);
    }

    #[tokio::test]
    async fn test_adjust_logs_movements() {
        let store = Store::memory();
        let created = create_item(&store, item("p1", 10)).await.unwrap();

        let restocked = adjust(&store, &created.id, &adjustment(MovementType::In, 20), Utc::now())
            .await
            .unwrap();
        assert_eq!(restocked.current_stock, 30);
        assert!(restocked.last_restocked.is_some());

        let counted = adjust(
            &store,
            &created.id,
            &adjustment(MovementType::Adjustment, 7),
            Utc::now(),
        )
        .await
        .unwrap();
        assert_eq!(counted.current_stock, 7);
        assert_eq!(counted.available_stock, 5);

        let logged = movements(&store, Some("p1")).await.unwrap();
        assert_eq!(logged.len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_rejects_negative_result_and_sale_type() {
        let store = Store::memory();
        let created = create_item(&store, item("p1", 3)).await.unwrap();

        let err = adjust(&store, &created.id, &adjustment(MovementType::Out, 4), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);

        let err = adjust(&store, &created.id, &adjustment(MovementType::Sale, 1), Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert!(store.stock_movements().get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disposal_decrements_product_stock() {
        let store = Store::memory();
        let pid = store
            .products()
            .create(&product("Chiffon Dupatta", "CHF-01", 1000, 10))
            .await
            .unwrap();

        let created = create_disposal(&store, disposal(&pid, 3, 500)).await.unwrap();
        assert_eq!(created.product_name, "Chiffon Dupatta");
        assert_eq!(created.loss_amount.units(), 2500);
        assert_eq!(store.products().require(&pid).await.unwrap().stock, 7);

        let logged = movements(&store, Some(&pid)).await.unwrap();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].movement_type, MovementType::Disposal);
        assert_eq!(logged[0].reference, created.id);
    }

    #[tokio::test]
    async fn test_disposal_beyond_stock_is_rejected() {
        let store = Store::memory();
        let pid = store
            .products()
            .create(&product("Chiffon Dupatta", "CHF-01", 1000, 2))
            .await
            .unwrap();

        let err = create_disposal(&store, disposal(&pid, 3, 0)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(store.disposals().get_all().await.unwrap().is_empty());
    }
}
