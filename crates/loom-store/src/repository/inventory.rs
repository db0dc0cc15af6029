//! Inventory levels and the stock movement log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use loom_core::{InventoryItem, StockStatus};

use crate::collection::Collection;
use crate::error::StoreResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelPatch {
    current_stock: i64,
    available_stock: i64,
    status: StockStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_restocked: Option<DateTime<Utc>>,
}

impl Collection<InventoryItem> {
    /// Writes the counters of an item after [`InventoryItem::recompute`].
    pub async fn update_level(&self, item: &InventoryItem) -> StoreResult<InventoryItem> {
        self.update(
            &item.id,
            &LevelPatch {
                current_stock: item.current_stock,
                available_stock: item.available_stock,
                status: item.status,
                last_restocked: item.last_restocked,
            },
        )
        .await
    }

    pub async fn find_by_product(&self, product_id: &str) -> StoreResult<Option<InventoryItem>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|i| i.product_id == product_id))
    }
}
