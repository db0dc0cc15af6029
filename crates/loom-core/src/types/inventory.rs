//! Inventory counters and the stock movement log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{self, ValidationResult};

/// Stock counters for one product at one location.
///
/// ## Derived Fields
/// ```text
/// available = max(0, current − reserved)
///
/// status:  current ≤ 0            → out_of_stock
///          current ≤ min          → low_stock
///          max > 0, current ≥ max → overstock
///          otherwise              → in_stock
/// ```
/// Both are computed by [`InventoryItem::recompute`] at write time. A later
/// partial update that changes a counter without recomputing leaves them
/// stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    #[serde(default)]
    pub id: String,

    pub product_id: String,

    #[serde(default)]
    pub product_name: String,

    #[serde(default)]
    pub product_code: String,

    pub current_stock: i64,

    #[serde(default)]
    pub min_stock: i64,

    #[serde(default)]
    pub max_stock: i64,

    #[serde(default)]
    pub reserved_stock: i64,

    #[serde(default)]
    pub available_stock: i64,

    #[serde(default)]
    pub status: StockStatus,

    #[serde(default)]
    pub location: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub last_restocked: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_document_id("productId", &self.product_id)?;
        validation::validate_count("currentStock", self.current_stock)?;
        validation::validate_count("minStock", self.min_stock)?;
        validation::validate_count("maxStock", self.max_stock)?;
        validation::validate_count("reservedStock", self.reserved_stock)?;
        Ok(())
    }

    /// Recomputes `available_stock` and `status` from the counters.
    pub fn recompute(&mut self) {
        self.available_stock = (self.current_stock - self.reserved_stock).max(0);
        self.status = StockStatus::derive(self.current_stock, self.min_stock, self.max_stock);
    }
}

/// Stock level classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
    Overstock,
}

impl StockStatus {
    pub fn derive(current: i64, min: i64, max: i64) -> Self {
        if current <= 0 {
            StockStatus::OutOfStock
        } else if current <= min {
            StockStatus::LowStock
        } else if max > 0 && current >= max {
            StockStatus::Overstock
        } else {
            StockStatus::InStock
        }
    }
}

/// One change to a product's stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockMovement {
    #[serde(default)]
    pub id: String,

    pub product_id: String,

    #[serde(default)]
    pub product_name: String,

    pub movement_type: MovementType,

    /// Signed change applied to the counter.
    pub quantity: i64,

    pub previous_stock: i64,

    pub new_stock: i64,

    #[serde(default)]
    pub reason: String,

    /// Sale id, disposal id or supplier invoice the movement came from.
    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub performed_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MovementType {
    /// Goods received.
    In,
    /// Goods removed for a reason other than a sale.
    Out,
    /// Count corrected to a new absolute value.
    Adjustment,
    Sale,
    Disposal,
    Return,
}

impl MovementType {
    /// Applies a movement of `quantity` to `current`.
    ///
    /// `In`/`Return` add, `Out`/`Sale`/`Disposal` subtract, `Adjustment`
    /// replaces the count with `quantity`.
    pub fn apply(&self, current: i64, quantity: i64) -> i64 {
        match self {
            MovementType::In | MovementType::Return => current + quantity,
            MovementType::Out | MovementType::Sale | MovementType::Disposal => current - quantity,
            MovementType::Adjustment => quantity,
        }
    }
}
