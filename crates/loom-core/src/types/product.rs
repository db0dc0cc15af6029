//! Product catalogue documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// A product available for sale.
///
/// ## Pricing Ladder
/// ```text
///   purchaseCost ≤ minSalePrice ≤ currentPrice ≤ maxSalePrice
///        │               │              │               │
///     what we paid   bargain floor   tag price     bargain ceiling
/// ```
/// Only the last three are enforced; selling below cost is allowed but
/// shows up as a negative margin in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    /// Document id (UUID v4), stamped by the store.
    #[serde(default)]
    pub id: String,

    pub name: String,

    /// Business identifier printed on the tag.
    pub code: String,

    #[serde(default)]
    pub fabric_type: String,

    #[serde(default)]
    pub size: String,

    #[serde(default)]
    pub color: String,

    pub purchase_cost: Money,
    pub min_sale_price: Money,
    pub max_sale_price: Money,
    pub current_price: Money,

    /// Units on hand. Decremented by checkout and disposal.
    pub stock: i64,

    /// Reorder threshold.
    #[serde(default)]
    pub min_stock: i64,

    #[serde(default)]
    pub supplier: String,

    #[serde(default)]
    pub batch_info: String,

    #[serde(default)]
    pub status: ProductStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Checks every field rule before the product is written.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_name("name", &self.name)?;
        validation::validate_product_code(&self.code)?;
        validation::validate_amount("purchaseCost", self.purchase_cost)?;
        validation::validate_price_range(
            self.min_sale_price,
            self.current_price,
            self.max_sale_price,
        )?;
        validation::validate_count("stock", self.stock)?;
        validation::validate_count("minStock", self.min_stock)?;
        Ok(())
    }

    /// At or below the reorder threshold (but not empty).
    pub fn is_low_stock(&self) -> bool {
        self.stock > 0 && self.stock <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock <= 0
    }

    /// Whether `quantity` units can be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.status == ProductStatus::Active && self.stock >= quantity
    }

    /// Margin per unit at the current price.
    pub fn unit_margin(&self) -> Money {
        self.current_price - self.purchase_cost
    }

    /// Stock valued at purchase cost.
    pub fn stock_cost_value(&self) -> Money {
        self.purchase_cost * self.stock.max(0)
    }

    /// Stock valued at the current price.
    pub fn stock_retail_value(&self) -> Money {
        self.current_price * self.stock.max(0)
    }

    /// Whether the product is sellable at `price` without breaking the ladder.
    pub fn check_sale_price(&self, price: Money) -> ValidationResult<()> {
        if price < self.min_sale_price || price > self.max_sale_price {
            return Err(ValidationError::PriceRange {
                reason: format!(
                    "{} must sell between {} and {}",
                    self.name, self.min_sale_price, self.max_sale_price
                ),
            });
        }
        Ok(())
    }
}

/// Catalogue status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Discontinued,
}
