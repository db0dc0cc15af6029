//! Bargaining tracker documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// A negotiated price reduction on one product.
///
/// Checkout writes one pre-approved record per discounted line; staff can
/// also log a bargain by hand, which starts out `pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BargainRecord {
    #[serde(default)]
    pub id: String,

    pub product_id: String,

    #[serde(default)]
    pub product_name: String,

    #[serde(default = "one")]
    pub quantity: i64,

    /// Unit price before the bargain.
    pub original_price: Money,

    /// Unit price agreed.
    pub final_price: f64,

    /// Total reduction across `quantity` units.
    #[serde(default)]
    pub discount_amount: Money,

    /// `discount_amount / (original_price × quantity) × 100`.
    #[serde(default)]
    pub discount_percentage: f64,

    #[serde(default)]
    pub customer_name: String,

    #[serde(default)]
    pub staff_id: String,

    #[serde(default)]
    pub staff_name: String,

    /// Sale the bargain was applied in, if any.
    #[serde(default)]
    pub sale_id: String,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub status: BargainStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn one() -> i64 {
    1
}

impl BargainRecord {
    /// Fills `discount_amount`, `discount_percentage` from the prices.
    pub fn derive_discount(&mut self) {
        let gross = self.original_price * self.quantity;
        let agreed = (self.final_price * self.quantity as f64).round() as i64;
        self.discount_amount = gross - Money::from_units(agreed);
        self.discount_percentage = self.discount_amount.ratio_percent(gross);
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_document_id("productId", &self.product_id)?;
        validation::validate_quantity(self.quantity)?;
        validation::validate_amount("originalPrice", self.original_price)?;
        if !self.final_price.is_finite() || self.final_price < 0.0 {
            return Err(crate::error::ValidationError::Negative {
                field: "finalPrice".to_string(),
            });
        }
        Ok(())
    }
}

/// Manager decision on a bargain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BargainStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for BargainStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BargainStatus::Pending => write!(f, "pending"),
            BargainStatus::Approved => write!(f, "approved"),
            BargainStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_discount() {
        let mut b: BargainRecord = serde_json::from_str(
            r#"{"productId":"p1","quantity":2,"originalPrice":1500,"finalPrice":1350,
                "discountAmount":0,"discountPercentage":0}"#,
        )
        .unwrap();
        b.derive_discount();
        assert_eq!(b.discount_amount.units(), 300);
        assert!((b.discount_percentage - 10.0).abs() < 1e-9);
        assert_eq!(b.status, BargainStatus::Pending);
    }
}
