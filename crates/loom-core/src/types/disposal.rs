//! Written-off stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// Stock removed from sale because it was damaged, expired or unsellable.
///
/// `loss_amount = original_price × quantity − disposal_value`, computed by
/// [`DisposalRecord::compute_loss`] when the record is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DisposalRecord {
    #[serde(default)]
    pub id: String,

    pub product_id: String,

    #[serde(default)]
    pub product_name: String,

    pub quantity: i64,

    /// Unit price the goods were carried at.
    pub original_price: Money,

    /// Whatever was recovered (scrap sale, supplier credit).
    #[serde(default)]
    pub disposal_value: Money,

    #[serde(default)]
    pub loss_amount: Money,

    pub condition: DisposalCondition,

    pub method: DisposalMethod,

    #[serde(default)]
    pub reason: String,

    #[serde(default)]
    pub disposed_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl DisposalRecord {
    pub fn compute_loss(&mut self) {
        self.loss_amount = self.original_price * self.quantity - self.disposal_value;
    }

    pub fn original_value(&self) -> Money {
        self.original_price * self.quantity
    }

    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_document_id("productId", &self.product_id)?;
        validation::validate_quantity(self.quantity)?;
        validation::validate_amount("originalPrice", self.original_price)?;
        validation::validate_amount("disposalValue", self.disposal_value)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DisposalCondition {
    Damaged,
    Defective,
    Stained,
    Expired,
    Obsolete,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DisposalMethod {
    Discard,
    Donate,
    Recycle,
    SoldAsScrap,
    ReturnedToSupplier,
}


#[cfg(test)]
mod tests {
    use super::fixtures::disposal;
    use super::*;

    #[test]
    fn test_loss_amount() {
        let d = disposal(
            1500,
            2,
            200,
            DisposalCondition::Damaged,
            DisposalMethod::SoldAsScrap,
        );
        assert_eq!(d.loss_amount.units(), 2800);
        assert_eq!(d.original_value().units(), 3000);
    }

    #[test]
    fn test_recovery_above_value_is_negative_loss() {
        let d = disposal(100, 1, 150, DisposalCondition::Obsolete, DisposalMethod::ReturnedToSupplier);
        assert_eq!(d.loss_amount.units(), -50);
    }
}
