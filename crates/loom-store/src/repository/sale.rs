//! Sale status changes.

use serde::{Deserialize, Serialize};

use loom_core::{DeliveryStatus, PaymentStatus, SaleRecord};

use crate::collection::Collection;
use crate::error::StoreResult;

/// Either or both statuses; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleStatusPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<DeliveryStatus>,
}

impl SaleStatusPatch {
    pub fn is_empty(&self) -> bool {
        self.payment_status.is_none() && self.delivery_status.is_none()
    }
}

impl Collection<SaleRecord> {
    pub async fn update_status(&self, id: &str, patch: &SaleStatusPatch) -> StoreResult<SaleRecord> {
        self.update(id, patch).await
    }
}
