//! Bargain approval.

use serde::Serialize;

use loom_core::{BargainRecord, BargainStatus};

use crate::collection::Collection;
use crate::error::StoreResult;

#[derive(Serialize)]
struct StatusPatch {
    status: BargainStatus,
}

impl Collection<BargainRecord> {
    pub async fn set_status(&self, id: &str, status: BargainStatus) -> StoreResult<BargainRecord> {
        self.update(id, &StatusPatch { status }).await
    }
}
