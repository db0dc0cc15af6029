//! Employee counters.

use serde::Serialize;
use tracing::debug;

use loom_core::performance::SalesCredit;
use loom_core::{Employee, Money};

use crate::collection::Collection;
use crate::error::StoreResult;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MonthlyResetPatch {
    monthly_sales: Money,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttendancePatch {
    attendance_rate: f64,
}

impl Collection<Employee> {
    /// Writes the running totals and score produced by
    /// [`loom_core::performance::credit_sale`].
    pub async fn apply_sales_credit(&self, id: &str, credit: &SalesCredit) -> StoreResult<Employee> {
        debug!(
            id = %id,
            monthly_sales = %credit.monthly_sales,
            score = credit.performance_score,
            "Crediting sale to employee"
        );
        self.update(id, credit).await
    }

    /// Zeroes `monthlySales` for a new period. Totals and score are kept.
    pub async fn reset_monthly_sales(&self, id: &str) -> StoreResult<Employee> {
        self.update(
            id,
            &MonthlyResetPatch {
                monthly_sales: Money::zero(),
            },
        )
        .await
    }

    pub async fn set_attendance_rate(&self, id: &str, attendance_rate: f64) -> StoreResult<Employee> {
        self.update(id, &AttendancePatch { attendance_rate }).await
    }
}
