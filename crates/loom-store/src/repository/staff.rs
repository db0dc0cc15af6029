//! Attendance and payroll records.

use chrono::{DateTime, Utc};
use serde::Serialize;

use loom_core::{AttendanceRecord, SalaryRecord, SalaryStatus};

use crate::collection::Collection;
use crate::error::StoreResult;

impl Collection<AttendanceRecord> {
    pub async fn for_employee(&self, employee_id: &str) -> StoreResult<Vec<AttendanceRecord>> {
        let mut records: Vec<AttendanceRecord> = self
            .get_all()
            .await?
            .into_iter()
            .filter(|r| r.employee_id == employee_id)
            .collect();
        records.sort_by_key(|r| r.date);
        Ok(records)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PaidPatch {
    status: SalaryStatus,
    paid_at: DateTime<Utc>,
}

impl Collection<SalaryRecord> {
    pub async fn mark_paid(&self, id: &str, paid_at: DateTime<Utc>) -> StoreResult<SalaryRecord> {
        self.update(
            id,
            &PaidPatch {
                status: SalaryStatus::Paid,
                paid_at,
            },
        )
        .await
    }

    /// The slip already generated for `employee_id` in `period`, if any.
    pub async fn find_for_period(
        &self,
        employee_id: &str,
        period: &str,
    ) -> StoreResult<Option<SalaryRecord>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .find(|r| r.employee_id == employee_id && r.period == period))
    }
}
