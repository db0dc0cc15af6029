//! Attendance, payroll and the monthly sales reset.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use loom_core::payroll::{self, SalaryAdjustments};
use loom_core::{AttendanceRecord, CoreError, Employee, SalaryRecord, SalaryStatus};
use loom_store::Store;

use crate::error::{ApiError, ApiResult};

async fn require_employee(store: &Store, id: &str) -> ApiResult<Employee> {
    store
        .employees()
        .get_by_id(id)
        .await?
        .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()).into())
}

/// Records a day and refreshes the employee's attendance rate from their
/// full history. One record per employee per day.
pub async fn record_attendance(
    store: &Store,
    mut record: AttendanceRecord,
) -> ApiResult<AttendanceRecord> {
    record.validate()?;
    let employee = require_employee(store, &record.employee_id).await?;

    let existing = store.attendance().for_employee(&employee.id).await?;
    if existing.iter().any(|r| r.date == record.date) {
        return Err(ApiError::validation(format!(
            "Attendance for {} on {} is already recorded",
            employee.name, record.date
        )));
    }
    record.employee_name = employee.name;

    let (id, created) = store.attendance().insert(&record).await?;

    let history = store.attendance().for_employee(&employee.id).await?;
    let rate = payroll::attendance_rate(&history);
    store.employees().set_attendance_rate(&employee.id, rate).await?;

    info!(
        id = %id,
        employee_id = %employee.id,
        status = ?created.status,
        attendance_rate = rate,
        "Attendance recorded"
    );
    Ok(created)
}

/// Body of `POST /api/salaries`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRequest {
    pub employee_id: String,
    pub period: String,
    #[serde(flatten)]
    pub adjustments: SalaryAdjustments,
}

/// Generates the slip for one employee and month. One slip per period.
pub async fn generate_salary(store: &Store, request: &SalaryRequest) -> ApiResult<SalaryRecord> {
    let employee = require_employee(store, &request.employee_id).await?;

    let salaries = store.salaries();
    if salaries
        .find_for_period(&employee.id, &request.period)
        .await?
        .is_some()
    {
        return Err(ApiError::validation(format!(
            "Salary for {} in {} has already been generated",
            employee.name, request.period
        )));
    }

    let slip = payroll::salary_slip(&employee, &request.period, &request.adjustments)?;
    let (id, created) = salaries.insert(&slip).await?;
    info!(
        id = %id,
        employee_id = %employee.id,
        period = %created.period,
        net = created.net_salary.units(),
        "Salary generated"
    );
    Ok(created)
}

pub async fn pay_salary(store: &Store, id: &str, now: DateTime<Utc>) -> ApiResult<SalaryRecord> {
    let salaries = store.salaries();
    let slip = salaries.require(id).await?;
    if slip.status == SalaryStatus::Paid {
        return Err(CoreError::EntryAlreadyPaid(id.to_string()).into());
    }

    let paid = salaries.mark_paid(id, now).await?;
    info!(id = %id, employee_id = %paid.employee_id, net = paid.net_salary.units(), "Salary paid");
    Ok(paid)
}

/// Zeroes `monthlySales` at the start of a new month. Lifetime totals and
/// the performance score carry over.
pub async fn reset_monthly(store: &Store, id: &str) -> ApiResult<Employee> {
    let updated = store.employees().reset_monthly_sales(id).await?;
    info!(id = %id, "Monthly sales reset");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures::employee;
    use chrono::NaiveDate;
    use loom_core::{AttendanceStatus, Money};

    fn day(employee_id: &str, d: u32, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: String::new(),
            employee_id: employee_id.to_string(),
            employee_name: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 2, d).unwrap(),
            status,
            check_in: "09:00".to_string(),
            check_out: "18:00".to_string(),
            notes: String::new(),
            created_at: None,
        }
    }

    fn salary_request(employee_id: &str, period: &str) -> SalaryRequest {
        SalaryRequest {
            employee_id: employee_id.to_string(),
            period: period.to_string(),
            adjustments: SalaryAdjustments {
                bonus: Money::from_units(1000),
                deductions: Money::from_units(500),
            },
        }
    }

    #[tokio::test]
    async fn test_attendance_updates_rate() {
        let store = Store::memory();
        let id = store
            .employees()
            .create(&employee("Ayesha", 50.0, 50000, 0))
            .await
            .unwrap();

        record_attendance(&store, day(&id, 1, AttendanceStatus::Present)).await.unwrap();
        record_attendance(&store, day(&id, 2, AttendanceStatus::HalfDay)).await.unwrap();
        let last = record_attendance(&store, day(&id, 3, AttendanceStatus::Absent))
            .await
            .unwrap();

        assert_eq!(last.employee_name, "Ayesha");
        // (1 + 0.5 + 0) / 3
        assert_eq!(store.employees().require(&id).await.unwrap().attendance_rate, 50.0);
    }

    #[tokio::test]
    async fn test_attendance_rejects_duplicate_day_and_bad_times() {
        let store = Store::memory();
        let id = store
            .employees()
            .create(&employee("Ayesha", 50.0, 50000, 0))
            .await
            .unwrap();

        record_attendance(&store, day(&id, 1, AttendanceStatus::Present)).await.unwrap();
        let err = record_attendance(&store, day(&id, 1, AttendanceStatus::Absent))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("already recorded"));

        let mut backwards = day(&id, 2, AttendanceStatus::Present);
        backwards.check_in = "18:00".to_string();
        backwards.check_out = "09:00".to_string();
        let err = record_attendance(&store, backwards).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // Neither rejected call touched the history or the rate
        assert_eq!(store.attendance().for_employee(&id).await.unwrap().len(), 1);
        assert_eq!(store.employees().require(&id).await.unwrap().attendance_rate, 100.0);
    }

    #[tokio::test]
    async fn test_attendance_for_unknown_employee() {
        let store = Store::memory();
        let err = record_attendance(&store, day("ghost", 1, AttendanceStatus::Present))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_salary_once_per_period_and_paid_once() {
        let store = Store::memory();
        // 20000 this month at 2% commission
        let id = store
            .employees()
            .create(&employee("Ayesha", 50.0, 50000, 20000))
            .await
            .unwrap();

        let slip = generate_salary(&store, &salary_request(&id, "2026-02")).await.unwrap();
        assert_eq!(slip.commission.units(), 400);
        assert_eq!(slip.net_salary.units(), 40000 + 400 + 1000 - 500);

        let err = generate_salary(&store, &salary_request(&id, "2026-02"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let paid = pay_salary(&store, &slip.id, Utc::now()).await.unwrap();
        assert_eq!(paid.status, SalaryStatus::Paid);
        assert!(paid.paid_at.is_some());

        let err = pay_salary(&store, &slip.id, Utc::now()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::PaymentError);
    }

    #[tokio::test]
    async fn test_reset_monthly_keeps_totals() {
        let store = Store::memory();
        let id = store
            .employees()
            .create(&employee("Ayesha", 80.0, 50000, 30000))
            .await
            .unwrap();

        let reset = reset_monthly(&store, &id).await.unwrap();
        assert!(reset.monthly_sales.is_zero());
        assert_eq!(reset.total_sales.units(), 30000);
        assert_eq!(reset.performance_score, 80.0);
    }
}
