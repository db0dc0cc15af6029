//! Attendance rate and salary slips.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{AttendanceRecord, Employee, SalaryRecord, SalaryStatus};
use crate::validation::{self, ValidationResult};

/// Attendance rate in percent: `(present + late + ½·half_day) / days × 100`.
///
/// Returns 0 for an empty record set.
pub fn attendance_rate(records: &[AttendanceRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let worked: f64 = records.iter().map(|r| r.status.weight()).sum();
    (worked / records.len() as f64 * 100.0 * 100.0).round() / 100.0
}

/// Bonus and deductions entered when generating a slip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalaryAdjustments {
    #[serde(default)]
    pub bonus: Money,
    #[serde(default)]
    pub deductions: Money,
}

/// `base + commission + bonus − deductions`
pub fn net_salary(base: Money, commission: Money, bonus: Money, deductions: Money) -> Money {
    base + commission + bonus - deductions
}

/// Checks a `YYYY-MM` period string.
pub fn validate_period(period: &str) -> ValidationResult<()> {
    let ok = period.is_ascii()
        && period.len() == 7
        && period.as_bytes()[4] == b'-'
        && period[..4].chars().all(|c| c.is_ascii_digit())
        && period[5..]
            .parse::<u32>()
            .map(|m| (1..=12).contains(&m))
            .unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(ValidationError::invalid_format("period", "expected YYYY-MM"))
    }
}

/// Builds the month's slip from the employee's counters.
///
/// Commission is this month's sales at the employee's rate.
pub fn salary_slip(
    employee: &Employee,
    period: &str,
    adjustments: &SalaryAdjustments,
) -> ValidationResult<SalaryRecord> {
    validate_period(period)?;
    validation::validate_amount("bonus", adjustments.bonus)?;
    validation::validate_amount("deductions", adjustments.deductions)?;

    let commission = employee
        .monthly_sales
        .percentage_of(employee.commission_rate);

    Ok(SalaryRecord {
        id: String::new(),
        employee_id: employee.id.clone(),
        employee_name: employee.name.clone(),
        period: period.to_string(),
        base_salary: employee.salary,
        commission,
        bonus: adjustments.bonus,
        deductions: adjustments.deductions,
        net_salary: net_salary(
            employee.salary,
            commission,
            adjustments.bonus,
            adjustments.deductions,
        ),
        status: SalaryStatus::Pending,
        paid_at: None,
        created_at: None,
        updated_at: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::employee::fixtures::employee;
    use crate::types::AttendanceStatus;
    use chrono::NaiveDate;

    fn day(status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: String::new(),
            employee_id: "e1".to_string(),
            employee_name: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
            status,
            check_in: String::new(),
            check_out: String::new(),
            notes: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_attendance_rate() {
        use AttendanceStatus::*;
        let records = vec![day(Present), day(Late), day(HalfDay), day(Absent)];
        assert_eq!(attendance_rate(&records), 62.5);
        assert_eq!(attendance_rate(&[]), 0.0);
    }

    #[test]
    fn test_salary_slip() {
        let e = employee("e1", 70.0, 50000, 30000);
        let slip = salary_slip(
            &e,
            "2026-02",
            &SalaryAdjustments {
                bonus: Money::from_units(2000),
                deductions: Money::from_units(500),
            },
        )
        .unwrap();

        // 40000 + 2% of 30000 + 2000 − 500
        assert_eq!(slip.commission.units(), 600);
        assert_eq!(slip.net_salary.units(), 42100);
        assert_eq!(slip.status, SalaryStatus::Pending);
    }

    #[test]
    fn test_validate_period() {
        assert!(validate_period("2026-02").is_ok());
        assert!(validate_period("2026-13").is_err());
        assert!(validate_period("26-02").is_err());
        assert!(validate_period("2026/02").is_err());
    }
}
