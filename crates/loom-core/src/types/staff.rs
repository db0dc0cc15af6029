//! Attendance and payroll documents.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// One employee's attendance on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AttendanceRecord {
    #[serde(default)]
    pub id: String,

    pub employee_id: String,

    #[serde(default)]
    pub employee_name: String,

    #[ts(as = "String")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    /// "09:05" style wall-clock times, as entered.
    #[serde(default)]
    pub check_in: String,

    #[serde(default)]
    pub check_out: String,

    #[serde(default)]
    pub notes: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Times are optional. When both are given, check-out is not before
    /// check-in.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_document_id("employeeId", &self.employee_id)?;
        let check_in = parse_clock("checkIn", &self.check_in)?;
        let check_out = parse_clock("checkOut", &self.check_out)?;
        if let (Some(start), Some(end)) = (check_in, check_out) {
            if end < start {
                return Err(ValidationError::invalid_format(
                    "checkOut",
                    "earlier than check-in",
                ));
            }
        }
        Ok(())
    }
}

fn parse_clock(field: &str, raw: &str) -> ValidationResult<Option<NaiveTime>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map(Some)
        .map_err(|_| ValidationError::invalid_format(field, "expected HH:MM"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    HalfDay,
    Leave,
}

impl AttendanceStatus {
    /// How much of a working day this status counts for.
    pub fn weight(&self) -> f64 {
        match self {
            AttendanceStatus::Present | AttendanceStatus::Late => 1.0,
            AttendanceStatus::HalfDay => 0.5,
            AttendanceStatus::Absent | AttendanceStatus::Leave => 0.0,
        }
    }
}

/// A salary slip for one employee and one month.
///
/// `net_salary = base_salary + commission + bonus − deductions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalaryRecord {
    #[serde(default)]
    pub id: String,

    pub employee_id: String,

    #[serde(default)]
    pub employee_name: String,

    /// `YYYY-MM`.
    pub period: String,

    pub base_salary: Money,

    #[serde(default)]
    pub commission: Money,

    #[serde(default)]
    pub bonus: Money,

    #[serde(default)]
    pub deductions: Money,

    pub net_salary: Money,

    #[serde(default)]
    pub status: SalaryStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SalaryStatus {
    #[default]
    Pending,
    Paid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(check_in: &str, check_out: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: String::new(),
            employee_id: "e1".to_string(),
            employee_name: String::new(),
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            status: AttendanceStatus::Present,
            check_in: check_in.to_string(),
            check_out: check_out.to_string(),
            notes: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn test_attendance_validation() {
        assert!(record("09:05", "18:00").validate().is_ok());
        assert!(record("", "").validate().is_ok());
        assert!(record("9am", "").validate().is_err());
        assert!(record("18:00", "09:00").validate().is_err());

        let mut missing = record("09:00", "17:00");
        missing.employee_id = " ".to_string();
        assert!(missing.validate().is_err());
    }
}
