//! Staff documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{self, ValidationResult};

/// A staff member who can ring up sales.
///
/// `monthly_sales`, `total_sales`, `total_commission` and
/// `performance_score` are running counters updated after every checkout
/// the employee is credited with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Employee {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub email: String,

    /// Free-form role ("Cashier", "Manager", ...).
    #[serde(default)]
    pub role: String,

    /// Monthly base salary.
    #[serde(default)]
    pub salary: Money,

    /// Commission as a percentage of sales (2.5 = 2.5%).
    #[serde(default)]
    pub commission_rate: f64,

    #[serde(default)]
    pub monthly_target: Money,

    #[serde(default)]
    pub monthly_sales: Money,

    #[serde(default)]
    pub total_sales: Money,

    #[serde(default)]
    pub total_commission: Money,

    /// 0–100, blended after each sale.
    #[serde(default)]
    pub performance_score: f64,

    /// 0–100, recomputed from attendance records.
    #[serde(default)]
    pub attendance_rate: f64,

    #[serde(default)]
    pub status: EmployeeStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub join_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Employee {
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_name("name", &self.name)?;
        if !self.phone.trim().is_empty() {
            validation::validate_phone(&self.phone)?;
        }
        if !self.email.trim().is_empty() {
            validation::validate_email(&self.email)?;
        }
        validation::validate_amount("salary", self.salary)?;
        validation::validate_amount("monthlyTarget", self.monthly_target)?;
        validation::validate_percentage("commissionRate", self.commission_rate)?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn employee(id: &str, score: f64, target: i64, monthly: i64) -> Employee {
        Employee {
            id: id.to_string(),
            name: format!("Staff {}", id),
            phone: "0300-1234567".to_string(),
            email: String::new(),
            role: "Cashier".to_string(),
            salary: Money::from_units(40000),
            commission_rate: 2.0,
            monthly_target: Money::from_units(target),
            monthly_sales: Money::from_units(monthly),
            total_sales: Money::from_units(monthly),
            total_commission: Money::zero(),
            performance_score: score,
            attendance_rate: 100.0,
            status: EmployeeStatus::Active,
            join_date: None,
            created_at: None,
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::employee;

    #[test]
    fn test_validate() {
        let mut e = employee("1", 75.0, 50000, 0);
        assert!(e.validate().is_ok());

        e.commission_rate = 150.0;
        assert!(e.validate().is_err());
    }

    #[test]
    fn test_minimal_document_deserializes() {
        let e: super::Employee = serde_json::from_str(r#"{"name":"Ayesha"}"#).unwrap();
        assert!(e.is_active());
        assert_eq!(e.performance_score, 0.0);
    }
}
