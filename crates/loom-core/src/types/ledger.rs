//! Credit (receivable) and debit (payable) ledger documents.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::{self, ValidationResult};
use crate::{CREDIT_ENTRIES, DEBIT_ENTRIES};

/// Which side of the books an entry sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    /// Customers owe us.
    Credit,
    /// We owe suppliers.
    Debit,
}

impl LedgerKind {
    /// Collection the entries of this kind live in.
    pub const fn path(&self) -> &'static str {
        match self {
            LedgerKind::Credit => CREDIT_ENTRIES,
            LedgerKind::Debit => DEBIT_ENTRIES,
        }
    }
}

impl std::str::FromStr for LedgerKind {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "credit" | "receivable" | "receivables" => Ok(LedgerKind::Credit),
            "debit" | "payable" | "payables" => Ok(LedgerKind::Debit),
            other => Err(crate::error::ValidationError::invalid_format(
                "ledger",
                format!("unknown ledger '{}', expected credit or debit", other),
            )),
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerKind::Credit => write!(f, "credit"),
            LedgerKind::Debit => write!(f, "debit"),
        }
    }
}

/// An amount owed to or by a counterparty, with its payment history.
///
/// ## Balances
/// `remaining_amount = amount − paid_amount`, computed whenever a payment is
/// applied (see [`crate::ledger::apply_payment`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerEntry {
    #[serde(default)]
    pub id: String,

    /// Customer (credit) or supplier (debit).
    pub party_name: String,

    #[serde(default)]
    pub party_phone: String,

    #[serde(default)]
    pub description: String,

    /// Invoice or bill this entry refers to.
    #[serde(default)]
    pub reference: String,

    pub amount: Money,

    #[serde(default)]
    pub paid_amount: Money,

    #[serde(default)]
    pub remaining_amount: Money,

    #[serde(default)]
    pub status: LedgerStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub payments: Vec<PaymentRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl LedgerEntry {
    pub fn validate(&self) -> ValidationResult<()> {
        validation::validate_name("partyName", &self.party_name)?;
        validation::validate_positive("amount", self.amount)?;
        validation::validate_amount("paidAmount", self.paid_amount)?;
        if self.paid_amount > self.amount {
            return Err(crate::error::ValidationError::OutOfRange {
                field: "paidAmount".to_string(),
                min: 0,
                max: self.amount.units(),
            });
        }
        Ok(())
    }

    /// Derives `remaining_amount` and `status` for a new entry.
    ///
    /// An entry created with an upfront payment starts as `partial` (or
    /// `paid` if it is settled in full).
    pub fn prepare_new(&mut self) {
        self.remaining_amount = self.amount - self.paid_amount;
        self.status = LedgerStatus::from_balance(self.paid_amount, self.remaining_amount);
    }

    /// Status as shown on `today`: unpaid entries past their due date read
    /// as overdue even though the stored status is not rewritten.
    pub fn effective_status(&self, today: NaiveDate) -> LedgerStatus {
        match (self.status, self.due_date) {
            (LedgerStatus::Paid, _) => LedgerStatus::Paid,
            (_, Some(due)) if due < today => LedgerStatus::Overdue,
            (status, _) => status,
        }
    }
}

/// Settlement state of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LedgerStatus {
    #[default]
    Pending,
    Partial,
    Paid,
    Overdue,
}

impl LedgerStatus {
    pub fn from_balance(paid: Money, remaining: Money) -> Self {
        if remaining.is_zero() || remaining.is_negative() {
            LedgerStatus::Paid
        } else if paid.is_positive() {
            LedgerStatus::Partial
        } else {
            LedgerStatus::Pending
        }
    }
}

/// One payment against a ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Money,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub notes: String,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn entry(amount: i64, paid: i64) -> LedgerEntry {
        let mut e = LedgerEntry {
            id: "led-1".to_string(),
            party_name: "Hamza Traders".to_string(),
            party_phone: String::new(),
            description: "Winter stock".to_string(),
            reference: "BILL-77".to_string(),
            amount: Money::from_units(amount),
            paid_amount: Money::from_units(paid),
            remaining_amount: Money::zero(),
            status: LedgerStatus::Pending,
            due_date: None,
            payments: Vec::new(),
            created_at: None,
            updated_at: None,
        };
        e.prepare_new();
        e
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::entry;
    use super::*;

    #[test]
    fn test_prepare_new() {
        let e = entry(5000, 0);
        assert_eq!(e.remaining_amount.units(), 5000);
        assert_eq!(e.status, LedgerStatus::Pending);

        let e = entry(5000, 2000);
        assert_eq!(e.remaining_amount.units(), 3000);
        assert_eq!(e.status, LedgerStatus::Partial);

        let e = entry(5000, 5000);
        assert_eq!(e.status, LedgerStatus::Paid);
    }

    #[test]
    fn test_effective_status_overdue() {
        let mut e = entry(5000, 0);
        e.due_date = NaiveDate::from_ymd_opt(2026, 1, 10);
        let today = NaiveDate::from_ymd_opt(2026, 1, 11).unwrap();
        assert_eq!(e.effective_status(today), LedgerStatus::Overdue);

        let on_due = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        assert_eq!(e.effective_status(on_due), LedgerStatus::Pending);
    }

    #[test]
    fn test_kind_paths() {
        assert_eq!(LedgerKind::Credit.path(), "creditEntries");
        assert_eq!(LedgerKind::Debit.path(), "debitEntries");
        assert_eq!("payables".parse::<LedgerKind>().unwrap(), LedgerKind::Debit);
        assert!("other".parse::<LedgerKind>().is_err());
    }

    #[test]
    fn test_validate_rejects_overpaid() {
        let mut e = entry(100, 0);
        e.paid_amount = Money::from_units(150);
        assert!(e.validate().is_err());
    }
}
