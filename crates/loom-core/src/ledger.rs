//! # Ledger Payments
//!
//! Applying a payment to a credit or debit entry.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  LedgerEntry { amount: 5000, paid: 2000, remaining: 3000 }              │
//! │       │                                                                 │
//! │       ▼  NewPayment { amount: 3000 }                                    │
//! │  amount ≤ 0            → InvalidPaymentAmount                           │
//! │  remaining == 0        → EntryAlreadyPaid                               │
//! │  amount > remaining    → PaymentExceedsBalance                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LedgerPaymentUpdate { paid: 5000, remaining: 0, status: paid,          │
//! │                        payments: [..history, new record] }              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  (server) partial update of the entry; last write wins                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LedgerEntry, LedgerStatus, PaymentMethod, PaymentRecord};

/// A payment as entered on the ledger screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewPayment {
    pub amount: Money,
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: String,
    #[serde(default)]
    pub notes: String,
}

/// The partial update written back to the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LedgerPaymentUpdate {
    pub paid_amount: Money,
    pub remaining_amount: Money,
    pub status: LedgerStatus,
    pub payments: Vec<PaymentRecord>,
}

/// Applies `payment` to `entry` as of `now`.
///
/// The entry is not modified; the caller persists the returned update.
pub fn apply_payment(
    entry: &LedgerEntry,
    payment: &NewPayment,
    now: DateTime<Utc>,
) -> CoreResult<LedgerPaymentUpdate> {
    if !payment.amount.is_positive() {
        return Err(CoreError::InvalidPaymentAmount {
            reason: "amount must be greater than zero".to_string(),
        });
    }

    if !entry.remaining_amount.is_positive() {
        return Err(CoreError::EntryAlreadyPaid(entry.id.clone()));
    }

    if payment.amount > entry.remaining_amount {
        return Err(CoreError::PaymentExceedsBalance {
            amount: payment.amount.units(),
            remaining: entry.remaining_amount.units(),
        });
    }

    let paid_amount = entry.paid_amount + payment.amount;
    let remaining_amount = entry.amount - paid_amount;
    let status = if remaining_amount.is_zero() {
        LedgerStatus::Paid
    } else {
        LedgerStatus::Partial
    };

    let mut payments = entry.payments.clone();
    payments.push(PaymentRecord {
        id: Uuid::new_v4().to_string(),
        amount: payment.amount,
        date: now,
        method: payment.method,
        reference: payment.reference.trim().to_string(),
        notes: payment.notes.trim().to_string(),
    });

    Ok(LedgerPaymentUpdate {
        paid_amount,
        remaining_amount,
        status,
        payments,
    })
}
