//! # Domain Types
//!
//! The documents Loom keeps in its store, one module per collection family.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  products/        Product            inventory/      InventoryItem     │
//! │  sales/           SaleRecord         stockMovements/ StockMovement     │
//! │                   └─ SaleItem[]                                         │
//! │  employees/       Employee           creditEntries/  LedgerEntry       │
//! │  attendance/      AttendanceRecord   debitEntries/   LedgerEntry       │
//! │  salaryRecords/   SalaryRecord                       └─ PaymentRecord[]│
//! │  bargainRecords/  BargainRecord      disposalRecords/ DisposalRecord   │
//! │  loginLogs/       AuthLog            logoutLogs/     AuthLog           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Shape
//! Every document is a flat camelCase JSON object. `id` duplicates the key
//! the document is stored under; `createdAt`/`updatedAt` are stamped by the
//! store wrapper, so both are optional when building a record in memory.
//! Derived fields (`remainingAmount`, `lossAmount`, inventory `status`) are
//! computed when the record is written and are not kept in sync afterwards.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod auth_log;
pub mod bargain;
pub mod disposal;
pub mod employee;
pub mod inventory;
pub mod ledger;
pub mod product;
pub mod sale;
pub mod staff;

pub use auth_log::{AuthEvent, AuthLog};
pub use bargain::{BargainRecord, BargainStatus};
pub use disposal::{DisposalCondition, DisposalMethod, DisposalRecord};
pub use employee::{Employee, EmployeeStatus};
pub use inventory::{InventoryItem, MovementType, StockMovement, StockStatus};
pub use ledger::{LedgerEntry, LedgerKind, LedgerStatus, PaymentRecord};
pub use product::{Product, ProductStatus};
pub use sale::{DeliveryStatus, PaymentStatus, SaleItem, SaleRecord};
pub use staff::{AttendanceRecord, AttendanceStatus, SalaryRecord, SalaryStatus};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%; 1700 bps = 17% GST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage.
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How money changed hands (sales and ledger payments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    BankTransfer,
    /// JazzCash, Easypaisa and similar wallets.
    MobileWallet,
    /// Sold on account; a receivable is expected.
    Credit,
}

impl PaymentMethod {
    /// Label for invoices and reports.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::MobileWallet => "Mobile Wallet",
            PaymentMethod::Credit => "Credit",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
