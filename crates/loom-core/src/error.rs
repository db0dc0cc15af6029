//! # Error Types
//!
//! Domain-specific error types for loom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  loom-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  loom-store errors (separate crate)                                    │
//! │  └── StoreError       - Document store failures                        │
//! │                                                                         │
//! │  Server errors (in app)                                                │
//! │  └── ApiError         - What the dashboard sees (serialized)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Dashboard              │
//! │                          StoreError ─┘                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rule that blocks a write is checked before the first write, so a
//! `CoreError` always means nothing was persisted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// One cart line that asks for more than the shelf holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StockShortage {
    pub product_id: String,
    pub product_name: String,
    pub requested: i64,
    pub available: i64,
}

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Checkout was submitted with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Checkout was submitted without choosing how the customer pays.
    #[error("Payment method is required")]
    PaymentMethodRequired,

    /// Checkout was submitted without the staff member who made the sale.
    #[error("Staff member is required")]
    StaffRequired,

    /// One or more lines exceed current stock.
    ///
    /// ## When This Occurs
    /// - Another terminal sold the last units after this cart was built
    /// - The cashier typed a quantity larger than the shelf count
    ///
    /// ## User Workflow
    /// ```text
    /// Cart: Lawn Suit ×5, Silk Dupatta ×2
    ///      │
    ///      ▼
    /// Re-read products: Lawn Suit=3, Silk Dupatta=0
    ///      │
    ///      ▼
    /// InsufficientStock { shortages: [Lawn Suit 5/3, Silk Dupatta 2/0] }
    ///      │
    ///      ▼
    /// UI lists every line to fix; nothing was written
    /// ```
    #[error("Insufficient stock: {}", describe_shortages(.shortages))]
    InsufficientStock { shortages: Vec<StockShortage> },

    /// A ledger payment larger than what is still owed.
    #[error("Payment {amount} exceeds remaining balance {remaining}")]
    PaymentExceedsBalance { amount: i64, remaining: i64 },

    /// Payment amount is zero or negative.
    #[error("Invalid payment amount: {reason}")]
    InvalidPaymentAmount { reason: String },

    /// The ledger entry is already settled.
    #[error("Entry {0} is already paid")]
    EntryAlreadyPaid(String),

    /// A bargain decision on a record that was already decided.
    #[error("Bargain {id} is already {status}")]
    BargainAlreadyDecided { id: String, status: String },

    /// Product cannot be found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Employee cannot be found.
    #[error("Employee not found: {0}")]
    EmployeeNotFound(String),

    /// Disposal asks for more units than are in stock.
    #[error("Cannot dispose {requested} of {product}: only {available} in stock")]
    DisposalExceedsStock {
        product: String,
        requested: i64,
        available: i64,
    },

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

fn describe_shortages(shortages: &[StockShortage]) -> String {
    shortages
        .iter()
        .map(|s| {
            format!(
                "{} (requested {}, available {})",
                s.product_name, s.requested, s.available
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any write.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid phone, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Price ordering is broken (min ≤ current ≤ max).
    #[error("Price range invalid: {reason}")]
    PriceRange { reason: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
