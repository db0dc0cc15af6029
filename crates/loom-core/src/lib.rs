//! # loom-core: Pure Business Logic for Loom
//!
//! This crate holds every rule the retail back office applies to its data,
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Loom Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (browser)                          │   │
//! │  │   POS ──► Products ──► Inventory ──► Ledgers ──► Reports        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/server (axum)                           │   │
//! │  │    checkout, record_payment, import, dashboard, etc.           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ loom-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ checkout  │  │  reports  │  │  invoice  │  │   │
//! │  │   │  Product  │  │ discount  │  │ dashboard │  │   HTML    │  │   │
//! │  │   │   Sale    │  │   stock   │  │  profit   │  │ WhatsApp  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORE • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 loom-store (Document Store Layer)               │   │
//! │  │         collections, subscriptions, per-entity repositories    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Documents stored per collection (Product, SaleRecord, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`checkout`] - Cart validation, discount distribution, sale assembly
//! - [`performance`] - Staff performance score blending
//! - [`ledger`] - Credit/debit payment application
//! - [`reports`] - Dashboard and report aggregates
//! - [`invoice`] - Printable HTML invoice and WhatsApp deep links
//! - [`import`] - CSV product import
//! - [`auth`] - Authorized account and provider error mapping
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use loom_core::checkout::distribute_discount;
//! use loom_core::money::Money;
//!
//! let lines = [Money::from_units(2000), Money::from_units(500)];
//! let shares = distribute_discount(&lines, Money::from_units(300));
//! assert_eq!(shares, vec![Money::from_units(240), Money::from_units(60)]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod checkout;
pub mod error;
pub mod import;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod payroll;
pub mod performance;
pub mod reports;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, StockShortage, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Collection Paths
// =============================================================================
// Every document lives at `<collection>/<id>`.

/// Product catalogue.
pub const PRODUCTS: &str = "products";
/// Staff members.
pub const EMPLOYEES: &str = "employees";
/// Completed sales.
pub const SALES: &str = "sales";
/// Inventory counters per product.
pub const INVENTORY: &str = "inventory";
/// Stock movement log.
pub const STOCK_MOVEMENTS: &str = "stockMovements";
/// Receivables.
pub const CREDIT_ENTRIES: &str = "creditEntries";
/// Payables.
pub const DEBIT_ENTRIES: &str = "debitEntries";
/// Bargaining tracker.
pub const BARGAIN_RECORDS: &str = "bargainRecords";
/// Damaged and written-off stock.
pub const DISPOSAL_RECORDS: &str = "disposalRecords";
/// Daily attendance.
pub const ATTENDANCE: &str = "attendance";
/// Payroll.
pub const SALARY_RECORDS: &str = "salaryRecords";
/// Sign-in attempts.
pub const LOGIN_LOGS: &str = "loginLogs";
/// Sign-outs.
pub const LOGOUT_LOGS: &str = "logoutLogs";

/// All collection paths, in the order the dashboard lists them.
pub const COLLECTIONS: [&str; 13] = [
    PRODUCTS,
    EMPLOYEES,
    SALES,
    INVENTORY,
    STOCK_MOVEMENTS,
    CREDIT_ENTRIES,
    DEBIT_ENTRIES,
    BARGAIN_RECORDS,
    DISPOSAL_RECORDS,
    ATTENDANCE,
    SALARY_RECORDS,
    LOGIN_LOGS,
    LOGOUT_LOGS,
];

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines in a single checkout.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches fat-finger entries (typing 1000 instead of 10) at the counter.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Largest single amount accepted for a price, discount, ledger entry or
/// salary figure.
///
/// ## Business Reason
/// Keeps `price × quantity` and stock valuations far inside `i64` even for
/// a full cart.
pub const MAX_AMOUNT: i64 = 1_000_000_000;

/// Largest stock counter accepted on a product or inventory item.
pub const MAX_STOCK: i64 = 10_000_000;

/// Weight of the previous performance score when blending in a new sale.
pub const PERFORMANCE_HISTORY_WEIGHT: f64 = 0.7;

/// Placeholder recorded where the client address is not known.
pub const UNKNOWN_IP: &str = "unknown";
