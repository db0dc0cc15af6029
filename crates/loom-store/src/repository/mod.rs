//! # Per-Entity Operations
//!
//! Each module adds the partial updates one entity needs on top of the
//! generic [`Collection`](crate::Collection).
//!
//! ```text
//! store.products()            → Collection<Product>
//!      .update_stock(id, 7)   → partial update { stock: 7, updatedAt }
//! ```
//!
//! - [`product`] - stock level, lookup by code
//! - [`employee`] - sales credit, monthly reset, attendance rate
//! - [`sale`] - payment / delivery status
//! - [`inventory`] - stock levels and movement log
//! - [`ledger`] - payments against credit / debit entries
//! - [`bargain`] - approve / reject
//! - [`staff`] - attendance lookups, salary payment

pub mod bargain;
pub mod employee;
pub mod inventory;
pub mod ledger;
pub mod product;
pub mod sale;
pub mod staff;
