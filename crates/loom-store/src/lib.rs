//! # loom-store: Document Store Layer for Loom
//!
//! A small real-time document store: JSON documents grouped by collection
//! path, with typed access and change subscriptions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Loom Data Flow                                   │
//! │                                                                         │
//! │  HTTP handler (checkout, ledger payment, dashboard)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    loom-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │     Store     │    │ Collection<T> │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │───►│ + repository/ │    │  (embedded)  │  │   │
//! │  │   └───────┬───────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │           │                    │                               │   │
//! │  │           ▼                    ▼                               │   │
//! │  │   dyn DocumentStore ◄──── put / list / get / merge / remove    │   │
//! │  │   ├── MemoryStore                                              │   │
//! │  │   └── SqliteStore ──► documents(path, id, body)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`backend`] - `DocumentStore` trait, memory and SQLite backends
//! - [`collection`] - generic typed collection and subscriptions
//! - [`repository`] - per-entity partial updates
//! - [`store`] - the `Store` handle
//! - [`migrations`] - embedded SQLite migrations
//! - [`error`] - store error types

pub mod backend;
pub mod collection;
pub mod error;
pub mod migrations;
pub mod repository;
pub mod store;

pub use backend::sqlite::SqliteConfig;
pub use backend::{ChangeEvent, ChangeKind, DocumentStore};
pub use collection::{Collection, LiveStream, Subscription};
pub use error::{StoreError, StoreResult};
pub use repository::sale::SaleStatusPatch;
pub use store::Store;
