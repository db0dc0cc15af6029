//! # Store Handle
//!
//! The one object the server holds. Cheap to clone; every accessor hands
//! out a [`Collection`] sharing the same backend.
//!
//! ## Usage
//! ```rust,ignore
//! let store = Store::sqlite(SqliteConfig::new("./loom.db")).await?;
//!
//! let id = store.products().create(&product).await?;
//! store.products().update_stock(&id, 7).await?;
//! let credits = store.ledger(LedgerKind::Credit).get_all().await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use loom_core::{
    AttendanceRecord, AuthLog, BargainRecord, DisposalRecord, Employee, InventoryItem,
    LedgerEntry, LedgerKind, Product, SalaryRecord, SaleRecord, StockMovement,
};

use crate::backend::memory::MemoryStore;
use crate::backend::sqlite::{SqliteConfig, SqliteStore};
use crate::backend::DocumentStore;
use crate::collection::Collection;
use crate::error::StoreResult;

#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn DocumentStore>,
}

impl Store {
    pub fn new(backend: Arc<dyn DocumentStore>) -> Self {
        Self { backend }
    }

    /// Volatile in-process store.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Durable SQLite store; creates the file and runs migrations.
    pub async fn sqlite(config: SqliteConfig) -> StoreResult<Self> {
        let backend = SqliteStore::connect(config).await?;
        info!("SQLite document store ready");
        Ok(Self::new(Arc::new(backend)))
    }

    pub fn backend_kind(&self) -> &'static str {
        self.backend.kind()
    }

    pub async fn health_check(&self) -> bool {
        self.backend.health_check().await
    }

    pub async fn close(&self) {
        self.backend.close().await;
    }

    pub fn collection<T>(&self, path: &str) -> Collection<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
    {
        Collection::new(Arc::clone(&self.backend), path)
    }

    /// Untyped access, e.g. for streaming an arbitrary collection.
    pub fn raw(&self, path: &str) -> Collection<Value> {
        self.collection(path)
    }

    pub fn products(&self) -> Collection<Product> {
        self.collection(loom_core::PRODUCTS)
    }

    pub fn employees(&self) -> Collection<Employee> {
        self.collection(loom_core::EMPLOYEES)
    }

    pub fn sales(&self) -> Collection<SaleRecord> {
        self.collection(loom_core::SALES)
    }

    pub fn inventory(&self) -> Collection<InventoryItem> {
        self.collection(loom_core::INVENTORY)
    }

    pub fn stock_movements(&self) -> Collection<StockMovement> {
        self.collection(loom_core::STOCK_MOVEMENTS)
    }

    /// `creditEntries` (receivables) or `debitEntries` (payables).
    pub fn ledger(&self, kind: LedgerKind) -> Collection<LedgerEntry> {
        self.collection(kind.path())
    }

    pub fn bargains(&self) -> Collection<BargainRecord> {
        self.collection(loom_core::BARGAIN_RECORDS)
    }

    pub fn disposals(&self) -> Collection<DisposalRecord> {
        self.collection(loom_core::DISPOSAL_RECORDS)
    }

    pub fn attendance(&self) -> Collection<AttendanceRecord> {
        self.collection(loom_core::ATTENDANCE)
    }

    pub fn salaries(&self) -> Collection<SalaryRecord> {
        self.collection(loom_core::SALARY_RECORDS)
    }

    pub fn login_logs(&self) -> Collection<AuthLog> {
        self.collection(loom_core::LOGIN_LOGS)
    }

    pub fn logout_logs(&self) -> Collection<AuthLog> {
        self.collection(loom_core::LOGOUT_LOGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_store_health() {
        let store = Store::memory();
        assert!(store.health_check().await);
        assert_eq!(store.backend_kind(), "memory");
    }

    #[tokio::test]
    async fn test_sqlite_store_shares_backend_across_collections() {
        let store = Store::sqlite(SqliteConfig::in_memory()).await.unwrap();
        assert_eq!(store.backend_kind(), "sqlite");

        let id = store.raw("products").create(&json!({"name": "Raw"})).await.unwrap();
        let doc = store.raw(loom_core::PRODUCTS).get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(doc["name"], "Raw");
        assert_eq!(doc["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_close_releases_sqlite_pool() {
        let store = Store::sqlite(SqliteConfig::in_memory()).await.unwrap();
        assert!(store.health_check().await);

        store.close().await;
        assert!(!store.health_check().await);

        // Memory backend has nothing to release
        let memory = Store::memory();
        memory.close().await;
        assert!(memory.health_check().await);
    }
}
