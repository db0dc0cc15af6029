//! # Storage Backends
//!
//! A backend stores untyped JSON documents addressed by `(path, id)` and
//! announces every mutation on a broadcast channel.
//!
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────────┐
//! │  Collection<T> (typed)   │ ─────► │  dyn DocumentStore (JSON)    │
//! │  create / get / update   │        │  ├── MemoryStore   (tests)   │
//! │  delete / subscribe      │ ◄───── │  └── SqliteStore   (shop)    │
//! └──────────────────────────┘ change └──────────────────────────────┘
//!                              events
//! ```
//!
//! Writes to a single document are last-write-wins. Nothing spans more
//! than one document; there are no multi-document transactions.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::broadcast;

use crate::error::StoreResult;

/// Capacity of each backend's change channel. Slow subscribers that fall
/// further behind than this skip straight to a fresh replay.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// What happened to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Put,
    Merged,
    Removed,
}

/// Published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: String,
    pub id: String,
    pub kind: ChangeKind,
}

#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Writes the whole document, replacing any existing one.
    async fn put(&self, path: &str, id: &str, document: Value) -> StoreResult<()>;

    /// Every document at `path`. Order is not meaningful.
    async fn list(&self, path: &str) -> StoreResult<Vec<Value>>;

    async fn get(&self, path: &str, id: &str) -> StoreResult<Option<Value>>;

    /// Shallow-merges `patch` into an existing document and returns the
    /// result. A `null` in the patch removes that field.
    ///
    /// Fails with `NotFound` if the document does not exist.
    async fn merge(&self, path: &str, id: &str, patch: Map<String, Value>) -> StoreResult<Value>;

    /// Fails with `NotFound` if the document does not exist.
    async fn remove(&self, path: &str, id: &str) -> StoreResult<()>;

    /// A fresh receiver for change events on every path.
    fn changes(&self) -> broadcast::Receiver<ChangeEvent>;

    async fn health_check(&self) -> bool;

    /// Short name for logs and `/health`.
    fn kind(&self) -> &'static str;

    /// Releases pooled connections on shutdown. Nothing to do in memory.
    async fn close(&self) {}
}

/// Shared merge rule for both backends.
pub(crate) fn apply_patch(target: &mut Value, patch: Map<String, Value>) {
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(fields) = target {
        for (key, value) in patch {
            if value.is_null() {
                fields.remove(&key);
            } else {
                fields.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_apply_patch() {
        let mut doc = json!({"id": "p1", "stock": 5, "color": "red"});
        let patch = json!({"stock": 3, "color": null, "size": "M"});
        let Value::Object(patch) = patch else { unreachable!() };

        apply_patch(&mut doc, patch);
        assert_eq!(doc, json!({"id": "p1", "stock": 3, "size": "M"}));
    }
}
