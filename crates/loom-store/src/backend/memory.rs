//! In-process backend for tests and demos. Nothing survives a restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use super::{apply_patch, ChangeEvent, ChangeKind, DocumentStore, CHANGE_CHANNEL_CAPACITY};
use crate::error::{validate_key, StoreError, StoreResult};

#[derive(Debug)]
pub struct MemoryStore {
    paths: RwLock<BTreeMap<String, BTreeMap<String, Value>>>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            paths: RwLock::new(BTreeMap::new()),
            changes,
        }
    }

    fn notify(&self, path: &str, id: &str, kind: ChangeKind) {
        // No receivers is fine.
        let _ = self.changes.send(ChangeEvent {
            path: path.to_string(),
            id: id.to_string(),
            kind,
        });
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, path: &str, id: &str, document: Value) -> StoreResult<()> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, "memory put");

        self.paths
            .write()
            .await
            .entry(path.to_string())
            .or_default()
            .insert(id.to_string(), document);
        self.notify(path, id, ChangeKind::Put);
        Ok(())
    }

    async fn list(&self, path: &str) -> StoreResult<Vec<Value>> {
        validate_key("path", path)?;
        let paths = self.paths.read().await;
        Ok(paths
            .get(path)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get(&self, path: &str, id: &str) -> StoreResult<Option<Value>> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        let paths = self.paths.read().await;
        Ok(paths.get(path).and_then(|docs| docs.get(id)).cloned())
    }

    async fn merge(&self, path: &str, id: &str, patch: Map<String, Value>) -> StoreResult<Value> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, fields = patch.len(), "memory merge");

        let merged = {
            let mut paths = self.paths.write().await;
            let doc = paths
                .get_mut(path)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::not_found(path, id))?;
            apply_patch(doc, patch);
            doc.clone()
        };
        self.notify(path, id, ChangeKind::Merged);
        Ok(merged)
    }

    async fn remove(&self, path: &str, id: &str) -> StoreResult<()> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, "memory remove");

        let removed = self
            .paths
            .write()
            .await
            .get_mut(path)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::not_found(path, id));
        }
        self.notify(path, id, ChangeKind::Removed);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}
