//! # Typed Collections
//!
//! One generic client for every entity. A `Collection<T>` is a store handle
//! plus a path; the per-entity modules in [`crate::repository`] add their
//! own partial updates on top via `impl Collection<Product> { .. }`.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create(doc)        new UUID v4 id, stamps createdAt, writes, → id      │
//! │  get_all()          every document at the path (order not meaningful)   │
//! │  get_by_id(id)      → Option<T>                                         │
//! │  update(id, patch)  shallow merge, stamps updatedAt                     │
//! │  delete(id)         removes the document                                │
//! │  subscribe(cb)      replays the whole collection now and after every    │
//! │                     change under the path, until the Subscription drops │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure is logged here and then returned to the caller unchanged;
//! nothing is retried.

use std::fmt;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use chrono::Utc;
use futures_util::Stream;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::backend::DocumentStore;
use crate::error::{StoreError, StoreResult};

/// Fields the store owns. Patches cannot overwrite them.
const RESERVED_FIELDS: [&str; 2] = ["id", "createdAt"];

pub struct Collection<T> {
    store: Arc<dyn DocumentStore>,
    path: String,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            path: self.path.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection")
            .field("path", &self.path)
            .field("backend", &self.store.kind())
            .finish()
    }
}

/// Serializes `value` and insists on a JSON object.
pub(crate) fn to_object<S: Serialize + ?Sized>(value: &S) -> StoreResult<Map<String, Value>> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Serialization(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    pub fn new(store: Arc<dyn DocumentStore>, path: impl Into<String>) -> Self {
        Self {
            store,
            path: path.into(),
            _entity: PhantomData,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn logged<R>(&self, op: &str, id: Option<&str>, result: StoreResult<R>) -> StoreResult<R> {
        if let Err(e) = &result {
            let id = id.unwrap_or("-");
            if e.is_not_found() {
                debug!(path = %self.path, id = %id, op = op, "Document not found");
            } else {
                error!(path = %self.path, id = %id, op = op, error = %e, "Store operation failed");
            }
        }
        result
    }

    fn decode(&self, value: Value) -> StoreResult<T> {
        serde_json::from_value(value).map_err(StoreError::from)
    }

    /// Writes a new document and returns its id.
    pub async fn create(&self, document: &T) -> StoreResult<String> {
        self.insert(document).await.map(|(id, _)| id)
    }

    /// Like [`create`](Self::create), but also returns the stored document.
    pub async fn insert(&self, document: &T) -> StoreResult<(String, T)> {
        let id = Uuid::new_v4().to_string();
        let result: StoreResult<T> = async {
            let mut fields = to_object(document)?;
            fields.insert("id".to_string(), Value::String(id.clone()));
            fields.insert("createdAt".to_string(), serde_json::to_value(Utc::now())?);
            let value = Value::Object(fields);
            self.store.put(&self.path, &id, value.clone()).await?;
            self.decode(value)
        }
        .await;

        let stored = self.logged("create", Some(&id), result)?;
        debug!(path = %self.path, id = %id, "Document created");
        Ok((id, stored))
    }

    /// Every document at the path. Documents that no longer match `T` are
    /// skipped with a warning.
    pub async fn get_all(&self) -> StoreResult<Vec<T>> {
        let values = self.logged("get_all", None, self.store.list(&self.path).await)?;
        let total = values.len();

        let documents: Vec<T> = values
            .into_iter()
            .filter_map(|value| {
                let id = value.get("id").and_then(Value::as_str).unwrap_or("-").to_string();
                match self.decode(value) {
                    Ok(doc) => Some(doc),
                    Err(e) => {
                        warn!(path = %self.path, id = %id, error = %e, "Skipping unreadable document");
                        None
                    }
                }
            })
            .collect();

        debug!(path = %self.path, count = documents.len(), total = total, "Listed documents");
        Ok(documents)
    }

    pub async fn get_by_id(&self, id: &str) -> StoreResult<Option<T>> {
        let result = match self.store.get(&self.path, id).await {
            Ok(Some(value)) => self.decode(value).map(Some),
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        self.logged("get_by_id", Some(id), result)
    }

    /// Like [`get_by_id`](Self::get_by_id) but a missing document is an error.
    pub async fn require(&self, id: &str) -> StoreResult<T> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| StoreError::not_found(self.path.clone(), id))
    }

    /// Merges the fields of `patch` into the document and stamps
    /// `updatedAt`. `id` and `createdAt` in the patch are ignored.
    pub async fn update<P: Serialize + ?Sized>(&self, id: &str, patch: &P) -> StoreResult<T> {
        let result: StoreResult<T> = async {
            let mut fields = to_object(patch)?;
            for reserved in RESERVED_FIELDS {
                fields.remove(reserved);
            }
            fields.insert("updatedAt".to_string(), serde_json::to_value(Utc::now())?);
            let merged = self.store.merge(&self.path, id, fields).await?;
            self.decode(merged)
        }
        .await;

        let updated = self.logged("update", Some(id), result)?;
        debug!(path = %self.path, id = %id, "Document updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.logged("delete", Some(id), self.store.remove(&self.path, id).await)?;
        debug!(path = %self.path, id = %id, "Document deleted");
        Ok(())
    }

    async fn replay<F: Fn(Vec<T>)>(&self, callback: &F) {
        // Errors are already logged by get_all; the next change retries.
        if let Ok(documents) = self.get_all().await {
            callback(documents);
        }
    }

    /// Calls `callback` with the whole collection now, then again after
    /// every change under this path. Stops when the returned
    /// [`Subscription`] is dropped.
    ///
    /// Must be called inside a tokio runtime.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Vec<T>) + Send + Sync + 'static,
    {
        // Subscribe before the first replay so no change slips between them.
        let mut changes = self.store.changes();
        let collection = self.clone();
        debug!(path = %self.path, "Subscription started");

        let handle = tokio::spawn(async move {
            collection.replay(&callback).await;
            loop {
                match changes.recv().await {
                    Ok(event) if event.path == collection.path => {
                        collection.replay(&callback).await;
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(path = %collection.path, skipped = skipped, "Subscriber lagged, replaying");
                        collection.replay(&callback).await;
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            debug!(path = %collection.path, "Subscription ended");
        });

        Subscription { handle }
    }

    /// The subscription as a stream of snapshots.
    pub fn watch(&self) -> LiveStream<T> {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = self.subscribe(move |documents| {
            let _ = tx.send(documents);
        });
        LiveStream {
            inner: UnboundedReceiverStream::new(rx),
            _subscription: subscription,
        }
    }
}

// =============================================================================
// Subscriptions
// =============================================================================

/// Keeps a subscription alive. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    pub fn is_active(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Snapshots of a collection; see [`Collection::watch`].
pub struct LiveStream<T> {
    inner: UnboundedReceiverStream<Vec<T>>,
    _subscription: Subscription,
}

impl<T> Stream for LiveStream<T> {
    type Item = Vec<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use chrono::{DateTime, Utc};
    use futures_util::StreamExt;
    use serde::Deserialize;
    use serde_json::json;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Note {
        #[serde(default)]
        id: String,
        text: String,
        #[serde(default)]
        pinned: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        created_at: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        updated_at: Option<DateTime<Utc>>,
    }

    fn note(text: &str) -> Note {
        Note {
            id: String::new(),
            text: text.to_string(),
            pinned: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn notes() -> (Arc<MemoryStore>, Collection<Note>) {
        let store = Arc::new(MemoryStore::new());
        let collection = Collection::new(store.clone() as Arc<dyn DocumentStore>, "notes");
        (store, collection)
    }

    #[tokio::test]
    async fn test_create_stamps_id_and_created_at() {
        let (_, notes) = notes();
        let id = notes.create(&note("hello")).await.unwrap();

        let stored = notes.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert!(stored.created_at.is_some());
        assert!(stored.updated_at.is_none());
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_update_merges_and_protects_reserved_fields() {
        let (_, notes) = notes();
        let (id, created) = notes.insert(&note("hello")).await.unwrap();

        let updated = notes
            .update(&id, &json!({"pinned": true, "id": "hijack", "createdAt": null}))
            .await
            .unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.text, "hello");
        assert!(updated.pinned);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at.is_some());

        let err = notes.update("missing", &json!({"pinned": true})).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            notes.update(&id, &json!([1, 2])).await,
            Err(StoreError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_get_all_skips_unreadable_documents() {
        let (store, notes) = notes();
        notes.create(&note("a")).await.unwrap();
        notes.create(&note("b")).await.unwrap();
        store.put("notes", "broken", json!({"id": "broken"})).await.unwrap();

        let all = notes.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_delete() {
        let (_, notes) = notes();
        let id = notes.create(&note("bye")).await.unwrap();
        notes.delete(&id).await.unwrap();
        assert!(notes.get_by_id(&id).await.unwrap().is_none());
        assert!(notes.delete(&id).await.unwrap_err().is_not_found());
        assert!(notes.require(&id).await.unwrap_err().is_not_found());
    }

    async fn next_len(rx: &mut mpsc::UnboundedReceiver<usize>) -> Option<usize> {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_subscribe_replays_on_change_until_dropped() {
        let (store, notes) = notes();
        notes.create(&note("first")).await.unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let subscription = notes.subscribe(move |docs: Vec<Note>| {
            let _ = tx.send(docs.len());
        });

        assert_eq!(next_len(&mut rx).await, Some(1));

        // Writes to another path do not trigger a replay.
        store.put("other", "x", json!({})).await.unwrap();
        notes.create(&note("second")).await.unwrap();
        assert_eq!(next_len(&mut rx).await, Some(2));

        assert!(subscription.is_active());
        subscription.unsubscribe();
        // The task is aborted, which drops the callback and closes the channel.
        assert_eq!(next_len(&mut rx).await, None);
    }

    #[tokio::test]
    async fn test_watch_stream() {
        let (_, notes) = notes();
        let mut live = notes.watch();

        let first = tokio::time::timeout(Duration::from_secs(2), live.next())
            .await
            .unwrap()
            .unwrap();
        assert!(first.is_empty());

        notes.create(&note("x")).await.unwrap();
        let second = tokio::time::timeout(Duration::from_secs(2), live.next())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.len(), 1);
    }
}
