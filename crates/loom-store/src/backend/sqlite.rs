//! # SQLite Backend
//!
//! Durable backend: every document is one row of the `documents` table.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SQLite Document Store                              │
//! │                                                                         │
//! │  Server Startup                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteConfig::new(path) ← Configure pool settings                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SqliteStore::connect(config).await ← Create pool + run migrations     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │ documents                                    │                      │
//! │  │ path      │ id        │ body (JSON)          │                      │
//! │  │ products  │ 7f3c…     │ {"id":"7f3c…",…}     │                      │
//! │  │ sales     │ 91ab…     │ {"id":"91ab…",…}     │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## WAL Mode
//! SQLite WAL (Write-Ahead Logging) mode is enabled so dashboard reads do
//! not block checkout writes.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::{apply_patch, ChangeEvent, ChangeKind, DocumentStore, CHANGE_CHANNEL_CAPACITY};
use crate::error::{validate_key, StoreError, StoreResult};
use crate::migrations;

// =============================================================================
// Configuration
// =============================================================================

/// SQLite backend configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = SqliteConfig::new("/var/lib/loom/loom.db")
///     .max_connections(5)
///     .min_connections(1);
/// ```
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Path to the SQLite database file. `:memory:` for a throwaway store.
    pub database_path: PathBuf,

    /// Default: 5
    pub max_connections: u32,

    /// Default: 1
    pub min_connections: u32,

    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// Default: true
    pub run_migrations: bool,
}

impl SqliteConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SqliteConfig {
            database_path: path.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// In-memory database (for tests). Each pool is its own database, so
    /// this is pinned to a single connection.
    pub fn in_memory() -> Self {
        SqliteConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            run_migrations: true,
        }
    }

    fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == ":memory:"
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SqliteStore {
    /// Opens (creating if needed) the database and runs migrations.
    pub async fn connect(config: SqliteConfig) -> StoreResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening SQLite document store"
        );

        let url = if config.is_in_memory() {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}", config.database_path.display())
        };

        let connect_options = SqliteConnectOptions::from_str(&url)
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(max_connections = config.max_connections, "SQLite pool created");

        if config.run_migrations {
            migrations::run_migrations(&pool).await?;
        }

        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { pool, changes })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn notify(&self, path: &str, id: &str, kind: ChangeKind) {
        let _ = self.changes.send(ChangeEvent {
            path: path.to_string(),
            id: id.to_string(),
            kind,
        });
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn put(&self, path: &str, id: &str, document: Value) -> StoreResult<()> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, "sqlite put");

        let body = serde_json::to_string(&document)?;
        sqlx::query(
            r#"
            INSERT INTO documents (path, id, body, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (path, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(path)
        .bind(id)
        .bind(body)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        self.notify(path, id, ChangeKind::Put);
        Ok(())
    }

    async fn list(&self, path: &str) -> StoreResult<Vec<Value>> {
        validate_key("path", path)?;

        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE path = ?1 ORDER BY rowid")
                .bind(path)
                .fetch_all(&self.pool)
                .await?;

        debug!(path = %path, count = bodies.len(), "sqlite list");
        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(StoreError::from))
            .collect()
    }

    async fn get(&self, path: &str, id: &str) -> StoreResult<Option<Value>> {
        validate_key("path", path)?;
        validate_key("id", id)?;

        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE path = ?1 AND id = ?2")
                .bind(path)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        body.map(|b| serde_json::from_str(&b).map_err(StoreError::from))
            .transpose()
    }

    async fn merge(&self, path: &str, id: &str, patch: Map<String, Value>) -> StoreResult<Value> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, fields = patch.len(), "sqlite merge");

        // Read-modify-write in one transaction.
        let mut tx = self.pool.begin().await?;

        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM documents WHERE path = ?1 AND id = ?2")
                .bind(path)
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(body) = body else {
            return Err(StoreError::not_found(path, id));
        };

        let mut document: Value = serde_json::from_str(&body)?;
        apply_patch(&mut document, patch);

        sqlx::query("UPDATE documents SET body = ?3, updated_at = ?4 WHERE path = ?1 AND id = ?2")
            .bind(path)
            .bind(id)
            .bind(serde_json::to_string(&document)?)
            .bind(Utc::now().to_rfc3339())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.notify(path, id, ChangeKind::Merged);
        Ok(document)
    }

    async fn remove(&self, path: &str, id: &str) -> StoreResult<()> {
        validate_key("path", path)?;
        validate_key("id", id)?;
        debug!(path = %path, id = %id, "sqlite remove");

        let result = sqlx::query("DELETE FROM documents WHERE path = ?1 AND id = ?2")
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(path, id));
        }
        self.notify(path, id, ChangeKind::Removed);
        Ok(())
    }

    fn changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    fn kind(&self) -> &'static str {
        "sqlite"
    }

    async fn close(&self) {
        info!("Closing SQLite pool");
        self.pool.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
