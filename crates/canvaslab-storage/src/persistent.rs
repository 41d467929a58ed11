//! Durable storage backed by redb
//!
//! Every batch is one redb write transaction, so list appends and counter
//! increments from the same batch commit together or not at all.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::KvStore;
use crate::batch::{WriteBatch, WriteOp};
use crate::error::StorageError;

// Key: (list name, index), Value: serialized entry
const LIST_ENTRIES: TableDefinition<(&str, u64), &str> = TableDefinition::new("list_entries");

// Key: list name, Value: number of entries
const LIST_LENGTHS: TableDefinition<&str, u64> = TableDefinition::new("list_lengths");

// Key: counter name, Value: current count
const COUNTERS: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Configuration for redb storage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedbStorageConfig {
    /// Path to the database file
    pub db_path: PathBuf,
}

impl Default for RedbStorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/canvaslab.redb"),
        }
    }
}

/// redb-backed implementation of KvStore
#[derive(Clone)]
pub struct RedbKvStore {
    db: Arc<Database>,
    config: RedbStorageConfig,
}

impl std::fmt::Debug for RedbKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbKvStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedbKvStore {
    /// Open or create the database described by `config`
    #[instrument(skip(config), fields(path = %config.db_path.display()))]
    pub fn open(config: RedbStorageConfig) -> Result<Self, StorageError> {
        if let Some(parent) = config.db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&config.db_path)?;
        info!("Opened redb database");

        let store = Self {
            db: Arc::new(db),
            config,
        };
        store.init_tables()?;

        Ok(store)
    }

    /// Open or create a database at `path` with default settings
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open(RedbStorageConfig {
            db_path: path.as_ref().to_path_buf(),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &RedbStorageConfig {
        &self.config
    }

    /// Create tables so read transactions never hit a missing table
    fn init_tables(&self) -> Result<(), StorageError> {
        let write_txn = self.db.begin_write()?;
        write_txn.open_table(LIST_ENTRIES)?;
        write_txn.open_table(LIST_LENGTHS)?;
        write_txn.open_table(COUNTERS)?;
        write_txn.commit()?;

        debug!("Initialized redb tables");
        Ok(())
    }

    /// Run a blocking closure against the database off the async executor
    async fn with_db<T, F>(&self, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db)).await?
    }
}

/// Error to report for a failed batch once its transaction is aborted
///
/// The batch error always wins; an abort failure is only logged.
fn rollback(batch_error: StorageError, abort: Result<(), redb::StorageError>) -> StorageError {
    if let Err(abort_error) = abort {
        warn!(error = %abort_error, batch_error = %batch_error, "Failed to abort write transaction");
    }
    batch_error
}

fn apply_in_txn(txn: &WriteTransaction, batch: WriteBatch) -> Result<Vec<u64>, StorageError> {
    let mut entries = txn.open_table(LIST_ENTRIES)?;
    let mut lengths = txn.open_table(LIST_LENGTHS)?;
    let mut counters = txn.open_table(COUNTERS)?;

    let mut results = Vec::with_capacity(batch.len());
    for op in batch.into_ops() {
        match op {
            WriteOp::Append { list, value } => {
                if counters.get(list.as_str())?.is_some() {
                    return Err(StorageError::wrong_type(list, "list"));
                }
                let len = lengths.get(list.as_str())?.map_or(0, |v| v.value());
                entries.insert((list.as_str(), len), value.as_str())?;
                lengths.insert(list.as_str(), len + 1)?;
                results.push(len + 1);
            }
            WriteOp::IncrementBy { key, delta } => {
                if lengths.get(key.as_str())?.is_some() {
                    return Err(StorageError::wrong_type(key, "counter"));
                }
                let current = counters.get(key.as_str())?.map_or(0, |v| v.value());
                let next = current.saturating_add(delta);
                counters.insert(key.as_str(), next)?;
                results.push(next);
            }
        }
    }

    Ok(results)
}

#[async_trait]
impl KvStore for RedbKvStore {
    async fn apply(&self, batch: WriteBatch) -> Result<Vec<u64>, StorageError> {
        let ops = batch.len();
        let results = self
            .with_db(move |db| {
                let txn = db.begin_write()?;
                match apply_in_txn(&txn, batch) {
                    Ok(results) => {
                        txn.commit()?;
                        Ok(results)
                    }
                    Err(e) => Err(rollback(e, txn.abort())),
                }
            })
            .await?;

        debug!(ops, "Committed batch");
        Ok(results)
    }

    async fn list_len(&self, list: &str) -> Result<u64, StorageError> {
        let list = list.to_string();
        self.with_db(move |db| {
            let txn = db.begin_read()?;
            let lengths = txn.open_table(LIST_LENGTHS)?;
            Ok(lengths.get(list.as_str())?.map_or(0, |v| v.value()))
        })
        .await
    }

    async fn list_range(
        &self,
        list: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<String>, StorageError> {
        let list = list.to_string();
        self.with_db(move |db| {
            let txn = db.begin_read()?;
            let entries = txn.open_table(LIST_ENTRIES)?;
            let lengths = txn.open_table(LIST_LENGTHS)?;

            let len = lengths.get(list.as_str())?.map_or(0, |v| v.value());
            let end = end.min(len);
            let start = start.min(end);

            let mut values = Vec::new();
            for item in entries.range((list.as_str(), start)..(list.as_str(), end))? {
                let (_, value) = item?;
                values.push(value.value().to_string());
            }
            Ok(values)
        })
        .await
    }

    async fn counter(&self, key: &str) -> Result<u64, StorageError> {
        let key = key.to_string();
        self.with_db(move |db| {
            let txn = db.begin_read()?;
            let counters = txn.open_table(COUNTERS)?;
            Ok(counters.get(key.as_str())?.map_or(0, |v| v.value()))
        })
        .await
    }

    async fn counters_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, u64)>, StorageError> {
        let prefix = prefix.to_string();
        self.with_db(move |db| {
            let txn = db.begin_read()?;
            let counters = txn.open_table(COUNTERS)?;

            let mut results = Vec::new();
            for item in counters.range(prefix.as_str()..)? {
                let (key, value) = item?;
                let key = key.value();

                // Stop when we're past the prefix
                if !key.starts_with(prefix.as_str()) {
                    break;
                }
                results.push((key.to_string(), value.value()));
            }
            Ok(results)
        })
        .await
    }
}

impl RedbKvStore {
    /// Number of distinct counters stored
    pub async fn counter_count(&self) -> Result<u64, StorageError> {
        self.with_db(|db| {
            let txn = db.begin_read()?;
            let counters = txn.open_table(COUNTERS)?;
            Ok(counters.len()?)
        })
        .await
    }
}
