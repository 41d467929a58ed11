//! # Canvaslab Storage
//!
//! Key-value store abstraction for canvaslab event ingestion.
//!
//! The ingestion handlers only ever append to lists and bump counters, so the
//! store surface is small. Handlers depend on [`KvStore`] alone,
//! which lets tests swap the durable backend for an in-memory one.
//!
//! ## Features
//!
//! - **KvStore trait**: append-only lists, monotonic counters, atomic batches
//! - **InMemoryKvStore**: In-memory implementation for tests and ephemeral runs
//! - **RedbKvStore**: Durable implementation backed by redb
//!
//! ## Example
//!
//! ```rust,ignore
//! use canvaslab_storage::{InMemoryKvStore, KvStore, WriteBatch};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = InMemoryKvStore::new();
//!
//!     let mut batch = WriteBatch::new();
//!     batch
//!         .append("telemetry:events", r#"{"type":"faces"}"#)
//!         .increment_by("telemetry:facesEvents", 1);
//!     store.apply(batch).await.unwrap();
//!
//!     assert_eq!(store.list_len("telemetry:events").await.unwrap(), 1);
//!     assert_eq!(store.counter("telemetry:facesEvents").await.unwrap(), 1);
//! }
//! ```

pub mod batch;
pub mod error;
pub mod memory;
pub mod persistent;

// Re-exports
pub use batch::{WriteBatch, WriteOp};
pub use error::StorageError;
pub use memory::InMemoryKvStore;
pub use persistent::{RedbKvStore, RedbStorageConfig};

use async_trait::async_trait;

/// Store for append-only lists and monotonic counters
///
/// Lists and counters live in separate namespaces per key: a key that holds
/// a list cannot be incremented and vice versa, mirroring typed keys in
/// common key-value servers.
///
/// ## Atomicity
///
/// [`KvStore::apply`] commits every operation in the batch or none of them.
/// Concurrent batches are serialized; a reader never observes half of one.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Apply a batch of mutations atomically
    ///
    /// Returns one value per operation, in order: the list length after an
    /// append, or the counter value after an increment.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::WrongType`] if an operation targets a key of
    /// the other kind, or a backend error. Nothing is written on error.
    async fn apply(&self, batch: WriteBatch) -> Result<Vec<u64>, StorageError>;

    /// Number of entries in a list (0 if it does not exist)
    async fn list_len(&self, list: &str) -> Result<u64, StorageError>;

    /// Entries of a list from `start` (inclusive) to `end` (exclusive)
    ///
    /// Out-of-range bounds are clamped.
    async fn list_range(&self, list: &str, start: u64, end: u64)
    -> Result<Vec<String>, StorageError>;

    /// Current value of a counter (0 if it does not exist)
    async fn counter(&self, key: &str) -> Result<u64, StorageError>;

    /// All counters whose key starts with `prefix`, sorted by key
    async fn counters_with_prefix(&self, prefix: &str)
    -> Result<Vec<(String, u64)>, StorageError>;

    /// Append a single value to the tail of a list
    ///
    /// Returns the new list length.
    async fn append(&self, list: &str, value: String) -> Result<u64, StorageError> {
        let mut batch = WriteBatch::new();
        batch.append(list, value);
        let results = self.apply(batch).await?;
        Ok(results.first().copied().unwrap_or_default())
    }

    /// Add `delta` to a single counter
    ///
    /// Returns the new counter value.
    async fn increment_by(&self, key: &str, delta: u64) -> Result<u64, StorageError> {
        let mut batch = WriteBatch::new();
        batch.increment_by(key, delta);
        let results = self.apply(batch).await?;
        Ok(results.first().copied().unwrap_or_default())
    }
}
