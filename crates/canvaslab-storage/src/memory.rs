//! In-memory storage implementation
//!
//! Suitable for tests and for running the ingestion service without a
//! database. Contents are lost when the process exits.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::KvStore;
use crate::batch::{WriteBatch, WriteOp};
use crate::error::StorageError;

#[derive(Debug, Default)]
struct MemoryState {
    lists: HashMap<String, Vec<String>>,
    counters: BTreeMap<String, u64>,
}

impl MemoryState {
    /// Reject the batch up front if any key would change kind
    fn check(&self, batch: &WriteBatch) -> Result<(), StorageError> {
        let mut new_lists = HashSet::new();
        let mut new_counters = HashSet::new();

        for op in batch.ops() {
            match op {
                WriteOp::Append { list, .. } => {
                    if self.counters.contains_key(list) || new_counters.contains(list.as_str()) {
                        return Err(StorageError::wrong_type(list, "list"));
                    }
                    new_lists.insert(list.as_str());
                }
                WriteOp::IncrementBy { key, .. } => {
                    if self.lists.contains_key(key) || new_lists.contains(key.as_str()) {
                        return Err(StorageError::wrong_type(key, "counter"));
                    }
                    new_counters.insert(key.as_str());
                }
            }
        }

        Ok(())
    }

    fn apply_op(&mut self, op: WriteOp) -> u64 {
        match op {
            WriteOp::Append { list, value } => {
                let entries = self.lists.entry(list).or_default();
                entries.push(value);
                entries.len() as u64
            }
            WriteOp::IncrementBy { key, delta } => {
                let counter = self.counters.entry(key).or_insert(0);
                *counter = counter.saturating_add(delta);
                *counter
            }
        }
    }
}

/// In-memory implementation of KvStore
///
/// A single lock guards all keys so that a batch is applied without any
/// reader observing a partial result.
#[derive(Debug, Default)]
pub struct InMemoryKvStore {
    state: RwLock<MemoryState>,
}

impl InMemoryKvStore {
    /// Create a new, empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of lists
    pub fn list_count(&self) -> usize {
        self.state.read().lists.len()
    }

    /// Number of counters
    pub fn counter_count(&self) -> usize {
        self.state.read().counters.len()
    }

    /// Whether no key has been written yet
    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.lists.is_empty() && state.counters.is_empty()
    }
}

#[async_trait]
impl KvStore for InMemoryKvStore {
    async fn apply(&self, batch: WriteBatch) -> Result<Vec<u64>, StorageError> {
        let mut state = self.state.write();
        state.check(&batch)?;

        trace!(ops = batch.len(), "Applying batch in memory");
        let results = batch
            .into_ops()
            .into_iter()
            .map(|op| state.apply_op(op))
            .collect();

        Ok(results)
    }

    async fn list_len(&self, list: &str) -> Result<u64, StorageError> {
        let state = self.state.read();
        Ok(state.lists.get(list).map_or(0, |entries| entries.len() as u64))
    }

    async fn list_range(
        &self,
        list: &str,
        start: u64,
        end: u64,
    ) -> Result<Vec<String>, StorageError> {
        let state = self.state.read();
        let Some(entries) = state.lists.get(list) else {
            return Ok(Vec::new());
        };

        let len = entries.len();
        let end = usize::try_from(end).unwrap_or(usize::MAX).min(len);
        let start = usize::try_from(start).unwrap_or(usize::MAX).min(end);
        Ok(entries[start..end].to_vec())
    }

    async fn counter(&self, key: &str) -> Result<u64, StorageError> {
        Ok(self.state.read().counters.get(key).copied().unwrap_or(0))
    }

    async fn counters_with_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<(String, u64)>, StorageError> {
        let state = self.state.read();
        Ok(state
            .counters
            .range(prefix.to_string()..)
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), *value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_preserves_order() {
        let store = InMemoryKvStore::new();
        for i in 0..5 {
            store.append("prof:accessLog", format!("e{i}")).await.unwrap();
        }

        assert_eq!(store.list_len("prof:accessLog").await.unwrap(), 5);
        assert_eq!(
            store.list_range("prof:accessLog", 1, 3).await.unwrap(),
            vec!["e1", "e2"]
        );
    }

    #[tokio::test]
    async fn test_list_range_clamps() {
        let store = InMemoryKvStore::new();
        store.append("l", "x".into()).await.unwrap();

        assert_eq!(store.list_range("l", 0, 100).await.unwrap(), vec!["x"]);
        assert!(store.list_range("l", 5, 2).await.unwrap().is_empty());
        assert!(store.list_range("missing", 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_keys_read_as_zero() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.list_len("nope").await.unwrap(), 0);
        assert_eq!(store.counter("nope").await.unwrap(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_counter_saturates() {
        let store = InMemoryKvStore::new();
        store.increment_by("c", u64::MAX - 1).await.unwrap();
        assert_eq!(store.increment_by("c", 10).await.unwrap(), u64::MAX);
    }

    #[tokio::test]
    async fn test_increment_by_zero_creates_counter() {
        let store = InMemoryKvStore::new();
        assert_eq!(store.increment_by("telemetry:facesTotal", 0).await.unwrap(), 0);
        assert_eq!(store.counter_count(), 1);
    }

    #[tokio::test]
    async fn test_batch_results() {
        let store = InMemoryKvStore::new();
        let mut batch = WriteBatch::new();
        batch
            .append("telemetry:events", "{}")
            .increment_by("telemetry:facesEvents", 1)
            .increment_by("telemetry:facesTotal", 7);

        let results = store.apply(batch).await.unwrap();
        assert_eq!(results, vec![1, 1, 7]);
    }

    #[tokio::test]
    async fn test_wrong_type_rejects_whole_batch() {
        let store = InMemoryKvStore::new();
        store.append("events", "first".into()).await.unwrap();

        let mut batch = WriteBatch::new();
        batch.append("events", "second").increment_by("events", 1);

        let err = store.apply(batch).await.unwrap_err();
        assert!(matches!(err, StorageError::WrongType { .. }));
        assert_eq!(store.list_len("events").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_wrong_type_within_one_batch() {
        let store = InMemoryKvStore::new();

        let mut batch = WriteBatch::new();
        batch.increment_by("k", 1).append("k", "v");

        assert!(store.apply(batch).await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_counters_with_prefix() {
        let store = InMemoryKvStore::new();
        store.increment_by("telemetry:widget:a:clicks", 2).await.unwrap();
        store.increment_by("telemetry:widget:b:clicks", 1).await.unwrap();
        store.increment_by("telemetry:widgetEvents", 3).await.unwrap();

        let widgets = store.counters_with_prefix("telemetry:widget:").await.unwrap();
        assert_eq!(
            widgets,
            vec![
                ("telemetry:widget:a:clicks".to_string(), 2),
                ("telemetry:widget:b:clicks".to_string(), 1),
            ]
        );
    }
}
