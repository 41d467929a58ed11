//! Stress tests for canvaslab-storage
//!
//! These tests verify that concurrent batches neither lose writes nor
//! interleave partially, on both backends.

use std::sync::Arc;
use std::time::Instant;

use canvaslab_storage::{InMemoryKvStore, KvStore, RedbKvStore, WriteBatch};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

fn faces_batch(count: u64) -> WriteBatch {
    let mut batch = WriteBatch::new();
    batch
        .append("telemetry:events", format!(r#"{{"type":"faces","facesCount":{count}}}"#))
        .increment_by("telemetry:facesEvents", 1)
        .increment_by("telemetry:facesTotal", count);
    batch
}

async fn run_concurrent_batches(store: Arc<dyn KvStore>, tasks: u64, per_task: u64) {
    let mut handles = Vec::new();
    for task in 0..tasks {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for i in 0..per_task {
                store
                    .apply(faces_batch((task + i) % 5))
                    .await
                    .expect("batch should apply");
            }
        }));
    }

    for handle in handles {
        handle.await.expect("task panicked");
    }
}

fn expected_total(tasks: u64, per_task: u64) -> u64 {
    (0..tasks)
        .flat_map(|task| (0..per_task).map(move |i| (task + i) % 5))
        .sum()
}

// ============================================================================
// Concurrency Tests
// ============================================================================

/// Concurrent batches against the in-memory store keep lists and counters in step
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_concurrent_batches() {
    let store = Arc::new(InMemoryKvStore::new());
    let (tasks, per_task) = (16, 250);

    let start = Instant::now();
    run_concurrent_batches(store.clone(), tasks, per_task).await;
    println!("Applied {} batches in {:?}", tasks * per_task, start.elapsed());

    assert_eq!(store.list_len("telemetry:events").await.unwrap(), tasks * per_task);
    assert_eq!(store.counter("telemetry:facesEvents").await.unwrap(), tasks * per_task);
    assert_eq!(
        store.counter("telemetry:facesTotal").await.unwrap(),
        expected_total(tasks, per_task)
    );
}

/// Same workload against redb
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_redb_concurrent_batches() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(RedbKvStore::open_path(temp_dir.path().join("stress.redb")).unwrap());
    let (tasks, per_task) = (8, 25);

    let start = Instant::now();
    run_concurrent_batches(store.clone(), tasks, per_task).await;
    println!("Committed {} batches in {:?}", tasks * per_task, start.elapsed());

    assert_eq!(store.list_len("telemetry:events").await.unwrap(), tasks * per_task);
    assert_eq!(store.counter("telemetry:facesEvents").await.unwrap(), tasks * per_task);
    assert_eq!(
        store.counter("telemetry:facesTotal").await.unwrap(),
        expected_total(tasks, per_task)
    );
}

/// Readers racing a writer only ever see the counter grow
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_memory_counter_monotonic_under_writes() {
    let store = Arc::new(InMemoryKvStore::new());

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 0..2_000 {
                store.apply(faces_batch(i % 3)).await.unwrap();
            }
        })
    };

    let mut last = 0;
    while !writer.is_finished() {
        let events = store.counter("telemetry:facesEvents").await.unwrap();
        assert!(events >= last, "counter went backwards");
        last = events;
        tokio::task::yield_now().await;
    }
    writer.await.unwrap();

    assert_eq!(store.list_len("telemetry:events").await.unwrap(), 2_000);
    assert_eq!(store.counter("telemetry:facesEvents").await.unwrap(), 2_000);
}

// ============================================================================
// Volume Tests
// ============================================================================

/// Many widget counters with a shared prefix can be listed back
#[tokio::test]
async fn test_many_widget_counters() {
    let store = InMemoryKvStore::new();
    for w in 0..500 {
        let key = format!("telemetry:widget:w{w:03}:clicks");
        store.increment_by(&key, 1).await.unwrap();
    }
    store.increment_by("telemetry:widgetEvents", 500).await.unwrap();

    let widgets = store.counters_with_prefix("telemetry:widget:").await.unwrap();
    assert_eq!(widgets.len(), 500);
    assert_eq!(widgets[0].0, "telemetry:widget:w000:clicks");
    assert!(widgets.iter().all(|(_, v)| *v == 1));
}
