//! # Canvaslab Ingest
//!
//! HTTP ingestion service for access-log and telemetry events.
//!
//! Each request is validated and turned into a single [`WriteBatch`] that is
//! applied atomically to the configured [`KvStore`]: the event is appended
//! to its list and, for telemetry `faces` and `widget` events, the matching
//! counters are incremented in the same commit.
//!
//! [`WriteBatch`]: canvaslab_storage::WriteBatch
//! [`KvStore`]: canvaslab_storage::KvStore

pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod server;
pub mod stats;

pub use config::{ConfigError, IngestConfig, ServerConfig, StorageBackend, StorageConfig};
pub use endpoint::Endpoint;
pub use error::IngestError;
pub use server::{AppState, router, serve};
pub use stats::StoreStats;
