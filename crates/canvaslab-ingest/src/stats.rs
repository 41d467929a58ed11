//! Store summary for operators
//!
//! Nothing in the service reads its own lists or counters back; this is the
//! read side used by the `stats` subcommand.

use std::collections::BTreeMap;
use std::path::Path;

use canvaslab_core::keys;
use canvaslab_storage::{KvStore, RedbKvStore, StorageError};
use serde::Serialize;

const WIDGET_PREFIX: &str = "telemetry:widget:";
const WIDGET_SUFFIX: &str = ":clicks";

/// Snapshot of every list length and counter the endpoints write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Length of `prof:accessLog`
    pub access_log: u64,
    /// Length of `telemetry:events`
    pub telemetry_events: u64,
    /// `telemetry:facesEvents`
    pub faces_events: u64,
    /// `telemetry:facesTotal`
    pub faces_total: u64,
    /// `telemetry:widgetEvents`
    pub widget_events: u64,
    /// Per-widget click counters keyed by widget id
    pub widget_clicks: BTreeMap<String, u64>,
}

impl StoreStats {
    /// Read stats from an existing redb file
    ///
    /// A missing file is an error; nothing is created on disk.
    pub async fn read_db(path: &Path) -> Result<Self, StorageError> {
        if !path.is_file() {
            return Err(StorageError::Io(format!(
                "no database at {}",
                path.display()
            )));
        }

        let store = RedbKvStore::open_path(path)?;
        Self::collect(&store).await
    }

    /// Read the current values from a store
    pub async fn collect(store: &dyn KvStore) -> Result<Self, StorageError> {
        let widget_clicks = store
            .counters_with_prefix(WIDGET_PREFIX)
            .await?
            .into_iter()
            .filter_map(|(key, count)| {
                key.strip_prefix(WIDGET_PREFIX)
                    .and_then(|rest| rest.strip_suffix(WIDGET_SUFFIX))
                    .map(|id| (id.to_string(), count))
            })
            .collect();

        Ok(Self {
            access_log: store.list_len(keys::ACCESS_LOG).await?,
            telemetry_events: store.list_len(keys::TELEMETRY_EVENTS).await?,
            faces_events: store.counter(keys::FACES_EVENTS).await?,
            faces_total: store.counter(keys::FACES_TOTAL).await?,
            widget_events: store.counter(keys::WIDGET_EVENTS).await?,
            widget_clicks,
        })
    }
}
