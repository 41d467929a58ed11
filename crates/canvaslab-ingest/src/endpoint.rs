//! Ingestion endpoints
//!
//! Both endpoints share one contract: POST only, a JSON object body, a fixed
//! set of required truthy fields, and a single atomic store batch on success.
//! They differ in the required fields, the target list, and whether
//! telemetry counters are bumped.

use axum::http::Method;
use bytes::Bytes;
use canvaslab_core::{Event, EventKind, FIELD_SESSION_ID, FIELD_TS, FIELD_TYPE, keys};
use canvaslab_storage::{KvStore, WriteBatch};
use tracing::{debug, instrument, warn};

use crate::error::IngestError;

/// An ingestion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/api/prof-access`: access log records
    AccessLog,
    /// `/api/telemetry`: telemetry events with per-type counters
    Telemetry,
}

impl Endpoint {
    /// Route path
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::AccessLog => "/api/prof-access",
            Endpoint::Telemetry => "/api/telemetry",
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::AccessLog => "prof-access",
            Endpoint::Telemetry => "telemetry",
        }
    }

    /// Fields that must be present and truthy
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Endpoint::AccessLog => &[FIELD_TS, FIELD_SESSION_ID],
            Endpoint::Telemetry => &[FIELD_TYPE, FIELD_SESSION_ID, FIELD_TS],
        }
    }

    /// List that accepted events are appended to
    pub fn list_key(&self) -> &'static str {
        match self {
            Endpoint::AccessLog => keys::ACCESS_LOG,
            Endpoint::Telemetry => keys::TELEMETRY_EVENTS,
        }
    }

    /// Decode and validate a raw body
    pub fn parse(&self, body: &[u8]) -> Result<Event, IngestError> {
        let event = Event::from_slice(body)?;
        event.require(self.required_fields())?;
        Ok(event)
    }

    /// Build the store batch for an accepted event
    ///
    /// The batch always appends the serialized event; telemetry `faces` and
    /// `widget` events add their counter increments to the same batch.
    pub fn plan(&self, event: &Event) -> Result<WriteBatch, IngestError> {
        let serialized = event
            .to_json()
            .map_err(|e| IngestError::Internal(e.to_string()))?;

        let mut batch = WriteBatch::new();
        batch.append(self.list_key(), serialized);

        if *self != Endpoint::Telemetry {
            return Ok(batch);
        }

        match event.kind() {
            Some(EventKind::Faces) => {
                batch
                    .increment_by(keys::FACES_EVENTS, 1)
                    .increment_by(keys::FACES_TOTAL, event.faces_count());
            }
            Some(EventKind::Widget) => {
                batch.increment_by(keys::WIDGET_EVENTS, 1);
                match event.widget() {
                    Some(widget) => {
                        batch.increment_by(keys::widget_clicks(&widget), 1);
                    }
                    None => warn!(
                        session = event.session_id().unwrap_or_default(),
                        "Widget event without widget id; per-widget counter skipped"
                    ),
                }
            }
            Some(EventKind::Other(_)) | None => {}
        }

        Ok(batch)
    }

    /// Handle one request: check the verb, validate, and store
    ///
    /// Nothing is written unless the request is a valid POST, and then the
    /// list append and any counter increments commit together.
    #[instrument(skip(self, store, body), fields(endpoint = self.name(), bytes = body.len()))]
    pub async fn ingest(
        &self,
        store: &dyn KvStore,
        method: &Method,
        body: &Bytes,
    ) -> Result<(), IngestError> {
        if *method != Method::POST {
            return Err(IngestError::MethodNotAllowed(method.clone()));
        }

        let event = self.parse(body)?;
        let batch = self.plan(&event)?;
        let ops = batch.len();

        store.apply(batch).await?;

        debug!(
            session = event.session_id().unwrap_or_default(),
            kind = event.event_type().unwrap_or_default(),
            ops,
            "Event stored"
        );
        Ok(())
    }
}
