//! Store key names
//!
//! Lists hold serialized events in arrival order; counters are created on
//! first increment and never reset.

/// List of accepted access-log events
pub const ACCESS_LOG: &str = "prof:accessLog";

/// List of accepted telemetry events
pub const TELEMETRY_EVENTS: &str = "telemetry:events";

/// Counter: number of `faces` events seen
pub const FACES_EVENTS: &str = "telemetry:facesEvents";

/// Counter: sum of `facesCount` over all `faces` events
pub const FACES_TOTAL: &str = "telemetry:facesTotal";

/// Counter: number of `widget` events seen
pub const WIDGET_EVENTS: &str = "telemetry:widgetEvents";

/// Per-widget click counter key, `telemetry:widget:<id>:clicks`
pub fn widget_clicks(widget: &str) -> String {
    format!("telemetry:widget:{widget}:clicks")
}
