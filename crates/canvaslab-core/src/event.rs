//! Ingested events
//!
//! An [`Event`] is the JSON object a producer posted, kept verbatim. Only the
//! handful of fields the endpoints inspect get typed accessors; everything
//! else passes through untouched.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EventError;

/// Field holding the producer timestamp
pub const FIELD_TS: &str = "ts";
/// Field holding the client session id
pub const FIELD_SESSION_ID: &str = "sessionId";
/// Field holding the telemetry category
pub const FIELD_TYPE: &str = "type";
/// Field holding the number of faces in a `faces` event
pub const FIELD_FACES_COUNT: &str = "facesCount";
/// Field holding the widget identifier in a `widget` event
pub const FIELD_WIDGET: &str = "widget";

/// JavaScript truthiness of a JSON value
///
/// `null`, `false`, `0` and `""` are falsy; everything else, including empty
/// arrays and objects, is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Telemetry categories that drive counters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Face detection report, carries `facesCount`
    Faces,
    /// UI widget interaction, carries `widget`
    Widget,
    /// Any other category; stored but not counted
    Other(String),
}

impl EventKind {
    /// Classify a `type` field value
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "faces" => Self::Faces,
            "widget" => Self::Widget,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A producer-supplied event record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Decode an event from a raw request body
    ///
    /// The body must be JSON. A body that decodes to a JSON string is a
    /// text payload and is decoded once more.
    pub fn from_slice(body: &[u8]) -> Result<Self, EventError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Build an event from an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self, EventError> {
        let value = match value {
            Value::String(text) => serde_json::from_str(&text)?,
            other => other,
        };

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(EventError::NotAnObject(type_name(&other))),
        }
    }

    /// Get a raw field
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Whether a field is present and truthy
    pub fn has_truthy(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(is_truthy)
    }

    /// Check that every listed field is present and truthy
    ///
    /// Reports the first failing field in list order.
    pub fn require(&self, fields: &[&str]) -> Result<(), EventError> {
        match fields.iter().find(|f| !self.has_truthy(f)) {
            Some(missing) => Err(EventError::missing_field(*missing)),
            None => Ok(()),
        }
    }

    /// The `type` field, when it is a string
    pub fn event_type(&self) -> Option<&str> {
        self.fields.get(FIELD_TYPE).and_then(Value::as_str)
    }

    /// Classified telemetry category
    pub fn kind(&self) -> Option<EventKind> {
        self.event_type().map(EventKind::from_type)
    }

    /// The `sessionId` field, when it is a string
    pub fn session_id(&self) -> Option<&str> {
        self.fields.get(FIELD_SESSION_ID).and_then(Value::as_str)
    }

    /// Number of faces reported by a `faces` event
    ///
    /// Numbers and numeric strings are accepted and truncated toward zero.
    /// Anything missing, negative, non-finite or non-numeric counts as 0.
    pub fn faces_count(&self) -> u64 {
        let Some(value) = self.fields.get(FIELD_FACES_COUNT) else {
            return 0;
        };

        let number = match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    return u;
                }
                n.as_f64()
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    trimmed.parse::<f64>().ok()
                }
            }
            _ => None,
        };

        match number {
            Some(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
            _ => 0,
        }
    }

    /// Widget identifier of a `widget` event
    ///
    /// Non-empty strings are used as is and numbers in their JSON form, so
    /// `"widget": 5` counts under `telemetry:widget:5:clicks`. Any other
    /// value has no identifier.
    pub fn widget(&self) -> Option<Cow<'_, str>> {
        match self.fields.get(FIELD_WIDGET)? {
            Value::String(s) if !s.is_empty() => Some(Cow::Borrowed(s.as_str())),
            Value::Number(n) => Some(Cow::Owned(n.to_string())),
            _ => None,
        }
    }

    /// Serialize the event exactly as received, preserving field order
    pub fn to_json(&self) -> Result<String, EventError> {
        serde_json::to_string(&self.fields).map_err(|e| EventError::Serialization(e.to_string()))
    }

    /// Number of top-level fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the event has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the event and return its fields
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1000)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_from_slice_object() {
        let event = Event::from_slice(br#"{"ts":1000,"sessionId":"s1"}"#).unwrap();
        assert_eq!(event.len(), 2);
        assert_eq!(event.session_id(), Some("s1"));
    }

    #[test]
    fn test_from_slice_text_payload() {
        let body = serde_json::to_vec(&json!(r#"{"ts":1000,"sessionId":"s1"}"#)).unwrap();
        let event = Event::from_slice(&body).unwrap();
        assert_eq!(event.get("ts"), Some(&json!(1000)));
    }

    #[test]
    fn test_from_slice_rejects_garbage() {
        let err = Event::from_slice(b"ts=1000&sessionId=s1").unwrap_err();
        assert!(matches!(err, EventError::Malformed(_)));
    }

    #[test]
    fn test_from_slice_rejects_non_object() {
        let err = Event::from_slice(b"[1,2,3]").unwrap_err();
        assert!(matches!(err, EventError::NotAnObject("array")));

        let err = Event::from_slice(b"null").unwrap_err();
        assert!(matches!(err, EventError::NotAnObject("null")));
    }

    #[test]
    fn test_require_reports_first_missing() {
        let event = Event::from_value(json!({"sessionId": "s1", "ts": 0})).unwrap();
        let err = event.require(&[FIELD_TYPE, FIELD_SESSION_ID, FIELD_TS]).unwrap_err();
        assert!(matches!(err, EventError::MissingField(ref f) if f == "type"));

        let err = event.require(&[FIELD_SESSION_ID, FIELD_TS]).unwrap_err();
        assert!(matches!(err, EventError::MissingField(ref f) if f == "ts"));
    }

    #[test]
    fn test_require_accepts_truthy_fields() {
        let event = Event::from_value(json!({"ts": "2024-01-01", "sessionId": "s1"})).unwrap();
        assert!(event.require(&[FIELD_TS, FIELD_SESSION_ID]).is_ok());
    }

    #[test]
    fn test_kind() {
        let faces = Event::from_value(json!({"type": "faces"})).unwrap();
        assert_eq!(faces.kind(), Some(EventKind::Faces));

        let widget = Event::from_value(json!({"type": "widget"})).unwrap();
        assert_eq!(widget.kind(), Some(EventKind::Widget));

        let other = Event::from_value(json!({"type": "pageview"})).unwrap();
        assert_eq!(other.kind(), Some(EventKind::Other("pageview".into())));

        let numeric = Event::from_value(json!({"type": 3})).unwrap();
        assert_eq!(numeric.kind(), None);
    }

    #[test]
    fn test_faces_count() {
        let count = |v: Value| {
            Event::from_value(json!({ "facesCount": v }))
                .unwrap()
                .faces_count()
        };

        assert_eq!(count(json!(7)), 7);
        assert_eq!(count(json!(7.9)), 7);
        assert_eq!(count(json!("12")), 12);
        assert_eq!(count(json!(" 3 ")), 3);
        assert_eq!(count(json!(-4)), 0);
        assert_eq!(count(json!("many")), 0);
        assert_eq!(count(json!(null)), 0);
        assert_eq!(count(json!(true)), 0);
        assert_eq!(count(json!([7])), 0);

        let missing = Event::from_value(json!({"type": "faces"})).unwrap();
        assert_eq!(missing.faces_count(), 0);
    }

    #[test]
    fn test_widget() {
        let event = Event::from_value(json!({"widget": "blendBtn"})).unwrap();
        assert_eq!(event.widget().as_deref(), Some("blendBtn"));

        let empty = Event::from_value(json!({"widget": ""})).unwrap();
        assert_eq!(empty.widget(), None);

        let flag = Event::from_value(json!({"widget": true})).unwrap();
        assert_eq!(flag.widget(), None);
    }

    #[test]
    fn test_numeric_widget_id() {
        let int = Event::from_value(json!({"widget": 5})).unwrap();
        assert_eq!(int.widget().as_deref(), Some("5"));

        let float = Event::from_value(json!({"widget": 1.5})).unwrap();
        assert_eq!(float.widget().as_deref(), Some("1.5"));
    }

    #[test]
    fn test_to_json_preserves_fields_and_order() {
        let body = r#"{"sessionId":"s2","ts":1001,"extra":{"nested":[1,2]}}"#;
        let event = Event::from_slice(body.as_bytes()).unwrap();
        assert_eq!(event.to_json().unwrap(), body);
    }
}
