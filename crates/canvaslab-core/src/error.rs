//! Error types for canvaslab events

use thiserror::Error;

/// Errors raised while decoding or validating an event
#[derive(Debug, Error)]
pub enum EventError {
    /// Body is not valid JSON
    #[error("Malformed body: {0}")]
    Malformed(String),

    /// Body decoded to something other than a JSON object
    #[error("Event must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A required field is absent or falsy
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Event could not be serialized for storage
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EventError {
    /// Create a new MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField(field.into())
    }
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_error() {
        let err = EventError::missing_field("sessionId");
        assert!(matches!(err, EventError::MissingField(_)));
        assert!(err.to_string().contains("sessionId"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: EventError = json_err.into();
        assert!(matches!(err, EventError::Malformed(_)));
    }
}
