//! Error types for logging setup

use thiserror::Error;

/// Errors that can occur while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Log directory or file could not be created
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    /// Level or target directive did not parse
    #[error("Invalid filter directive: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    /// A global subscriber is already installed
    #[error("Global subscriber already set: {0}")]
    AlreadyInitialized(String),
}
