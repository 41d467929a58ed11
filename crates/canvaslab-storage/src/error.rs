//! Error types for canvaslab-storage
//!
//! This module defines the error types used throughout the storage crate.

use thiserror::Error;

/// Errors that can occur in storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during storage operations
    #[error("I/O error: {0}")]
    Io(String),

    /// Key already holds a value of the other kind (list vs counter)
    #[error("Wrong type for key {key}: expected {expected}")]
    WrongType {
        /// Offending key
        key: String,
        /// Kind the operation needed
        expected: &'static str,
    },

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Blocking storage task failed to complete
    #[error("Storage task failed: {0}")]
    Task(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl StorageError {
    /// Create a new WrongType error
    pub fn wrong_type(key: impl Into<String>, expected: &'static str) -> Self {
        Self::WrongType {
            key: key.into(),
            expected,
        }
    }

    /// Create a new Database error
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }
}

macro_rules! impl_from_redb {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for StorageError {
                fn from(err: $ty) -> Self {
                    StorageError::Database(err.to_string())
                }
            }
        )*
    };
}

impl_from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<tokio::task::JoinError> for StorageError {
    fn from(err: tokio::task::JoinError) -> Self {
        StorageError::Task(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_type_error() {
        let err = StorageError::wrong_type("telemetry:events", "counter");
        assert!(matches!(err, StorageError::WrongType { .. }));
        assert!(err.to_string().contains("telemetry:events"));
        assert!(err.to_string().contains("counter"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let storage_err: StorageError = io_err.into();
        assert!(matches!(storage_err, StorageError::Io(_)));
    }

    #[test]
    fn test_database_error() {
        let err = StorageError::database("table missing");
        assert!(matches!(err, StorageError::Database(_)));
    }
}
