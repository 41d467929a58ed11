//! Error types for the workbench

use thiserror::Error;

/// Errors from loading, combining, or encoding images
#[derive(Debug, Error)]
pub enum WorkbenchError {
    /// An operation was requested before both slots were loaded
    #[error("Load both images before applying an operation")]
    MissingInputs,

    /// Blend weight outside `[0, 1]` or not a number
    #[error("Alpha must be a number between 0 and 1, got {0}")]
    InvalidAlpha(String),

    /// Inputs to an operation have different dimensions
    #[error("Image sizes differ: {first:?} vs {second:?}")]
    SizeMismatch {
        /// Width and height of the first image
        first: (u32, u32),
        /// Width and height of the second image
        second: (u32, u32),
    },

    /// Decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkbenchError {
    /// Create an invalid alpha error from the rejected input
    pub fn invalid_alpha(value: impl ToString) -> Self {
        Self::InvalidAlpha(value.to_string())
    }
}

/// Result type for workbench operations
pub type WorkbenchResult<T> = Result<T, WorkbenchError>;
