//! # Canvaslab Core
//!
//! Core types and errors shared by the canvaslab ingestion stack.
//!
//! ## Key Types
//!
//! - [`Event`]: A producer-supplied JSON record (access log or telemetry)
//! - [`EventKind`]: Telemetry sub-types that carry counters
//! - [`keys`]: Names of the lists and counters kept in the key-value store
//!
//! Presence checks use JavaScript truthiness (see [`is_truthy`]) so that
//! producers written against a JS backend keep the same acceptance rules.

pub mod error;
pub mod event;
pub mod keys;

// Re-export main types
pub use error::*;
pub use event::*;
