//! Write batches
//!
//! A [`WriteBatch`] groups list appends and counter increments that must land
//! together. Backends apply a batch all-or-nothing.

use serde::{Deserialize, Serialize};

/// A single store mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOp {
    /// Push a value onto the tail of a list
    Append {
        /// List key
        list: String,
        /// Serialized value
        value: String,
    },
    /// Add to a counter, creating it at zero first if needed
    IncrementBy {
        /// Counter key
        key: String,
        /// Amount to add
        delta: u64,
    },
}

impl WriteOp {
    /// Key this operation touches
    pub fn key(&self) -> &str {
        match self {
            WriteOp::Append { list, .. } => list,
            WriteOp::IncrementBy { key, .. } => key,
        }
    }
}

/// Ordered set of mutations applied atomically
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a list append
    pub fn append(&mut self, list: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.ops.push(WriteOp::Append {
            list: list.into(),
            value: value.into(),
        });
        self
    }

    /// Queue a counter increment
    pub fn increment_by(&mut self, key: impl Into<String>, delta: u64) -> &mut Self {
        self.ops.push(WriteOp::IncrementBy {
            key: key.into(),
            delta,
        });
        self
    }

    /// Number of queued operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Queued operations in order
    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    /// Consume the batch
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
