//! Structured, serializable model state.
//!
//! A snapshot is the model's self-description: its version label, an
//! architecture tag, and named weight tensors. The worker serializes
//! snapshots at its lock-protected boundary; callers that want a
//! different wire format serialize the snapshot themselves with any
//! serde backend.

use serde::{Deserialize, Serialize};
use std::io;

/// One named weight tensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedTensor {
    /// Tensor identity within the architecture (e.g. `"fast"`).
    pub label: String,
    /// Tensor shape; the product equals `data.len()`.
    pub shape: Vec<usize>,
    /// Flattened tensor data (row-major order).
    pub data: Vec<f32>,
}

/// Serializable state of a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    /// Version label at snapshot time.
    pub name: String,
    /// Architecture tag guarding restores.
    pub arch: String,
    /// Named weight tensors.
    pub tensors: Vec<NamedTensor>,
}

impl ModelSnapshot {
    /// Look up a tensor by label.
    #[must_use]
    pub fn tensor(&self, label: &str) -> Option<&NamedTensor> {
        self.tensors.iter().find(|t| t.label == label)
    }

    /// Compact byte encoding.
    pub fn to_bytes(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    /// Decode from [`ModelSnapshot::to_bytes`] output.
    pub fn from_bytes(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }

    /// Serialize into a writer using the compact byte encoding.
    pub fn write_to(&self, writer: &mut dyn io::Write) -> bincode::Result<()> {
        bincode::serialize_into(writer, self)
    }
}
