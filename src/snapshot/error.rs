//! Snapshot error types.

use crate::graph::GraphError;
use thiserror::Error;

/// Errors that can occur while exporting or restoring a controller.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The controller could not be encoded
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Input is not a controller snapshot
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// The snapshot refers to nodes that are missing or of the wrong kind
    #[error("Snapshot is inconsistent: {0}")]
    Inconsistent(#[from] GraphError),

    /// Parent, child or edge-to-machine links contradict each other
    #[error("Snapshot links disagree: {0}")]
    BrokenLink(String),
}
