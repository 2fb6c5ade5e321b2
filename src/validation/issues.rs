//! Findings reported by controller validation.

use crate::core::{ConditionMode, EdgeId, MachineId};
use crate::parameters::ParameterKind;
use thiserror::Error;

/// A problem that would make the authored controller misbehave in the host.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphIssue {
    #[error("Condition on {edge} uses undeclared parameter '{parameter}'")]
    UnregisteredParameter { edge: EdgeId, parameter: String },

    #[error("Condition on {edge} compares {kind} parameter '{parameter}' with '{mode}'")]
    IncompatibleCondition {
        edge: EdgeId,
        parameter: String,
        kind: ParameterKind,
        mode: ConditionMode,
    },

    /// Timed edge with neither conditions nor exit time.
    #[error("Transition {edge} has no conditions and no exit time, it never fires")]
    NeverFires { edge: EdgeId },

    #[error("Machine {machine} has states but no default state")]
    MissingDefaultState { machine: MachineId },

    #[error("Custom check failed: {message}")]
    CustomCheckFailed { message: String },
}
