//! Errors raised while authoring a controller graph.

use crate::core::{EdgeId, MachineId, NodeId};
use crate::parameters::ParameterKind;
use thiserror::Error;

/// Errors that can occur when creating nodes, edges or parameters.
///
/// Every variant is raised before the graph is mutated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error("Invalid transition topology: {reason}")]
    InvalidTopology { reason: String },

    #[error("Node {node} does not exist in this controller")]
    UnknownNode { node: NodeId },

    #[error("Edge {edge} does not exist in this controller")]
    UnknownEdge { edge: EdgeId },

    #[error("Node {node} is not a state")]
    NotAState { node: NodeId },

    #[error("Node {node} is not a state machine")]
    NotASubMachine { node: NodeId },

    #[error("Machine {machine} is a layer root and has no parent machine")]
    RootMachine { machine: MachineId },

    #[error("Parameter '{name}' is already registered as {existing}, cannot use it as {requested}")]
    ParameterKindMismatch {
        name: String,
        existing: ParameterKind,
        requested: ParameterKind,
    },

    #[error("Clause on {edge} does not belong to this transition")]
    ForeignClause { edge: EdgeId },
}
