//! Stable arena handles for nodes and edges.
//!
//! Handles are plain indices into the owning [`ControllerGraph`](crate::graph::ControllerGraph).
//! They are only meaningful for the controller that issued them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of any node (state or sub-machine) in a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Handle of a leaf state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(pub(crate) NodeId);

impl StateId {
    pub fn node(self) -> NodeId {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state#{}", self.0 .0)
    }
}

/// Handle of a state machine (a layer root or a nested sub-machine).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MachineId(pub(crate) NodeId);

impl MachineId {
    pub fn node(self) -> NodeId {
        self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "machine#{}", self.0 .0)
    }
}

impl From<StateId> for NodeId {
    fn from(id: StateId) -> Self {
        id.0
    }
}

impl From<MachineId> for NodeId {
    fn from(id: MachineId) -> Self {
        id.0
    }
}

/// Handle of a transition edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "edge#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_handles_convert_to_node_ids() {
        let state = StateId(NodeId(3));
        let machine = MachineId(NodeId(0));

        assert_eq!(NodeId::from(state), NodeId(3));
        assert_eq!(machine.node(), NodeId(0));
    }

    #[test]
    fn handles_display_with_their_kind() {
        assert_eq!(StateId(NodeId(2)).to_string(), "state#2");
        assert_eq!(MachineId(NodeId(1)).to_string(), "machine#1");
        assert_eq!(EdgeId(7).to_string(), "edge#7");
    }
}
