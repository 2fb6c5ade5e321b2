//! Transition endpoints and the dispatch from endpoint pairs to host edge primitives.

use super::ids::{MachineId, StateId};
use crate::graph::GraphError;
use serde::{Deserialize, Serialize};

/// Source or destination of a transition.
///
/// `Absent` reads as "any state" or "entry" when used as a source, and as
/// "exit" when used as a destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
    State(StateId),
    SubMachine(MachineId),
    Absent,
}

impl Endpoint {
    pub fn try_get_state(&self) -> Option<StateId> {
        match self {
            Endpoint::State(state) => Some(*state),
            _ => None,
        }
    }

    pub fn try_get_state_machine(&self) -> Option<MachineId> {
        match self {
            Endpoint::SubMachine(machine) => Some(*machine),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Endpoint::Absent)
    }
}

impl From<StateId> for Endpoint {
    fn from(state: StateId) -> Self {
        Endpoint::State(state)
    }
}

impl From<MachineId> for Endpoint {
    fn from(machine: MachineId) -> Self {
        Endpoint::SubMachine(machine)
    }
}

/// Whether an edge carries a settings bundle.
///
/// The host stores state-sourced and any-state edges as timed transitions,
/// while entry and sub-machine-sourced edges have no duration, exit time or
/// interruption semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeFlavor {
    Timed,
    Untimed,
}

/// A validated host edge primitive.
///
/// Only [`Route::resolve`] builds routes from endpoints, so holding a `Route`
/// proves the endpoint pair maps to exactly one primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// State to state or sub-machine.
    StateTo { from: StateId, to: Endpoint },
    /// State to the exit of its machine.
    StateExit { from: StateId },
    /// Any state of `machine` to a node.
    AnyState { machine: MachineId, to: Endpoint },
    /// Entry of `machine` to a node.
    Entry { machine: MachineId, to: Endpoint },
    /// Sub-machine to a node, stored on the parent `machine`.
    MachineTo {
        machine: MachineId,
        from: MachineId,
        to: Endpoint,
    },
    /// Sub-machine to the exit of the parent `machine`.
    MachineExit { machine: MachineId, from: MachineId },
}

impl Route {
    /// Picks the host primitive for an endpoint pair.
    ///
    /// `machine` is the machine the edge is stored on; it only matters for
    /// any-state, entry and sub-machine-sourced primitives.
    pub fn resolve(
        flavor: EdgeFlavor,
        machine: MachineId,
        source: Endpoint,
        destination: Endpoint,
    ) -> Result<Route, GraphError> {
        match (flavor, source, destination) {
            (_, Endpoint::Absent, Endpoint::Absent) => Err(GraphError::InvalidTopology {
                reason: "transition has no source nor destination".to_string(),
            }),
            (EdgeFlavor::Timed, Endpoint::Absent, to) => Ok(Route::AnyState { machine, to }),
            (EdgeFlavor::Timed, Endpoint::State(from), Endpoint::Absent) => {
                Ok(Route::StateExit { from })
            }
            (EdgeFlavor::Timed, Endpoint::State(from), to) => Ok(Route::StateTo { from, to }),
            (EdgeFlavor::Timed, Endpoint::SubMachine(from), _) => {
                Err(GraphError::InvalidTopology {
                    reason: format!("timed transition cannot start from sub-machine {from}"),
                })
            }
            (EdgeFlavor::Untimed, Endpoint::Absent, to) => Ok(Route::Entry { machine, to }),
            (EdgeFlavor::Untimed, Endpoint::SubMachine(from), Endpoint::Absent) => {
                Ok(Route::MachineExit { machine, from })
            }
            (EdgeFlavor::Untimed, Endpoint::SubMachine(from), to) => {
                Ok(Route::MachineTo { machine, from, to })
            }
            (EdgeFlavor::Untimed, Endpoint::State(from), _) => Err(GraphError::InvalidTopology {
                reason: format!("untimed transition cannot start from state {from}"),
            }),
        }
    }

    pub fn source(&self) -> Endpoint {
        match *self {
            Route::StateTo { from, .. } | Route::StateExit { from } => Endpoint::State(from),
            Route::AnyState { .. } | Route::Entry { .. } => Endpoint::Absent,
            Route::MachineTo { from, .. } | Route::MachineExit { from, .. } => {
                Endpoint::SubMachine(from)
            }
        }
    }

    pub fn destination(&self) -> Endpoint {
        match *self {
            Route::StateTo { to, .. }
            | Route::AnyState { to, .. }
            | Route::Entry { to, .. }
            | Route::MachineTo { to, .. } => to,
            Route::StateExit { .. } | Route::MachineExit { .. } => Endpoint::Absent,
        }
    }

    pub fn flavor(&self) -> EdgeFlavor {
        match self {
            Route::StateTo { .. } | Route::StateExit { .. } | Route::AnyState { .. } => {
                EdgeFlavor::Timed
            }
            Route::Entry { .. } | Route::MachineTo { .. } | Route::MachineExit { .. } => {
                EdgeFlavor::Untimed
            }
        }
    }
}
