//! In-memory controller asset: layers, nodes, edges and parameters.
//!
//! Nodes and edges live in handle-indexed arenas. A node is owned by its
//! parent machine's child list; the parent link on the node is only used to
//! locate it, never to keep it alive. Nothing is ever removed while authoring.

mod attachment;
mod editor;
mod error;
mod layout;
mod transitions;

pub use editor::StateEditor;
pub use error::GraphError;

use crate::core::{
    Condition, ConditionAppender, ConditionMode, EdgeFlavor, EdgeId, Endpoint, IntoConditions,
    MachineId, NodeId, Route, StateId, TransitionSettings,
};
use crate::defaults::{AuthoringDefaults, MachineAnchors, Position, StateSettings};
use crate::parameters::Parameter;
use attachment::AttachmentStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payload of a state machine node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineData {
    pub(crate) children: Vec<NodeId>,
    pub(crate) default_state: Option<StateId>,
    pub(crate) anchors: MachineAnchors,
}

impl MachineData {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn default_state(&self) -> Option<StateId> {
        self.default_state
    }

    pub fn anchors(&self) -> &MachineAnchors {
        &self.anchors
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    State(StateSettings),
    SubMachine(MachineData),
}

/// A state or a state machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) parent: Option<MachineId>,
    pub(crate) position: Position,
    pub(crate) kind: NodeKind,
}

impl Node {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning machine; `None` only for a layer root.
    pub fn parent(&self) -> Option<MachineId> {
        self.parent
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn is_state(&self) -> bool {
        matches!(self.kind, NodeKind::State(_))
    }

    pub fn state_settings(&self) -> Option<&StateSettings> {
        match &self.kind {
            NodeKind::State(settings) => Some(settings),
            NodeKind::SubMachine(_) => None,
        }
    }

    pub fn machine(&self) -> Option<&MachineData> {
        match &self.kind {
            NodeKind::SubMachine(machine) => Some(machine),
            NodeKind::State(_) => None,
        }
    }
}

/// A guarded transition. Its conditions are all required to hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub(crate) machine: MachineId,
    pub(crate) route: Route,
    pub(crate) settings: Option<TransitionSettings>,
    pub(crate) conditions: Vec<Condition>,
}

impl Edge {
    /// Machine whose graph this edge is drawn in.
    pub fn machine(&self) -> MachineId {
        self.machine
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn source(&self) -> Endpoint {
        self.route.source()
    }

    pub fn destination(&self) -> Endpoint {
        self.route.destination()
    }

    /// `None` for entry and sub-machine-sourced edges.
    pub fn settings(&self) -> Option<&TransitionSettings> {
        self.settings.as_ref()
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn flavor(&self) -> EdgeFlavor {
        self.route.flavor()
    }
}

/// A named layer rooted at its own machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    pub machine: MachineId,
}

/// Controller asset being authored.
#[derive(Debug)]
pub struct ControllerGraph {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) defaults: AuthoringDefaults,
    pub(crate) parameters: Vec<Parameter>,
    pub(crate) layers: Vec<Layer>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    attachments: AttachmentStore,
}

impl ControllerGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_defaults(name, AuthoringDefaults::default())
    }

    pub fn with_defaults(name: impl Into<String>, defaults: AuthoringDefaults) -> Self {
        Self::from_parts(Uuid::new_v4(), name.into(), defaults)
    }

    pub(crate) fn from_parts(id: Uuid, name: String, defaults: AuthoringDefaults) -> Self {
        Self {
            id,
            name,
            defaults,
            parameters: Vec::new(),
            layers: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            attachments: AttachmentStore::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn defaults(&self) -> &AuthoringDefaults {
        &self.defaults
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Adds a layer and returns its root machine.
    pub fn add_layer(&mut self, name: impl Into<String>) -> MachineId {
        let name = name.into();
        let id = self.push_node(Node {
            name: name.clone(),
            parent: None,
            position: Position::default(),
            kind: NodeKind::SubMachine(MachineData {
                children: Vec::new(),
                default_state: None,
                anchors: self.defaults.configure_machine(),
            }),
        });
        let machine = MachineId(id);
        tracing::debug!(layer = %name, %machine, "added layer");
        self.layers.push(Layer { name, machine });
        machine
    }

    /// Adds a state below the previously added sibling.
    pub fn new_state(&mut self, machine: MachineId, name: &str) -> Result<StateId, GraphError> {
        let last = self.last_node_position(machine)?;
        let state = self.new_state_at(machine, name, 0, 0)?;
        self.shift(state, last, 0, 1)?;
        Ok(state)
    }

    /// Adds a state at grid cell `(x, y)`.
    pub fn new_state_at(
        &mut self,
        machine: MachineId,
        name: &str,
        x: i32,
        y: i32,
    ) -> Result<StateId, GraphError> {
        self.machine_data(machine)?;
        let id = self.push_node(Node {
            name: name.to_string(),
            parent: Some(machine),
            position: self.defaults.grid_position(x, y),
            kind: NodeKind::State(self.defaults.configure_state()),
        });
        let state = StateId(id);
        if let Some(data) = self.machine_data_mut(machine) {
            data.children.push(id);
            if data.default_state.is_none() {
                data.default_state = Some(state);
            }
        }
        tracing::debug!(%machine, %state, name, "added state");
        Ok(state)
    }

    /// Adds a sub-machine below the previously added sibling.
    pub fn new_sub_machine(
        &mut self,
        parent: MachineId,
        name: &str,
    ) -> Result<MachineId, GraphError> {
        let last = self.last_node_position(parent)?;
        let machine = self.new_sub_machine_at(parent, name, 0, 0)?;
        self.shift(machine, last, 0, 1)?;
        Ok(machine)
    }

    /// Adds a sub-machine at grid cell `(x, y)`.
    pub fn new_sub_machine_at(
        &mut self,
        parent: MachineId,
        name: &str,
        x: i32,
        y: i32,
    ) -> Result<MachineId, GraphError> {
        self.machine_data(parent)?;
        let id = self.push_node(Node {
            name: name.to_string(),
            parent: Some(parent),
            position: self.defaults.grid_position(x, y),
            kind: NodeKind::SubMachine(MachineData {
                children: Vec::new(),
                default_state: None,
                anchors: self.defaults.configure_machine(),
            }),
        });
        if let Some(data) = self.machine_data_mut(parent) {
            data.children.push(id);
        }
        let machine = MachineId(id);
        tracing::debug!(%parent, %machine, name, "added sub-machine");
        Ok(machine)
    }

    /// Designates the state entered when `machine` is entered.
    pub fn set_default_state(
        &mut self,
        machine: MachineId,
        state: StateId,
    ) -> Result<(), GraphError> {
        if self.parent_of_state(state)? != machine {
            return Err(GraphError::InvalidTopology {
                reason: format!("{state} is not a child of {machine}"),
            });
        }
        if let Some(data) = self.machine_data_mut(machine) {
            data.default_state = Some(state);
        }
        Ok(())
    }

    pub fn node(&self, node: impl Into<NodeId>) -> Result<&Node, GraphError> {
        let node = node.into();
        self.nodes
            .get(node.index())
            .ok_or(GraphError::UnknownNode { node })
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn children(&self, machine: MachineId) -> Result<&[NodeId], GraphError> {
        Ok(self.machine_data(machine)?.children())
    }

    pub fn parent(&self, node: impl Into<NodeId>) -> Result<Option<MachineId>, GraphError> {
        Ok(self.node(node)?.parent)
    }

    pub fn default_state(&self, machine: MachineId) -> Result<Option<StateId>, GraphError> {
        Ok(self.machine_data(machine)?.default_state)
    }

    /// Finds a direct child state of `machine` by name.
    pub fn find_state(&self, machine: MachineId, name: &str) -> Option<StateId> {
        let data = self.machine_data(machine).ok()?;
        data.children
            .iter()
            .copied()
            .find(|id| {
                self.nodes
                    .get(id.index())
                    .is_some_and(|node| node.is_state() && node.name == name)
            })
            .map(StateId)
    }

    pub fn edge(&self, edge: EdgeId) -> Result<&Edge, GraphError> {
        self.edges
            .get(edge.index())
            .ok_or(GraphError::UnknownEdge { edge })
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (EdgeId(i as u32), edge))
    }

    /// All edges sharing an endpoint pair, in creation order.
    pub fn edges_between(&self, source: Endpoint, destination: Endpoint) -> Vec<EdgeId> {
        self.edges()
            .filter(|(_, edge)| edge.source() == source && edge.destination() == destination)
            .map(|(id, _)| id)
            .collect()
    }

    /// Appends one clause to an existing edge.
    pub fn append_condition(
        &mut self,
        edge: EdgeId,
        parameter: &str,
        mode: ConditionMode,
        threshold: f32,
    ) -> Result<(), GraphError> {
        let slot = self
            .edges
            .get_mut(edge.index())
            .ok_or(GraphError::UnknownEdge { edge })?;
        ConditionAppender::new(&mut slot.conditions).add(parameter, mode, threshold);
        Ok(())
    }

    pub(crate) fn push_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub(crate) fn machine_data(&self, machine: MachineId) -> Result<&MachineData, GraphError> {
        match &self.node(machine)?.kind {
            NodeKind::SubMachine(data) => Ok(data),
            NodeKind::State(_) => Err(GraphError::NotASubMachine {
                node: machine.node(),
            }),
        }
    }

    fn machine_data_mut(&mut self, machine: MachineId) -> Option<&mut MachineData> {
        match &mut self.nodes.get_mut(machine.node().index())?.kind {
            NodeKind::SubMachine(data) => Some(data),
            NodeKind::State(_) => None,
        }
    }

    pub(crate) fn state_settings_mut(
        &mut self,
        state: StateId,
    ) -> Result<&mut StateSettings, GraphError> {
        let node = state.node();
        match &mut self
            .nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode { node })?
            .kind
        {
            NodeKind::State(settings) => Ok(settings),
            NodeKind::SubMachine(_) => Err(GraphError::NotAState { node }),
        }
    }

    /// Machine that owns `state`.
    pub(crate) fn parent_of_state(&self, state: StateId) -> Result<MachineId, GraphError> {
        let node = self.node(state)?;
        if !node.is_state() {
            return Err(GraphError::NotAState { node: state.node() });
        }
        node.parent.ok_or(GraphError::NotAState { node: state.node() })
    }

    /// Machine that owns `machine`, failing for layer roots.
    pub(crate) fn parent_of_machine(&self, machine: MachineId) -> Result<MachineId, GraphError> {
        self.machine_data(machine)?;
        self.node(machine)?
            .parent
            .ok_or(GraphError::RootMachine { machine })
    }

    /// Checks that a node endpoint refers to a node of the right kind.
    pub(crate) fn check_endpoint(&self, endpoint: Endpoint) -> Result<(), GraphError> {
        match endpoint {
            Endpoint::State(state) => self.parent_of_state(state).map(|_| ()),
            Endpoint::SubMachine(machine) => self.machine_data(machine).map(|_| ()),
            Endpoint::Absent => Ok(()),
        }
    }

    /// Appends clauses to one edge. Unknown edges are left untouched.
    pub(crate) fn append_conditions<C: IntoConditions + ?Sized>(
        &mut self,
        edge: EdgeId,
        conditions: &C,
    ) {
        if let Some(edge) = self.edges.get_mut(edge.index()) {
            conditions.apply_to(&mut ConditionAppender::new(&mut edge.conditions));
        }
    }
}
