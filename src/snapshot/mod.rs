//! Export and restore of a controller's authored data.
//!
//! A snapshot carries everything needed to rebuild the graph: defaults,
//! parameters, layers, nodes and edges with their conditions. Node
//! attachments are runtime objects and are not exported.

use crate::core::MachineId;
use crate::defaults::AuthoringDefaults;
use crate::graph::{ControllerGraph, Edge, Layer, Node, NodeKind};
use crate::parameters::Parameter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for the snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable copy of a controller graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControllerSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Identity of the exported controller
    pub id: Uuid,

    pub exported_at: DateTime<Utc>,

    pub name: String,

    pub defaults: AuthoringDefaults,

    pub parameters: Vec<Parameter>,

    pub layers: Vec<Layer>,

    /// Node arena, indexed by node handle
    pub nodes: Vec<Node>,

    /// Edge arena, indexed by edge handle
    pub edges: Vec<Edge>,
}

impl ControllerSnapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str(json).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))
    }
}

impl ControllerGraph {
    /// Captures the authored data of this controller.
    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            version: SNAPSHOT_VERSION,
            id: self.id,
            exported_at: Utc::now(),
            name: self.name.clone(),
            defaults: self.defaults.clone(),
            parameters: self.parameters.clone(),
            layers: self.layers.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
        }
    }

    /// Rebuilds a controller from a snapshot, keeping its id and handles.
    pub fn restore(snapshot: ControllerSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut graph = Self::from_parts(snapshot.id, snapshot.name, snapshot.defaults);
        graph.parameters = snapshot.parameters;
        graph.layers = snapshot.layers;
        graph.nodes = snapshot.nodes;
        graph.edges = snapshot.edges;
        graph.check_references()?;

        tracing::debug!(
            controller = %graph.id,
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "restored controller"
        );
        Ok(graph)
    }

    /// Every handle stored in the arenas must resolve to a node of the
    /// expected kind, and the links between nodes and edges must agree.
    fn check_references(&self) -> Result<(), SnapshotError> {
        for layer in &self.layers {
            self.machine_data(layer.machine)?;
        }
        for (id, node) in self.nodes() {
            if let Some(parent) = node.parent() {
                if !self.machine_data(parent)?.children().contains(&id) {
                    return Err(SnapshotError::BrokenLink(format!(
                        "{id} names {parent} as parent but is not one of its children"
                    )));
                }
            }
            if let NodeKind::SubMachine(data) = node.kind() {
                let machine = MachineId(id);
                for child in data.children() {
                    if self.node(*child)?.parent() != Some(machine) {
                        return Err(SnapshotError::BrokenLink(format!(
                            "{child} is listed under {machine} but names another parent"
                        )));
                    }
                }
                if let Some(state) = data.default_state() {
                    self.parent_of_state(state)?;
                }
            }
        }
        for (id, edge) in self.edges() {
            self.machine_data(edge.machine())?;
            self.check_endpoint(edge.source())?;
            self.check_endpoint(edge.destination())?;
            let host = self.route_machine(edge.route());
            if host != edge.machine() {
                return Err(SnapshotError::BrokenLink(format!(
                    "{id} is stored on {} but its route belongs to {host}",
                    edge.machine()
                )));
            }
        }
        Ok(())
    }
}
