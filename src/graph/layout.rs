//! Node positioning on the machine grid.
//!
//! Positions are stored on the node itself, indexed by its handle, so an
//! update is an in-place write and never adds a second entry.

use super::{ControllerGraph, GraphError, NodeKind};
use crate::core::{MachineId, NodeId};
use crate::defaults::{MachineAnchors, Position};

impl ControllerGraph {
    pub fn position(&self, node: impl Into<NodeId>) -> Result<Position, GraphError> {
        Ok(self.node(node)?.position)
    }

    pub fn set_position(
        &mut self,
        node: impl Into<NodeId>,
        position: Position,
    ) -> Result<(), GraphError> {
        let node = node.into();
        let slot = self
            .nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode { node })?;
        slot.position = position;
        Ok(())
    }

    /// Moves a node to grid cell `(x, y)`.
    pub fn at(&mut self, node: impl Into<NodeId>, x: i32, y: i32) -> Result<(), GraphError> {
        let position = self.defaults.grid_position(x, y);
        self.set_position(node, position)
    }

    /// Places a node `(dx, dy)` cells away from `origin`.
    pub fn shift(
        &mut self,
        node: impl Into<NodeId>,
        origin: Position,
        dx: i32,
        dy: i32,
    ) -> Result<(), GraphError> {
        let position = origin + self.defaults.grid_position(dx, dy);
        self.set_position(node, position)
    }

    pub fn under(
        &mut self,
        node: impl Into<NodeId>,
        other: impl Into<NodeId>,
    ) -> Result<(), GraphError> {
        self.shift_from(node.into(), other.into(), 0, 1)
    }

    pub fn over(
        &mut self,
        node: impl Into<NodeId>,
        other: impl Into<NodeId>,
    ) -> Result<(), GraphError> {
        self.shift_from(node.into(), other.into(), 0, -1)
    }

    pub fn left_of(
        &mut self,
        node: impl Into<NodeId>,
        other: impl Into<NodeId>,
    ) -> Result<(), GraphError> {
        self.shift_from(node.into(), other.into(), -1, 0)
    }

    pub fn right_of(
        &mut self,
        node: impl Into<NodeId>,
        other: impl Into<NodeId>,
    ) -> Result<(), GraphError> {
        self.shift_from(node.into(), other.into(), 1, 0)
    }

    fn shift_from(
        &mut self,
        node: NodeId,
        other: NodeId,
        dx: i32,
        dy: i32,
    ) -> Result<(), GraphError> {
        self.node(node)?;
        let origin = self.position(other)?;
        self.shift(node, origin, dx, dy)
    }

    /// Current position of the last child of `machine`, or the first-child
    /// origin when the machine is empty.
    pub(crate) fn last_node_position(&self, machine: MachineId) -> Result<Position, GraphError> {
        let data = self.machine_data(machine)?;
        match data.children.last() {
            Some(last) => self.position(*last),
            None => Ok(self.defaults.first_child_origin()),
        }
    }

    pub fn with_entry_position(
        &mut self,
        machine: MachineId,
        x: i32,
        y: i32,
    ) -> Result<(), GraphError> {
        let position = self.defaults.grid_position(x, y);
        self.anchors_mut(machine)?.entry = position;
        Ok(())
    }

    pub fn with_exit_position(
        &mut self,
        machine: MachineId,
        x: i32,
        y: i32,
    ) -> Result<(), GraphError> {
        let position = self.defaults.grid_position(x, y);
        self.anchors_mut(machine)?.exit = position;
        Ok(())
    }

    pub fn with_any_state_position(
        &mut self,
        machine: MachineId,
        x: i32,
        y: i32,
    ) -> Result<(), GraphError> {
        let position = self.defaults.grid_position(x, y);
        self.anchors_mut(machine)?.any_state = position;
        Ok(())
    }

    pub fn with_parent_machine_position(
        &mut self,
        machine: MachineId,
        x: i32,
        y: i32,
    ) -> Result<(), GraphError> {
        let position = self.defaults.grid_position(x, y);
        self.anchors_mut(machine)?.parent_machine = position;
        Ok(())
    }

    fn anchors_mut(&mut self, machine: MachineId) -> Result<&mut MachineAnchors, GraphError> {
        let node = machine.node();
        match &mut self
            .nodes
            .get_mut(node.index())
            .ok_or(GraphError::UnknownNode { node })?
            .kind
        {
            NodeKind::SubMachine(data) => Ok(&mut data.anchors),
            NodeKind::State(_) => Err(GraphError::NotASubMachine { node }),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::defaults::{AuthoringDefaults, Position};
    use crate::graph::{ControllerGraph, GraphError};

    fn unit_graph() -> ControllerGraph {
        ControllerGraph::with_defaults("Layout", AuthoringDefaults::unit_grid())
    }

    #[test]
    fn second_state_lands_one_cell_below_the_first() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let a = graph.new_state_at(layer, "A", 0, 0).unwrap();
        let b = graph.new_state(layer, "B").unwrap();

        assert_eq!(graph.position(a).unwrap(), Position::new(0.0, 0.0));
        assert_eq!(graph.position(b).unwrap(), Position::new(0.0, 1.0));
    }

    #[test]
    fn first_child_uses_origin_offset() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let first = graph.new_state(layer, "First").unwrap();

        assert_eq!(graph.position(first).unwrap(), Position::new(2.0, 1.0));
    }

    #[test]
    fn default_layout_follows_moved_sibling() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let a = graph.new_state_at(layer, "A", 0, 0).unwrap();
        graph.at(a, 4, 3).unwrap();
        let b = graph.new_state(layer, "B").unwrap();

        assert_eq!(graph.position(b).unwrap(), Position::new(4.0, 4.0));
    }

    #[test]
    fn sub_machines_join_the_sibling_layout() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        graph.new_state_at(layer, "A", 1, 1).unwrap();
        let sub = graph.new_sub_machine(layer, "Sub").unwrap();
        let c = graph.new_state(layer, "C").unwrap();

        assert_eq!(graph.position(sub).unwrap(), Position::new(1.0, 2.0));
        assert_eq!(graph.position(c).unwrap(), Position::new(1.0, 3.0));
    }

    #[test]
    fn set_position_updates_in_place() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();

        graph.set_position(a, Position::new(9.0, 9.0)).unwrap();
        graph.set_position(a, Position::new(5.0, 6.0)).unwrap();

        assert_eq!(graph.children(layer).unwrap().len(), 1);
        assert_eq!(graph.position(a).unwrap(), Position::new(5.0, 6.0));
    }

    #[test]
    fn relative_placement() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let a = graph.new_state_at(layer, "A", 3, 3).unwrap();
        let b = graph.new_state_at(layer, "B", 0, 0).unwrap();

        graph.right_of(b, a).unwrap();
        assert_eq!(graph.position(b).unwrap(), Position::new(4.0, 3.0));
        graph.left_of(b, a).unwrap();
        assert_eq!(graph.position(b).unwrap(), Position::new(2.0, 3.0));
        graph.over(b, a).unwrap();
        assert_eq!(graph.position(b).unwrap(), Position::new(3.0, 2.0));
        graph.under(b, a).unwrap();
        assert_eq!(graph.position(b).unwrap(), Position::new(3.0, 4.0));
    }

    #[test]
    fn anchors_are_placed_on_the_grid() {
        let mut graph = ControllerGraph::new("Layout");
        let layer = graph.add_layer("Base");

        graph.with_exit_position(layer, 2, 0).unwrap();
        graph.with_entry_position(layer, -1, 0).unwrap();

        let anchors = *graph.node(layer).unwrap().machine().unwrap().anchors();
        assert_eq!(anchors.exit, Position::new(500.0, 0.0));
        assert_eq!(anchors.entry, Position::new(-250.0, 0.0));
    }

    #[test]
    fn anchors_require_a_machine() {
        let mut graph = unit_graph();
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();

        let result = graph.with_any_state_position(crate::core::MachineId(a.node()), 0, 0);
        assert!(matches!(result, Err(GraphError::NotASubMachine { .. })));
    }
}
