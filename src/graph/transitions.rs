//! Transition creation and the template cloner behind `or`.

use super::{ControllerGraph, Edge, GraphError};
use crate::builder::{NewContinuation, Transition};
use crate::core::{
    EdgeFlavor, EdgeId, Endpoint, MachineId, Route, StateId, TransitionSettings,
};

/// Edge arena state taken before an or-condition forks.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EdgeMark {
    start: EdgeId,
    start_conditions: usize,
    next: usize,
}

impl ControllerGraph {
    /// Starts a transition from `from` to a state or sub-machine.
    ///
    /// An [`Endpoint::Absent`] destination creates an exit transition.
    pub fn transitions_to(
        &mut self,
        from: StateId,
        to: impl Into<Endpoint>,
    ) -> Result<Transition<'_>, GraphError> {
        let to = to.into();
        let machine = self.parent_of_state(from)?;
        self.check_endpoint(to)?;
        let route = Route::resolve(EdgeFlavor::Timed, machine, from.into(), to)?;
        Ok(self.open_timed(machine, route))
    }

    /// Starts a transition from `from` to the exit of its machine.
    pub fn exits(&mut self, from: StateId) -> Result<Transition<'_>, GraphError> {
        self.transitions_to(from, Endpoint::Absent)
    }

    /// Starts an any-state transition into `state`, drawn in its own machine.
    pub fn transitions_from_any(&mut self, state: StateId) -> Result<Transition<'_>, GraphError> {
        let machine = self.parent_of_state(state)?;
        self.any_state_transition(machine, state)
    }

    /// Starts a transition from the any-state node of `machine`.
    pub fn any_state_transition(
        &mut self,
        machine: MachineId,
        to: impl Into<Endpoint>,
    ) -> Result<Transition<'_>, GraphError> {
        let to = to.into();
        self.machine_data(machine)?;
        self.check_endpoint(to)?;
        let route = Route::resolve(EdgeFlavor::Timed, machine, Endpoint::Absent, to)?;
        Ok(self.open_timed(machine, route))
    }

    /// Starts a transition from the entry node of `machine`.
    pub fn entry_transition(
        &mut self,
        machine: MachineId,
        to: impl Into<Endpoint>,
    ) -> Result<NewContinuation<'_>, GraphError> {
        let to = to.into();
        self.machine_data(machine)?;
        self.check_endpoint(to)?;
        let route = Route::resolve(EdgeFlavor::Untimed, machine, Endpoint::Absent, to)?;
        Ok(self.open_untimed(machine, route))
    }

    /// Starts an entry transition into `state`, drawn in its own machine.
    pub fn transitions_from_entry(
        &mut self,
        state: StateId,
    ) -> Result<NewContinuation<'_>, GraphError> {
        let machine = self.parent_of_state(state)?;
        self.entry_transition(machine, state)
    }

    /// Starts an entry transition into `machine`, drawn in its parent.
    pub fn machine_transitions_from_entry(
        &mut self,
        machine: MachineId,
    ) -> Result<NewContinuation<'_>, GraphError> {
        let parent = self.parent_of_machine(machine)?;
        self.entry_transition(parent, machine)
    }

    /// Starts a transition leaving sub-machine `from`, drawn in its parent.
    pub fn machine_transitions_to(
        &mut self,
        from: MachineId,
        to: impl Into<Endpoint>,
    ) -> Result<NewContinuation<'_>, GraphError> {
        let to = to.into();
        let parent = self.parent_of_machine(from)?;
        self.check_endpoint(to)?;
        let route = Route::resolve(EdgeFlavor::Untimed, parent, from.into(), to)?;
        Ok(self.open_untimed(parent, route))
    }

    /// Starts a transition from sub-machine `from` to the exit of its parent.
    pub fn machine_exits(&mut self, from: MachineId) -> Result<NewContinuation<'_>, GraphError> {
        self.machine_transitions_to(from, Endpoint::Absent)
    }

    /// Adds an unconditional self-loop on a sub-machine.
    pub fn restarts(&mut self, machine: MachineId) -> Result<EdgeId, GraphError> {
        let parent = self.parent_of_machine(machine)?;
        let route = Route::resolve(EdgeFlavor::Untimed, parent, machine.into(), machine.into())?;
        Ok(self.create_edge(parent, route))
    }

    /// Adds a transition that fires once the state's animation reaches its exit time.
    pub fn automatically_moves_to(
        &mut self,
        from: StateId,
        to: impl Into<Endpoint>,
    ) -> Result<EdgeId, GraphError> {
        let to = to.into();
        if to.is_absent() {
            return Err(GraphError::InvalidTopology {
                reason: format!("{from} cannot automatically move to the exit"),
            });
        }
        let machine = self.parent_of_state(from)?;
        self.check_endpoint(to)?;
        let route = Route::resolve(EdgeFlavor::Timed, machine, from.into(), to)?;
        let edge = self.create_edge(machine, route);
        if let Some(settings) = self.settings_mut(edge) {
            settings.has_exit_time = true;
        }
        Ok(edge)
    }

    /// Creates a new edge with the settings of `template` and no conditions.
    ///
    /// The endpoints must be those of the template: a clone never changes
    /// topology, so forking an entry edge yields another entry edge on the
    /// same machine.
    pub fn clone_as_new_edge(
        &mut self,
        template: EdgeId,
        source: Endpoint,
        destination: Endpoint,
    ) -> Result<EdgeId, GraphError> {
        let edge = self.edge(template)?;
        let (flavor, machine, original) = (edge.flavor(), edge.machine, edge.route);
        let route = Route::resolve(flavor, machine, source, destination)?;
        if route != original {
            return Err(GraphError::InvalidTopology {
                reason: format!(
                    "{template} connects {:?} to {:?}, a clone cannot connect {:?} to {:?}",
                    original.source(),
                    original.destination(),
                    source,
                    destination
                ),
            });
        }
        Ok(self.fork_edge(template, route))
    }

    /// Records the edge arena before an or-condition runs.
    pub(crate) fn mark_edges(&self, start: EdgeId) -> EdgeMark {
        EdgeMark {
            start,
            start_conditions: self
                .edges
                .get(start.index())
                .map_or(0, |edge| edge.conditions.len()),
            next: self.edges.len(),
        }
    }

    /// Whether `edge` is the marked edge or was forked after the mark.
    pub(crate) fn created_since(&self, mark: &EdgeMark, edge: EdgeId) -> bool {
        edge == mark.start || (edge.index() >= mark.next && edge.index() < self.edges.len())
    }

    /// Drops edges forked after the mark and conditions appended to the
    /// marked edge since.
    pub(crate) fn rollback_to(&mut self, mark: &EdgeMark) {
        let discarded = self.edges.len().saturating_sub(mark.next);
        self.edges.truncate(mark.next);
        if let Some(edge) = self.edges.get_mut(mark.start.index()) {
            edge.conditions.truncate(mark.start_conditions);
        }
        tracing::debug!(start = %mark.start, discarded, "rolled back transition");
    }

    /// Fork used by the continuation grammar; `route` is already validated.
    pub(crate) fn fork_edge(&mut self, template: EdgeId, route: Route) -> EdgeId {
        let template_edge = self.edges.get(template.index());
        let machine = template_edge.map_or_else(|| self.route_machine(&route), |edge| edge.machine);
        let settings = match route.flavor() {
            EdgeFlavor::Timed => Some(
                template_edge
                    .and_then(|edge| edge.settings.as_ref())
                    .map(TransitionSettings::copied_from)
                    .unwrap_or_else(|| self.defaults.configure_transition()),
            ),
            EdgeFlavor::Untimed => None,
        };
        let forked = self.push_edge(Edge {
            machine,
            route,
            settings,
            conditions: Vec::new(),
        });
        tracing::debug!(%template, %forked, "forked transition");
        forked
    }

    pub(crate) fn settings_mut(&mut self, edge: EdgeId) -> Option<&mut TransitionSettings> {
        self.edges.get_mut(edge.index())?.settings.as_mut()
    }

    fn open_timed(&mut self, machine: MachineId, route: Route) -> Transition<'_> {
        let edge = self.create_edge(machine, route);
        Transition::new(NewContinuation::new(self, edge, route))
    }

    fn open_untimed(&mut self, machine: MachineId, route: Route) -> NewContinuation<'_> {
        let edge = self.create_edge(machine, route);
        NewContinuation::new(self, edge, route)
    }

    fn create_edge(&mut self, machine: MachineId, route: Route) -> EdgeId {
        let settings = match route.flavor() {
            EdgeFlavor::Timed => Some(self.defaults.configure_transition()),
            EdgeFlavor::Untimed => None,
        };
        let edge = self.push_edge(Edge {
            machine,
            route,
            settings,
            conditions: Vec::new(),
        });
        tracing::debug!(%edge, %machine, ?route, "created transition");
        edge
    }

    fn push_edge(&mut self, edge: Edge) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(edge);
        id
    }

    /// Machine an edge with `route` is stored on.
    pub(crate) fn route_machine(&self, route: &Route) -> MachineId {
        match *route {
            Route::StateTo { from, .. } | Route::StateExit { from } => self
                .nodes
                .get(from.node().index())
                .and_then(|node| node.parent)
                .unwrap_or(MachineId(from.node())),
            Route::AnyState { machine, .. }
            | Route::Entry { machine, .. }
            | Route::MachineTo { machine, .. }
            | Route::MachineExit { machine, .. } => machine,
        }
    }
}
