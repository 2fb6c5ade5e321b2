//! Builder roles of the condition grammar.
//!
//! Each role is its own type and exposes only the operations that are
//! unambiguous in that role:
//!
//! | role                    | operations                                       |
//! |-------------------------|--------------------------------------------------|
//! | [`NewContinuation`]     | `when`, `when_all`, `when_with_or`, `when_any`   |
//! | [`Continuation`]        | `and`, `and_all`, `or`                           |
//! | [`OrOnlyContinuation`]  | `or`                                             |
//! | [`MultiContinuation`]   | `and`, `and_all` (applied to every clause)       |
//! | [`ConjunctionScope`]    | `and`, `and_whenever`                            |
//!
//! `or` forks a new edge with the same endpoints and settings and an empty
//! condition list; it is the only way a disjunct is introduced.

use crate::core::{EdgeId, IntoConditions, Route};
use crate::graph::{ControllerGraph, GraphError};
use uuid::Uuid;

/// Shared plumbing: which graph, which edge, which validated primitive.
struct Cursor<'g> {
    graph: &'g mut ControllerGraph,
    edge: EdgeId,
    route: Route,
}

impl<'g> Cursor<'g> {
    fn reborrow(&mut self) -> Cursor<'_> {
        Cursor {
            graph: &mut *self.graph,
            edge: self.edge,
            route: self.route,
        }
    }

    fn append<C: IntoConditions + ?Sized>(&mut self, conditions: &C) {
        self.graph.append_conditions(self.edge, conditions);
    }

    fn scope(&mut self) -> ConjunctionScope<'_> {
        ConjunctionScope {
            graph: &mut *self.graph,
            edge: self.edge,
        }
    }

    fn fork(self) -> Cursor<'g> {
        let edge = self.graph.fork_edge(self.edge, self.route);
        Cursor {
            graph: self.graph,
            edge,
            route: self.route,
        }
    }

    fn clause(&self) -> Clause {
        Clause {
            graph: self.graph.id(),
            edge: self.edge,
        }
    }
}

/// Token naming one conjunctive clause (one edge) produced by an
/// [`OrCondition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Clause {
    graph: Uuid,
    edge: EdgeId,
}

impl Clause {
    pub fn edge(&self) -> EdgeId {
        self.edge
    }
}

/// A condition source that expands into several disjuncts.
///
/// Implementations receive the fresh continuation of the transition being
/// built, fork it with `or` as often as needed, and return one [`Clause`] per
/// edge they produced. Later `and` calls on the resulting
/// [`MultiContinuation`] apply to every returned clause.
pub trait OrCondition {
    fn apply_to(&self, first: NewContinuation<'_>) -> Vec<Clause>;
}

impl<T: OrCondition + ?Sized> OrCondition for &T {
    fn apply_to(&self, first: NewContinuation<'_>) -> Vec<Clause> {
        (**self).apply_to(first)
    }
}

/// An edge with no committed condition shape yet.
pub struct NewContinuation<'g> {
    cursor: Cursor<'g>,
}

impl<'g> NewContinuation<'g> {
    pub(crate) fn new(graph: &'g mut ControllerGraph, edge: EdgeId, route: Route) -> Self {
        Self {
            cursor: Cursor { graph, edge, route },
        }
    }

    /// Adds the first conditions of this clause.
    ///
    /// ```rust
    /// use controller_graph::ControllerGraph;
    ///
    /// let mut graph = ControllerGraph::new("Avatar");
    /// let layer = graph.add_layer("Base");
    /// let idle = graph.new_state(layer, "Idle").unwrap();
    /// let jump = graph.new_state(layer, "Jump").unwrap();
    /// let pressed = graph.bool_parameter("JumpPressed").unwrap();
    /// let grounded = graph.bool_parameter("Grounded").unwrap();
    /// let gesture = graph.int_parameter("Gesture").unwrap();
    ///
    /// graph
    ///     .transitions_to(idle, jump)
    ///     .unwrap()
    ///     .when(pressed.is_true())
    ///     .and(grounded.is_true())
    ///     .or()
    ///     .when(gesture.is_equal_to(3));
    ///
    /// assert_eq!(graph.edges().count(), 2);
    /// ```
    pub fn when(mut self, conditions: impl IntoConditions) -> Continuation<'g> {
        self.cursor.append(&conditions);
        Continuation {
            cursor: self.cursor,
        }
    }

    /// Adds a series of conditions that cannot contain `or`.
    pub fn when_all<F>(mut self, series: F) -> Continuation<'g>
    where
        F: FnOnce(&mut ConjunctionScope<'_>),
    {
        series(&mut self.cursor.scope());
        Continuation {
            cursor: self.cursor,
        }
    }

    /// Adds a series of conditions that may fork with `or`.
    ///
    /// The result only offers `or`: after the series has forked, a trailing
    /// `and` could not say which of the forked clauses it belongs to.
    pub fn when_with_or<F>(mut self, series: F) -> OrOnlyContinuation<'g>
    where
        F: FnOnce(NewContinuation<'_>),
    {
        series(NewContinuation {
            cursor: self.cursor.reborrow(),
        });
        OrOnlyContinuation {
            cursor: self.cursor,
        }
    }

    /// Expands a multi-clause condition; following `and` calls apply to every
    /// clause it produced.
    ///
    /// Only the starting edge and edges forked while the condition ran count
    /// as its clauses. Any other token is a [`GraphError::ForeignClause`];
    /// the graph is then put back as it was before the call, leaving the
    /// starting edge in place with no conditions added.
    pub fn when_any<O>(mut self, disjuncts: O) -> Result<MultiContinuation<'g>, GraphError>
    where
        O: OrCondition,
    {
        let mark = self.cursor.graph.mark_edges(self.cursor.edge);
        let clauses = disjuncts.apply_to(NewContinuation {
            cursor: self.cursor.reborrow(),
        });

        let Cursor { graph, route, .. } = self.cursor;
        let mut edges: Vec<EdgeId> = Vec::with_capacity(clauses.len());
        for clause in clauses {
            let owned = clause.graph == graph.id()
                && graph.created_since(&mark, clause.edge)
                && graph.edge(clause.edge).is_ok_and(|edge| *edge.route() == route);
            if !owned {
                graph.rollback_to(&mark);
                return Err(GraphError::ForeignClause { edge: clause.edge });
            }
            if !edges.contains(&clause.edge) {
                edges.push(clause.edge);
            }
        }

        Ok(MultiContinuation { graph, edges })
    }

    /// Moves on to the `and`/`or` role without adding a condition.
    pub fn when_conditions(self) -> Continuation<'g> {
        Continuation {
            cursor: self.cursor,
        }
    }

    pub fn edge(&self) -> EdgeId {
        self.cursor.edge
    }

    pub(crate) fn graph(&self) -> &ControllerGraph {
        &*self.cursor.graph
    }

    pub(crate) fn graph_mut(&mut self) -> &mut ControllerGraph {
        &mut *self.cursor.graph
    }
}

/// One edge open for further conjuncts.
pub struct Continuation<'g> {
    cursor: Cursor<'g>,
}

impl<'g> Continuation<'g> {
    /// Adds conditions that must hold together with the preceding ones.
    pub fn and(mut self, conditions: impl IntoConditions) -> Self {
        self.cursor.append(&conditions);
        self
    }

    /// Adds a series of conditions that cannot contain `or`.
    pub fn and_all<F>(mut self, series: F) -> Self
    where
        F: FnOnce(&mut ConjunctionScope<'_>),
    {
        series(&mut self.cursor.scope());
        self
    }

    /// Starts a new clause: a new edge with identical settings and no
    /// conditions yet.
    pub fn or(self) -> NewContinuation<'g> {
        NewContinuation {
            cursor: self.cursor.fork(),
        }
    }

    /// Token for this clause, for [`OrCondition`] implementations.
    pub fn clause(&self) -> Clause {
        self.cursor.clause()
    }

    pub fn edge(&self) -> EdgeId {
        self.cursor.edge
    }
}

/// Result of a series that forked internally; only `or` may follow.
///
/// ```compile_fail
/// use controller_graph::ControllerGraph;
///
/// let mut graph = ControllerGraph::new("Avatar");
/// let layer = graph.add_layer("Base");
/// let a = graph.new_state(layer, "A").unwrap();
/// let b = graph.new_state(layer, "B").unwrap();
/// let x = graph.bool_parameter("X").unwrap();
/// let y = graph.bool_parameter("Y").unwrap();
///
/// graph
///     .transitions_to(a, b)
///     .unwrap()
///     .when_with_or(|c| {
///         c.when(x.is_true()).or().when(y.is_true());
///     })
///     .and(x.is_true());
/// ```
pub struct OrOnlyContinuation<'g> {
    cursor: Cursor<'g>,
}

impl<'g> OrOnlyContinuation<'g> {
    /// Starts a new clause from the transition this series began on.
    pub fn or(self) -> NewContinuation<'g> {
        NewContinuation {
            cursor: self.cursor.fork(),
        }
    }

    pub fn edge(&self) -> EdgeId {
        self.cursor.edge
    }
}

/// Several clauses that receive every following `and`.
///
/// The set of clauses is fixed by the [`OrCondition`] that produced it; no
/// `or` is offered.
///
/// ```compile_fail
/// use controller_graph::ControllerGraph;
///
/// let mut graph = ControllerGraph::new("Avatar");
/// let layer = graph.add_layer("Base");
/// let a = graph.new_state(layer, "A").unwrap();
/// let b = graph.new_state(layer, "B").unwrap();
/// let hands = graph.bool_parameters(&["Left", "Right"]).unwrap();
///
/// graph
///     .transitions_to(a, b)
///     .unwrap()
///     .when_any(hands.is_any_true())
///     .unwrap()
///     .or();
/// ```
pub struct MultiContinuation<'g> {
    graph: &'g mut ControllerGraph,
    edges: Vec<EdgeId>,
}

impl<'g> MultiContinuation<'g> {
    /// Adds the same conditions to every clause.
    pub fn and(self, conditions: impl IntoConditions) -> Self {
        for edge in &self.edges {
            self.graph.append_conditions(*edge, &conditions);
        }
        self
    }

    /// Runs the same or-less series against every clause.
    pub fn and_all<F>(self, series: F) -> Self
    where
        F: Fn(&mut ConjunctionScope<'_>),
    {
        for edge in &self.edges {
            series(&mut ConjunctionScope {
                graph: &mut *self.graph,
                edge: *edge,
            });
        }
        self
    }

    pub fn edges(&self) -> &[EdgeId] {
        &self.edges
    }
}

/// Scope handed to or-less series: conjuncts on a single edge.
pub struct ConjunctionScope<'a> {
    graph: &'a mut ControllerGraph,
    edge: EdgeId,
}

impl<'a> ConjunctionScope<'a> {
    pub fn and(&mut self, conditions: impl IntoConditions) -> &mut Self {
        self.graph.append_conditions(self.edge, &conditions);
        self
    }

    /// Runs a nested or-less series on the same edge.
    pub fn and_whenever<F>(&mut self, series: F) -> &mut Self
    where
        F: FnOnce(&mut ConjunctionScope<'a>),
    {
        series(self);
        self
    }

    pub fn edge(&self) -> EdgeId {
        self.edge
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Condition, ConditionMode, EdgeId, Endpoint};
    use crate::graph::{ControllerGraph, GraphError};

    use super::{Clause, NewContinuation, OrCondition};

    fn setup() -> (ControllerGraph, crate::core::StateId, crate::core::StateId) {
        let mut graph = ControllerGraph::new("Grammar");
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();
        let b = graph.new_state(layer, "B").unwrap();
        (graph, a, b)
    }

    fn cond(name: &str) -> Condition {
        Condition::new(name, ConditionMode::If, 0.0)
    }

    fn names(graph: &ControllerGraph, edge: EdgeId) -> Vec<String> {
        graph
            .edge(edge)
            .unwrap()
            .conditions()
            .iter()
            .map(|c| c.parameter.clone())
            .collect()
    }

    #[test]
    fn and_chain_stays_on_one_edge() {
        let (mut graph, a, b) = setup();

        let edge = graph
            .transitions_to(a, b)
            .unwrap()
            .when(cond("c1"))
            .and(cond("c2"))
            .and(cond("c3"))
            .edge();

        assert_eq!(graph.edges().count(), 1);
        assert_eq!(names(&graph, edge), ["c1", "c2", "c3"]);
    }

    #[test]
    fn or_forks_a_second_edge() {
        let (mut graph, a, b) = setup();

        graph
            .transitions_to(a, b)
            .unwrap()
            .when(cond("c1"))
            .and(cond("c2"))
            .or()
            .when(cond("c3"))
            .and(cond("c4"));

        let edges = graph.edges_between(Endpoint::State(a), Endpoint::State(b));
        assert_eq!(edges.len(), 2);
        assert_eq!(names(&graph, edges[0]), ["c1", "c2"]);
        assert_eq!(names(&graph, edges[1]), ["c3", "c4"]);
    }

    #[test]
    fn forked_edge_starts_empty() {
        let (mut graph, a, b) = setup();

        let fresh = graph
            .transitions_to(a, b)
            .unwrap()
            .when(cond("c1"))
            .or()
            .edge();

        assert!(graph.edge(fresh).unwrap().conditions().is_empty());
    }

    #[test]
    fn when_all_runs_or_less_series() {
        let (mut graph, a, b) = setup();

        let edge = graph
            .transitions_to(a, b)
            .unwrap()
            .when_all(|scope| {
                scope
                    .and(cond("c1"))
                    .and_whenever(|nested| {
                        nested.and(cond("c2"));
                    })
                    .and(cond("c3"));
            })
            .and_all(|scope| {
                scope.and(cond("c4"));
            })
            .edge();

        assert_eq!(graph.edges().count(), 1);
        assert_eq!(names(&graph, edge), ["c1", "c2", "c3", "c4"]);
    }

    #[test]
    fn when_with_or_forks_inside_and_allows_outer_or() {
        let (mut graph, a, b) = setup();

        graph
            .transitions_to(a, b)
            .unwrap()
            .when_with_or(|c| {
                c.when(cond("c1")).or().when(cond("c2"));
            })
            .or()
            .when(cond("c3"));

        let edges = graph.edges_between(Endpoint::State(a), Endpoint::State(b));
        assert_eq!(edges.len(), 3);
        assert_eq!(names(&graph, edges[0]), ["c1"]);
        assert_eq!(names(&graph, edges[1]), ["c2"]);
        assert_eq!(names(&graph, edges[2]), ["c3"]);
    }

    #[test]
    fn when_conditions_adds_nothing() {
        let (mut graph, a, b) = setup();

        let edge = graph
            .transitions_to(a, b)
            .unwrap()
            .when_conditions()
            .edge();

        assert!(graph.edge(edge).unwrap().conditions().is_empty());
    }

    struct EachOf(Vec<&'static str>);

    impl OrCondition for EachOf {
        fn apply_to(&self, first: NewContinuation<'_>) -> Vec<Clause> {
            let mut clauses = Vec::new();
            let mut next = Some(first);
            for (i, name) in self.0.iter().enumerate() {
                let Some(fresh) = next.take() else { break };
                let open = fresh.when(cond(name));
                clauses.push(open.clause());
                if i + 1 < self.0.len() {
                    next = Some(open.or());
                }
            }
            clauses
        }
    }

    #[test]
    fn multi_broadcasts_and_to_every_clause_only() {
        let (mut graph, a, b) = setup();
        let unrelated = graph.transitions_to(b, a).unwrap().when(cond("x")).edge();

        let multi = graph
            .transitions_to(a, b)
            .unwrap()
            .when_any(EachOf(vec!["l", "r", "m"]))
            .unwrap()
            .and(cond("local"))
            .and_all(|scope| {
                scope.and(cond("ready"));
            });
        let edges = multi.edges().to_vec();

        assert_eq!(edges.len(), 3);
        assert_eq!(names(&graph, edges[0]), ["l", "local", "ready"]);
        assert_eq!(names(&graph, edges[1]), ["r", "local", "ready"]);
        assert_eq!(names(&graph, edges[2]), ["m", "local", "ready"]);
        assert_eq!(names(&graph, unrelated), ["x"]);
    }

    struct Hijack(EdgeId, uuid::Uuid);

    impl OrCondition for Hijack {
        fn apply_to(&self, first: NewContinuation<'_>) -> Vec<Clause> {
            let open = first.when(cond("own"));
            let own = open.clause();
            let forked = open.or().when(cond("forked")).clause();
            vec![
                own,
                forked,
                Clause {
                    graph: self.1,
                    edge: self.0,
                },
            ]
        }
    }

    #[test]
    fn clauses_from_other_transitions_are_rejected() {
        let (mut graph, a, b) = setup();
        let other = graph.transitions_to(b, a).unwrap().edge();
        let id = graph.id();

        let fresh = graph.transitions_to(a, b).unwrap();
        let start = fresh.edge();
        let result = fresh.when_any(Hijack(other, id));

        assert!(matches!(result, Err(GraphError::ForeignClause { edge }) if edge == other));
        assert!(graph.edge(other).unwrap().conditions().is_empty());
        assert_eq!(graph.edges().count(), 2);
        assert!(graph.edge(start).unwrap().conditions().is_empty());
    }

    #[test]
    fn earlier_edge_between_same_states_is_not_a_clause() {
        let (mut graph, a, b) = setup();
        let earlier = graph.transitions_to(a, b).unwrap().when(cond("Earlier")).edge();
        let id = graph.id();

        let fresh = graph.transitions_to(a, b).unwrap();
        let start = fresh.edge();
        let result = fresh.when_any(Hijack(earlier, id));

        assert!(matches!(result, Err(GraphError::ForeignClause { edge }) if edge == earlier));
        assert_eq!(names(&graph, earlier), ["Earlier"]);
        assert!(names(&graph, start).is_empty());
        assert_eq!(
            graph.edges_between(Endpoint::State(a), Endpoint::State(b)),
            [earlier, start]
        );
    }

    #[test]
    fn clauses_from_other_graphs_are_rejected() {
        let (mut graph, a, b) = setup();
        let stranger = ControllerGraph::new("Other").id();

        let result = graph
            .transitions_to(a, b)
            .unwrap()
            .when_any(Hijack(EdgeId(0), stranger));

        assert!(matches!(result, Err(GraphError::ForeignClause { .. })));
    }

    #[test]
    fn entry_transitions_fork_as_entry_transitions() {
        let mut graph = ControllerGraph::new("Grammar");
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();

        graph
            .entry_transition(layer, a)
            .unwrap()
            .when(cond("c1"))
            .or()
            .when(cond("c2"));

        let edges = graph.edges_between(Endpoint::Absent, Endpoint::State(a));
        assert_eq!(edges.len(), 2);
        for edge in edges {
            assert!(graph.edge(edge).unwrap().settings().is_none());
        }
    }
}
