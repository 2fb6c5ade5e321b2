//! Fluent condition grammar for transitions.
//!
//! A transition starts as a [`Transition`] (timed primitives) or a
//! [`NewContinuation`] (entry and sub-machine primitives), and moves through
//! a small set of roles as conditions are added. Each role only offers the
//! operations that keep the resulting disjunctive normal form unambiguous:
//!
//! - `and` extends the current clause (edge).
//! - `or` forks a new edge between the same endpoints.
//! - after a series that forked internally, only `or` is available.
//! - after a multi-clause condition, only `and` is available and it applies
//!   to every clause.
//!
//! # Example
//!
//! ```rust
//! use controller_graph::ControllerGraph;
//!
//! let mut graph = ControllerGraph::new("Avatar");
//! let layer = graph.add_layer("Hands");
//! let rest = graph.new_state(layer, "Rest").unwrap();
//! let wave = graph.new_state(layer, "Wave").unwrap();
//! let hands = graph.bool_parameters(&["LeftUp", "RightUp"]).unwrap();
//! let enabled = graph.bool_parameter("Enabled").unwrap();
//!
//! graph
//!     .transitions_to(rest, wave)
//!     .unwrap()
//!     .with_transition_duration_seconds(0.1)
//!     .when_any(hands.is_any_true())
//!     .unwrap()
//!     .and(enabled.is_true());
//!
//! // One edge per hand, each also requiring `Enabled`.
//! assert_eq!(graph.edges().count(), 2);
//! for (_, edge) in graph.edges() {
//!     assert_eq!(edge.conditions().len(), 2);
//! }
//! ```

mod continuation;
mod transition;

pub use continuation::{
    Clause, ConjunctionScope, Continuation, MultiContinuation, NewContinuation, OrCondition,
    OrOnlyContinuation,
};
pub use transition::Transition;
