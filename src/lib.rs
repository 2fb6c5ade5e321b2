//! Controller Graph: authoring guarded state-machine controllers
//!
//! A controller is a set of layers, each rooted at a state machine that owns
//! states and nested sub-machines. Transitions between them are guarded by
//! conditions on controller parameters. The host only evaluates conjunctions:
//! each edge fires when all of its conditions hold. Disjunction is expressed
//! by adding several edges between the same endpoints.
//!
//! # Core Concepts
//!
//! - **Graph**: [`ControllerGraph`] owns nodes, edges and parameters in arenas
//! - **Conditions**: typed parameter references produce [`core::Condition`]s
//! - **Grammar**: [`builder`] roles turn `and`/`or` chains into edges
//! - **Validation**: [`validation`] accumulates every authoring issue
//! - **Snapshot**: [`snapshot`] exports and restores the authored data
//!
//! # Example
//!
//! ```rust
//! use controller_graph::core::Endpoint;
//! use controller_graph::{AuthoringDefaults, ControllerGraph};
//!
//! let mut graph = ControllerGraph::with_defaults("Avatar", AuthoringDefaults::unit_grid());
//! let layer = graph.add_layer("Base");
//! let a = graph.new_state(layer, "A").unwrap();
//! let b = graph.new_state(layer, "B").unwrap();
//! let x = graph.bool_parameter("X").unwrap();
//! let y = graph.int_parameter("Y").unwrap();
//! let z = graph.bool_parameter("Z").unwrap();
//!
//! graph
//!     .transitions_to(a, b)
//!     .unwrap()
//!     .when(x.is_true())
//!     .and(y.is_greater_than(2))
//!     .or()
//!     .when(z.is_true());
//!
//! assert_eq!(graph.edges_between(Endpoint::State(a), Endpoint::State(b)).len(), 2);
//! assert_eq!(graph.position(b).unwrap().y, graph.position(a).unwrap().y + 1.0);
//! ```

pub mod builder;
pub mod core;
pub mod defaults;
pub mod graph;
pub mod parameters;
pub mod snapshot;
pub mod validation;

// Re-export commonly used types
pub use builder::{
    Continuation, MultiContinuation, NewContinuation, OrCondition, OrOnlyContinuation, Transition,
};
pub use defaults::AuthoringDefaults;
pub use graph::{ControllerGraph, GraphError};
pub use snapshot::{ControllerSnapshot, SnapshotError};
pub use validation::{validate, GraphIssue};
