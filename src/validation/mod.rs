//! Whole-graph validation of an authored controller.
//!
//! The condition grammar guarantees well-formed clauses, but it cannot see
//! whether a condition names a declared parameter, whether its comparison
//! fits the parameter kind, or whether a timed edge can ever fire. These
//! checks run over the finished graph using Stillwater's `Validation`, so every
//! issue is reported in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use controller_graph::validation::{validate, GraphIssue};
//! use controller_graph::ControllerGraph;
//! use stillwater::validation::Validation;
//!
//! let mut graph = ControllerGraph::new("Avatar");
//! let layer = graph.add_layer("Base");
//! let idle = graph.new_state(layer, "Idle").unwrap();
//! graph.exits(idle).unwrap();
//!
//! match validate(&graph) {
//!     Validation::Failure(issues) => {
//!         assert!(matches!(issues.iter().next(), Some(GraphIssue::NeverFires { .. })));
//!     }
//!     Validation::Success(_) => unreachable!(),
//! }
//! ```

pub mod builder;
pub mod issues;
pub mod rules;

pub use builder::GraphRulesBuilder;
pub use issues::GraphIssue;
pub use rules::{validate, GraphCheck, GraphRules};
