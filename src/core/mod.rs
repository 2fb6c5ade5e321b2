//! Core value types of a controller graph.
//!
//! This module contains the plain data the rest of the crate builds on:
//! - Arena handles for nodes and edges
//! - Transition endpoints and the endpoint-pair dispatch to host primitives
//! - Guard conditions and the append-only condition algebra
//! - The settings bundle of timed transitions

mod condition;
mod endpoint;
mod ids;
mod settings;

pub use condition::{Condition, ConditionAppender, ConditionMode, IntoConditions};
pub use endpoint::{EdgeFlavor, Endpoint, Route};
pub use ids::{EdgeId, MachineId, NodeId, StateId};
pub use settings::{InterruptionSource, TransitionSettings};
