//! Controller parameters and the typed references that produce conditions.
//!
//! A reference is obtained by registering a parameter on the graph; the
//! reference only remembers the name, the graph remembers the kind.

use crate::builder::{Clause, NewContinuation, OrCondition};
use crate::core::{Condition, ConditionMode};
use crate::graph::{ControllerGraph, GraphError};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Bool,
    Trigger,
    Int,
    Float,
}

impl ParameterKind {
    /// Whether a condition with `mode` can be evaluated against this kind.
    pub fn accepts(self, mode: ConditionMode) -> bool {
        use ConditionMode::*;
        match self {
            ParameterKind::Bool => matches!(mode, If | IfNot),
            ParameterKind::Trigger => matches!(mode, If),
            ParameterKind::Int => matches!(mode, Greater | Less | Equals | NotEqual),
            ParameterKind::Float => matches!(mode, Greater | Less),
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParameterKind::Bool => "bool",
            ParameterKind::Trigger => "trigger",
            ParameterKind::Int => "int",
            ParameterKind::Float => "float",
        };
        f.write_str(name)
    }
}

/// A parameter declared on the controller.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolParameter {
    name: String,
}

impl BoolParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_true(&self) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::If, 0.0)
    }

    pub fn is_false(&self) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::IfNot, 0.0)
    }

    pub fn is_equal_to(&self, value: bool) -> Condition {
        if value {
            self.is_true()
        } else {
            self.is_false()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerParameter {
    name: String,
}

impl TriggerParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_true(&self) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::If, 0.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntParameter {
    name: String,
}

impl IntParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_greater_than(&self, value: i32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::Greater, value as f32)
    }

    pub fn is_less_than(&self, value: i32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::Less, value as f32)
    }

    pub fn is_equal_to(&self, value: i32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::Equals, value as f32)
    }

    pub fn is_not_equal_to(&self, value: i32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::NotEqual, value as f32)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatParameter {
    name: String,
}

impl FloatParameter {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_greater_than(&self, value: f32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::Greater, value)
    }

    pub fn is_less_than(&self, value: f32) -> Condition {
        Condition::new(self.name.as_str(), ConditionMode::Less, value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolParameterGroup {
    members: Vec<BoolParameter>,
}

impl BoolParameterGroup {
    pub fn members(&self) -> &[BoolParameter] {
        &self.members
    }

    /// Every member is set.
    pub fn are_true(&self) -> Vec<Condition> {
        self.members.iter().map(BoolParameter::is_true).collect()
    }

    /// Every member is unset.
    pub fn are_false(&self) -> Vec<Condition> {
        self.members.iter().map(BoolParameter::is_false).collect()
    }

    /// At least one member is set: one clause per member.
    pub fn is_any_true(&self) -> AnyOf {
        AnyOf::new(self.members.iter().map(BoolParameter::is_true).collect())
    }

    /// At least one member is unset: one clause per member.
    pub fn is_any_false(&self) -> AnyOf {
        AnyOf::new(self.members.iter().map(BoolParameter::is_false).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriggerParameterGroup {
    members: Vec<TriggerParameter>,
}

impl TriggerParameterGroup {
    pub fn members(&self) -> &[TriggerParameter] {
        &self.members
    }

    pub fn are_true(&self) -> Vec<Condition> {
        self.members.iter().map(TriggerParameter::is_true).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntParameterGroup {
    members: Vec<IntParameter>,
}

impl IntParameterGroup {
    pub fn members(&self) -> &[IntParameter] {
        &self.members
    }

    pub fn are_equal_to(&self, value: i32) -> Vec<Condition> {
        self.members.iter().map(|p| p.is_equal_to(value)).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatParameterGroup {
    members: Vec<FloatParameter>,
}

impl FloatParameterGroup {
    pub fn members(&self) -> &[FloatParameter] {
        &self.members
    }

    pub fn are_greater_than(&self, value: f32) -> Vec<Condition> {
        self.members.iter().map(|p| p.is_greater_than(value)).collect()
    }

    pub fn are_less_than(&self, value: f32) -> Vec<Condition> {
        self.members.iter().map(|p| p.is_less_than(value)).collect()
    }
}

/// Disjunction of single conditions, one forked clause each.
///
/// An empty disjunction leaves the transition unconditioned.
#[derive(Clone, Debug, PartialEq)]
pub struct AnyOf {
    conditions: Vec<Condition>,
}

impl AnyOf {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl OrCondition for AnyOf {
    fn apply_to(&self, first: NewContinuation<'_>) -> Vec<Clause> {
        let Some((last, rest)) = self.conditions.split_last() else {
            return vec![first.when_conditions().clause()];
        };

        let mut clauses = Vec::with_capacity(self.conditions.len());
        let mut fresh = first;
        for condition in rest {
            let open = fresh.when(condition);
            clauses.push(open.clause());
            fresh = open.or();
        }
        clauses.push(fresh.when(last).clause());
        clauses
    }
}

impl ControllerGraph {
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub fn bool_parameter(&mut self, name: &str) -> Result<BoolParameter, GraphError> {
        self.register_parameter(name, ParameterKind::Bool)?;
        Ok(BoolParameter {
            name: name.to_string(),
        })
    }

    pub fn trigger_parameter(&mut self, name: &str) -> Result<TriggerParameter, GraphError> {
        self.register_parameter(name, ParameterKind::Trigger)?;
        Ok(TriggerParameter {
            name: name.to_string(),
        })
    }

    pub fn int_parameter(&mut self, name: &str) -> Result<IntParameter, GraphError> {
        self.register_parameter(name, ParameterKind::Int)?;
        Ok(IntParameter {
            name: name.to_string(),
        })
    }

    pub fn float_parameter(&mut self, name: &str) -> Result<FloatParameter, GraphError> {
        self.register_parameter(name, ParameterKind::Float)?;
        Ok(FloatParameter {
            name: name.to_string(),
        })
    }

    pub fn bool_parameters(&mut self, names: &[&str]) -> Result<BoolParameterGroup, GraphError> {
        self.register_group(names, ParameterKind::Bool)?;
        Ok(BoolParameterGroup {
            members: names
                .iter()
                .map(|name| BoolParameter {
                    name: name.to_string(),
                })
                .collect(),
        })
    }

    pub fn trigger_parameters(
        &mut self,
        names: &[&str],
    ) -> Result<TriggerParameterGroup, GraphError> {
        self.register_group(names, ParameterKind::Trigger)?;
        Ok(TriggerParameterGroup {
            members: names
                .iter()
                .map(|name| TriggerParameter {
                    name: name.to_string(),
                })
                .collect(),
        })
    }

    pub fn int_parameters(&mut self, names: &[&str]) -> Result<IntParameterGroup, GraphError> {
        self.register_group(names, ParameterKind::Int)?;
        Ok(IntParameterGroup {
            members: names
                .iter()
                .map(|name| IntParameter {
                    name: name.to_string(),
                })
                .collect(),
        })
    }

    pub fn float_parameters(&mut self, names: &[&str]) -> Result<FloatParameterGroup, GraphError> {
        self.register_group(names, ParameterKind::Float)?;
        Ok(FloatParameterGroup {
            members: names
                .iter()
                .map(|name| FloatParameter {
                    name: name.to_string(),
                })
                .collect(),
        })
    }

    /// Declares `name` with `kind`; re-declaring with the same kind is a no-op.
    pub(crate) fn register_parameter(
        &mut self,
        name: &str,
        kind: ParameterKind,
    ) -> Result<(), GraphError> {
        match self.parameter(name) {
            Some(existing) if existing.kind == kind => Ok(()),
            Some(existing) => Err(GraphError::ParameterKindMismatch {
                name: name.to_string(),
                existing: existing.kind,
                requested: kind,
            }),
            None => {
                tracing::debug!(parameter = name, %kind, "registered parameter");
                self.parameters.push(Parameter {
                    name: name.to_string(),
                    kind,
                });
                Ok(())
            }
        }
    }

    fn register_group(&mut self, names: &[&str], kind: ParameterKind) -> Result<(), GraphError> {
        for name in names {
            if let Some(existing) = self.parameter(name).filter(|p| p.kind != kind) {
                return Err(GraphError::ParameterKindMismatch {
                    name: name.to_string(),
                    existing: existing.kind,
                    requested: kind,
                });
            }
        }
        names
            .iter()
            .try_for_each(|name| self.register_parameter(name, kind))
    }
}
