//! Guard conditions attached to transition edges.
//!
//! An edge holds a flat list of conditions that must all hold for the edge to
//! fire. The host has no disjunction; "or" is expressed by forking edges, see
//! [`crate::builder`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison performed by a condition against a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionMode {
    /// Bool or trigger parameter is set.
    If,
    /// Bool parameter is unset.
    IfNot,
    Greater,
    Less,
    Equals,
    NotEqual,
}

impl fmt::Display for ConditionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ConditionMode::If => "is true",
            ConditionMode::IfNot => "is false",
            ConditionMode::Greater => ">",
            ConditionMode::Less => "<",
            ConditionMode::Equals => "==",
            ConditionMode::NotEqual => "!=",
        };
        f.write_str(symbol)
    }
}

/// One primitive comparison `parameter <mode> threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub parameter: String,
    pub mode: ConditionMode,
    pub threshold: f32,
}

impl Condition {
    pub fn new(parameter: impl Into<String>, mode: ConditionMode, threshold: f32) -> Self {
        Self {
            parameter: parameter.into(),
            mode,
            threshold,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ConditionMode::If | ConditionMode::IfNot => write!(f, "{} {}", self.parameter, self.mode),
            _ => write!(f, "{} {} {}", self.parameter, self.mode, self.threshold),
        }
    }
}

/// Append-only view over one edge's condition list.
pub struct ConditionAppender<'a> {
    conditions: &'a mut Vec<Condition>,
}

impl<'a> ConditionAppender<'a> {
    pub(crate) fn new(conditions: &'a mut Vec<Condition>) -> Self {
        Self { conditions }
    }

    /// Appends one clause to the edge.
    pub fn add(&mut self, parameter: &str, mode: ConditionMode, threshold: f32) -> &mut Self {
        tracing::trace!(parameter, %mode, threshold, "appending condition");
        self.conditions.push(Condition::new(parameter, mode, threshold));
        self
    }
}

/// Anything that contributes conjunctive clauses to a single edge.
///
/// A single [`Condition`] appends itself; a parameter group's `are_true`
/// appends one clause per member.
pub trait IntoConditions {
    fn apply_to(&self, appender: &mut ConditionAppender<'_>);
}

impl IntoConditions for Condition {
    fn apply_to(&self, appender: &mut ConditionAppender<'_>) {
        appender.add(&self.parameter, self.mode, self.threshold);
    }
}

impl<T: IntoConditions + ?Sized> IntoConditions for &T {
    fn apply_to(&self, appender: &mut ConditionAppender<'_>) {
        (**self).apply_to(appender);
    }
}

impl<T: IntoConditions> IntoConditions for Vec<T> {
    fn apply_to(&self, appender: &mut ConditionAppender<'_>) {
        for item in self {
            item.apply_to(appender);
        }
    }
}

impl<T: IntoConditions, const N: usize> IntoConditions for [T; N] {
    fn apply_to(&self, appender: &mut ConditionAppender<'_>) {
        for item in self {
            item.apply_to(appender);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appender_only_appends() {
        let mut list = vec![Condition::new("Grounded", ConditionMode::If, 0.0)];
        let mut appender = ConditionAppender::new(&mut list);

        appender
            .add("Speed", ConditionMode::Greater, 0.5)
            .add("Speed", ConditionMode::Less, 2.0);

        assert_eq!(list.len(), 3);
        assert_eq!(list[0].parameter, "Grounded");
        assert_eq!(list[2], Condition::new("Speed", ConditionMode::Less, 2.0));
    }

    #[test]
    fn collections_apply_every_member() {
        let mut list = Vec::new();
        let conditions = [
            Condition::new("A", ConditionMode::If, 0.0),
            Condition::new("B", ConditionMode::IfNot, 0.0),
        ];

        conditions.apply_to(&mut ConditionAppender::new(&mut list));
        vec![Condition::new("C", ConditionMode::Equals, 3.0)]
            .apply_to(&mut ConditionAppender::new(&mut list));

        let names: Vec<_> = list.iter().map(|c| c.parameter.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn condition_display() {
        assert_eq!(
            Condition::new("Jump", ConditionMode::If, 0.0).to_string(),
            "Jump is true"
        );
        assert_eq!(
            Condition::new("Speed", ConditionMode::Greater, 2.0).to_string(),
            "Speed > 2"
        );
    }
}
