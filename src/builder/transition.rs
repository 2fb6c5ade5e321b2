//! Timed transitions: settings first, then conditions.

use super::continuation::{
    ConjunctionScope, Continuation, MultiContinuation, NewContinuation, OrCondition,
    OrOnlyContinuation,
};
use crate::core::{EdgeId, IntoConditions, InterruptionSource, TransitionSettings};
use crate::graph::GraphError;

/// A freshly created state, any-state or exit transition.
///
/// Settings can only be changed before the first condition; once a `when`
/// variant is called the transition continues as a condition builder.
pub struct Transition<'g> {
    inner: NewContinuation<'g>,
}

impl<'g> Transition<'g> {
    pub(crate) fn new(inner: NewContinuation<'g>) -> Self {
        Self { inner }
    }

    fn update(mut self, apply: impl FnOnce(&mut TransitionSettings)) -> Self {
        let edge = self.inner.edge();
        if let Some(settings) = self.inner.graph_mut().settings_mut(edge) {
            apply(settings);
        }
        self
    }

    pub fn with_transition_duration_seconds(self, seconds: f32) -> Self {
        self.update(|s| {
            s.has_fixed_duration = true;
            s.duration = seconds;
        })
    }

    /// Duration normalized to the source state's length.
    pub fn with_transition_duration_percent(self, normalized: f32) -> Self {
        self.update(|s| {
            s.has_fixed_duration = false;
            s.duration = normalized;
        })
    }

    pub fn with_offset(self, normalized: f32) -> Self {
        self.update(|s| s.offset = normalized)
    }

    pub fn with_source_interruption(self) -> Self {
        self.with_interruption(InterruptionSource::Source)
    }

    pub fn with_interruption(self, source: InterruptionSource) -> Self {
        self.update(|s| s.interruption_source = source)
    }

    pub fn with_ordered_interruption(self) -> Self {
        self.update(|s| s.ordered_interruption = true)
    }

    pub fn with_no_ordered_interruption(self) -> Self {
        self.update(|s| s.ordered_interruption = false)
    }

    pub fn with_transition_to_self(self) -> Self {
        self.update(|s| s.can_transition_to_self = true)
    }

    pub fn with_no_transition_to_self(self) -> Self {
        self.update(|s| s.can_transition_to_self = false)
    }

    pub fn after_animation_finishes(self) -> Self {
        self.after_animation_is_at_least_at_percent(1.0)
    }

    /// Fires as soon as conditions hold, through an exit time of zero.
    pub fn automatically(self) -> Self {
        self.after_animation_is_at_least_at_percent(0.0)
    }

    pub fn after_animation_is_at_least_at_percent(self, exit_time: f32) -> Self {
        self.update(|s| {
            s.has_exit_time = true;
            s.exit_time = exit_time;
        })
    }

    pub fn when(self, conditions: impl IntoConditions) -> Continuation<'g> {
        self.inner.when(conditions)
    }

    pub fn when_all<F>(self, series: F) -> Continuation<'g>
    where
        F: FnOnce(&mut ConjunctionScope<'_>),
    {
        self.inner.when_all(series)
    }

    pub fn when_with_or<F>(self, series: F) -> OrOnlyContinuation<'g>
    where
        F: FnOnce(NewContinuation<'_>),
    {
        self.inner.when_with_or(series)
    }

    pub fn when_any<O>(self, disjuncts: O) -> Result<MultiContinuation<'g>, GraphError>
    where
        O: OrCondition,
    {
        self.inner.when_any(disjuncts)
    }

    pub fn when_conditions(self) -> Continuation<'g> {
        self.inner.when_conditions()
    }

    pub fn into_continuation(self) -> NewContinuation<'g> {
        self.inner
    }

    pub fn edge(&self) -> EdgeId {
        self.inner.edge()
    }

    /// Current settings of the underlying edge.
    pub fn settings(&self) -> Option<TransitionSettings> {
        self.inner
            .graph()
            .edge(self.edge())
            .ok()
            .and_then(|edge| edge.settings().copied())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Condition, ConditionMode, Endpoint, InterruptionSource};
    use crate::graph::ControllerGraph;

    #[test]
    fn settings_apply_before_conditions() {
        let mut graph = ControllerGraph::new("Avatar");
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();
        let b = graph.new_state(layer, "B").unwrap();

        let transition = graph
            .transitions_to(a, b)
            .unwrap()
            .with_transition_duration_percent(0.5)
            .with_offset(0.2)
            .with_source_interruption()
            .with_no_ordered_interruption()
            .with_transition_to_self()
            .after_animation_finishes();

        let settings = transition.settings().unwrap();
        assert!(!settings.has_fixed_duration);
        assert_eq!(settings.duration, 0.5);
        assert_eq!(settings.offset, 0.2);
        assert_eq!(settings.interruption_source, InterruptionSource::Source);
        assert!(!settings.ordered_interruption);
        assert!(settings.can_transition_to_self);
        assert!(settings.has_exit_time);
        assert_eq!(settings.exit_time, 1.0);
    }

    #[test]
    fn automatically_uses_zero_exit_time() {
        let mut graph = ControllerGraph::new("Avatar");
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();

        let settings = graph
            .exits(a)
            .unwrap()
            .with_transition_duration_seconds(0.1)
            .automatically()
            .settings()
            .unwrap();

        assert!(settings.has_exit_time);
        assert_eq!(settings.exit_time, 0.0);
        assert!(settings.has_fixed_duration);
    }

    #[test]
    fn or_clones_every_setting() {
        let mut graph = ControllerGraph::new("Avatar");
        let layer = graph.add_layer("Base");
        let a = graph.new_state(layer, "A").unwrap();
        let b = graph.new_state(layer, "B").unwrap();

        graph
            .transitions_to(a, b)
            .unwrap()
            .with_transition_duration_seconds(0.25)
            .with_offset(0.1)
            .with_interruption(InterruptionSource::SourceThenDestination)
            .with_no_ordered_interruption()
            .with_transition_to_self()
            .after_animation_is_at_least_at_percent(0.8)
            .when(Condition::new("X", ConditionMode::If, 0.0))
            .or()
            .when(Condition::new("Y", ConditionMode::If, 0.0));

        let edges = graph.edges_between(Endpoint::State(a), Endpoint::State(b));
        let first = graph.edge(edges[0]).unwrap().settings().copied();
        let second = graph.edge(edges[1]).unwrap().settings().copied();
        assert_eq!(first, second);
        assert_eq!(second.unwrap().exit_time, 0.8);
    }
}
