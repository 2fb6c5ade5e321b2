//! Validation rules for authored controllers.

use crate::core::MachineId;
use crate::graph::{ControllerGraph, NodeKind};
use crate::validation::issues::GraphIssue;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type GraphCheck =
    Box<dyn Fn(&ControllerGraph) -> Validation<(), NonEmptyVec<GraphIssue>> + Send + Sync>;

/// Set of checks run against a controller.
/// Uses Validation to accumulate ALL issues.
pub struct GraphRules {
    pub(crate) check_parameters: bool,
    pub(crate) check_firing: bool,
    pub(crate) check_default_states: bool,
    pub(crate) required_checks: Vec<GraphCheck>,
}

impl GraphRules {
    /// Runs every enabled check and reports all issues at once.
    pub fn enforce(&self, graph: &ControllerGraph) -> Validation<(), NonEmptyVec<GraphIssue>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<GraphIssue>>> = Vec::new();

        if self.check_parameters {
            checks.extend(parameter_checks(graph));
        }
        if self.check_firing {
            checks.extend(firing_checks(graph));
        }
        if self.check_default_states {
            checks.extend(default_state_checks(graph));
        }
        for check_fn in &self.required_checks {
            checks.push(check_fn(graph));
        }

        let result = Validation::all_vec(checks).map(|_| ());
        if let Validation::Failure(issues) = &result {
            for issue in issues.iter() {
                tracing::warn!(controller = graph.name(), %issue, "validation issue");
            }
        }
        result
    }
}

impl Default for GraphRules {
    fn default() -> Self {
        Self {
            check_parameters: true,
            check_firing: true,
            check_default_states: true,
            required_checks: Vec::new(),
        }
    }
}

/// Runs the standard checks.
pub fn validate(graph: &ControllerGraph) -> Validation<(), NonEmptyVec<GraphIssue>> {
    GraphRules::default().enforce(graph)
}

fn parameter_checks(graph: &ControllerGraph) -> Vec<Validation<(), NonEmptyVec<GraphIssue>>> {
    let mut checks = Vec::new();
    for (id, edge) in graph.edges() {
        for condition in edge.conditions() {
            let check = match graph.parameter(&condition.parameter) {
                None => Validation::fail(GraphIssue::UnregisteredParameter {
                    edge: id,
                    parameter: condition.parameter.clone(),
                }),
                Some(parameter) if !parameter.kind.accepts(condition.mode) => {
                    Validation::fail(GraphIssue::IncompatibleCondition {
                        edge: id,
                        parameter: condition.parameter.clone(),
                        kind: parameter.kind,
                        mode: condition.mode,
                    })
                }
                Some(_) => Validation::success(()),
            };
            checks.push(check);
        }
    }
    checks
}

fn firing_checks(graph: &ControllerGraph) -> Vec<Validation<(), NonEmptyVec<GraphIssue>>> {
    graph
        .edges()
        .filter_map(|(id, edge)| {
            let settings = edge.settings()?;
            (!settings.has_exit_time && edge.conditions().is_empty())
                .then(|| Validation::fail(GraphIssue::NeverFires { edge: id }))
        })
        .collect()
}

fn default_state_checks(graph: &ControllerGraph) -> Vec<Validation<(), NonEmptyVec<GraphIssue>>> {
    graph
        .nodes()
        .filter_map(|(id, node)| match node.kind() {
            NodeKind::SubMachine(data) if data.default_state().is_none() => Some((id, data)),
            _ => None,
        })
        .filter(|(_, data)| {
            data.children()
                .iter()
                .any(|child| graph.node(*child).is_ok_and(|n| n.is_state()))
        })
        .map(|(id, _)| {
            Validation::fail(GraphIssue::MissingDefaultState {
                machine: MachineId(id),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Condition, ConditionMode};
    use crate::validation::builder::GraphRulesBuilder;

    fn authored() -> ControllerGraph {
        let mut graph = ControllerGraph::new("Avatar");
        let layer = graph.add_layer("Base");
        let idle = graph.new_state(layer, "Idle").unwrap();
        let walk = graph.new_state(layer, "Walk").unwrap();
        let speed = graph.float_parameter("Speed").unwrap();

        graph
            .transitions_to(idle, walk)
            .unwrap()
            .when(speed.is_greater_than(0.1));
        graph
            .transitions_to(walk, idle)
            .unwrap()
            .when(speed.is_less_than(0.1));
        graph
    }

    #[test]
    fn well_formed_controller_passes() {
        let graph = authored();
        assert!(matches!(validate(&graph), Validation::Success(())));
    }

    #[test]
    fn validation_accumulates_all_issues() {
        let mut graph = authored();
        let layer = graph.layers()[0].machine;
        let idle = graph.find_state(layer, "Idle").unwrap();
        let walk = graph.find_state(layer, "Walk").unwrap();

        graph
            .transitions_to(idle, walk)
            .unwrap()
            .when(Condition::new("Ghost", ConditionMode::If, 0.0))
            .and(Condition::new("Speed", ConditionMode::Equals, 1.0));
        graph.exits(walk).unwrap();
        if let NodeKind::SubMachine(data) = &mut graph.nodes[layer.node().index()].kind {
            data.default_state = None;
        }

        match validate(&graph) {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 4);

                let has_unregistered = issues
                    .iter()
                    .any(|i| matches!(i, GraphIssue::UnregisteredParameter { parameter, .. } if parameter == "Ghost"));
                let has_incompatible = issues
                    .iter()
                    .any(|i| matches!(i, GraphIssue::IncompatibleCondition { mode: ConditionMode::Equals, .. }));
                let has_never_fires = issues
                    .iter()
                    .any(|i| matches!(i, GraphIssue::NeverFires { .. }));
                let has_missing_default = issues
                    .iter()
                    .any(|i| matches!(i, GraphIssue::MissingDefaultState { machine } if *machine == layer));

                assert!(has_unregistered);
                assert!(has_incompatible);
                assert!(has_never_fires);
                assert!(has_missing_default);
            }
            Validation::Success(_) => panic!("Expected issues, got success"),
        }
    }

    #[test]
    fn exit_time_transitions_fire_without_conditions() {
        let mut graph = authored();
        let layer = graph.layers()[0].machine;
        let idle = graph.find_state(layer, "Idle").unwrap();
        let walk = graph.find_state(layer, "Walk").unwrap();

        graph.automatically_moves_to(walk, idle).unwrap();
        graph.entry_transition(layer, idle).unwrap();

        assert!(matches!(validate(&graph), Validation::Success(())));
    }

    #[test]
    fn disabled_checks_are_skipped() {
        let mut graph = authored();
        let layer = graph.layers()[0].machine;
        let walk = graph.find_state(layer, "Walk").unwrap();
        graph.exits(walk).unwrap();

        let rules = GraphRulesBuilder::new().skip_never_fires().build();
        assert!(matches!(rules.enforce(&graph), Validation::Success(())));
        assert!(matches!(validate(&graph), Validation::Failure(_)));
    }
}
