//! Builder API for choosing validation rules.

use crate::graph::ControllerGraph;
use crate::validation::issues::GraphIssue;
use crate::validation::rules::{GraphCheck, GraphRules};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for creating graph rules. Starts with every standard check enabled.
pub struct GraphRulesBuilder {
    rules: GraphRules,
}

impl GraphRulesBuilder {
    pub fn new() -> Self {
        Self {
            rules: GraphRules::default(),
        }
    }

    /// Do not check parameter names and comparison modes
    pub fn skip_parameters(mut self) -> Self {
        self.rules.check_parameters = false;
        self
    }

    /// Allow timed transitions without conditions or exit time
    pub fn skip_never_fires(mut self) -> Self {
        self.rules.check_firing = false;
        self
    }

    pub fn skip_default_states(mut self) -> Self {
        self.rules.check_default_states = false;
        self
    }

    /// Runs `check` on the whole controller after the standard checks.
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&ControllerGraph) -> Validation<(), NonEmptyVec<GraphIssue>> + Send + Sync + 'static,
    {
        let check: GraphCheck = Box::new(check);
        self.rules.required_checks.push(check);
        self
    }

    /// Reports `CustomCheckFailed` with `error_msg` when the controller fails `predicate`.
    pub fn require_pred<F>(mut self, predicate: F, error_msg: String) -> Self
    where
        F: Fn(&ControllerGraph) -> bool + Send + Sync + 'static,
    {
        let check = move |graph: &ControllerGraph| {
            if predicate(graph) {
                Validation::success(())
            } else {
                Validation::fail(GraphIssue::CustomCheckFailed {
                    message: error_msg.clone(),
                })
            }
        };
        self.rules.required_checks.push(Box::new(check));
        self
    }

    pub fn build(self) -> GraphRules {
        self.rules
    }
}

impl Default for GraphRulesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_checks_join_standard_ones() {
        let mut graph = ControllerGraph::new("Avatar");
        let layer = graph.add_layer("Base");
        let idle = graph.new_state(layer, "Idle").unwrap();
        graph.exits(idle).unwrap();

        let rules = GraphRulesBuilder::new()
            .require_pred(|g| g.layers().len() > 1, "needs an FX layer".to_string())
            .require(|g| {
                if g.parameters().is_empty() {
                    Validation::fail(GraphIssue::CustomCheckFailed {
                        message: "no parameters".to_string(),
                    })
                } else {
                    Validation::success(())
                }
            })
            .build();

        match rules.enforce(&graph) {
            Validation::Failure(issues) => {
                assert_eq!(issues.len(), 3);
                let custom = issues
                    .iter()
                    .filter(|i| matches!(i, GraphIssue::CustomCheckFailed { .. }))
                    .count();
                assert_eq!(custom, 2);
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn predicate_that_holds_adds_nothing() {
        let graph = ControllerGraph::new("Avatar");
        let rules = GraphRulesBuilder::new()
            .skip_parameters()
            .skip_default_states()
            .require_pred(|g| g.name() == "Avatar", "wrong name".to_string())
            .build();

        assert!(matches!(rules.enforce(&graph), Validation::Success(())));
    }
}
