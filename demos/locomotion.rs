//! Locomotion Controller
//!
//! This example authors a small locomotion layer and a gesture layer.
//!
//! Key concepts:
//! - Typed parameters producing conditions
//! - `and`/`or` chains turning into one edge per clause
//! - Multi-clause conditions from parameter groups
//! - Validation and snapshot export
//!
//! Run with: cargo run --example locomotion

use controller_graph::core::Endpoint;
use controller_graph::validation::{validate, GraphIssue};
use controller_graph::{ControllerGraph, ControllerSnapshot, GraphError};
use stillwater::validation::Validation;

fn author_locomotion(graph: &mut ControllerGraph) -> Result<(), GraphError> {
    let base = graph.add_layer("Base");
    let idle = graph.new_state(base, "Idle")?;
    let walk = graph.new_state(base, "Walk")?;
    let run = graph.new_state(base, "Run")?;
    let airborne = graph.new_sub_machine(base, "Airborne")?;
    let rise = graph.new_state(airborne, "Rise")?;
    let fall = graph.new_state(airborne, "Fall")?;

    let speed = graph.float_parameter("Speed")?;
    let grounded = graph.bool_parameter("Grounded")?;
    let jump = graph.trigger_parameter("Jump")?;

    graph.state_mut(idle)?.with_animation("idle_loop");
    graph
        .state_mut(walk)?
        .with_animation("walk_loop")
        .with_speed_parameter(&speed);
    graph.state_mut(run)?.with_animation("run_loop");

    graph
        .transitions_to(idle, walk)?
        .with_transition_duration_seconds(0.15)
        .when(speed.is_greater_than(0.1))
        .and(grounded.is_true());
    graph
        .transitions_to(walk, run)?
        .with_transition_duration_seconds(0.2)
        .when(speed.is_greater_than(0.6));
    graph
        .transitions_to(run, walk)?
        .when(speed.is_less_than(0.6));
    graph
        .transitions_to(walk, idle)?
        .when(speed.is_less_than(0.1))
        .or()
        .when(grounded.is_false());

    graph
        .transitions_from_any(idle)?
        .with_no_transition_to_self()
        .when(grounded.is_true())
        .and(speed.is_less_than(0.1));
    graph.any_state_transition(base, airborne)?.when(jump.is_true());

    graph.automatically_moves_to(rise, fall)?;
    graph
        .exits(fall)?
        .after_animation_is_at_least_at_percent(0.9)
        .when(grounded.is_true());
    graph
        .machine_transitions_to(airborne, idle)?
        .when_conditions();

    Ok(())
}

fn author_gestures(graph: &mut ControllerGraph) -> Result<(), GraphError> {
    let hands = graph.add_layer("Hands");
    let rest = graph.new_state(hands, "Rest")?;
    let point = graph.new_state(hands, "Point")?;

    let gestures = graph.int_parameters(&["GestureLeft", "GestureRight"])?;
    let tracking = graph.bool_parameters(&["TrackingLeft", "TrackingRight"])?;

    graph
        .transitions_to(rest, point)?
        .when_any(tracking.is_any_true())?
        .and(gestures.are_equal_to(3));
    graph
        .transitions_to(point, rest)?
        .when_with_or(|series| {
            series
                .when(tracking.are_false())
                .or()
                .when(gestures.are_equal_to(0));
        });

    Ok(())
}

fn print_edges(graph: &ControllerGraph) {
    for (id, edge) in graph.edges() {
        let label = |endpoint: Endpoint| match endpoint {
            Endpoint::State(state) => graph.node(state).map(|n| n.name().to_string()).unwrap_or_default(),
            Endpoint::SubMachine(machine) => graph
                .node(machine)
                .map(|n| format!("[{}]", n.name()))
                .unwrap_or_default(),
            Endpoint::Absent => "*".to_string(),
        };
        let conditions: Vec<String> = edge.conditions().iter().map(|c| c.to_string()).collect();
        println!(
            "  {id}: {} -> {}  when {}",
            label(edge.source()),
            label(edge.destination()),
            if conditions.is_empty() {
                "(exit time)".to_string()
            } else {
                conditions.join(" && ")
            }
        );
    }
}

fn main() {
    println!("=== Locomotion Controller Example ===\n");

    let mut graph = ControllerGraph::new("Avatar");
    if let Err(e) = author_locomotion(&mut graph).and_then(|_| author_gestures(&mut graph)) {
        println!("Authoring failed: {}", e);
        return;
    }

    println!("Edges:");
    print_edges(&graph);
    println!();

    match validate(&graph) {
        Validation::Success(_) => println!("Validation: no issues"),
        Validation::Failure(issues) => {
            println!("Validation issues:");
            for issue in issues.iter() {
                let marker = match issue {
                    GraphIssue::NeverFires { .. } => "dead",
                    _ => "error",
                };
                println!("  [{marker}] {issue}");
            }
        }
    }

    match graph.snapshot().to_json() {
        Ok(json) => {
            println!("\nSnapshot: {} bytes of JSON", json.len());
            match ControllerSnapshot::from_json(&json).and_then(ControllerGraph::restore) {
                Ok(restored) => println!(
                    "Restored '{}' with {} edges",
                    restored.name(),
                    restored.edges().count()
                ),
                Err(e) => println!("Restore failed: {}", e),
            }
        }
        Err(e) => println!("Snapshot failed: {}", e),
    }
}
