//! Authoring defaults applied when nodes and edges are created.
//!
//! Defaults are plain data so they can be shipped alongside a project and
//! loaded from JSON:
//!
//! ```rust
//! use controller_graph::defaults::AuthoringDefaults;
//!
//! let defaults = AuthoringDefaults::from_json(r#"{ "grid": { "x": 1.0, "y": 1.0 } }"#).unwrap();
//! assert_eq!(defaults.grid.x, 1.0);
//! assert!(!defaults.transition.has_exit_time);
//! ```

use crate::core::TransitionSettings;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};
use thiserror::Error;

/// Position of a node in host units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Size of one layout cell in host units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSize {
    pub x: f32,
    pub y: f32,
}

impl Default for GridSize {
    fn default() -> Self {
        Self { x: 250.0, y: 70.0 }
    }
}

impl Mul<(i32, i32)> for GridSize {
    type Output = Position;

    fn mul(self, (x, y): (i32, i32)) -> Position {
        Position::new(x as f32 * self.x, y as f32 * self.y)
    }
}

/// Cell coordinates, multiplied by the grid when applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Initial settings of a freshly created state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSettings {
    pub motion: Option<String>,
    pub write_defaults: bool,
    pub speed: f32,
    pub speed_parameter: Option<String>,
    pub time_parameter: Option<String>,
    pub cycle_offset: f32,
    pub cycle_offset_parameter: Option<String>,
}

/// Anchor positions of the pseudo-nodes drawn inside a machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MachineAnchors {
    pub entry: Position,
    pub exit: Position,
    pub any_state: Position,
    pub parent_machine: Position,
}

/// Errors raised while loading defaults.
#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("Invalid defaults document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Defaults applied by the controller when it creates nodes and edges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringDefaults {
    pub grid: GridSize,
    pub write_defaults: bool,
    pub transition: TransitionSettings,
    pub entry_anchor: GridCell,
    pub exit_anchor: GridCell,
    pub any_state_anchor: GridCell,
    pub parent_machine_anchor: GridCell,
}

impl Default for AuthoringDefaults {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            write_defaults: false,
            transition: TransitionSettings::default(),
            entry_anchor: GridCell::new(0, -1),
            exit_anchor: GridCell::new(7, -1),
            any_state_anchor: GridCell::new(0, 7),
            parent_machine_anchor: GridCell::new(3, -1),
        }
    }
}

impl AuthoringDefaults {
    /// Defaults with a one-unit grid, handy when positions are read back as cells.
    pub fn unit_grid() -> Self {
        Self {
            grid: GridSize { x: 1.0, y: 1.0 },
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DefaultsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Converts cell coordinates to host units.
    pub fn grid_position(&self, x: i32, y: i32) -> Position {
        self.grid * (x, y)
    }

    /// Where the first child of an empty machine is anchored before the
    /// one-cell downward shift.
    pub fn first_child_origin(&self) -> Position {
        Position::new(self.grid.x * 2.0, 0.0)
    }

    pub fn configure_state(&self) -> StateSettings {
        StateSettings {
            write_defaults: self.write_defaults,
            speed: 1.0,
            ..StateSettings::default()
        }
    }

    pub fn configure_transition(&self) -> TransitionSettings {
        self.transition
    }

    pub fn configure_machine(&self) -> MachineAnchors {
        let cell = |c: GridCell| self.grid_position(c.x, c.y);
        MachineAnchors {
            entry: cell(self.entry_anchor),
            exit: cell(self.exit_anchor),
            any_state: cell(self.any_state_anchor),
            parent_machine: cell(self.parent_machine_anchor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_position_scales_cells() {
        let defaults = AuthoringDefaults::default();

        assert_eq!(defaults.grid_position(1, 2), Position::new(250.0, 140.0));
        assert_eq!(defaults.grid_position(0, -1), Position::new(0.0, -70.0));
    }

    #[test]
    fn first_child_origin_sits_two_columns_right() {
        let defaults = AuthoringDefaults::unit_grid();
        assert_eq!(defaults.first_child_origin(), Position::new(2.0, 0.0));
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let defaults =
            AuthoringDefaults::from_json(r#"{ "write_defaults": true, "grid": { "x": 100.0, "y": 50.0 } }"#)
                .unwrap();

        assert!(defaults.write_defaults);
        assert_eq!(defaults.grid, GridSize { x: 100.0, y: 50.0 });
        assert_eq!(defaults.exit_anchor, GridCell::new(7, -1));
        assert!(defaults.configure_state().write_defaults);
    }

    #[test]
    fn malformed_json_is_reported() {
        let result = AuthoringDefaults::from_json("{ not json");
        assert!(matches!(result, Err(DefaultsError::Parse(_))));
    }

    #[test]
    fn machine_anchors_use_grid() {
        let anchors = AuthoringDefaults::default().configure_machine();

        assert_eq!(anchors.exit, Position::new(1750.0, -70.0));
        assert_eq!(anchors.any_state, Position::new(0.0, 490.0));
    }
}
