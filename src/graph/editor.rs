//! Fluent editing of a state's own settings.

use super::{ControllerGraph, GraphError};
use crate::core::StateId;
use crate::defaults::StateSettings;
use crate::parameters::FloatParameter;

/// Mutable view over one state's settings.
pub struct StateEditor<'g> {
    settings: &'g mut StateSettings,
}

impl<'g> StateEditor<'g> {
    pub fn with_animation(self, motion: impl Into<String>) -> Self {
        self.settings.motion = Some(motion.into());
        self
    }

    pub fn with_write_defaults(self, write_defaults: bool) -> Self {
        self.settings.write_defaults = write_defaults;
        self
    }

    pub fn with_speed(self, speed: f32) -> Self {
        self.settings.speed_parameter = None;
        self.settings.speed = speed;
        self
    }

    /// Drives the playback speed from a float parameter.
    pub fn with_speed_parameter(self, parameter: &FloatParameter) -> Self {
        self.settings.speed_parameter = Some(parameter.name().to_string());
        self
    }

    /// Drives the normalized playback time from a float parameter.
    pub fn with_motion_time(self, parameter: &FloatParameter) -> Self {
        self.settings.time_parameter = Some(parameter.name().to_string());
        self
    }

    pub fn with_cycle_offset(self, cycle_offset: f32) -> Self {
        self.settings.cycle_offset_parameter = None;
        self.settings.cycle_offset = cycle_offset;
        self
    }

    pub fn with_cycle_offset_parameter(self, parameter: &FloatParameter) -> Self {
        self.settings.cycle_offset_parameter = Some(parameter.name().to_string());
        self
    }

    pub fn settings(&self) -> &StateSettings {
        self.settings
    }
}

impl ControllerGraph {
    pub fn state_mut(&mut self, state: StateId) -> Result<StateEditor<'_>, GraphError> {
        Ok(StateEditor {
            settings: self.state_settings_mut(state)?,
        })
    }
}
