//! Settings bundle carried by timed transitions.

use serde::{Deserialize, Serialize};

/// Which transitions may interrupt a transition in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterruptionSource {
    #[default]
    None,
    Source,
    Destination,
    SourceThenDestination,
    DestinationThenSource,
}

/// Non-condition settings of a timed transition.
///
/// Copied field by field when a transition is forked for `or`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionSettings {
    /// Blend duration, in seconds when `has_fixed_duration`, otherwise normalized.
    pub duration: f32,
    pub offset: f32,
    pub has_fixed_duration: bool,
    pub has_exit_time: bool,
    pub exit_time: f32,
    pub interruption_source: InterruptionSource,
    pub ordered_interruption: bool,
    pub can_transition_to_self: bool,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration: 0.0,
            offset: 0.0,
            has_fixed_duration: true,
            has_exit_time: false,
            exit_time: 0.0,
            interruption_source: InterruptionSource::None,
            ordered_interruption: true,
            can_transition_to_self: false,
        }
    }
}

impl TransitionSettings {
    /// Explicit field copy used by the template cloner.
    pub(crate) fn copied_from(template: &TransitionSettings) -> Self {
        Self {
            duration: template.duration,
            offset: template.offset,
            has_fixed_duration: template.has_fixed_duration,
            has_exit_time: template.has_exit_time,
            exit_time: template.exit_time,
            interruption_source: template.interruption_source,
            ordered_interruption: template.ordered_interruption,
            can_transition_to_self: template.can_transition_to_self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_exit_time_and_zero_duration() {
        let settings = TransitionSettings::default();

        assert_eq!(settings.duration, 0.0);
        assert!(!settings.has_exit_time);
        assert!(settings.has_fixed_duration);
        assert_eq!(settings.interruption_source, InterruptionSource::None);
    }

    #[test]
    fn copy_preserves_every_field() {
        let template = TransitionSettings {
            duration: 0.25,
            offset: 0.1,
            has_fixed_duration: false,
            has_exit_time: true,
            exit_time: 0.75,
            interruption_source: InterruptionSource::DestinationThenSource,
            ordered_interruption: false,
            can_transition_to_self: true,
        };

        assert_eq!(TransitionSettings::copied_from(&template), template);
    }
}
