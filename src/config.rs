use crate::error::ConfigError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constants for a localization run. Fixed for the whole run.
///
/// Distances share the unit of the range readings and the reference map.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocalizerConfig {
    /// Readings at or below this are invalid.
    pub min_valid_distance: f64,

    /// Magnitude of the scan derivative that counts as a cylinder edge.
    pub jump_threshold: f64,

    /// Added to each cylinder depth, from visible surface towards the axis.
    pub range_offset: f64,

    /// Observations farther than this from every map landmark stay unpaired.
    pub max_correspondence_radius: f64,

    /// Estimate a rigid transform instead of a similarity transform.
    pub fix_scale: bool,
}

impl Default for LocalizerConfig {
    fn default() -> Self {
        Self {
            min_valid_distance: 20.0,
            jump_threshold: 100.0,
            range_offset: 90.0,
            max_correspondence_radius: 400.0,
            fix_scale: true,
        }
    }
}

impl LocalizerConfig {
    /// Returns the config unchanged if every value is usable.
    pub fn validate(self) -> Result<Self, ConfigError> {
        non_negative("min_valid_distance", self.min_valid_distance)?;
        non_negative("jump_threshold", self.jump_threshold)?;

        if !self.range_offset.is_finite() {
            return Err(ConfigError::NonFinite {
                name: "range_offset",
                value: self.range_offset,
            });
        }

        let radius = self.max_correspondence_radius;
        if radius.is_nan() || radius <= 0.0 {
            return Err(ConfigError::EmptyGate { value: radius });
        }

        Ok(self)
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    match value.is_finite() && value >= 0.0 {
        true => Ok(()),
        false => Err(ConfigError::NegativeOrNonFinite { name, value }),
    }
}
