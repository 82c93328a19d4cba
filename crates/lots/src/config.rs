use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::carving::CarveMode;
use crate::error::ConfigError;

/// Fraction of the perimeter-derived block radius a courtyard may eat into.
pub const COURTYARD_RADIUS_FRACTION: f32 = 0.45;
/// Blocks smaller than `min_area * COURTYARD_SKIP_AREA_FACTOR` never get a courtyard.
pub const COURTYARD_SKIP_AREA_FACTOR: f32 = 2.0;
/// Courtyards shallower than this (world units) are skipped.
pub const COURTYARD_MIN_DEPTH: f32 = 5.0;

/// Block previews are shrunk by this fraction of `shrink_spacing`.
pub const BLOCK_PREVIEW_SHRINK_FRACTION: f32 = 0.5;

/// Camera distance the projection is computed against at zoom 1.0.
pub const DEFAULT_PROJECTION_DISTANCE: f32 = 1000.0;

/// Runtime-tunable parameters for a generation pass.
///
/// A pass snapshots this resource when it starts, so edits made while a pass
/// is in flight only apply to the next one.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingConfig {
    /// Lots are subdivided until they are smaller than twice this area.
    pub min_area: f32,
    /// Street cycles with this many nodes or more are not treated as blocks.
    pub max_length: usize,
    /// Street setback applied to every block before carving.
    pub shrink_spacing: f32,
    /// Probability that a block is kept whole in divide mode.
    pub chance_no_divide: f32,
    /// Requested courtyard depth; the carver caps it per block.
    pub courtyard_depth: f32,
    pub min_height: f32,
    pub height_range: f32,
    pub mode: CarveMode,
    /// Base camera distance for the pseudo-3D projection. Heights must stay
    /// below `projection_distance / zoom` or roofs blow up.
    pub projection_distance: f32,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            min_area: 50.0,
            max_length: 20,
            shrink_spacing: 4.0,
            chance_no_divide: 0.05,
            courtyard_depth: 20.0,
            min_height: 20.0,
            height_range: 20.0,
            mode: CarveMode::Divide,
            projection_distance: DEFAULT_PROJECTION_DISTANCE,
        }
    }
}

impl BuildingConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BuildingConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or break a pass.
    ///
    /// Heights close to the projection distance are deliberately not checked:
    /// they only produce visual artifacts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("min_area", self.min_area)?;
        require_finite("shrink_spacing", self.shrink_spacing)?;
        require_finite("chance_no_divide", self.chance_no_divide)?;
        require_finite("courtyard_depth", self.courtyard_depth)?;
        require_finite("min_height", self.min_height)?;
        require_finite("height_range", self.height_range)?;
        require_finite("projection_distance", self.projection_distance)?;

        if self.min_area <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "min_area",
                reason: "must be positive",
            });
        }
        if self.max_length < 3 {
            return Err(ConfigError::Invalid {
                field: "max_length",
                reason: "must allow at least a triangle",
            });
        }
        if !(0.0..=1.0).contains(&self.chance_no_divide) {
            return Err(ConfigError::Invalid {
                field: "chance_no_divide",
                reason: "must be a probability in [0, 1]",
            });
        }
        for (field, value) in [
            ("shrink_spacing", self.shrink_spacing),
            ("courtyard_depth", self.courtyard_depth),
            ("min_height", self.min_height),
            ("height_range", self.height_range),
        ] {
            if value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be negative",
                });
            }
        }
        if self.projection_distance <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "projection_distance",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: "must be finite",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(BuildingConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_non_positive_min_area() {
        let config = BuildingConfig {
            min_area: 0.0,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "min_area",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_probability_out_of_range() {
        let config = BuildingConfig {
            chance_no_divide: 1.5,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "chance_no_divide",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_nan() {
        let config = BuildingConfig {
            height_range: f32::NAN,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "height_range",
                reason: "must be finite"
            })
        ));
    }

    #[test]
    fn test_rejects_negative_spacing() {
        let config = BuildingConfig {
            shrink_spacing: -1.0,
            ..default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_huge_height_range_is_accepted() {
        // h >= d is a rendering artifact, not a config error
        let config = BuildingConfig {
            height_range: 5000.0,
            ..default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_from_json_fills_defaults() {
        let config = BuildingConfig::from_json(r#"{"mode": "courtyard", "min_area": 80.0}"#)
            .expect("valid json");
        assert_eq!(config.mode, CarveMode::Courtyard);
        assert_eq!(config.min_area, 80.0);
        assert_eq!(config.courtyard_depth, 20.0);
        assert_eq!(config.max_length, 20);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = BuildingConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_json_validates() {
        let err = BuildingConfig::from_json(r#"{"max_length": 2}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_length",
                ..
            }
        ));
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let config = BuildingConfig {
            mode: CarveMode::Courtyard,
            courtyard_depth: 12.0,
            ..default()
        };
        let json = config.to_json().expect("serializes");
        assert_eq!(BuildingConfig::from_json(&json), Ok(config));
    }
}
