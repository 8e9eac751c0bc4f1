// Data-driven navigation configuration.
//
// Every tunable and permission flag that influences path costs lives in
// `NavConfig`, loaded from JSON at startup and passed explicitly into each
// `CalculationContext`. The cost model never reads ambient settings: a
// context copies what it needs at construction, so a config swap between
// planning passes can never leave one search with a mix of old and new
// values.
//
// Missing JSON fields fall back to `NavConfig::default()`.
//
// See also: `context.rs` which snapshots these values, `goal.rs` whose
// heuristics are scaled by `heuristic_scale`.

use crate::error::{NavError, Result};
use crate::types::BlockKind;
use serde::{Deserialize, Serialize};

/// Top-level navigation configuration. Loaded from JSON, never mutated at
/// runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Cost per block of horizontal distance used by the XZ heuristics.
    /// Admissibility requires this to stay at or below the cheapest
    /// per-block horizontal move (sprinting).
    pub heuristic_scale: f64,

    /// Allow sprinting when the agent is fed enough.
    pub allow_sprint: bool,

    /// Sprinting requires a food level strictly above this value.
    pub sprint_food_threshold: u32,

    /// Allow placing throwaway blocks.
    pub allow_place: bool,

    /// Allow breaking blocks.
    pub allow_break: bool,

    /// Blocks that may be broken even when `allow_break` is false.
    pub allow_break_anyway: Vec<BlockKind>,

    pub allow_parkour: bool,
    pub allow_parkour_place: bool,
    pub allow_parkour_ascend: bool,

    /// Allow jumping while standing at the top of the build limit.
    pub allow_jump_at_build_limit: bool,

    /// Price water surfaces as walkable (with `walk_on_water_one_penalty`).
    pub assume_walk_on_water: bool,

    pub allow_diagonal_descend: bool,
    pub allow_diagonal_ascend: bool,

    /// Allow digging straight down.
    pub allow_downward: bool,

    /// Allow long falls that are broken with a water bucket.
    pub allow_water_bucket_fall: bool,

    /// Extra ticks charged for placing one block.
    pub block_placement_penalty: f64,

    /// Extra ticks charged for breaking one block, on top of mining time.
    pub block_break_additional_penalty: f64,

    /// Multiplier applied to cells on the previous path. Values below 1.0
    /// make the search prefer backtracking along known ground.
    pub backtrack_cost_favoring_coefficient: f64,

    /// Extra ticks charged for each jump.
    pub jump_penalty: f64,

    /// Extra ticks charged per block walked on a water surface.
    pub walk_on_water_one_penalty: f64,

    /// Highest safe fall without a water bucket.
    pub max_fall_height_no_water: u32,

    /// Highest fall attempted with a water bucket.
    pub max_fall_height_bucket: u32,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            heuristic_scale: 3.563,
            allow_sprint: true,
            sprint_food_threshold: 6,
            allow_place: true,
            allow_break: true,
            allow_break_anyway: Vec::new(),
            allow_parkour: false,
            allow_parkour_place: false,
            allow_parkour_ascend: true,
            allow_jump_at_build_limit: false,
            assume_walk_on_water: false,
            allow_diagonal_descend: false,
            allow_diagonal_ascend: false,
            allow_downward: true,
            allow_water_bucket_fall: true,
            block_placement_penalty: 20.0,
            block_break_additional_penalty: 2.0,
            backtrack_cost_favoring_coefficient: 0.5,
            jump_penalty: 2.0,
            walk_on_water_one_penalty: 3.0,
            max_fall_height_no_water: 3,
            max_fall_height_bucket: 20,
        }
    }
}

impl NavConfig {
    /// Parse and validate a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: NavConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would make costs meaningless (negative, NaN) or
    /// break the heuristic contract.
    pub fn validate(&self) -> Result<()> {
        if !self.heuristic_scale.is_finite() || self.heuristic_scale <= 0.0 {
            return Err(invalid(
                "heuristic_scale",
                format!("must be finite and positive, got {}", self.heuristic_scale),
            ));
        }
        let penalties = [
            ("block_placement_penalty", self.block_placement_penalty),
            (
                "block_break_additional_penalty",
                self.block_break_additional_penalty,
            ),
            ("jump_penalty", self.jump_penalty),
            ("walk_on_water_one_penalty", self.walk_on_water_one_penalty),
        ];
        for (name, value) in penalties {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(
                    name,
                    format!("must be finite and non-negative, got {value}"),
                ));
            }
        }
        let coefficient = self.backtrack_cost_favoring_coefficient;
        if !(coefficient > 0.0 && coefficient <= 1.0) {
            return Err(invalid(
                "backtrack_cost_favoring_coefficient",
                format!("must be in (0, 1], got {coefficient}"),
            ));
        }
        if self.max_fall_height_bucket < self.max_fall_height_no_water {
            return Err(invalid(
                "max_fall_height_bucket",
                format!(
                    "must be at least max_fall_height_no_water ({}), got {}",
                    self.max_fall_height_no_water, self.max_fall_height_bucket
                ),
            ));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: String) -> NavError {
    log::warn!("rejecting nav config: {name}: {reason}");
    NavError::InvalidTunable { name, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = NavConfig::default();
        let json = config.to_json().unwrap();
        let restored = NavConfig::from_json(&json).unwrap();
        assert_eq!(config, restored);
    }

    #[test]
    fn default_config_is_valid() {
        NavConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_fills_defaults() {
        let json = r#"{
            "heuristic_scale": 1.0,
            "allow_break": false,
            "allow_break_anyway": ["Leaves", "Glass"],
            "max_fall_height_no_water": 4
        }"#;
        let config = NavConfig::from_json(json).unwrap();
        assert_eq!(config.heuristic_scale, 1.0);
        assert!(!config.allow_break);
        assert_eq!(
            config.allow_break_anyway,
            vec![BlockKind::Leaves, BlockKind::Glass]
        );
        assert_eq!(config.max_fall_height_no_water, 4);
        // Untouched fields keep their defaults.
        assert_eq!(config.block_placement_penalty, 20.0);
        assert!(config.allow_place);
    }

    #[test]
    fn rejects_non_positive_heuristic_scale() {
        let err = NavConfig::from_json(r#"{ "heuristic_scale": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            NavError::InvalidTunable {
                name: "heuristic_scale",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_penalty() {
        let config = NavConfig {
            jump_penalty: -1.0,
            ..NavConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(NavError::InvalidTunable {
                name: "jump_penalty",
                ..
            })
        ));
    }

    #[test]
    fn rejects_bucket_ceiling_below_plain_ceiling() {
        let config = NavConfig {
            max_fall_height_bucket: 2,
            ..NavConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_backtrack_coefficient() {
        let config = NavConfig {
            backtrack_cost_favoring_coefficient: 1.5,
            ..NavConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = NavConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, NavError::Json(_)));
    }
}
