//! Board configuration and tuning
//!
//! Everything the host may tune lives here. Validation is fail-fast: a bad
//! config is rejected before the first turn can start.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts;

/// Matching rule used by the detector and the spawn-safety test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchRule {
    /// Maximal 4-connected same-type region (flood fill)
    #[default]
    Region,
    /// Orthogonal same-type runs through the origin cell, no gaps
    Line,
}

/// One control point of the damage response curve: cluster size -> multiplier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub size: f32,
    pub multiplier: f32,
}

/// Piecewise-linear damage response curve.
///
/// Evaluation clamps outside the key range, so a single key degenerates to a
/// constant multiplier. Keys must be strictly increasing in `size` and
/// non-decreasing in `multiplier` (larger clusters never pay out less).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageCurve {
    pub keys: Vec<CurveKey>,
}

impl Default for DamageCurve {
    fn default() -> Self {
        // size 3 -> x1 up to size 12 -> x6; deliberately super-linear
        Self {
            keys: vec![
                CurveKey { size: 3.0, multiplier: 1.0 },
                CurveKey { size: 12.0, multiplier: 6.0 },
            ],
        }
    }
}

impl DamageCurve {
    /// Multiplier for a cluster of `size` tiles, linearly interpolated
    /// between keys and clamped at both ends.
    pub fn evaluate(&self, size: f32) -> f32 {
        let keys = &self.keys;
        match keys.first() {
            None => 1.0,
            Some(first) if size <= first.size => first.multiplier,
            Some(_) => {
                for pair in keys.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    if size <= b.size {
                        let t = (size - a.size) / (b.size - a.size);
                        return a.multiplier + (b.multiplier - a.multiplier) * t;
                    }
                }
                keys.last().map(|k| k.multiplier).unwrap_or(1.0)
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.keys.is_empty() {
            return Err(ConfigError::EmptyCurve);
        }
        for pair in self.keys.windows(2) {
            if pair[1].size <= pair[0].size {
                return Err(ConfigError::CurveNotIncreasing {
                    size: pair[1].size,
                });
            }
            if pair[1].multiplier < pair[0].multiplier {
                return Err(ConfigError::CurveNotMonotonic {
                    size: pair[1].size,
                });
            }
        }
        Ok(())
    }
}

/// Configuration errors, all fatal at construction time
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("board dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("cell size must be positive (got {0})")]
    BadCellSize(f32),
    #[error("match threshold must be at least 2 (got {0})")]
    BadThreshold(usize),
    #[error("type count must be non-zero")]
    ZeroTypes,
    #[error("boss max health must be non-zero")]
    ZeroBossHealth,
    #[error("chain multiplier step must be non-negative (got {0})")]
    NegativeChainStep(f32),
    #[error("damage curve has no control points")]
    EmptyCurve,
    #[error("damage curve sizes must be strictly increasing (at size {size})")]
    CurveNotIncreasing { size: f32 },
    #[error("damage curve multipliers must be non-decreasing (at size {size})")]
    CurveNotMonotonic { size: f32 },
    #[error("config parse error: {0}")]
    Parse(String),
}

/// Full tunable surface of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Board width in cells
    pub width: u32,
    /// Board height in cells
    pub height: u32,
    /// World-space size of one cell
    pub cell_size: f32,
    /// World-space position of cell (0, 0)
    pub origin: Vec2,

    /// Damage dealt by a threshold-sized cluster before curve scaling
    pub base_damage: u32,
    /// Response curve: cluster size -> damage multiplier
    pub damage_curve: DamageCurve,
    /// Chain multiplier growth per chained resolution past the first
    pub chain_step: f32,
    /// Boss health pool restored on every reset
    pub boss_max_health: u32,

    /// Active matching rule
    pub match_rule: MatchRule,
    /// Minimum cluster size that counts as a match
    pub match_threshold: usize,
    /// Number of distinct tile types
    pub type_count: u8,

    /// Start from the fixed intro layout instead of a random drop
    pub use_intro_layout: bool,
    /// Tiles dropped by the random starting layout
    pub initial_tiles: u32,

    /// Seconds between per-tile clear cues (consumed by presentation only)
    pub explode_delay: f32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            width: consts::BOARD_WIDTH,
            height: consts::BOARD_HEIGHT,
            cell_size: consts::CELL_SIZE,
            origin: Vec2::new(consts::ORIGIN_X, consts::ORIGIN_Y),
            base_damage: consts::BASE_DAMAGE,
            damage_curve: DamageCurve::default(),
            chain_step: consts::CHAIN_STEP,
            boss_max_health: consts::BOSS_MAX_HEALTH,
            match_rule: MatchRule::default(),
            match_threshold: consts::MATCH_THRESHOLD,
            type_count: consts::TYPE_COUNT,
            use_intro_layout: true,
            initial_tiles: consts::INITIAL_TILES,
            explode_delay: consts::EXPLODE_DELAY,
        }
    }
}

impl BoardConfig {
    /// Check every invariant the sim relies on. Called by `BoardState::new`;
    /// hosts that build configs by hand can call it directly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::BadCellSize(self.cell_size));
        }
        if self.match_threshold < 2 {
            return Err(ConfigError::BadThreshold(self.match_threshold));
        }
        if self.type_count == 0 {
            return Err(ConfigError::ZeroTypes);
        }
        if self.boss_max_health == 0 {
            return Err(ConfigError::ZeroBossHealth);
        }
        if !(self.chain_step >= 0.0) {
            return Err(ConfigError::NegativeChainStep(self.chain_step));
        }
        self.damage_curve.validate()
    }

    /// Load and validate a config from JSON. Unknown fields are ignored,
    /// missing fields fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(BoardConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_curve_interpolation_and_clamping() {
        let curve = DamageCurve::default();
        assert_eq!(curve.evaluate(3.0), 1.0);
        assert_eq!(curve.evaluate(12.0), 6.0);
        // halfway between the control points
        let mid = curve.evaluate(7.5);
        assert!((mid - 3.5).abs() < 1e-6);
        // clamped outside the key range
        assert_eq!(curve.evaluate(1.0), 1.0);
        assert_eq!(curve.evaluate(50.0), 6.0);
    }

    #[test]
    fn test_bad_configs_rejected() {
        let mut config = BoardConfig {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroDimension { .. })
        ));

        config = BoardConfig {
            match_threshold: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::BadThreshold(0))));

        config = BoardConfig::default();
        config.damage_curve.keys.clear();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCurve));

        // multiplier drops between keys
        config = BoardConfig::default();
        config.damage_curve.keys = vec![
            CurveKey { size: 3.0, multiplier: 2.0 },
            CurveKey { size: 6.0, multiplier: 1.0 },
        ];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CurveNotMonotonic { .. })
        ));
    }

    #[test]
    fn test_from_json_partial() {
        let config = BoardConfig::from_json(r#"{ "width": 8, "match_rule": "line" }"#).unwrap();
        assert_eq!(config.width, 8);
        assert_eq!(config.height, consts::BOARD_HEIGHT);
        assert_eq!(config.match_rule, MatchRule::Line);
    }

    #[test]
    fn test_from_json_invalid_is_rejected() {
        let err = BoardConfig::from_json(r#"{ "type_count": 0 }"#).unwrap_err();
        assert_eq!(err, ConfigError::ZeroTypes);
    }
}
