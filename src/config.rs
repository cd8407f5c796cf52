//! Simulation configuration
//!
//! Handed to the kernel at construction. Loaded from JSON by the driver or
//! built in code; every field has a default matching the classic 800x600 board.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::PlayerAttributes;

/// Tunable options recognised by the simulation kernel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Paddle ===
    /// Initial paddle width (level 1)
    pub paddle_size: f32,
    pub paddle_height: f32,
    /// Initial paddle speed in px/s (level 1)
    pub paddle_speed: f32,
    /// Distance from the bottom edge to the paddle's top
    pub paddle_bottom_offset: f32,
    /// Horizontal tolerance around paddle center that forces a straight return
    pub paddle_dead_zone: f32,

    // === Ball ===
    /// Initial ball speed in px/s (level 1)
    pub ball_speed: f32,
    pub ball_damage: f32,
    pub ball_radius: f32,
    /// Lower bound of the speed envelope as a multiple of the ball speed
    pub min_speed_multiplier: f32,
    /// Upper bound of the speed envelope as a multiple of the ball speed
    pub max_speed_multiplier: f32,

    // === Blocks ===
    pub block_rows: u32,
    pub block_cols: u32,
    pub block_width: f32,
    pub block_height: f32,
    pub block_padding: f32,
    /// Distance from the top edge to the first row
    pub block_top_offset: f32,

    // === Combat & rewards ===
    pub critical_chance: f32,
    pub critical_multiplier: f32,
    /// Experience granted by a plain block before the row bonus
    pub base_block_experience: u32,
    pub experience_per_row: u32,
    /// Score gained per experience point
    pub score_multiplier: u64,
    /// Health per second restored by regenerating monsters
    pub regeneration_per_second: f32,

    // === Run ===
    pub initial_lives: u8,
    /// Largest frame time accepted by a single update (seconds)
    pub max_delta_time: f32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            paddle_size: PADDLE_SIZE,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_offset: PADDLE_BOTTOM_OFFSET,
            paddle_dead_zone: PADDLE_DEAD_ZONE,

            ball_speed: BALL_SPEED,
            ball_damage: BALL_DAMAGE,
            ball_radius: BALL_RADIUS,
            min_speed_multiplier: MIN_SPEED_MULTIPLIER,
            max_speed_multiplier: MAX_SPEED_MULTIPLIER,

            block_rows: BLOCK_ROWS,
            block_cols: BLOCK_COLS,
            block_width: BLOCK_WIDTH,
            block_height: BLOCK_HEIGHT,
            block_padding: BLOCK_PADDING,
            block_top_offset: BLOCK_TOP_OFFSET,

            critical_chance: CRITICAL_CHANCE,
            critical_multiplier: CRITICAL_MULTIPLIER,
            base_block_experience: BASE_BLOCK_EXPERIENCE,
            experience_per_row: EXPERIENCE_PER_ROW,
            score_multiplier: SCORE_MULTIPLIER,
            regeneration_per_second: REGENERATION_PER_SECOND,

            initial_lives: INITIAL_LIVES,
            max_delta_time: MAX_DELTA_TIME,
        }
    }
}

impl SimConfig {
    /// Parse a config from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Level 1 player attributes implied by the initial paddle and ball options
    pub fn base_attributes(&self) -> PlayerAttributes {
        PlayerAttributes {
            paddle_size: self.paddle_size,
            paddle_speed: self.paddle_speed,
            ball_speed: self.ball_speed,
            ball_damage: self.ball_damage,
            critical_chance: self.critical_chance,
            experience_multiplier: 1.0,
        }
    }

    /// Width of the whole block grid including inner padding
    pub fn grid_width(&self) -> f32 {
        let cols = self.block_cols as f32;
        cols * (self.block_width + self.block_padding) - self.block_padding
    }

    /// Y coordinate of the bottom edge of the last block row
    pub fn grid_bottom(&self) -> f32 {
        let rows = self.block_rows as f32;
        self.block_top_offset + rows * (self.block_height + self.block_padding) - self.block_padding
    }

    /// Left edge of the block grid (grid is horizontally centered)
    pub fn grid_offset_x(&self) -> f32 {
        (self.field_width - self.grid_width()) / 2.0
    }

    /// Y coordinate of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.field_height - self.paddle_bottom_offset - self.paddle_height
    }

    /// Reject configurations the kernel cannot run
    pub fn validate(&self) -> Result<(), SimError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("paddle_size", self.paddle_size),
            ("paddle_height", self.paddle_height),
            ("paddle_speed", self.paddle_speed),
            ("ball_speed", self.ball_speed),
            ("ball_damage", self.ball_damage),
            ("ball_radius", self.ball_radius),
            ("block_width", self.block_width),
            ("block_height", self.block_height),
            ("critical_multiplier", self.critical_multiplier),
            ("max_delta_time", self.max_delta_time),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(SimError::InvalidConfig {
                    field,
                    reason: "must be a positive finite number",
                });
            }
        }

        if self.block_rows == 0 || self.block_cols == 0 {
            return Err(SimError::InvalidConfig {
                field: "block_rows/block_cols",
                reason: "grid needs at least one row and one column",
            });
        }
        if self.initial_lives == 0 {
            return Err(SimError::InvalidConfig {
                field: "initial_lives",
                reason: "must be at least 1",
            });
        }
        if !(0.0..=1.0).contains(&self.critical_chance) {
            return Err(SimError::InvalidConfig {
                field: "critical_chance",
                reason: "must be within [0, 1]",
            });
        }
        if !(self.min_speed_multiplier > 0.0)
            || self.min_speed_multiplier > self.max_speed_multiplier
        {
            return Err(SimError::InvalidConfig {
                field: "min_speed_multiplier",
                reason: "must be positive and not exceed max_speed_multiplier",
            });
        }
        if self.paddle_size > self.field_width {
            return Err(SimError::InvalidConfig {
                field: "paddle_size",
                reason: "paddle is wider than the field",
            });
        }
        if self.paddle_y() <= 0.0 {
            return Err(SimError::InvalidConfig {
                field: "paddle_bottom_offset",
                reason: "paddle would sit above the field",
            });
        }
        if self.grid_width() > self.field_width {
            return Err(SimError::GridDoesNotFit {
                grid_width: self.grid_width(),
                field_width: self.field_width,
            });
        }

        // Ball spawns at the field center and relaunches above the paddle
        let limit = (self.field_height / 2.0 - self.ball_radius).min(self.paddle_y());
        if self.grid_bottom() > limit {
            return Err(SimError::GridTooTall {
                grid_bottom: self.grid_bottom(),
                limit,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimConfig::default();
        assert!(config.validate().is_ok());
        // 10 * (75 + 5) - 5 = 795, centered in 800
        assert_eq!(config.grid_width(), 795.0);
        assert_eq!(config.grid_offset_x(), 2.5);
        // 50 + 6 * (25 + 5) - 5
        assert_eq!(config.grid_bottom(), 225.0);
    }

    #[test]
    fn test_default_base_attributes_match_progression() {
        assert_eq!(SimConfig::default().base_attributes(), PlayerAttributes::base());
    }

    #[test]
    fn test_from_json_partial() {
        let config = SimConfig::from_json(r#"{ "field_width": 900, "block_rows": 4 }"#).unwrap();
        assert_eq!(config.field_width, 900.0);
        assert_eq!(config.block_rows, 4);
        assert_eq!(config.block_cols, BLOCK_COLS);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            SimConfig::from_json("not json"),
            Err(SimError::Config(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = SimConfig {
            field_width: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig { field: "field_width", .. })
        ));

        let config = SimConfig {
            block_cols: 20,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::GridDoesNotFit { .. })));

        let config = SimConfig {
            block_rows: 20,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimError::GridTooTall { limit, .. }) if limit == 290.0
        ));

        let config = SimConfig {
            block_top_offset: 280.0,
            block_rows: 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::GridTooTall { .. })));

        let config = SimConfig {
            min_speed_multiplier: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
