//! Setup and rejection errors
//!
//! Ordinary tick outcomes (no collision, missing ball, clamped positions) are
//! never errors. Only construction problems and rejected player actions are.

use thiserror::Error;

/// Fatal problems detected before a simulation starts
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is outside the range the kernel can work with
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    /// The block grid is wider than the playing field
    #[error("block grid is {grid_width}px wide but the field is only {field_width}px")]
    GridDoesNotFit { grid_width: f32, field_width: f32 },

    /// The block grid reaches down to the ball spawn point or the paddle
    #[error("block grid ends at y={grid_bottom} but must stay above y={limit}")]
    GridTooTall { grid_bottom: f32, limit: f32 },

    /// A config document could not be parsed
    #[error("failed to parse config: {0}")]
    Config(#[from] serde_json::Error),

    /// A config document could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a skill could not be used or unlocked
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkillError {
    #[error("unknown skill `{0}`")]
    UnknownSkill(String),

    #[error("skill `{id}` is on cooldown for another {remaining:.2}s")]
    OnCooldown { id: String, remaining: f32 },

    #[error("skill `{id}` requires level {required}, player is level {level}")]
    LevelTooLow { id: String, required: u32, level: u32 },

    #[error("no skill points left to unlock `{0}`")]
    NoSkillPoints(String),

    #[error("skill `{0}` is already unlocked")]
    AlreadyUnlocked(String),

    #[error("skill `{0}` has not been unlocked")]
    NotUnlocked(String),
}
