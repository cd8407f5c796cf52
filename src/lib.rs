//! Monster Breaker - a Breakout arena with monsters, levels and skills
//!
//! Core modules:
//! - `sim`: Simulation kernel (geometry, entities, progression, skills, tick)
//! - `config`: Tunable options handed to the kernel
//! - `error`: Setup errors and rejected actions

pub mod config;
pub mod error;
pub mod sim;

pub use config::SimConfig;
pub use error::{SimError, SkillError};

/// Default board constants
pub mod consts {
    /// Playing field
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Paddle defaults (level 1)
    pub const PADDLE_SIZE: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_SPEED: f32 = 300.0;
    pub const PADDLE_BOTTOM_OFFSET: f32 = 35.0;
    pub const PADDLE_DEAD_ZONE: f32 = 10.0;

    /// Ball defaults (level 1)
    pub const BALL_SPEED: f32 = 250.0;
    pub const BALL_DAMAGE: f32 = 10.0;
    pub const BALL_RADIUS: f32 = 10.0;
    /// Speed envelope bounds as multiples of the configured ball speed
    pub const MIN_SPEED_MULTIPLIER: f32 = 0.4;
    pub const MAX_SPEED_MULTIPLIER: f32 = 1.5;
    /// Relaunch angle spread after a lost ball (±60°)
    pub const RELAUNCH_MAX_ANGLE: f32 = std::f32::consts::FRAC_PI_3;
    /// Extra gap between paddle and a relaunched ball
    pub const RELAUNCH_GAP: f32 = 10.0;
    /// Paddle deflection at the very edge (45°)
    pub const PADDLE_MAX_DEFLECTION: f32 = std::f32::consts::FRAC_PI_4;

    /// Block grid
    pub const BLOCK_ROWS: u32 = 6;
    pub const BLOCK_COLS: u32 = 10;
    pub const BLOCK_WIDTH: f32 = 75.0;
    pub const BLOCK_HEIGHT: f32 = 25.0;
    pub const BLOCK_PADDING: f32 = 5.0;
    pub const BLOCK_TOP_OFFSET: f32 = 50.0;

    /// Combat and rewards
    pub const CRITICAL_CHANCE: f32 = 0.05;
    pub const CRITICAL_MULTIPLIER: f32 = 2.0;
    pub const BASE_BLOCK_EXPERIENCE: u32 = 5;
    pub const EXPERIENCE_PER_ROW: u32 = 2;
    pub const SCORE_MULTIPLIER: u64 = 10;
    pub const REGENERATION_PER_SECOND: f32 = 2.0;

    /// Run
    pub const INITIAL_LIVES: u8 = 3;
    /// Largest accepted frame time (30 FPS)
    pub const MAX_DELTA_TIME: f32 = 1.0 / 30.0;
}
