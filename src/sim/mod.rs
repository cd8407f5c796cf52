//! Simulation module
//!
//! All gameplay logic lives here:
//! - Frame-time driven updates (`dt` clamped per tick)
//! - Seeded RNG only
//! - Stable iteration order (blocks in scan order, cooldowns by skill id)
//! - No windowing or platform dependencies

pub mod entity;
pub mod geometry;
pub mod monster;
pub mod progression;
pub mod render;
pub mod skills;
pub mod state;
pub mod tick;

pub use entity::{Ball, Block, BlockKind, Paddle, PaddleIntent};
pub use geometry::{Rect, circle_rect_overlap, collision_normal, rects_overlap, reflect};
pub use monster::{MonsterArchetype, MonsterKind, Reward, SpecialAbility, select_monster_type};
pub use progression::{
    LevelUpResult, Player, PlayerAttributes, PlayerStats, add_experience, apply_level_up_bonuses,
};
pub use render::{RenderSurface, render};
pub use skills::{EffectType, Skill, SkillKind, SkillSystem};
pub use state::{GameEvent, GamePhase, Modifiers, Simulation, Snapshot};
pub use tick::{generate_wave, tick};
