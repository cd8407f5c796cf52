//! Ball, paddle and block entities

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{self, Rect};
use super::monster::{MonsterArchetype, MonsterKind, Reward, SpecialAbility};

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center position
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub active: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2, damage: f32) -> Self {
        Self {
            pos,
            vel,
            radius,
            damage,
            active: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Reflect velocity about a surface normal
    pub fn bounce(&mut self, normal: Vec2) {
        self.vel = geometry::reflect(self.vel, normal);
    }

    /// Move the ball and bring it to rest
    pub fn reset_position(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vel = Vec2::ZERO;
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.pos.x - self.radius,
            self.pos.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Horizontal movement intent coming from the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaddleIntent {
    Left,
    Right,
    #[default]
    Stop,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Movement speed in px/s
    pub speed: f32,
    pub intent: PaddleIntent,
    /// Horizontal velocity derived from intent on the last tick
    pub vel_x: f32,
}

impl Paddle {
    pub fn new(pos: Vec2, width: f32, height: f32, speed: f32) -> Self {
        Self {
            pos,
            width,
            height,
            speed,
            intent: PaddleIntent::Stop,
            vel_x: 0.0,
        }
    }

    pub fn move_left(&mut self) {
        self.intent = PaddleIntent::Left;
    }

    pub fn move_right(&mut self) {
        self.intent = PaddleIntent::Right;
    }

    pub fn stop(&mut self) {
        self.intent = PaddleIntent::Stop;
    }

    /// Turn the current intent into velocity, move, and stay inside the field
    pub fn advance(&mut self, dt: f32, field_width: f32) {
        self.vel_x = match self.intent {
            PaddleIntent::Left => -self.speed,
            PaddleIntent::Right => self.speed,
            PaddleIntent::Stop => 0.0,
        };
        self.pos.x += self.vel_x * dt;
        self.clamp_to_field(field_width);
    }

    pub fn clamp_to_field(&mut self, field_width: f32) {
        let max_x = (field_width - self.width).max(0.0);
        self.pos.x = geometry::clamp(self.pos.x, 0.0, max_x);
    }

    /// Resize around the current center
    pub fn set_width(&mut self, width: f32, field_width: f32) {
        let center = self.center_x();
        self.width = width;
        self.pos.x = center - width / 2.0;
        self.clamp_to_field(field_width);
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.width, self.height)
    }
}

/// Block variants
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    /// Plain block
    #[default]
    Normal,
    /// Multi-hit monster with per-type rewards
    Monster {
        monster: MonsterKind,
        drop_rewards: Vec<Reward>,
    },
}

/// A destructible block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub kind: BlockKind,
    pub rect: Rect,
    pub current_health: f32,
    pub max_health: f32,
    /// Experience granted on destruction before the row bonus
    pub experience_value: u32,
    /// Grid row (0 = top)
    pub row: u32,
    /// RGB color tag for rendering
    pub color: u32,
    pub active: bool,
    pub destroyed: bool,
}

impl Block {
    /// Single-hit plain block
    pub fn normal(id: u32, rect: Rect, row: u32, experience_value: u32, color: u32) -> Self {
        Self {
            id,
            kind: BlockKind::Normal,
            rect,
            current_health: 1.0,
            max_health: 1.0,
            experience_value,
            row,
            color,
            active: true,
            destroyed: false,
        }
    }

    /// Monster block with health and rewards taken from its archetype
    pub fn monster(id: u32, rect: Rect, row: u32, archetype: &MonsterArchetype) -> Self {
        Self {
            id,
            kind: BlockKind::Monster {
                monster: archetype.kind,
                drop_rewards: archetype.drop_rewards.to_vec(),
            },
            rect,
            current_health: archetype.max_health,
            max_health: archetype.max_health,
            experience_value: archetype.experience_value,
            row,
            color: archetype.color,
            active: true,
            destroyed: false,
        }
    }

    /// Override health (both current and max)
    pub fn with_health(mut self, health: f32) -> Self {
        self.max_health = health;
        self.current_health = health;
        self
    }

    /// Apply damage. Returns true when this hit destroyed the block.
    pub fn take_damage(&mut self, damage: f32) -> bool {
        if self.destroyed {
            return false;
        }
        self.current_health = (self.current_health - damage).max(0.0);
        if self.current_health <= 0.0 {
            self.destroy();
            return true;
        }
        false
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.active = false;
    }

    /// Restore health, never beyond max
    pub fn heal(&mut self, amount: f32) {
        if !self.destroyed {
            self.current_health = (self.current_health + amount).min(self.max_health);
        }
    }

    /// Fraction of health left, for the health bar
    pub fn health_ratio(&self) -> f32 {
        if self.max_health > 0.0 {
            self.current_health / self.max_health
        } else {
            0.0
        }
    }

    pub fn archetype(&self) -> Option<&'static MonsterArchetype> {
        match &self.kind {
            BlockKind::Normal => None,
            BlockKind::Monster { monster, .. } => Some(monster.archetype()),
        }
    }

    pub fn is_monster(&self) -> bool {
        matches!(self.kind, BlockKind::Monster { .. })
    }

    pub fn regenerates(&self) -> bool {
        self.archetype()
            .is_some_and(|a| a.special_ability == Some(SpecialAbility::Regeneration))
    }

    pub fn drop_rewards(&self) -> &[Reward] {
        match &self.kind {
            BlockKind::Normal => &[],
            BlockKind::Monster { drop_rewards, .. } => drop_rewards,
        }
    }

    /// Experience for destroying this block, before player multipliers
    pub fn experience_reward(&self, per_row: u32) -> u32 {
        self.experience_value + self.row * per_row
    }
}
