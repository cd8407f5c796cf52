//! Simulation state
//!
//! The kernel owns the ball, paddle and blocks. The player record is owned by
//! the caller and lent to each update, so several simulations can run side by
//! side without sharing anything.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Ball, Block, Paddle};
use super::monster::Reward;
use super::progression::{self, Player};
use super::skills::{self, EffectType, SkillKind, SkillSystem};
use crate::config::SimConfig;
use crate::consts::RELAUNCH_MAX_ANGLE;
use crate::error::{SimError, SkillError};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ticking (entities may still be partially set up)
    Playing,
    /// Updates are ignored until resumed
    Paused,
    /// Out of lives
    GameOver,
    /// Stopped by the driver
    Stopped,
}

/// Something that happened during a tick, for UI and persistence hooks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BlockHit {
        block_id: u32,
        damage: f32,
        critical: bool,
    },
    BlockDestroyed {
        block_id: u32,
        experience: u32,
        score: u64,
    },
    LeveledUp {
        levels_gained: u32,
        new_level: u32,
    },
    RewardGranted(Reward),
    SkillActivated {
        skill_id: String,
        duration: Option<f32>,
    },
    LifeLost {
        lives_left: u8,
    },
    WaveCleared {
        wave: u32,
    },
    WaveStarted {
        wave: u32,
        monsters: u32,
    },
    GameOver {
        score: u64,
    },
}

/// Attribute values after skill effects, resolved once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Modifiers {
    pub paddle_size: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub ball_damage: f32,
    pub critical_chance: f32,
    pub experience_multiplier: f32,
}

impl Modifiers {
    pub fn resolve(player: &Player, skills: &SkillSystem) -> Self {
        let attrs = &player.attributes;
        let bonus = |kind| skills.effect_value(kind) + skills::passive_value(player, kind);
        Self {
            paddle_size: attrs.paddle_size * skills.multiplier(EffectType::PaddleSize),
            paddle_speed: attrs.paddle_speed * skills.multiplier(EffectType::PaddleSpeed),
            ball_speed: attrs.ball_speed * skills.multiplier(EffectType::BallSpeed),
            ball_damage: attrs.ball_damage * skills.multiplier(EffectType::BallDamage),
            critical_chance: (attrs.critical_chance + bonus(EffectType::CriticalChance))
                .clamp(0.0, 1.0),
            experience_multiplier: attrs.experience_multiplier
                + bonus(EffectType::ExperienceBoost),
        }
    }
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub wave: u32,
    pub lives: u8,
    pub score: u64,
    pub time: f64,
    pub ball: Option<Ball>,
    pub paddle: Option<Paddle>,
    pub blocks: Vec<Block>,
}

/// The simulation kernel
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) config: SimConfig,
    /// Run seed for reproducibility
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: GamePhase,
    /// Current wave index (0 before the first wave)
    pub(crate) wave_index: u32,
    /// Set once a generated wave is in play; enables automatic repopulation
    pub(crate) wave_active: bool,
    pub(crate) lives: u8,
    pub(crate) score: u64,
    /// Simulation clock in seconds
    pub(crate) time: f64,
    pub(crate) time_ticks: u64,
    pub(crate) ball: Option<Ball>,
    pub(crate) paddle: Option<Paddle>,
    /// Blocks in scan order
    pub(crate) blocks: Vec<Block>,
    pub(crate) skills: SkillSystem,
    /// Modifiers seen on the previous tick; entities resync when they change
    pub(crate) last_modifiers: Option<Modifiers>,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl Simulation {
    /// Create an empty simulation seeded for reproducible randomness
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        Self::with_rng(config, seed, Pcg32::seed_from_u64(seed))
    }

    /// Create an empty simulation drawing from a caller-supplied generator
    pub fn with_rng(config: SimConfig, seed: u64, rng: Pcg32) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            lives: config.initial_lives,
            config,
            seed,
            rng,
            phase: GamePhase::Playing,
            wave_index: 0,
            wave_active: false,
            score: 0,
            time: 0.0,
            time_ticks: 0,
            ball: None,
            paddle: None,
            blocks: Vec::new(),
            skills: SkillSystem::new(),
            last_modifiers: None,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place paddle and ball for `player` and generate the first wave
    ///
    /// The player's attributes are rebuilt from the configured level 1
    /// baseline first, so a fresh `Player` plays on this board's numbers.
    pub fn start_wave(&mut self, player: &mut Player) {
        progression::apply_level_up_bonuses_from(player, &self.config.base_attributes());
        let config = &self.config;
        let modifiers = Modifiers::resolve(player, &self.skills);

        let paddle_x = (config.field_width - modifiers.paddle_size) / 2.0;
        self.paddle = Some(Paddle::new(
            Vec2::new(paddle_x, config.paddle_y()),
            modifiers.paddle_size,
            config.paddle_height,
            modifiers.paddle_speed,
        ));

        let center = Vec2::new(config.field_width / 2.0, config.field_height / 2.0);
        self.ball = Some(Ball::new(
            center,
            config.ball_radius,
            Vec2::ZERO,
            modifiers.ball_damage,
        ));
        self.launch_ball(center, modifiers.ball_speed);
        self.last_modifiers = Some(modifiers);

        self.wave_index += 1;
        super::tick::generate_wave(self, player.level());
        self.wave_active = true;
        self.phase = GamePhase::Playing;
    }

    /// Place the ball at `pos` heading upward at a random angle within ±60°
    pub(crate) fn launch_ball(&mut self, pos: Vec2, speed: f32) {
        let angle = self.rng.random_range(-RELAUNCH_MAX_ANGLE..=RELAUNCH_MAX_ANGLE);
        if let Some(ball) = &mut self.ball {
            ball.pos = pos;
            ball.vel = Vec2::new(angle.sin(), -angle.cos()) * speed;
            ball.active = true;
        }
    }

    // === Partial setup ===

    pub fn set_ball(&mut self, ball: Ball) {
        self.ball = Some(ball);
    }

    pub fn set_paddle(&mut self, paddle: Paddle) {
        self.paddle = Some(paddle);
    }

    /// Append a block after the existing ones in scan order
    pub fn add_block(&mut self, block: Block) {
        self.next_id = self.next_id.max(block.id + 1);
        self.blocks.push(block);
    }

    // === Input intents ===

    pub fn move_left(&mut self) {
        if let Some(paddle) = &mut self.paddle {
            paddle.move_left();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(paddle) = &mut self.paddle {
            paddle.move_right();
        }
    }

    pub fn stop_paddle(&mut self) {
        if let Some(paddle) = &mut self.paddle {
            paddle.stop();
        }
    }

    // === Run control ===

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Halt the simulation; later updates have no effect
    pub fn stop(&mut self) {
        self.phase = GamePhase::Stopped;
    }

    /// Advance by one frame
    pub fn update(&mut self, player: &mut Player, dt: f32) {
        super::tick::tick(self, player, dt);
    }

    /// Trigger an unlocked skill on the simulation clock
    pub fn use_skill(&mut self, player: &Player, skill_id: &str) -> Result<(), SkillError> {
        let skill = skills::skill_by_id(skill_id)
            .ok_or_else(|| SkillError::UnknownSkill(skill_id.to_string()))?;
        if !player.has_skill(skill.id) {
            return Err(SkillError::NotUnlocked(skill.id.to_string()));
        }

        match self.skills.use_skill(skill, self.time) {
            Ok(()) => {
                log::debug!("Skill {} used at t={:.2}", skill.id, self.time);
                if skill.kind != SkillKind::Passive {
                    self.events.push(GameEvent::SkillActivated {
                        skill_id: skill.id.to_string(),
                        duration: skill.duration,
                    });
                }
                Ok(())
            }
            Err(err) => {
                log::warn!("Skill {} rejected: {}", skill.id, err);
                Err(err)
            }
        }
    }

    /// Take all events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Read-only views ===

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn wave(&self) -> u32 {
        self.wave_index
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        self.paddle.as_ref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn skills(&self) -> &SkillSystem {
        &self.skills
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            wave: self.wave_index,
            lives: self.lives,
            score: self.score,
            time: self.time,
            ball: self.ball.clone(),
            paddle: self.paddle.clone(),
            blocks: self.blocks.clone(),
        }
    }
}
