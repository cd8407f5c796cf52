//! Experience, levels and level-scaled player attributes
//!
//! The `Player` record is owned by the caller (loaded and stored by whatever
//! persistence layer hosts the game) and lent to the simulation each tick.

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_DAMAGE, BALL_SPEED, CRITICAL_CHANCE, PADDLE_SIZE, PADDLE_SPEED};

/// Experience needed to clear level 1
pub const BASE_EXPERIENCE_REQUIRED: f64 = 100.0;
/// Growth factor of the experience curve
pub const EXPERIENCE_GROWTH: f64 = 1.5;
/// Critical chance cap reachable through levels
pub const MAX_LEVEL_CRITICAL_CHANCE: f32 = 0.5;
/// Highest reachable level; its threshold still fits in `u32`
pub const MAX_LEVEL: u32 = 40;

/// Level and experience counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    /// Experience collected toward the next level
    pub experience: u32,
    pub experience_to_next: u32,
    /// Lifetime experience
    pub total_experience: u64,
    /// Unspent skill points
    pub skill_points: u32,
}

/// Attributes derived from level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAttributes {
    pub paddle_size: f32,
    pub paddle_speed: f32,
    pub ball_speed: f32,
    pub ball_damage: f32,
    pub critical_chance: f32,
    pub experience_multiplier: f32,
}

impl PlayerAttributes {
    /// Level 1 attributes of the default board
    pub fn base() -> Self {
        Self {
            paddle_size: PADDLE_SIZE,
            paddle_speed: PADDLE_SPEED,
            ball_speed: BALL_SPEED,
            ball_damage: BALL_DAMAGE,
            critical_chance: CRITICAL_CHANCE,
            experience_multiplier: 1.0,
        }
    }

    /// Attributes at `level`, grown linearly from the level 1 `base`
    pub fn scaled(base: &Self, level: u32) -> Self {
        let s = (level.max(1) - 1) as f32;
        Self {
            paddle_size: (base.paddle_size + s * 5.0).floor(),
            paddle_speed: (base.paddle_speed + s * 10.0).floor(),
            ball_speed: (base.ball_speed + s * 8.0).floor(),
            ball_damage: (base.ball_damage + s * 2.0).floor(),
            critical_chance: (base.critical_chance + s * 0.02).min(MAX_LEVEL_CRITICAL_CHANCE),
            experience_multiplier: base.experience_multiplier + s * 0.1,
        }
    }

    pub fn for_level(level: u32) -> Self {
        Self::scaled(&Self::base(), level)
    }
}

impl Default for PlayerAttributes {
    fn default() -> Self {
        Self::base()
    }
}

/// Long-lived player progression record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub stats: PlayerStats,
    pub attributes: PlayerAttributes,
    /// Skill ids bought with skill points
    #[serde(default)]
    pub unlocked_skills: Vec<String>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    /// Fresh level 1 player
    pub fn new() -> Self {
        Self::with_base(PlayerAttributes::base())
    }

    /// Fresh level 1 player starting from custom attributes
    pub fn with_base(base: PlayerAttributes) -> Self {
        Self {
            stats: PlayerStats {
                level: 1,
                experience: 0,
                experience_to_next: experience_required(1),
                total_experience: 0,
                skill_points: 0,
            },
            attributes: base,
            unlocked_skills: Vec::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.stats.level
    }

    pub fn has_skill(&self, skill_id: &str) -> bool {
        self.unlocked_skills.iter().any(|id| id == skill_id)
    }
}

/// Outcome of an experience grant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpResult {
    pub leveled_up: bool,
    pub levels_gained: u32,
    pub new_level: u32,
}

/// Experience needed to advance from `level` to `level + 1`
///
/// Levels past `MAX_LEVEL` reuse the `MAX_LEVEL` threshold.
pub fn experience_required(level: u32) -> u32 {
    let exponent = level.clamp(1, MAX_LEVEL) - 1;
    (BASE_EXPERIENCE_REQUIRED * EXPERIENCE_GROWTH.powi(exponent as i32)).floor() as u32
}

/// Level reached by a player who has collected `total` experience from level 1
pub fn level_from_total_experience(total: u64) -> u32 {
    let mut level = 1;
    let mut remaining = total;
    loop {
        let required = experience_required(level) as u64;
        if level >= MAX_LEVEL || remaining < required {
            return level;
        }
        remaining -= required;
        level += 1;
    }
}

/// Grant experience and roll over as many levels as it covers
pub fn add_experience(player: &mut Player, amount: u32) -> LevelUpResult {
    let stats = &mut player.stats;
    stats.total_experience += amount as u64;
    stats.experience = stats.experience.saturating_add(amount);

    let mut levels_gained = 0;
    while stats.level < MAX_LEVEL && stats.experience >= stats.experience_to_next {
        stats.experience -= stats.experience_to_next;
        stats.level += 1;
        stats.skill_points += 1;
        levels_gained += 1;
        stats.experience_to_next = experience_required(stats.level);
    }
    if stats.level >= MAX_LEVEL {
        // Progress bar stays just short of full at the cap
        stats.experience = stats.experience.min(stats.experience_to_next - 1);
    }

    if levels_gained > 0 {
        log::debug!(
            "Player gained {} level(s), now level {}",
            levels_gained,
            stats.level
        );
    }

    LevelUpResult {
        leveled_up: levels_gained > 0,
        levels_gained,
        new_level: stats.level,
    }
}

/// Recompute level-derived attributes (idempotent for a given level)
pub fn apply_level_up_bonuses(player: &mut Player) {
    apply_level_up_bonuses_from(player, &PlayerAttributes::base());
}

/// Same as `apply_level_up_bonuses` with a custom level 1 baseline
pub fn apply_level_up_bonuses_from(player: &mut Player, base: &PlayerAttributes) {
    player.attributes = PlayerAttributes::scaled(base, player.stats.level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_required() {
        assert_eq!(experience_required(1), 100);
        assert_eq!(experience_required(2), 150);
        assert_eq!(experience_required(3), 225);
        assert_eq!(experience_required(4), 337);
    }

    #[test]
    fn test_experience_required_strictly_increasing() {
        for level in 1..MAX_LEVEL {
            assert!(experience_required(level + 1) > experience_required(level));
        }
        assert!(experience_required(MAX_LEVEL) < u32::MAX);
        assert_eq!(experience_required(60), experience_required(MAX_LEVEL));
    }

    #[test]
    fn test_level_stops_at_cap() {
        let mut player = Player::new();
        for _ in 0..10 {
            add_experience(&mut player, u32::MAX);
        }
        assert_eq!(player.stats.level, MAX_LEVEL);
        assert_eq!(player.stats.skill_points, MAX_LEVEL - 1);
        assert!(player.stats.experience < player.stats.experience_to_next);
        assert_eq!(
            level_from_total_experience(player.stats.total_experience),
            MAX_LEVEL
        );

        let result = add_experience(&mut player, 1_000);
        assert!(!result.leveled_up);
        assert_eq!(result.new_level, MAX_LEVEL);
    }

    #[test]
    fn test_fresh_player() {
        let player = Player::new();
        assert_eq!(player.stats.level, 1);
        assert_eq!(player.stats.experience, 0);
        assert_eq!(player.stats.experience_to_next, 100);
        assert_eq!(player.stats.skill_points, 0);
        assert_eq!(player.attributes.paddle_size, 100.0);
        assert_eq!(player.attributes.paddle_speed, 300.0);
        assert_eq!(player.attributes.ball_speed, 250.0);
        assert_eq!(player.attributes.ball_damage, 10.0);
    }

    #[test]
    fn test_add_experience_without_level_up() {
        let mut player = Player::new();
        let result = add_experience(&mut player, 50);
        assert!(!result.leveled_up);
        assert_eq!(result.levels_gained, 0);
        assert_eq!(player.stats.experience, 50);
        assert_eq!(player.stats.level, 1);
    }

    #[test]
    fn test_add_experience_exact_threshold() {
        let mut player = Player::new();
        let result = add_experience(&mut player, 100);
        assert!(result.leveled_up);
        assert_eq!(result.levels_gained, 1);
        assert_eq!(result.new_level, 2);
        assert_eq!(player.stats.level, 2);
        assert_eq!(player.stats.skill_points, 1);
        assert_eq!(player.stats.experience, 0);
        assert_eq!(player.stats.experience_to_next, 150);
    }

    #[test]
    fn test_add_experience_multiple_levels() {
        let mut player = Player::new();
        // 100 + 150 = 250 clears two levels, 50 carried over
        let result = add_experience(&mut player, 300);
        assert_eq!(result.levels_gained, 2);
        assert_eq!(player.stats.level, 3);
        assert_eq!(player.stats.experience, 50);
        assert_eq!(player.stats.total_experience, 300);
        assert!(player.stats.experience < player.stats.experience_to_next);
    }

    #[test]
    fn test_level_from_total_experience() {
        assert_eq!(level_from_total_experience(0), 1);
        assert_eq!(level_from_total_experience(99), 1);
        assert_eq!(level_from_total_experience(100), 2);
        assert_eq!(level_from_total_experience(250), 3);

        let mut player = Player::new();
        add_experience(&mut player, 1234);
        assert_eq!(level_from_total_experience(1234), player.stats.level);
    }

    #[test]
    fn test_apply_level_up_bonuses() {
        let mut player = Player::new();
        player.stats.level = 5;
        apply_level_up_bonuses(&mut player);
        assert_eq!(player.attributes.paddle_size, 120.0);
        assert_eq!(player.attributes.paddle_speed, 340.0);
        assert_eq!(player.attributes.ball_speed, 282.0);
        assert_eq!(player.attributes.ball_damage, 18.0);
        assert!((player.attributes.critical_chance - 0.13).abs() < 1e-6);
        assert!((player.attributes.experience_multiplier - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_apply_level_up_bonuses_idempotent() {
        let mut player = Player::new();
        player.stats.level = 9;
        apply_level_up_bonuses(&mut player);
        let first = player.attributes.clone();
        apply_level_up_bonuses(&mut player);
        assert_eq!(player.attributes, first);
    }

    #[test]
    fn test_bonuses_from_custom_base() {
        let base = PlayerAttributes {
            paddle_size: 80.0,
            ..PlayerAttributes::base()
        };
        let mut player = Player::with_base(base.clone());
        assert_eq!(player.attributes.paddle_size, 80.0);
        player.stats.level = 3;
        apply_level_up_bonuses_from(&mut player, &base);
        assert_eq!(player.attributes.paddle_size, 90.0);
        assert_eq!(player.attributes.ball_speed, 266.0);
    }

    #[test]
    fn test_critical_chance_cap() {
        assert_eq!(PlayerAttributes::for_level(50).critical_chance, 0.5);
    }

    #[test]
    fn test_player_serde_roundtrip() {
        let mut player = Player::new();
        add_experience(&mut player, 420);
        player.unlocked_skills.push("power_shot".into());
        let json = serde_json::to_string(&player).unwrap();
        let loaded: Player = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, player);
    }
}
