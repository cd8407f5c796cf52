//! Skills, cooldowns and timed effects
//!
//! All times are seconds on the simulation clock owned by the kernel, so
//! effect expiry only depends on the `dt` values fed to `update`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::progression::Player;
use crate::error::SkillError;

/// How a skill is triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    /// Always on once unlocked
    Passive,
    /// Triggered by the player, then cools down
    Active,
}

/// What a skill effect modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectType {
    PaddleSize,
    PaddleSpeed,
    BallSpeed,
    BallDamage,
    CriticalChance,
    ExperienceBoost,
}

impl EffectType {
    /// Multiplier effects scale an attribute; the rest add to it
    pub fn is_multiplier(self) -> bool {
        matches!(
            self,
            EffectType::PaddleSize
                | EffectType::PaddleSpeed
                | EffectType::BallSpeed
                | EffectType::BallDamage
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillEffect {
    pub kind: EffectType,
    pub value: f32,
    /// Seconds; `None` never expires
    pub duration: Option<f32>,
}

/// Static skill definition
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub required_level: u32,
    /// Seconds between uses
    pub cooldown: f32,
    /// Buff window reported when the skill fires; `None` for passives
    pub duration: Option<f32>,
    pub kind: SkillKind,
    pub effects: &'static [SkillEffect],
}

/// Built-in skill catalog
pub static SKILLS: [Skill; 4] = [
    Skill {
        id: "power_shot",
        name: "Power Shot",
        description: "Doubles ball damage for a short time",
        required_level: 3,
        cooldown: 10.0,
        duration: Some(5.0),
        kind: SkillKind::Active,
        effects: &[SkillEffect {
            kind: EffectType::BallDamage,
            value: 2.0,
            duration: Some(5.0),
        }],
    },
    Skill {
        id: "speed_boost",
        name: "Speed Boost",
        description: "Paddle moves 1.5x faster for a short time",
        required_level: 5,
        cooldown: 15.0,
        duration: Some(6.0),
        kind: SkillKind::Active,
        effects: &[SkillEffect {
            kind: EffectType::PaddleSpeed,
            value: 1.5,
            duration: Some(6.0),
        }],
    },
    Skill {
        id: "critical_master",
        name: "Critical Master",
        description: "Permanently raises critical chance by 10%",
        required_level: 7,
        cooldown: 0.0,
        duration: None,
        kind: SkillKind::Passive,
        effects: &[SkillEffect {
            kind: EffectType::CriticalChance,
            value: 0.1,
            duration: None,
        }],
    },
    Skill {
        id: "experience_boost",
        name: "Experience Boost",
        description: "Permanently raises experience gained by 25%",
        required_level: 10,
        cooldown: 0.0,
        duration: None,
        kind: SkillKind::Passive,
        effects: &[SkillEffect {
            kind: EffectType::ExperienceBoost,
            value: 0.25,
            duration: None,
        }],
    },
];

pub fn skill_by_id(id: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}

/// Skills a player of `level` may unlock
pub fn available_skills(level: u32) -> Vec<&'static Skill> {
    SKILLS.iter().filter(|s| s.required_level <= level).collect()
}

/// Spend a skill point to unlock `skill`
pub fn unlock_skill(player: &mut Player, skill: &Skill) -> Result<(), SkillError> {
    if player.has_skill(skill.id) {
        return Err(SkillError::AlreadyUnlocked(skill.id.to_string()));
    }
    if player.stats.level < skill.required_level {
        return Err(SkillError::LevelTooLow {
            id: skill.id.to_string(),
            required: skill.required_level,
            level: player.stats.level,
        });
    }
    if player.stats.skill_points == 0 {
        return Err(SkillError::NoSkillPoints(skill.id.to_string()));
    }

    player.stats.skill_points -= 1;
    player.unlocked_skills.push(skill.id.to_string());
    log::debug!("Unlocked skill {}", skill.id);
    Ok(())
}

/// Summed magnitude of the passive effects a player has unlocked
pub fn passive_value(player: &Player, kind: EffectType) -> f32 {
    SKILLS
        .iter()
        .filter(|s| s.kind == SkillKind::Passive && player.has_skill(s.id))
        .flat_map(|s| s.effects.iter())
        .filter(|e| e.kind == kind)
        .map(|e| e.value)
        .sum()
}

/// A skill effect currently in force
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSkillEffect {
    pub skill_id: String,
    pub kind: EffectType,
    pub value: f32,
    pub start_time: f64,
    /// `None` for effects without automatic expiry
    pub end_time: Option<f64>,
}

impl ActiveSkillEffect {
    pub fn is_expired(&self, now: f64) -> bool {
        self.end_time.is_some_and(|end| now >= end)
    }
}

/// Cooldown bookkeeping for one skill id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooldown {
    pub skill_id: String,
    pub last_used: f64,
    /// Cooldown length captured at use time (seconds)
    pub cooldown: f32,
    pub is_ready: bool,
}

impl Cooldown {
    pub fn ready_at(&self) -> f64 {
        self.last_used + self.cooldown as f64
    }
}

/// Tracks active effects and cooldowns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SkillSystem {
    active_effects: Vec<ActiveSkillEffect>,
    /// Keyed by skill id (ordered for stable iteration)
    cooldowns: BTreeMap<String, Cooldown>,
}

impl SkillSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trigger `skill` at time `now`
    ///
    /// Rejected without any state change while the skill is cooling down.
    /// Passive skills succeed without creating effects or cooldowns.
    pub fn use_skill(&mut self, skill: &Skill, now: f64) -> Result<(), SkillError> {
        if let Some(cooldown) = self.cooldowns.get(skill.id) {
            let ready_at = cooldown.last_used + skill.cooldown as f64;
            if now < ready_at {
                return Err(SkillError::OnCooldown {
                    id: skill.id.to_string(),
                    remaining: (ready_at - now) as f32,
                });
            }
        }

        if skill.kind == SkillKind::Passive {
            return Ok(());
        }

        for effect in skill.effects {
            self.active_effects.push(ActiveSkillEffect {
                skill_id: skill.id.to_string(),
                kind: effect.kind,
                value: effect.value,
                start_time: now,
                end_time: effect.duration.map(|d| now + d as f64),
            });
        }

        self.cooldowns.insert(
            skill.id.to_string(),
            Cooldown {
                skill_id: skill.id.to_string(),
                last_used: now,
                cooldown: skill.cooldown,
                is_ready: skill.cooldown <= 0.0,
            },
        );

        Ok(())
    }

    /// Drop expired effects and refresh cooldown readiness
    pub fn update_active_effects(&mut self, now: f64) {
        self.active_effects.retain(|e| !e.is_expired(now));
        for cooldown in self.cooldowns.values_mut() {
            cooldown.is_ready = now >= cooldown.ready_at();
        }
    }

    /// Sum of all active effects of `kind`
    pub fn effect_value(&self, kind: EffectType) -> f32 {
        self.active_effects
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value)
            .sum()
    }

    /// Factor to scale an attribute by: the summed active value, or 1 when none
    pub fn multiplier(&self, kind: EffectType) -> f32 {
        let value = self.effect_value(kind);
        if value > 0.0 { value } else { 1.0 }
    }

    /// Readiness as of the last `update_active_effects`
    pub fn is_on_cooldown(&self, skill_id: &str) -> bool {
        self.cooldowns
            .get(skill_id)
            .map(|c| !c.is_ready)
            .unwrap_or(false)
    }

    pub fn cooldown_remaining(&self, skill_id: &str, now: f64) -> f32 {
        self.cooldowns
            .get(skill_id)
            .map(|c| (c.ready_at() - now).max(0.0) as f32)
            .unwrap_or(0.0)
    }

    pub fn active_effects(&self) -> &[ActiveSkillEffect] {
        &self.active_effects
    }

    pub fn cooldowns(&self) -> impl Iterator<Item = &Cooldown> {
        self.cooldowns.values()
    }

    pub fn clear_all_effects(&mut self) {
        self.active_effects.clear();
        self.cooldowns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_shot() -> &'static Skill {
        skill_by_id("power_shot").unwrap()
    }

    #[test]
    fn test_use_skill_creates_effect_and_cooldown() {
        let mut skills = SkillSystem::new();
        assert!(skills.use_skill(power_shot(), 0.0).is_ok());
        assert_eq!(skills.active_effects().len(), 1);
        assert_eq!(skills.active_effects()[0].end_time, Some(5.0));
        assert_eq!(skills.effect_value(EffectType::BallDamage), 2.0);

        skills.update_active_effects(0.1);
        assert!(skills.is_on_cooldown("power_shot"));
    }

    #[test]
    fn test_cooldown_rejects_then_allows() {
        let mut skills = SkillSystem::new();
        skills.use_skill(power_shot(), 1.0).unwrap();

        let err = skills.use_skill(power_shot(), 2.0).unwrap_err();
        assert!(matches!(err, SkillError::OnCooldown { .. }));
        // Rejection leaves state untouched
        assert_eq!(skills.active_effects().len(), 1);
        assert!((skills.cooldown_remaining("power_shot", 2.0) - 9.0).abs() < 1e-5);

        assert!(skills.use_skill(power_shot(), 11.0).is_ok());
        assert_eq!(skills.cooldown_remaining("power_shot", 11.0), 0.0);
    }

    #[test]
    fn test_effects_expire() {
        let mut skills = SkillSystem::new();
        skills.use_skill(power_shot(), 0.0).unwrap();

        skills.update_active_effects(4.9);
        assert_eq!(skills.effect_value(EffectType::BallDamage), 2.0);

        skills.update_active_effects(5.0);
        assert_eq!(skills.effect_value(EffectType::BallDamage), 0.0);
        assert_eq!(skills.multiplier(EffectType::BallDamage), 1.0);
        assert!(skills.is_on_cooldown("power_shot"));

        skills.update_active_effects(10.0);
        assert!(!skills.is_on_cooldown("power_shot"));
    }

    #[test]
    fn test_passive_skill_has_no_state() {
        let mut skills = SkillSystem::new();
        let passive = skill_by_id("critical_master").unwrap();
        assert!(skills.use_skill(passive, 0.0).is_ok());
        assert!(skills.use_skill(passive, 0.0).is_ok());
        assert!(skills.active_effects().is_empty());
        assert_eq!(skills.cooldowns().count(), 0);
    }

    #[test]
    fn test_same_type_effects_stack() {
        let mut skills = SkillSystem::new();
        let quick = Skill {
            id: "quick_power",
            name: "Quick Power",
            description: "",
            required_level: 1,
            cooldown: 0.0,
            duration: None,
            kind: SkillKind::Active,
            effects: &[SkillEffect {
                kind: EffectType::BallDamage,
                value: 0.5,
                duration: None,
            }],
        };
        skills.use_skill(&quick, 0.0).unwrap();
        skills.use_skill(&quick, 0.0).unwrap();
        skills.use_skill(power_shot(), 0.0).unwrap();
        assert_eq!(skills.effect_value(EffectType::BallDamage), 3.0);

        // Effects without a duration survive any amount of time
        skills.update_active_effects(1000.0);
        assert_eq!(skills.effect_value(EffectType::BallDamage), 1.0);
    }

    #[test]
    fn test_clear_all_effects() {
        let mut skills = SkillSystem::new();
        skills.use_skill(power_shot(), 0.0).unwrap();
        skills.clear_all_effects();
        assert!(skills.active_effects().is_empty());
        assert!(skills.use_skill(power_shot(), 0.1).is_ok());
    }

    #[test]
    fn test_effect_classification() {
        assert!(EffectType::BallDamage.is_multiplier());
        assert!(EffectType::PaddleSize.is_multiplier());
        assert!(!EffectType::CriticalChance.is_multiplier());
        assert!(!EffectType::ExperienceBoost.is_multiplier());
    }

    #[test]
    fn test_available_skills() {
        assert!(available_skills(2).is_empty());
        let ids: Vec<_> = available_skills(7).iter().map(|s| s.id).collect();
        assert_eq!(ids, ["power_shot", "speed_boost", "critical_master"]);
        assert_eq!(available_skills(10).len(), 4);
    }

    #[test]
    fn test_unlock_skill() {
        let mut player = Player::new();
        let skill = power_shot();

        assert!(matches!(
            unlock_skill(&mut player, skill),
            Err(SkillError::LevelTooLow { required: 3, .. })
        ));

        player.stats.level = 3;
        assert!(matches!(
            unlock_skill(&mut player, skill),
            Err(SkillError::NoSkillPoints(_))
        ));

        player.stats.skill_points = 2;
        assert!(unlock_skill(&mut player, skill).is_ok());
        assert_eq!(player.stats.skill_points, 1);
        assert!(player.has_skill("power_shot"));
        assert!(matches!(
            unlock_skill(&mut player, skill),
            Err(SkillError::AlreadyUnlocked(_))
        ));
    }

    #[test]
    fn test_passive_value() {
        let mut player = Player::new();
        assert_eq!(passive_value(&player, EffectType::CriticalChance), 0.0);
        player.unlocked_skills.push("critical_master".into());
        player.unlocked_skills.push("power_shot".into());
        assert_eq!(passive_value(&player, EffectType::CriticalChance), 0.1);
        // Active skills never contribute passively
        assert_eq!(passive_value(&player, EffectType::BallDamage), 0.0);
    }
}
