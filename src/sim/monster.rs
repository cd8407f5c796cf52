//! Monster archetypes and level-scaled monster selection
//!
//! Monsters unlock in tiers as the player levels up. Among unlocked types the
//! earlier (weaker) entries of the catalog are favoured by exponentially
//! decaying weights.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Base spawn probability at level 1
pub const BASE_SPAWN_RATE: f32 = 0.05;
/// Spawn probability added per level
pub const SPAWN_RATE_PER_LEVEL: f32 = 0.02;
/// Spawn probability cap
pub const MAX_SPAWN_RATE: f32 = 0.30;
/// Weight ratio between consecutive unlocked archetypes
pub const WEIGHT_DECAY: f32 = 0.7;

/// Monster types, in catalog (weakest first) order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterKind {
    Goblin,
    Orc,
    Troll,
    Dragon,
}

/// Special abilities a monster block may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAbility {
    /// Slowly heals back toward max health
    Regeneration,
}

/// Loot handed out when a monster block is destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reward {
    /// Bonus experience on top of the block's own reward
    Experience(u32),
    SkillPoint(u32),
}

/// Static description of a monster type
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterArchetype {
    pub kind: MonsterKind,
    pub id: &'static str,
    pub name: &'static str,
    pub max_health: f32,
    pub experience_value: u32,
    /// RGB color for rendering
    pub color: u32,
    pub special_ability: Option<SpecialAbility>,
    /// Lowest player level at which this type can spawn
    pub unlock_level: u32,
    pub drop_rewards: &'static [Reward],
}

/// Archetype catalog, weakest first
pub static ARCHETYPES: [MonsterArchetype; 4] = [
    MonsterArchetype {
        kind: MonsterKind::Goblin,
        id: "goblin",
        name: "Goblin",
        max_health: 20.0,
        experience_value: 15,
        color: 0x16a34a,
        special_ability: None,
        unlock_level: 1,
        drop_rewards: &[],
    },
    MonsterArchetype {
        kind: MonsterKind::Orc,
        id: "orc",
        name: "Orc",
        max_health: 35.0,
        experience_value: 25,
        color: 0xdc2626,
        special_ability: None,
        unlock_level: 4,
        drop_rewards: &[],
    },
    MonsterArchetype {
        kind: MonsterKind::Troll,
        id: "troll",
        name: "Troll",
        max_health: 60.0,
        experience_value: 40,
        color: 0x7c3aed,
        special_ability: None,
        unlock_level: 7,
        drop_rewards: &[Reward::Experience(20)],
    },
    MonsterArchetype {
        kind: MonsterKind::Dragon,
        id: "dragon",
        name: "Dragon",
        max_health: 100.0,
        experience_value: 75,
        color: 0xf59e0b,
        special_ability: Some(SpecialAbility::Regeneration),
        unlock_level: 11,
        drop_rewards: &[Reward::SkillPoint(1)],
    },
];

impl MonsterKind {
    /// Static data for this monster type
    pub fn archetype(self) -> &'static MonsterArchetype {
        match self {
            MonsterKind::Goblin => &ARCHETYPES[0],
            MonsterKind::Orc => &ARCHETYPES[1],
            MonsterKind::Troll => &ARCHETYPES[2],
            MonsterKind::Dragon => &ARCHETYPES[3],
        }
    }
}

/// Probability that a grid cell holds a monster instead of a plain block
pub fn spawn_rate(player_level: u32) -> f32 {
    let steps = player_level.saturating_sub(1) as f32;
    (BASE_SPAWN_RATE + SPAWN_RATE_PER_LEVEL * steps).min(MAX_SPAWN_RATE)
}

/// Archetypes that may spawn at `player_level`, in catalog order
pub fn unlocked_archetypes(player_level: u32) -> Vec<&'static MonsterArchetype> {
    ARCHETYPES
        .iter()
        .filter(|a| a.unlock_level <= player_level)
        .collect()
}

/// Pick an index from `count` entries weighted by `WEIGHT_DECAY^i`
///
/// `draw` is a uniform sample in `[0, 1)`. Returns `None` when `count == 0`.
pub fn pick_weighted(count: usize, draw: f32) -> Option<usize> {
    if count == 0 {
        return None;
    }

    let weights: Vec<f32> = (0..count).map(|i| WEIGHT_DECAY.powi(i as i32)).collect();
    let total: f32 = weights.iter().sum();
    let mut remaining = draw * total;

    for (i, weight) in weights.iter().enumerate() {
        remaining -= weight;
        if remaining <= 0.0 {
            return Some(i);
        }
    }

    // Float drift at draw ~ 1.0
    Some(count - 1)
}

/// Choose a monster type for a block at `player_level`
pub fn select_monster_type<R: Rng>(
    player_level: u32,
    rng: &mut R,
) -> &'static MonsterArchetype {
    let unlocked = unlocked_archetypes(player_level);
    let draw: f32 = rng.random();
    match pick_weighted(unlocked.len(), draw) {
        Some(i) => unlocked[i],
        // Level 0 is never produced by progression; treat it like level 1
        None => MonsterKind::Goblin.archetype(),
    }
}

/// Look up an archetype by its catalog id
pub fn archetype_by_id(id: &str) -> Option<&'static MonsterArchetype> {
    ARCHETYPES.iter().find(|a| a.id == id)
}

pub fn all_archetypes() -> &'static [MonsterArchetype] {
    &ARCHETYPES
}
