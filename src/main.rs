//! Monster Breaker headless driver
//!
//! Runs the simulation at a fixed frame time with a paddle that chases the
//! ball, spends skill points as they arrive, and prints the final state.

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use monster_breaker::sim::skills::{self, SkillKind};
use monster_breaker::sim::{GameEvent, GamePhase, Player, Simulation};
use monster_breaker::{SimConfig, SimError};

/// Frame time of the demo loop
const FRAME_DT: f32 = 1.0 / 60.0;
/// Paddle tolerance before it starts chasing the ball
const FOLLOW_SLACK: f32 = 8.0;

#[derive(Parser, Debug)]
#[command(name = "monster-breaker")]
#[command(about = "Run the Monster Breaker simulation headless with an auto-pilot paddle")]
struct Cli {
    /// RNG seed for the run
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Number of frames to simulate
    #[arg(long, default_value_t = 36_000)]
    frames: u32,
    /// JSON config file; omitted fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Player record to start from (JSON)
    #[arg(long)]
    player: Option<PathBuf>,
    /// Print the player record as JSON when done
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), SimError> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimConfig::from_json(&fs::read_to_string(path)?)?,
        None => SimConfig::default(),
    };
    let mut player = match &cli.player {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Player::with_base(config.base_attributes()),
    };

    log::info!("Monster Breaker starting (seed {})", cli.seed);
    let mut sim = Simulation::new(config, cli.seed)?;
    sim.start_wave(&mut player);

    let mut blocks_destroyed = 0u32;
    for _ in 0..cli.frames {
        steer(&mut sim);
        spend_skill_points(&mut player);
        trigger_skills(&mut sim, &player);

        sim.update(&mut player, FRAME_DT);

        for event in sim.drain_events() {
            match event {
                GameEvent::BlockDestroyed { .. } => blocks_destroyed += 1,
                GameEvent::LeveledUp { new_level, .. } => {
                    log::info!("Reached level {}", new_level);
                }
                GameEvent::SkillActivated {
                    skill_id,
                    duration: Some(duration),
                } => {
                    log::info!("{} active for {:.1}s", skill_id, duration);
                }
                GameEvent::LifeLost { lives_left } => {
                    log::warn!("Ball lost, {} lives left", lives_left);
                }
                _ => {}
            }
        }

        if sim.phase() == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "{:?} after {:.1}s: wave {}, score {}, lives {}, {} blocks destroyed",
        sim.phase(),
        sim.time(),
        sim.wave(),
        sim.score(),
        sim.lives(),
        blocks_destroyed
    );
    println!(
        "Player level {} ({} / {} xp), skills: {:?}",
        player.level(),
        player.stats.experience,
        player.stats.experience_to_next,
        player.unlocked_skills
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&player)?);
    }
    Ok(())
}

/// Move the paddle under the ball
fn steer(sim: &mut Simulation) {
    let (Some(ball), Some(paddle)) = (sim.ball(), sim.paddle()) else {
        return;
    };
    let offset = ball.pos.x - paddle.center_x();
    if offset < -FOLLOW_SLACK {
        sim.move_left();
    } else if offset > FOLLOW_SLACK {
        sim.move_right();
    } else {
        sim.stop_paddle();
    }
}

fn spend_skill_points(player: &mut Player) {
    while player.stats.skill_points > 0 {
        let Some(skill) = skills::available_skills(player.level())
            .into_iter()
            .find(|s| !player.has_skill(s.id))
        else {
            return;
        };
        if let Err(err) = skills::unlock_skill(player, skill) {
            log::warn!("Could not unlock {}: {}", skill.id, err);
            return;
        }
        log::info!("Unlocked {}", skill.name);
    }
}

fn trigger_skills(sim: &mut Simulation, player: &Player) {
    for skill in skills::SKILLS.iter().filter(|s| s.kind != SkillKind::Passive) {
        if !player.has_skill(skill.id) || sim.skills().is_on_cooldown(skill.id) {
            continue;
        }
        if let Err(err) = sim.use_skill(player, skill.id) {
            log::debug!("Skipping {}: {}", skill.id, err);
        }
    }
}
