//! Per-frame simulation tick
//!
//! Runs the fixed-order update: paddle, ball, walls, paddle bounce, one block
//! hit, speed envelope, ball loss and wave refill. Every random draw comes from
//! the simulation's seeded generator, so a run replays exactly from its seed
//! and its sequence of inputs.

use glam::Vec2;
use rand::Rng;

use super::entity::{Ball, Block, Paddle};
use super::geometry::{self, Rect};
use super::monster::{self, Reward};
use super::progression::{self, Player};
use super::state::{GameEvent, GamePhase, Modifiers, Simulation};
use crate::config::SimConfig;
use crate::consts::{PADDLE_MAX_DEFLECTION, RELAUNCH_GAP};

/// Advance the simulation by `dt` seconds
pub fn tick(sim: &mut Simulation, player: &mut Player, dt: f32) {
    if sim.phase != GamePhase::Playing || !dt.is_finite() {
        return;
    }
    let dt = dt.clamp(0.0, sim.config.max_delta_time);

    sim.time += dt as f64;
    sim.time_ticks += 1;
    sim.skills.update_active_effects(sim.time);

    progression::apply_level_up_bonuses_from(player, &sim.config.base_attributes());
    let mut modifiers = Modifiers::resolve(player, &sim.skills);
    sync_modifiers(sim, modifiers);
    regenerate_monsters(sim, dt);

    // 1. Paddle
    let field_width = sim.config.field_width;
    if let Some(paddle) = &mut sim.paddle {
        paddle.advance(dt, field_width);
    }

    if sim.ball.as_ref().is_some_and(|b| b.active) {
        // 2-4. Ball motion, walls, paddle
        if let Some(ball) = &mut sim.ball {
            ball.advance(dt);
            collide_walls(ball, &sim.config);
            if let Some(paddle) = &sim.paddle {
                collide_paddle(ball, paddle, sim.config.paddle_dead_zone);
            }
        }

        // 5-6. Blocks
        if collide_blocks(sim, player, &modifiers) {
            modifiers = Modifiers::resolve(player, &sim.skills);
            sync_modifiers(sim, modifiers);
        }

        // 7. Speed envelope
        if let Some(ball) = &mut sim.ball {
            enforce_speed_envelope(ball, modifiers.ball_speed, &sim.config);
        }

        // 8. Ball loss
        check_ball_loss(sim, &modifiers);
    }

    // 9. Cleanup and wave refill
    sim.blocks.retain(|b| !b.destroyed);
    if sim.wave_active && sim.phase == GamePhase::Playing && !sim.blocks.iter().any(|b| b.active)
    {
        advance_wave(sim, player, &modifiers);
    }
}

/// Push changed attributes into the paddle and ball
fn sync_modifiers(sim: &mut Simulation, modifiers: Modifiers) {
    if sim.last_modifiers.is_some_and(|prev| prev != modifiers) {
        let field_width = sim.config.field_width;
        if let Some(paddle) = &mut sim.paddle {
            paddle.speed = modifiers.paddle_speed;
            if paddle.width != modifiers.paddle_size {
                paddle.set_width(modifiers.paddle_size, field_width);
            }
        }
        if let Some(ball) = &mut sim.ball {
            ball.damage = modifiers.ball_damage;
        }
    }
    sim.last_modifiers = Some(modifiers);
}

fn regenerate_monsters(sim: &mut Simulation, dt: f32) {
    let amount = sim.config.regeneration_per_second * dt;
    for block in sim.blocks.iter_mut().filter(|b| b.active && b.regenerates()) {
        block.heal(amount);
    }
}

/// Bounce off the left, right and top edges; the bottom is open
pub fn collide_walls(ball: &mut Ball, config: &SimConfig) {
    let r = ball.radius;
    let width = config.field_width;

    if ball.pos.x - r < 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = r;
    } else if ball.pos.x + r > width {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = width - r;
    }

    if ball.pos.y - r < 0.0 {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = r;
    }
}

/// Send a descending ball back up at an angle set by where it struck
pub fn collide_paddle(ball: &mut Ball, paddle: &Paddle, dead_zone: f32) {
    if ball.vel.y <= 0.0 || !geometry::circle_rect_overlap(ball.pos, ball.radius, &paddle.bounds())
    {
        return;
    }

    if (ball.pos.x - paddle.center_x()).abs() <= dead_zone {
        ball.vel = Vec2::new(0.0, -ball.vel.y.abs());
    } else {
        let hit_position = ((ball.pos.x - paddle.pos.x) / paddle.width - 0.5).clamp(-0.5, 0.5);
        // ±0.5 maps to the full deflection
        let angle = hit_position * 2.0 * PADDLE_MAX_DEFLECTION;
        ball.vel = Vec2::new(angle.sin(), -angle.cos()) * ball.speed();
    }

    ball.pos.y = paddle.pos.y - ball.radius;
}

/// Resolve at most one block hit. Returns true when the player leveled up.
fn collide_blocks(sim: &mut Simulation, player: &mut Player, modifiers: &Modifiers) -> bool {
    let Some(ball) = &mut sim.ball else {
        return false;
    };
    let Some(index) = sim
        .blocks
        .iter()
        .position(|b| b.active && geometry::circle_rect_overlap(ball.pos, ball.radius, &b.rect))
    else {
        return false;
    };

    let critical = sim.rng.random::<f32>() < modifiers.critical_chance;
    let damage = if critical {
        ball.damage * sim.config.critical_multiplier
    } else {
        ball.damage
    };

    let block = &mut sim.blocks[index];
    let normal = geometry::collision_normal(ball.pos, &block.rect);
    let destroyed = block.take_damage(damage);
    ball.bounce(normal);
    ball.pos = geometry::push_out(ball.pos, ball.radius, &block.rect, normal);

    let block_id = block.id;
    sim.events.push(GameEvent::BlockHit {
        block_id,
        damage,
        critical,
    });
    if !destroyed {
        return false;
    }

    let base = block.experience_reward(sim.config.experience_per_row);
    let experience = (base as f32 * modifiers.experience_multiplier).floor() as u32;
    let rewards = block.drop_rewards().to_vec();

    let mut levels_gained = progression::add_experience(player, experience).levels_gained;
    for reward in rewards {
        match reward {
            Reward::Experience(amount) => {
                levels_gained += progression::add_experience(player, amount).levels_gained;
            }
            Reward::SkillPoint(points) => player.stats.skill_points += points,
        }
        sim.events.push(GameEvent::RewardGranted(reward));
    }

    let gained = experience as u64 * sim.config.score_multiplier;
    sim.score += gained;
    sim.events.push(GameEvent::BlockDestroyed {
        block_id,
        experience,
        score: gained,
    });

    if levels_gained == 0 {
        return false;
    }
    progression::apply_level_up_bonuses_from(player, &sim.config.base_attributes());
    sim.events.push(GameEvent::LeveledUp {
        levels_gained,
        new_level: player.level(),
    });
    log::info!("Level up! Now level {}", player.level());
    true
}

/// Keep the ball's speed inside `[ball_speed × min, ball_speed × max]`
///
/// Only the magnitude changes. A ball at rest has no direction to keep and is
/// sent straight up at the minimum speed.
pub fn enforce_speed_envelope(ball: &mut Ball, ball_speed: f32, config: &SimConfig) {
    let min = ball_speed * config.min_speed_multiplier;
    let max = ball_speed * config.max_speed_multiplier;
    let speed = ball.speed();

    if speed == 0.0 {
        ball.vel = Vec2::new(0.0, -min);
    } else if speed < min {
        ball.vel *= min / speed;
    } else if speed > max {
        ball.vel *= max / speed;
    }
}

fn check_ball_loss(sim: &mut Simulation, modifiers: &Modifiers) {
    let Some(ball) = &mut sim.ball else {
        return;
    };
    if ball.pos.y <= sim.config.field_height + ball.radius {
        return;
    }

    sim.lives = sim.lives.saturating_sub(1);
    sim.events.push(GameEvent::LifeLost {
        lives_left: sim.lives,
    });

    if sim.lives > 0 {
        let (x, top) = match &sim.paddle {
            Some(paddle) => (paddle.center_x(), paddle.pos.y),
            None => (sim.config.field_width / 2.0, sim.config.paddle_y()),
        };
        let pos = Vec2::new(x, top - ball.radius - RELAUNCH_GAP);
        log::debug!("Ball lost, {} lives left", sim.lives);
        sim.launch_ball(pos, modifiers.ball_speed);
    } else {
        ball.active = false;
        ball.vel = Vec2::ZERO;
        sim.phase = GamePhase::GameOver;
        sim.events.push(GameEvent::GameOver { score: sim.score });
        log::info!("Game over! Score: {}, wave {}", sim.score, sim.wave_index);
    }
}

fn advance_wave(sim: &mut Simulation, player: &Player, modifiers: &Modifiers) {
    sim.events.push(GameEvent::WaveCleared {
        wave: sim.wave_index,
    });
    sim.wave_index += 1;
    generate_wave(sim, player.level());

    let center = Vec2::new(sim.config.field_width / 2.0, sim.config.field_height / 2.0);
    sim.launch_ball(center, modifiers.ball_speed);
}

/// Fill the field with a fresh grid of blocks for the current wave
///
/// Each cell independently becomes a monster with probability
/// `spawn_rate(player_level)`; the rest are single-hit blocks colored by row.
pub fn generate_wave(sim: &mut Simulation, player_level: u32) {
    let config = sim.config.clone();
    let spawn_rate = monster::spawn_rate(player_level);
    let offset_x = config.grid_offset_x();

    sim.blocks.clear();
    let mut monsters = 0u32;

    for row in 0..config.block_rows {
        let color = row_color(row);
        let y = config.block_top_offset + row as f32 * (config.block_height + config.block_padding);

        for col in 0..config.block_cols {
            let x = offset_x + col as f32 * (config.block_width + config.block_padding);
            let rect = Rect::new(x, y, config.block_width, config.block_height);
            let id = sim.next_entity_id();

            let block = if sim.rng.random::<f32>() < spawn_rate {
                monsters += 1;
                let archetype = monster::select_monster_type(player_level, &mut sim.rng);
                Block::monster(id, rect, row, archetype)
            } else {
                Block::normal(id, rect, row, config.base_block_experience, color)
            };
            sim.blocks.push(block);
        }
    }

    log::info!(
        "Wave {}: {}x{} grid, {} monsters (spawn rate {:.2}, player level {})",
        sim.wave_index,
        config.block_cols,
        config.block_rows,
        monsters,
        spawn_rate,
        player_level
    );
    sim.events.push(GameEvent::WaveStarted {
        wave: sim.wave_index,
        monsters,
    });
}

/// Row tint: hue steps of 30° at 70% saturation and 50% lightness
pub fn row_color(row: u32) -> u32 {
    hsl_to_rgb((row * 30 % 360) as f32, 0.7, 0.5)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> u32 {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h = hue / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let channel = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u32;
    (channel(r) << 16) | (channel(g) << 8) | channel(b)
}
