//! End-to-end runs through the public kernel API

use glam::Vec2;

use monster_breaker::sim::skills::{self, skill_by_id};
use monster_breaker::sim::{
    Ball, Block, GameEvent, GamePhase, Paddle, Player, Rect, Simulation, add_experience,
    apply_level_up_bonuses, monster,
};
use monster_breaker::{SimConfig, SkillError};

const DT: f32 = 1.0 / 60.0;

fn simulation() -> Simulation {
    Simulation::new(SimConfig::default(), 7).unwrap()
}

#[test]
fn test_ball_at_paddle_center_returns_straight_up() {
    let mut sim = simulation();
    let mut player = Player::new();
    sim.set_paddle(Paddle::new(Vec2::new(350.0, 550.0), 100.0, 15.0, 300.0));
    sim.set_ball(Ball::new(
        Vec2::new(400.0, 541.0),
        10.0,
        Vec2::new(0.0, 100.0),
        10.0,
    ));

    sim.update(&mut player, DT);

    let ball = sim.ball().unwrap();
    assert_eq!(ball.vel.x, 0.0);
    assert!((ball.vel.y + 100.0).abs() < 1e-3);
    assert_eq!(ball.pos.y, 540.0);
}

#[test]
fn test_single_health_block_destroyed_and_rewarded() {
    let config = SimConfig {
        critical_chance: 0.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(config, 7).unwrap();
    let mut player = Player::new();

    let row = 3;
    sim.add_block(Block::normal(
        1,
        Rect::new(360.0, 200.0, 80.0, 20.0),
        row,
        5,
        0xff0000,
    ));
    sim.set_ball(Ball::new(
        Vec2::new(400.0, 232.0),
        10.0,
        Vec2::new(0.0, -200.0),
        10.0,
    ));

    sim.update(&mut player, DT);

    assert!(sim.blocks().is_empty());
    assert_eq!(player.stats.experience, 5 + row * 2);
    assert_eq!(sim.score(), (5 + row as u64 * 2) * 10);

    let ball = sim.ball().unwrap();
    assert!(ball.vel.y > 0.0);
    assert_eq!(ball.pos.y, 230.0);

    let events = sim.drain_events();
    assert!(events.contains(&GameEvent::BlockDestroyed {
        block_id: 1,
        experience: 11,
        score: 110,
    }));
}

#[test]
fn test_full_run_keeps_invariants() {
    let mut sim = simulation();
    let mut player = Player::new();
    sim.start_wave(&mut player);

    for frame in 0..20_000 {
        let offset = match (sim.ball(), sim.paddle()) {
            (Some(ball), Some(paddle)) => ball.pos.x - paddle.center_x(),
            _ => 0.0,
        };
        if offset < -5.0 {
            sim.move_left();
        } else if offset > 5.0 {
            sim.move_right();
        } else {
            sim.stop_paddle();
        }
        sim.update(&mut player, DT);
        if sim.phase() != GamePhase::Playing {
            break;
        }

        let ball_speed = player.attributes.ball_speed;
        let ball = sim.ball().unwrap();
        let speed = ball.speed();
        assert!(
            speed >= ball_speed * 0.4 * 0.999 && speed <= ball_speed * 1.5 * 1.001,
            "frame {frame}: speed {speed} outside envelope for {ball_speed}"
        );

        let paddle = sim.paddle().unwrap();
        assert!(paddle.pos.x >= 0.0 && paddle.pos.x + paddle.width <= 800.0);

        for block in sim.blocks() {
            assert!(block.current_health <= block.max_health);
            assert!(!block.destroyed || !block.active);
        }
        assert!(player.stats.experience < player.stats.experience_to_next);
    }

    assert!(sim.score() > 0);
}

#[test]
fn test_configured_baseline_reaches_fresh_player() {
    let config = SimConfig {
        ball_speed: 400.0,
        paddle_size: 150.0,
        critical_chance: 0.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(config.clone(), 3).unwrap();
    let mut player = Player::new();
    sim.start_wave(&mut player);

    assert!((sim.ball().unwrap().speed() - 400.0).abs() < 1e-2);
    assert_eq!(sim.paddle().unwrap().width, 150.0);
    assert_eq!(player.attributes.ball_speed, 400.0);
    assert_eq!(player.attributes.critical_chance, 0.0);

    // No critical hits while the player is still on the level 1 baseline
    let mut hits = 0;
    for _ in 0..20_000 {
        if player.level() > 1 || sim.phase() != GamePhase::Playing {
            break;
        }
        let offset = match (sim.ball(), sim.paddle()) {
            (Some(ball), Some(paddle)) => ball.pos.x - paddle.center_x(),
            _ => 0.0,
        };
        if offset < -5.0 {
            sim.move_left();
        } else if offset > 5.0 {
            sim.move_right();
        } else {
            sim.stop_paddle();
        }
        sim.update(&mut player, DT);
        for event in sim.drain_events() {
            if let GameEvent::BlockHit { critical, .. } = event {
                assert!(!critical);
                hits += 1;
            }
        }
    }
    assert!(hits > 0);

    // Level-ups grow from the configured baseline, not the default board
    let mut sim = Simulation::new(config, 3).unwrap();
    let mut player = Player::new();
    add_experience(&mut player, 100);
    sim.update(&mut player, DT);
    assert_eq!(player.level(), 2);
    assert_eq!(player.attributes.ball_speed, 408.0);
    assert_eq!(player.attributes.paddle_size, 155.0);
    assert!((player.attributes.critical_chance - 0.02).abs() < 1e-6);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut sim = Simulation::new(SimConfig::default(), seed).unwrap();
        let mut player = Player::new();
        sim.start_wave(&mut player);
        for _ in 0..1200 {
            sim.update(&mut player, DT);
        }
        (sim.snapshot().ball, sim.score(), sim.lives(), player)
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn test_progression_rules() {
    let mut player = Player::new();
    let result = add_experience(&mut player, 100);
    assert!(result.leveled_up);
    assert_eq!(player.stats.level, 2);
    assert_eq!(player.stats.skill_points, 1);

    apply_level_up_bonuses(&mut player);
    let once = player.attributes.clone();
    apply_level_up_bonuses(&mut player);
    assert_eq!(player.attributes, once);

    assert_eq!(monster::spawn_rate(1), 0.05);
    assert!((monster::spawn_rate(10) - 0.23).abs() < 1e-6);
    assert_eq!(monster::spawn_rate(20), 0.30);
}

#[test]
fn test_skill_unlock_and_cooldown_through_kernel() {
    let mut sim = simulation();
    let mut player = Player::new();
    let power_shot = skill_by_id("power_shot").unwrap();

    assert!(matches!(
        skills::unlock_skill(&mut player, power_shot),
        Err(SkillError::LevelTooLow { required: 3, .. })
    ));

    add_experience(&mut player, 250);
    assert_eq!(player.level(), 3);
    skills::unlock_skill(&mut player, power_shot).unwrap();
    assert_eq!(player.stats.skill_points, 1);

    sim.use_skill(&player, "power_shot").unwrap();
    assert!(matches!(
        sim.use_skill(&player, "power_shot"),
        Err(SkillError::OnCooldown { .. })
    ));

    // 10 s cooldown on the simulation clock
    for _ in 0..601 {
        sim.update(&mut player, DT);
    }
    assert!(sim.use_skill(&player, "power_shot").is_ok());
}
