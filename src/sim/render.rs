//! Drawing hook
//!
//! The kernel never owns a window. A host implements [`RenderSurface`] over its
//! canvas of choice and calls [`render`] once per frame; this module only walks
//! the read-only state and issues primitive draw calls.

use glam::Vec2;

use super::geometry::Rect;
use super::state::{GamePhase, Simulation};

const BACKGROUND: [f32; 4] = [0.06, 0.07, 0.12, 1.0];
const PADDLE_COLOR: [f32; 4] = [0.9, 0.9, 0.95, 1.0];
const BALL_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.9];
/// Height of a monster's health bar above its block
const HEALTH_BAR_HEIGHT: f32 = 4.0;

/// Minimal set of primitives a host canvas must provide
pub trait RenderSurface {
    fn clear(&mut self, color: [f32; 4]);
    fn fill_rect(&mut self, rect: Rect, color: [f32; 4]);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]);
    /// Bar filled to `ratio` (0..=1) of its width
    fn health_bar(&mut self, rect: Rect, ratio: f32);
    fn label(&mut self, pos: Vec2, text: &str, color: [f32; 4]);
}

/// Convert a packed `0xRRGGBB` tag to RGBA
pub fn rgba(color: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((color >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha]
}

/// Draw the current frame
pub fn render<S: RenderSurface + ?Sized>(sim: &Simulation, surface: &mut S) {
    surface.clear(BACKGROUND);

    for block in sim.blocks().iter().filter(|b| b.active) {
        surface.fill_rect(block.rect, rgba(block.color, 1.0));
        if block.is_monster() {
            let bar = Rect::new(
                block.rect.x,
                block.rect.y - HEALTH_BAR_HEIGHT,
                block.rect.width,
                HEALTH_BAR_HEIGHT,
            );
            surface.health_bar(bar, block.health_ratio());
        }
    }

    if let Some(paddle) = sim.paddle() {
        surface.fill_rect(paddle.bounds(), PADDLE_COLOR);
    }

    if let Some(ball) = sim.ball().filter(|b| b.active) {
        surface.fill_circle(ball.pos, ball.radius, BALL_COLOR);
    }

    let hud = format!(
        "Score {}  Lives {}  Wave {}",
        sim.score(),
        sim.lives(),
        sim.wave()
    );
    surface.label(Vec2::new(10.0, 20.0), &hud, TEXT_COLOR);

    let banner = match sim.phase() {
        GamePhase::Paused => Some("PAUSED"),
        GamePhase::GameOver => Some("GAME OVER"),
        GamePhase::Playing | GamePhase::Stopped => None,
    };
    if let Some(text) = banner {
        let config = sim.config();
        let center = Vec2::new(config.field_width / 2.0, config.field_height / 2.0);
        surface.label(center, text, TEXT_COLOR);
    }
}
