//! Collision geometry for axis-aligned rectangles and the ball
//!
//! Pure functions only. The ball is a circle, everything else (paddle, blocks)
//! is an axis-aligned rectangle with its origin at the top-left corner.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Closest point inside the rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            clamp(p.x, self.x, self.right()),
            clamp(p.y, self.y, self.bottom()),
        )
    }
}

/// Rectangle overlap test. Rectangles that only share an edge do not overlap.
#[inline]
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Circle/rectangle overlap test. A circle touching an edge counts as a hit.
#[inline]
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = rect.closest_point(center);
    (center - closest).length_squared() <= radius * radius
}

/// Estimate which face of `rect` the ball struck
///
/// Compares the center-to-center offset on each axis and returns a unit
/// normal on the dominant axis. This is an approximation: corner hits go to
/// whichever axis has the larger offset, and an exact tie goes to the
/// vertical axis. A zero offset on the chosen axis yields a negative normal.
pub fn collision_normal(center: Vec2, rect: &Rect) -> Vec2 {
    let offset = center - rect.center();

    if offset.x.abs() > offset.y.abs() {
        Vec2::new(if offset.x > 0.0 { 1.0 } else { -1.0 }, 0.0)
    } else {
        Vec2::new(0.0, if offset.y > 0.0 { 1.0 } else { -1.0 })
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Position that puts a circle just outside `rect` on the side `normal` faces
pub fn push_out(center: Vec2, radius: f32, rect: &Rect, normal: Vec2) -> Vec2 {
    let mut pos = center;
    if normal.x != 0.0 {
        pos.x = if normal.x > 0.0 {
            rect.right() + radius
        } else {
            rect.x - radius
        };
    }
    if normal.y != 0.0 {
        pos.y = if normal.y > 0.0 {
            rect.bottom() + radius
        } else {
            rect.y - radius
        };
    }
    pos
}

#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Unit vector in the direction of `v`; the zero vector maps to zero
#[inline]
pub fn normalize(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

#[inline]
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}
