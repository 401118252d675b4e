//! Circle overlap tests
//!
//! Entity counts stay small, so every check is a direct distance-squared
//! comparison with no broad phase.

use glam::Vec2;

/// Radius of the rider's hit circle against enemies and power-ups
pub const RIDER_RADIUS: f32 = 18.0;
/// Radius of a player bullet
pub const BULLET_RADIUS: f32 = 6.0;
/// Combined radius for an enemy shot hitting the rider
pub const ENEMY_SHOT_HIT_RADIUS: f32 = 28.0;

/// Rider hit-circle center offsets above the bike origin
pub const RIDER_ENEMY_LIFT: f32 = 12.0;
pub const RIDER_PICKUP_LIFT: f32 = 18.0;

/// True if two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    let r = a_radius + b_radius;
    a.distance_squared(b) < r * r
}

/// True if a point lies strictly within `radius` of `center`
#[inline]
pub fn within(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance_squared(center) < radius * radius
}
