//! Moto Mayhem - a side-scrolling motorcycle shooter
//!
//! Core modules:
//! - `sim`: Simulation (terrain, bike dynamics, entities, modes, tick)
//! - `hud`: HUD text derived from a frame snapshot
//! - `settings`: Persisted player selections
//! - `best`: Best-distance record
//! - `platform`: Browser bindings

pub mod best;
pub mod hud;
pub mod platform;
pub mod settings;
pub mod sim;

pub use best::BestRecord;
pub use settings::{BikeStyle, MusicTrack, Settings, World};

/// Game tuning constants
pub mod consts {
    /// Largest frame step the simulation will integrate (seconds)
    pub const MAX_DT: f32 = 0.033;

    /// Terrain sample spacing (pixels)
    pub const TERRAIN_STEP: f32 = 18.0;

    /// Bike geometry
    pub const WHEEL_RADIUS: f32 = 22.0;
    pub const WHEEL_BASE: f32 = 88.0;
    /// Horizontal start position of every run
    pub const BIKE_START_X: f32 = 120.0;
    /// Distance is measured from here
    pub const DISTANCE_ORIGIN_X: f32 = 100.0;

    /// Downward acceleration (pixels/s², y grows downward)
    pub const GRAVITY: f32 = 360.0;
    /// Forward speed cap without turbo
    pub const MAX_SPEED: f32 = 520.0;
    /// Speed cap multiplier while turbo is held
    pub const TURBO_SPEED_FACTOR: f32 = 1.45;
    /// Most negative horizontal speed (reversing)
    pub const MAX_REVERSE_SPEED: f32 = 140.0;
    pub const SLOPE_ROLL_FORCE: f32 = 420.0;
    pub const SUSPENSION_STIFFNESS: f32 = 32.0;
    pub const SUSPENSION_DAMPING: f32 = 0.38;

    /// Weapon
    pub const BULLET_SPEED: f32 = 1150.0;
    pub const FIRE_COOLDOWN: f32 = 0.22;
    /// Cooldown multiplier while rapid fire is active
    pub const RAPID_COOLDOWN_FACTOR: f32 = 0.4;
    pub const BULLET_LIFETIME: f32 = 2.2;
    pub const ENEMY_SHOT_LIFETIME: f32 = 3.0;

    /// Power-ups and boosts
    pub const MAX_SHIELD_CHARGES: u8 = 3;
    pub const RAPID_DURATION: f32 = 8.0;
    pub const BOOST_DURATION: f32 = 2.4;

    /// Entities further than this behind the bike are culled
    pub const CULL_BEHIND: f32 = 900.0;
    /// Projectiles this far outside the camera are culled
    pub const OFFSCREEN_MARGIN: f32 = 400.0;
}

/// Normalize angle to [-π, π]
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle < -PI {
        angle += TAU;
    }
    angle
}

/// Linear interpolation from `a` to `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Unit heading vector for a rotation in radians
#[inline]
pub fn heading(rot: f32) -> glam::Vec2 {
    glam::Vec2::new(rot.cos(), rot.sin())
}
