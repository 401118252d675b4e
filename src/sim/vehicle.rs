//! Arcade bike model
//!
//! Not a rigid-body solver: two wheel probes against the height field, a
//! partial push-out with a spring kick for suspension, and a pull toward the
//! local slope while grounded. Cost per tick is constant.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use crate::consts::*;
use crate::{heading, normalize_angle};

/// Engine acceleration on the ground / in the air (pixels/s²)
const GROUND_ACCEL: f32 = 360.0;
const AIR_ACCEL: f32 = 220.0;
/// Acceleration multiplier while turbo is held
const TURBO_ACCEL_FACTOR: f32 = 1.8;

/// Lean response (rad/s²) and angular velocity cap (rad/s)
const GROUND_TURN_RATE: f32 = 6.2;
const AIR_TURN_RATE: f32 = 8.8;
const MAX_ANGULAR_VEL: f32 = 7.0;

/// Forward acceleration while a boost is running
const BOOST_THRUST: f32 = 320.0;

/// Vertical velocity damping per second
const AIR_DAMPING: f32 = 0.03;

/// Fraction of the deepest penetration removed per tick
const PUSH_OUT: f32 = 0.9;
/// Pitch torque per pixel of front/back penetration difference
const PITCH_TORQUE: f32 = 0.015;

/// Slope alignment rate while grounded, and its per-tick cap
const SLOPE_ALIGN_RATE: f32 = 14.0;
const SLOPE_ALIGN_MAX: f32 = 0.7;
/// Angular velocity kept per grounded tick
const GROUND_SPIN_KEEP: f32 = 0.55;

/// Horizontal drag per second
const GROUND_DRAG: f32 = 1.2;
const SLOPE_DRAG: f32 = 0.5;
const MAX_SLOPE_DRAG: f32 = 1.4;
const AIR_DRAG: f32 = 0.12;

/// Head probe: body center sits this far above the bike origin, the head
/// this far along the body's up axis, with a collision radius
const BODY_RAISE: f32 = 20.0;
const HEAD_OFFSET: f32 = 26.0;
const HEAD_RADIUS: f32 = 8.0;
/// Grounded tilt past this is a crash (~140°)
const TILT_CRASH: f32 = 2.45;

/// Vertical velocity after a shield absorbs a hit
pub const SHIELD_BOUNCE_VY: f32 = -260.0;
/// Minimum clearance above the ground after a shield bounce
const SHIELD_CLEARANCE: f32 = 20.0;

/// Normalized rider intent for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    /// 0 or 1
    pub throttle: f32,
    /// 0 or 1
    pub brake: f32,
    /// -1 (back), 0, or 1 (forward)
    pub lean: f32,
    pub turbo: bool,
}

impl Controls {
    /// Net longitudinal drive in [-1, 1]
    pub fn drive(&self) -> f32 {
        self.throttle - self.brake
    }
}

/// Wheel probe results for one tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Contact {
    pub back_wheel: Vec2,
    pub front_wheel: Vec2,
    /// How far each wheel sank below the ground before correction
    pub back_penetration: f32,
    pub front_penetration: f32,
}

impl Contact {
    pub fn penetration(&self) -> f32 {
        self.back_penetration.max(self.front_penetration)
    }
}

/// Why the rider went down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    /// Head probe touched the ground
    HeadStrike,
    /// Grounded with the bike rolled over
    Tipped,
}

/// A crash condition found by [`Bike::crash_probe`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashProbe {
    pub cause: CrashCause,
    /// Ground height under the head probe
    pub ground_y: f32,
}

/// The player's bike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Heading in radians (0 = level, facing +x)
    pub rot: f32,
    pub rot_vel: f32,
    pub on_ground: bool,
}

impl Bike {
    /// A bike at rest on the start line
    pub fn at_start(terrain: &mut Terrain) -> Self {
        Self {
            pos: Vec2::new(BIKE_START_X, terrain.height(BIKE_START_X) - WHEEL_RADIUS),
            vel: Vec2::ZERO,
            rot: 0.0,
            rot_vel: 0.0,
            on_ground: false,
        }
    }

    /// World-space (back, front) wheel centers
    pub fn wheels(&self) -> (Vec2, Vec2) {
        let offset = heading(self.rot) * (WHEEL_BASE / 2.0);
        (self.pos - offset, self.pos + offset)
    }

    /// Forward speed cap for the given turbo state
    pub fn speed_cap(turbo: bool) -> f32 {
        if turbo {
            MAX_SPEED * TURBO_SPEED_FACTOR
        } else {
            MAX_SPEED
        }
    }

    /// Advance the bike one tick against the terrain
    pub fn step(&mut self, terrain: &mut Terrain, controls: &Controls, boosting: bool, dt: f32) -> Contact {
        // Engine and lean
        let turbo = if controls.turbo { TURBO_ACCEL_FACTOR } else { 1.0 };
        let accel = (if self.on_ground { GROUND_ACCEL } else { AIR_ACCEL }) * turbo;
        self.vel.x += controls.drive() * accel * dt;

        let turn = if self.on_ground { GROUND_TURN_RATE } else { AIR_TURN_RATE };
        self.rot_vel = (self.rot_vel + controls.lean * turn * dt).clamp(-MAX_ANGULAR_VEL, MAX_ANGULAR_VEL);

        if boosting {
            self.vel.x += BOOST_THRUST * dt;
        }

        self.vel.y += GRAVITY * dt;
        self.vel.y *= 1.0 - AIR_DAMPING * dt;

        self.pos += self.vel * dt;
        self.rot = normalize_angle(self.rot + self.rot_vel * dt);

        let contact = self.resolve_ground(terrain, dt);

        if self.on_ground {
            let slope_back = terrain.slope(contact.back_wheel.x);
            let slope_front = terrain.slope(contact.front_wheel.x);
            let target = ((slope_back + slope_front) * 0.5).atan();
            let delta = normalize_angle(target - self.rot);
            self.rot += delta * (SLOPE_ALIGN_RATE * dt).clamp(0.0, SLOPE_ALIGN_MAX);
            self.rot_vel *= GROUND_SPIN_KEEP;
        }

        // Rolling force pulls downhill (positive slope = ground drops ahead)
        let slope_here = terrain.slope(self.pos.x);
        if self.on_ground {
            self.vel.x += slope_here * SLOPE_ROLL_FORCE * dt;
        }
        self.vel.x *= 1.0 - Self::drag(self.on_ground, slope_here) * dt;
        self.vel.x = self.vel.x.clamp(-MAX_REVERSE_SPEED, Self::speed_cap(controls.turbo));

        contact
    }

    /// Horizontal drag per second; steeper ground drags harder, up to a cap
    pub fn drag(on_ground: bool, slope: f32) -> f32 {
        if on_ground {
            GROUND_DRAG + (slope.abs() * SLOPE_DRAG).min(MAX_SLOPE_DRAG)
        } else {
            AIR_DRAG
        }
    }

    /// Probe both wheels, push the bike out of the ground, and set `on_ground`
    fn resolve_ground(&mut self, terrain: &mut Terrain, dt: f32) -> Contact {
        let (back_wheel, front_wheel) = self.wheels();
        let ground_back = terrain.height(back_wheel.x) - WHEEL_RADIUS;
        let ground_front = terrain.height(front_wheel.x) - WHEEL_RADIUS;

        let contact = Contact {
            back_wheel,
            front_wheel,
            back_penetration: (back_wheel.y - ground_back).max(0.0),
            front_penetration: (front_wheel.y - ground_front).max(0.0),
        };

        let penetration = contact.penetration();
        if penetration > 0.0 {
            self.pos.y -= penetration * PUSH_OUT;
            self.vel.y -= penetration * SUSPENSION_STIFFNESS * dt;
            self.vel.y *= 1.0 - SUSPENSION_DAMPING * dt;
            self.rot_vel += (contact.back_penetration - contact.front_penetration) * PITCH_TORQUE;
        }
        self.on_ground = penetration > 0.0;

        contact
    }

    /// Rider's head position
    pub fn head(&self) -> Vec2 {
        let body_y = self.pos.y - BODY_RAISE;
        Vec2::new(
            self.pos.x + self.rot.sin() * HEAD_OFFSET,
            body_y - self.rot.cos() * HEAD_OFFSET,
        )
    }

    /// Check for a crash condition at the current pose
    pub fn crash_probe(&self, terrain: &mut Terrain) -> Option<CrashProbe> {
        let head = self.head();
        let ground_y = terrain.height(head.x);
        let cause = if head.y + HEAD_RADIUS > ground_y {
            CrashCause::HeadStrike
        } else if self.on_ground && self.rot.abs() > TILT_CRASH {
            CrashCause::Tipped
        } else {
            return None;
        };
        Some(CrashProbe { cause, ground_y })
    }

    /// Bounce clear of a hit that a shield absorbed
    pub fn shield_bounce(&mut self, ground_y: Option<f32>) {
        self.vel.y = SHIELD_BOUNCE_VY;
        self.on_ground = false;
        if let Some(ground_y) = ground_y {
            self.pos.y = self.pos.y.min(ground_y - SHIELD_CLEARANCE);
        }
    }

    /// Forward speed in km/h for display (100 px ≈ 1 m)
    pub fn speed_kmh(&self) -> f32 {
        self.vel.x.abs() * 3.6 / 100.0
    }
}
