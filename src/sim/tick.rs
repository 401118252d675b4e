//! Per-frame simulation tick
//!
//! Advances one run by a clamped frame step: bike first, then projectiles,
//! enemies, and power-ups, then the objective and camera, and lethal contact
//! last so this frame's movement is what gets judged.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::*;
use super::state::{GameEvent, GameState, RunStatus, SHIELD_HIT_FLASH, SHIELD_RAM_FLASH};
use super::vehicle::Controls;
use crate::consts::*;

/// Input state for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub turbo: bool,
    pub fire: bool,
}

impl TickInput {
    /// Throttle, brake, and lean derived from held buttons
    pub fn controls(&self) -> Controls {
        Controls {
            throttle: if self.up { 1.0 } else { 0.0 },
            brake: if self.down { 1.0 } else { 0.0 },
            lean: (self.right as i8 - self.left as i8) as f32,
            turbo: self.turbo,
        }
    }

    /// Pack into bits (up, down, left, right, turbo, fire from bit 0)
    pub fn to_bits(&self) -> u8 {
        [self.up, self.down, self.left, self.right, self.turbo, self.fire]
            .iter()
            .enumerate()
            .fold(0, |bits, (i, &held)| bits | ((held as u8) << i))
    }

    /// Unpack from [`TickInput::to_bits`] layout
    pub fn from_bits(bits: u8) -> Self {
        let held = |i: u8| bits & (1 << i) != 0;
        Self {
            up: held(0),
            down: held(1),
            left: held(2),
            right: held(3),
            turbo: held(4),
            fire: held(5),
        }
    }
}

/// Clamp a frame step into [0, MAX_DT]; garbage becomes 0
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_DT) } else { 0.0 }
}

/// Advance the game state by one frame.
///
/// Read the resulting frame with [`GameState::snapshot`] and
/// [`GameState::drain_events`].
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.status != RunStatus::Running {
        return;
    }
    let dt = clamp_dt(dt);

    let boosting = state.timers.boost > 0.0;
    state.timers.decay(dt);

    state
        .bike
        .step(&mut state.terrain, &input.controls(), boosting, dt);

    state.distance = state.distance.max(state.bike.pos.x - DISTANCE_ORIGIN_X);
    state.best_distance = state.best_distance.max(state.distance);
    state.elapsed += dt;

    spawn_ahead(state);
    if input.fire {
        fire(state);
    }
    update_bullets(state, dt);
    update_enemy_shots(state, dt);
    update_enemies(state, dt);
    update_powerups(state, dt);

    if let Some(objective) = state.config.objective {
        if objective.is_met(state.distance, state.kills) {
            state.win(objective.kind);
        }
    }

    state.camera.follow(state.bike.pos, &state.viewport, dt);
    // Keep the visible stretch generated for the renderer
    state
        .terrain
        .ensure(state.camera.pos.x + state.viewport.width * 2.0);

    if state.status == RunStatus::Running {
        check_crash(state);
    }
    if state.status == RunStatus::Running && !state.config.friendly {
        check_enemy_contact(state);
        check_enemy_shot_hits(state);
    }
}

fn spawn_ahead(state: &mut GameState) {
    let spawn_factor = state.config.effective_spawn_factor();
    let bike_x = state.bike.pos.x;
    let width = state.viewport.width;

    let enemies = state.spawner.spawn_enemies(
        bike_x,
        width,
        spawn_factor,
        &mut state.terrain,
        &mut state.rng,
        &mut state.enemies,
    );
    let powerups = state.spawner.spawn_powerups(
        bike_x,
        width,
        spawn_factor,
        &mut state.terrain,
        &mut state.rng,
        &mut state.powerups,
    );
    if enemies + powerups > 0 {
        log::debug!("Spawned {} enemies, {} power-ups ahead of x={:.0}", enemies, powerups, bike_x);
    }
}

fn fire(state: &mut GameState) {
    let rapid = state.rapid_fire_active();
    if let Some(bullet) = state.weapon.try_fire(&state.bike, state.elapsed, rapid) {
        state.bullets.push(bullet);
        state.events.push(GameEvent::ShotFired);
    }
}

fn update_bullets(state: &mut GameState, dt: f32) {
    let now = state.elapsed;
    for bullet in &mut state.bullets {
        bullet.advance(dt);
    }
    let camera = state.camera;
    let viewport = state.viewport;
    state
        .bullets
        .retain(|b| !b.expired(now) && camera.sees(b.pos, &viewport, OFFSCREEN_MARGIN));
}

fn update_enemy_shots(state: &mut GameState, dt: f32) {
    let now = state.elapsed;
    for shot in &mut state.enemy_shots {
        shot.advance(dt);
    }
    let camera = state.camera;
    let viewport = state.viewport;
    state
        .enemy_shots
        .retain(|s| !s.expired(now) && camera.sees(s.pos, &viewport, OFFSCREEN_MARGIN));
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let speed = state.config.enemy_speed;
    let hostile = !state.config.friendly;
    let bike_pos = state.bike.pos;
    let cull_x = bike_pos.x - CULL_BEHIND;
    let now = state.elapsed;

    let mut i = 0;
    while i < state.enemies.len() {
        let shot = state.enemies[i].update(
            dt,
            speed,
            hostile,
            bike_pos,
            now,
            &mut state.terrain,
            &mut state.rng,
        );
        if let Some(shot) = shot {
            state.enemy_shots.push(shot);
        }

        let enemy = state.enemies[i];
        let hit = state
            .bullets
            .iter()
            .position(|b| circles_overlap(b.pos, BULLET_RADIUS, enemy.pos, enemy.radius));
        if let Some(b) = hit {
            state.bullets.remove(b);
            state.enemies.remove(i);
            state.kills += 1;
            state.events.push(GameEvent::EnemyDestroyed(enemy.kind));
            continue;
        }

        if enemy.pos.x < cull_x {
            state.enemies.remove(i);
            continue;
        }
        i += 1;
    }
}

fn update_powerups(state: &mut GameState, dt: f32) {
    let rider = state.bike.pos - Vec2::new(0.0, RIDER_PICKUP_LIFT);
    let cull_x = state.bike.pos.x - CULL_BEHIND;

    let mut collected = Vec::new();
    state.powerups.retain_mut(|p| {
        p.animate(dt);
        if circles_overlap(rider, RIDER_RADIUS, p.pos, p.radius) {
            collected.push(p.kind);
            return false;
        }
        p.pos.x >= cull_x
    });
    for kind in collected {
        state.apply_powerup(kind);
    }
}

/// Head strike or rollover
fn check_crash(state: &mut GameState) {
    let Some(probe) = state.bike.crash_probe(&mut state.terrain) else {
        return;
    };
    if !state.try_use_shield(Some(probe.ground_y), SHIELD_HIT_FLASH) {
        log::debug!("Crash: {:?}", probe.cause);
        state.crash();
    }
}

/// Ramming an enemy: first contact only
fn check_enemy_contact(state: &mut GameState) {
    let rider = state.bike.pos - Vec2::new(0.0, RIDER_ENEMY_LIFT);
    let Some(i) = state
        .enemies
        .iter()
        .position(|e| circles_overlap(rider, RIDER_RADIUS, e.pos, e.radius))
    else {
        return;
    };
    if state.try_use_shield(None, SHIELD_RAM_FLASH) {
        state.enemies.remove(i);
    } else {
        state.crash();
    }
}

fn check_enemy_shot_hits(state: &mut GameState) {
    let mut i = 0;
    while i < state.enemy_shots.len() && state.status == RunStatus::Running {
        if within(state.enemy_shots[i].pos, state.bike.pos, ENEMY_SHOT_HIT_RADIUS) {
            state.enemy_shots.remove(i);
            if !state.try_use_shield(None, SHIELD_HIT_FLASH) {
                state.crash();
            }
            continue;
        }
        i += 1;
    }
}
