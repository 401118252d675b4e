//! Enemies, projectiles, and power-ups
//!
//! Each collection is a flat `Vec` of plain values. Entities only know about
//! the terrain and the bike through arguments passed in each tick.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::terrain::Terrain;
use super::vehicle::Bike;
use crate::consts::*;
use crate::heading;

/// Bullets drop at this fraction of normal gravity
const BULLET_GRAVITY_SCALE: f32 = 0.2;
/// Bullets spawn this far ahead of the bike along its heading
const MUZZLE_OFFSET: f32 = 40.0;
/// Fraction of the bike's velocity a bullet inherits
const MUZZLE_INHERIT: f32 = 0.25;

/// Wasp weapon
const WASP_RANGE: f32 = 900.0;
const WASP_SHOT_SPEED: f32 = 240.0;
/// Wasps aim this far above the bike origin
const WASP_AIM_LIFT: f32 = 30.0;
/// Reload time: base plus a random extra
const WASP_RELOAD: (f32, f32) = (1.8, 1.2);

/// Motion is tuned in pixels per 60 Hz frame
const FRAME_RATE: f32 = 60.0;

/// First spawn positions of a run
const FIRST_ENEMY_X: f32 = 600.0;
const FIRST_POWERUP_X: f32 = 900.0;
/// Spawn look-ahead as a fraction of viewport width
const ENEMY_LOOKAHEAD: f32 = 0.9;
const POWERUP_LOOKAHEAD: f32 = 0.8;
/// Enemy gap: minimum plus random extra, divided by the spawn factor
const ENEMY_GAP: (f32, f32) = (420.0, 720.0);
/// Power-up gap: minimum plus random extra, divided by the spawn factor
const POWERUP_GAP: (f32, f32) = (900.0, 800.0);
/// Power-ups float this far above the ground
const POWERUP_LIFT: f32 = 120.0;
const POWERUP_RADIUS: f32 = 22.0;

/// A player bullet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Simulation time at spawn
    pub born: f32,
}

impl Bullet {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.vel.y += GRAVITY * BULLET_GRAVITY_SCALE * dt;
    }

    pub fn expired(&self, now: f32) -> bool {
        now - self.born > BULLET_LIFETIME
    }
}

/// A wasp's projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyShot {
    pub pos: Vec2,
    pub vel: Vec2,
    pub born: f32,
}

impl EnemyShot {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn expired(&self, now: f32) -> bool {
        now - self.born > ENEMY_SHOT_LIFETIME
    }
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Free-flying, sine pattern
    Drone,
    /// Hovering turret
    Wasp,
    /// Rides the ground
    Crawler,
}

impl EnemyKind {
    /// Weighted pick from a uniform roll in [0, 1): 18% drone, 32% crawler,
    /// 50% wasp
    pub fn from_roll(roll: f32) -> Self {
        if roll > 0.82 {
            EnemyKind::Drone
        } else if roll > 0.5 {
            EnemyKind::Crawler
        } else {
            EnemyKind::Wasp
        }
    }

    pub fn radius(&self) -> f32 {
        match self {
            EnemyKind::Drone => 24.0,
            EnemyKind::Wasp => 20.0,
            EnemyKind::Crawler => 22.0,
        }
    }
}

/// Crawlers ride this far above the ground line
const CRAWLER_LIFT: f32 = WHEEL_RADIUS * 1.3;

/// An enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Animation/motion phase (seconds, randomized at spawn)
    pub phase: f32,
    pub radius: f32,
    /// Seconds until a wasp may fire again
    pub cooldown: f32,
}

impl Enemy {
    /// Spawn an enemy of `kind` above ground height `ground_y`
    pub fn spawn<R: Rng>(kind: EnemyKind, x: f32, ground_y: f32, rng: &mut R) -> Self {
        let y = match kind {
            EnemyKind::Drone => ground_y - 120.0 - rng.random::<f32>() * 80.0,
            EnemyKind::Wasp => ground_y - 60.0 - rng.random::<f32>() * 20.0,
            EnemyKind::Crawler => ground_y - CRAWLER_LIFT,
        };
        Self {
            pos: Vec2::new(x, y),
            kind,
            phase: rng.random::<f32>() * TAU,
            radius: kind.radius(),
            cooldown: 0.0,
        }
    }

    /// Move one tick. Returns a shot if a wasp fired at the bike.
    #[allow(clippy::too_many_arguments)]
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        speed: f32,
        hostile: bool,
        bike_pos: Vec2,
        now: f32,
        terrain: &mut Terrain,
        rng: &mut R,
    ) -> Option<EnemyShot> {
        self.phase += dt;
        let frames = dt * FRAME_RATE;
        match self.kind {
            EnemyKind::Drone => {
                self.pos.y += (self.phase * 2.1).sin() * 10.0 * frames * speed;
                self.pos.x += (self.phase * 1.3).sin() * 5.0 * frames * speed;
                None
            }
            EnemyKind::Wasp => {
                self.pos.y += (self.phase * 1.8).sin() * 0.4 * frames;
                self.cooldown -= dt;
                if hostile && self.cooldown <= 0.0 && (bike_pos.x - self.pos.x).abs() < WASP_RANGE {
                    let aim = Vec2::new(bike_pos.x, bike_pos.y - WASP_AIM_LIFT) - self.pos;
                    let dir = aim.y.atan2(aim.x);
                    self.cooldown = WASP_RELOAD.0 + rng.random::<f32>() * WASP_RELOAD.1;
                    Some(EnemyShot {
                        pos: self.pos,
                        vel: heading(dir) * WASP_SHOT_SPEED,
                        born: now,
                    })
                } else {
                    None
                }
            }
            EnemyKind::Crawler => {
                self.pos.y = terrain.height(self.pos.x) - CRAWLER_LIFT;
                let drift = (speed - 1.0).max(-0.3);
                self.pos.x += (self.phase * 0.8).sin() * 6.0 * frames * drift;
                None
            }
        }
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerupKind {
    /// One extra hit absorbed (stacks to 3)
    Shield,
    /// Faster fire for a while
    Rapid,
}

impl PowerupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Shield => "shield",
            PowerupKind::Rapid => "rapid",
        }
    }
}

/// A floating pickup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Powerup {
    pub pos: Vec2,
    pub kind: PowerupKind,
    pub radius: f32,
    pub phase: f32,
}

impl Powerup {
    /// Gentle bob
    pub fn animate(&mut self, dt: f32) {
        self.phase += dt;
        self.pos.y += (self.phase * 2.0).sin() * 0.3 * dt * FRAME_RATE;
    }
}

/// Tracks the spawn frontiers for enemies and power-ups.
///
/// Both gaps shrink with the mode's spawn factor, so sparse modes also see
/// fewer power-ups (chill gets roughly a fifth of what chaos does).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    pub next_enemy_x: f32,
    pub next_powerup_x: f32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            next_enemy_x: FIRST_ENEMY_X,
            next_powerup_x: FIRST_POWERUP_X,
        }
    }
}

impl Spawner {
    /// Spawn enemies until the frontier passes the look-ahead window
    pub fn spawn_enemies<R: Rng>(
        &mut self,
        bike_x: f32,
        viewport_width: f32,
        spawn_factor: f32,
        terrain: &mut Terrain,
        rng: &mut R,
        enemies: &mut Vec<Enemy>,
    ) -> usize {
        let ahead = bike_x + viewport_width * ENEMY_LOOKAHEAD;
        let mut spawned = 0;
        while self.next_enemy_x < ahead {
            let kind = EnemyKind::from_roll(rng.random::<f32>());
            let ground_y = terrain.height(self.next_enemy_x);
            enemies.push(Enemy::spawn(kind, self.next_enemy_x, ground_y, rng));
            self.next_enemy_x += gap(ENEMY_GAP, spawn_factor, rng);
            spawned += 1;
        }
        spawned
    }

    /// Spawn power-ups until the frontier passes the look-ahead window
    pub fn spawn_powerups<R: Rng>(
        &mut self,
        bike_x: f32,
        viewport_width: f32,
        spawn_factor: f32,
        terrain: &mut Terrain,
        rng: &mut R,
        powerups: &mut Vec<Powerup>,
    ) -> usize {
        let ahead = bike_x + viewport_width * POWERUP_LOOKAHEAD;
        let mut spawned = 0;
        while self.next_powerup_x < ahead {
            let ground_y = terrain.height(self.next_powerup_x);
            let kind = if rng.random_bool(0.5) {
                PowerupKind::Shield
            } else {
                PowerupKind::Rapid
            };
            powerups.push(Powerup {
                pos: Vec2::new(self.next_powerup_x, ground_y - POWERUP_LIFT),
                kind,
                radius: POWERUP_RADIUS,
                phase: rng.random::<f32>() * TAU,
            });
            self.next_powerup_x += gap(POWERUP_GAP, spawn_factor, rng);
            spawned += 1;
        }
        spawned
    }
}

/// Random gap in [min, min + extra) scaled down by the spawn factor
fn gap<R: Rng>((min, extra): (f32, f32), spawn_factor: f32, rng: &mut R) -> f32 {
    (min + rng.random::<f32>() * extra) / spawn_factor
}

/// Fire-rate gate for the bike's gun
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    /// Simulation time of the last shot
    pub last_shot_at: Option<f32>,
}

impl Weapon {
    pub fn cooldown(rapid: bool) -> f32 {
        if rapid {
            FIRE_COOLDOWN * RAPID_COOLDOWN_FACTOR
        } else {
            FIRE_COOLDOWN
        }
    }

    pub fn ready(&self, now: f32, rapid: bool) -> bool {
        match self.last_shot_at {
            Some(last) => now - last >= Self::cooldown(rapid),
            None => true,
        }
    }

    /// Fire from the bike if the cooldown has elapsed
    pub fn try_fire(&mut self, bike: &Bike, now: f32, rapid: bool) -> Option<Bullet> {
        if !self.ready(now, rapid) {
            return None;
        }
        self.last_shot_at = Some(now);
        let dir = heading(bike.rot);
        Some(Bullet {
            pos: bike.pos + dir * MUZZLE_OFFSET,
            vel: dir * BULLET_SPEED + bike.vel * MUZZLE_INHERIT,
            born: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn flat() -> Terrain {
        Terrain::new(1, 600.0, 600.0, 600.0, TERRAIN_STEP)
    }

    fn resting_bike() -> Bike {
        Bike {
            pos: Vec2::new(200.0, 578.0),
            vel: Vec2::new(100.0, 0.0),
            rot: 0.0,
            rot_vel: 0.0,
            on_ground: true,
        }
    }

    #[test]
    fn test_enemy_roll_tiers() {
        assert_eq!(EnemyKind::from_roll(0.9), EnemyKind::Drone);
        assert_eq!(EnemyKind::from_roll(0.6), EnemyKind::Crawler);
        assert_eq!(EnemyKind::from_roll(0.1), EnemyKind::Wasp);
        assert_eq!(EnemyKind::from_roll(0.5), EnemyKind::Wasp);
    }

    #[test]
    fn test_bullet_inherits_bike_velocity() {
        let bike = resting_bike();
        let mut weapon = Weapon::default();
        let bullet = weapon.try_fire(&bike, 1.0, false).expect("first shot is free");
        assert_eq!(bullet.pos, Vec2::new(240.0, 578.0));
        assert_eq!(bullet.vel, Vec2::new(BULLET_SPEED + 25.0, 0.0));
    }

    #[test]
    fn test_fire_rate_gate() {
        let bike = resting_bike();
        let mut weapon = Weapon::default();
        assert!(weapon.try_fire(&bike, 0.0, false).is_some());
        assert!(weapon.try_fire(&bike, 0.1, false).is_none());
        assert!(weapon.try_fire(&bike, 0.25, false).is_some());

        // Rapid fire shortens the gap
        assert!(weapon.try_fire(&bike, 0.35, true).is_some());
    }

    #[test]
    fn test_projectile_lifetimes() {
        let bullet = Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            born: 0.0,
        };
        assert!(!bullet.expired(2.0));
        assert!(bullet.expired(2.3));

        let shot = EnemyShot {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            born: 0.0,
        };
        assert!(!shot.expired(2.9));
        assert!(shot.expired(3.1));
    }

    #[test]
    fn test_bullets_arc_downward() {
        let mut bullet = Bullet {
            pos: Vec2::ZERO,
            vel: Vec2::new(BULLET_SPEED, 0.0),
            born: 0.0,
        };
        bullet.advance(0.1);
        bullet.advance(0.1);
        assert!(bullet.vel.y > 0.0);
        assert!(bullet.pos.y > 0.0);
    }

    #[test]
    fn test_crawler_follows_ground() {
        let mut terrain = flat();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut crawler = Enemy::spawn(EnemyKind::Crawler, 800.0, 600.0, &mut rng);
        crawler.pos.y = 100.0;
        crawler.update(1.0 / 60.0, 0.85, true, Vec2::ZERO, 0.0, &mut terrain, &mut rng);
        assert!((crawler.pos.y - (600.0 - CRAWLER_LIFT)).abs() < 1e-3);
    }

    #[test]
    fn test_wasp_fires_in_range_then_reloads() {
        let mut terrain = flat();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut wasp = Enemy::spawn(EnemyKind::Wasp, 800.0, 600.0, &mut rng);
        let bike_pos = Vec2::new(300.0, 578.0);

        let shot = wasp.update(1.0 / 60.0, 1.0, true, bike_pos, 5.0, &mut terrain, &mut rng);
        let shot = shot.expect("wasp in range with no cooldown fires");
        assert!(shot.vel.x < 0.0, "aimed back toward the bike");
        assert!((shot.vel.length() - WASP_SHOT_SPEED).abs() < 1e-2);
        assert!(wasp.cooldown >= WASP_RELOAD.0);

        let again = wasp.update(1.0 / 60.0, 1.0, true, bike_pos, 5.1, &mut terrain, &mut rng);
        assert!(again.is_none());
    }

    #[test]
    fn test_wasp_holds_fire_when_friendly_or_far() {
        let mut terrain = flat();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut wasp = Enemy::spawn(EnemyKind::Wasp, 800.0, 600.0, &mut rng);
        let near = Vec2::new(700.0, 578.0);
        assert!(wasp.update(0.016, 1.0, false, near, 0.0, &mut terrain, &mut rng).is_none());

        let far = Vec2::new(-500.0, 578.0);
        assert!(wasp.update(0.016, 1.0, true, far, 0.0, &mut terrain, &mut rng).is_none());
    }

    #[test]
    fn test_spawner_fills_lookahead() {
        let mut terrain = flat();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut spawner = Spawner::default();
        let mut enemies = Vec::new();
        let count = spawner.spawn_enemies(120.0, 1280.0, 0.8, &mut terrain, &mut rng, &mut enemies);

        assert_eq!(count, enemies.len());
        assert!(!enemies.is_empty());
        assert!(spawner.next_enemy_x >= 120.0 + 1280.0 * ENEMY_LOOKAHEAD);
        for pair in enemies.windows(2) {
            let gap = pair[1].pos.x - pair[0].pos.x;
            assert!(gap >= ENEMY_GAP.0 / 0.8 - 1e-3);
            assert!(gap < (ENEMY_GAP.0 + ENEMY_GAP.1) / 0.8 + 1e-3);
        }

        // Nothing new until the bike moves
        let again = spawner.spawn_enemies(120.0, 1280.0, 0.8, &mut terrain, &mut rng, &mut enemies);
        assert_eq!(again, 0);
    }

    #[test]
    fn test_denser_modes_have_smaller_gaps() {
        let mut terrain = flat();
        let mut sparse = Vec::new();
        let mut dense = Vec::new();
        Spawner::default().spawn_enemies(0.0, 40_000.0, 0.35, &mut terrain, &mut Pcg32::seed_from_u64(4), &mut sparse);
        Spawner::default().spawn_enemies(0.0, 40_000.0, 1.6, &mut terrain, &mut Pcg32::seed_from_u64(4), &mut dense);
        assert!(dense.len() > sparse.len() * 3);
    }

    #[test]
    fn test_powerup_gaps_follow_spawn_factor() {
        for factor in [0.35, 1.6] {
            let mut terrain = flat();
            let mut rng = Pcg32::seed_from_u64(8);
            let mut powerups = Vec::new();
            Spawner::default().spawn_powerups(0.0, 30_000.0, factor, &mut terrain, &mut rng, &mut powerups);
            assert!(powerups.len() > 2);
            for pair in powerups.windows(2) {
                let gap = pair[1].pos.x - pair[0].pos.x;
                assert!(gap >= POWERUP_GAP.0 / factor - 1e-2, "gap {} at factor {}", gap, factor);
                assert!(gap < (POWERUP_GAP.0 + POWERUP_GAP.1) / factor + 1e-2);
            }
        }
    }

    #[test]
    fn test_powerups_float_above_ground() {
        let mut terrain = flat();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut spawner = Spawner::default();
        let mut powerups = Vec::new();
        spawner.spawn_powerups(5_000.0, 1280.0, 1.0, &mut terrain, &mut rng, &mut powerups);
        assert!(!powerups.is_empty());
        for p in &powerups {
            assert_eq!(p.pos.y, 600.0 - POWERUP_LIFT);
            assert_eq!(p.radius, POWERUP_RADIUS);
        }
    }
}
