//! Run state and core simulation types
//!
//! Everything a run owns lives in [`GameState`]. The tick mutates it; the
//! renderer, HUD, and audio only see a [`Snapshot`] and drained events.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{Bullet, Enemy, EnemyKind, EnemyShot, Powerup, PowerupKind, Spawner, Weapon};
use super::modes::{GameMode, ModeConfig, ObjectiveKind};
use super::terrain::Terrain;
use super::vehicle::Bike;
use crate::consts::*;
use crate::lerp;

/// Run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    /// Title screen, world prepared but idle
    Title,
    /// Run reset and waiting to start
    Ready,
    /// Simulation advancing
    Running,
    /// Run ended by a crash
    Crashed,
    /// Objective complete
    Win,
}

impl RunStatus {
    /// Crashed or won
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunStatus::Crashed | RunStatus::Win)
    }
}

/// Discrete events for audio and HUD collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    ShotFired,
    Crashed,
    PowerupCollected(PowerupKind),
    ObjectiveComplete(ObjectiveKind),
    BoostActivated,
    /// A shield charge was spent instead of crashing
    ShieldAbsorbed,
    EnemyDestroyed(EnemyKind),
}

/// Receives events drained from the simulation
pub trait EventSink {
    fn notify(&mut self, event: &GameEvent);
}

/// Sink that writes every event to the log
#[derive(Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&mut self, event: &GameEvent) {
        log::info!("event: {:?}", event);
    }
}

impl EventSink for Vec<GameEvent> {
    fn notify(&mut self, event: &GameEvent) {
        self.push(*event);
    }
}

/// Visible area in world pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl Viewport {
    /// Viewport with non-positive or non-finite sizes replaced by defaults
    pub fn sanitized(width: f32, height: f32) -> Self {
        let fallback = Self::default();
        let pick = |v: f32, d: f32| if v.is_finite() && v > 0.0 { v } else { d };
        Self {
            width: pick(width, fallback.width),
            height: pick(height, fallback.height),
        }
    }
}

/// Smoothed camera (top-left corner of the view)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
}

/// Fraction of the view kept behind / above the bike
const CAMERA_LEAD: Vec2 = Vec2::new(0.35, 0.55);
/// Fraction of the remaining distance NOT covered per 60 Hz frame
const CAMERA_RETAIN_X: f32 = 0.001;
const CAMERA_RETAIN_Y: f32 = 0.0015;

impl Camera {
    /// Camera position that frames `target`
    pub fn desired(target: Vec2, viewport: &Viewport) -> Vec2 {
        Vec2::new(
            target.x - viewport.width * CAMERA_LEAD.x,
            target.y - viewport.height * CAMERA_LEAD.y,
        )
    }

    /// Jump straight to the framing position
    pub fn snap(&mut self, target: Vec2, viewport: &Viewport) {
        self.pos = Self::desired(target, viewport);
    }

    /// Exponential approach, independent of frame rate
    pub fn follow(&mut self, target: Vec2, viewport: &Viewport, dt: f32) {
        let desired = Self::desired(target, viewport);
        let frames = dt * 60.0;
        self.pos.x = lerp(self.pos.x, desired.x, 1.0 - CAMERA_RETAIN_X.powf(frames));
        self.pos.y = lerp(self.pos.y, desired.y, 1.0 - CAMERA_RETAIN_Y.powf(frames));
    }

    /// True if `point` is inside the view grown by `margin` on every side
    pub fn sees(&self, point: Vec2, viewport: &Viewport, margin: f32) -> bool {
        point.x >= self.pos.x - margin
            && point.x <= self.pos.x + viewport.width + margin
            && point.y >= self.pos.y - margin
            && point.y <= self.pos.y + viewport.height + margin
    }
}

/// Screen flash after a boost
const BOOST_FLASH: f32 = 0.65;
/// Shield ring flash durations
pub const SHIELD_PICKUP_FLASH: f32 = 0.35;
pub const SHIELD_HIT_FLASH: f32 = 0.45;
pub const SHIELD_RAM_FLASH: f32 = 0.4;
/// Velocity kick when a boost fires
const BOOST_KICK: Vec2 = Vec2::new(180.0, -260.0);

/// Countdown timers (seconds), all decaying toward zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timers {
    /// Full-screen flash
    pub flash: f32,
    /// Shield ring flash
    pub shield_flash: f32,
    /// Rapid fire remaining
    pub rapid_fire: f32,
    /// Boost thrust remaining
    pub boost: f32,
}

impl Timers {
    pub fn decay(&mut self, dt: f32) {
        for timer in [
            &mut self.flash,
            &mut self.shield_flash,
            &mut self.rapid_fire,
            &mut self.boost,
        ] {
            *timer = (*timer - dt).max(0.0);
        }
    }
}

/// Complete state of a play session
#[derive(Debug, Clone)]
pub struct GameState {
    pub status: RunStatus,
    /// Mode picked for the next (or current) run
    pub mode: GameMode,
    /// Mode record locked in at run start
    pub config: ModeConfig,
    pub viewport: Viewport,
    pub terrain: Terrain,
    pub bike: Bike,
    pub bullets: Vec<Bullet>,
    pub enemy_shots: Vec<EnemyShot>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<Powerup>,
    pub spawner: Spawner,
    pub weapon: Weapon,
    pub camera: Camera,
    pub timers: Timers,
    /// Furthest progress this run (pixels past the start line)
    pub distance: f32,
    pub kills: u32,
    /// Seconds of running time this run; also the projectile clock
    pub elapsed: f32,
    /// Shields held (0..=3)
    pub shield_charges: u8,
    /// Best distance across runs this session
    pub best_distance: f32,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session on the title screen with a prepared world
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut terrain = Terrain::for_viewport(rng.random(), viewport.height);
        let bike = Bike::at_start(&mut terrain);
        let mode = GameMode::default();
        let mut state = Self {
            status: RunStatus::Title,
            mode,
            config: mode.config(),
            viewport,
            terrain,
            bike,
            bullets: Vec::new(),
            enemy_shots: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            spawner: Spawner::default(),
            weapon: Weapon::default(),
            camera: Camera::default(),
            timers: Timers::default(),
            distance: 0.0,
            kills: 0,
            elapsed: 0.0,
            shield_charges: 0,
            best_distance: 0.0,
            rng,
            events: Vec::new(),
        };
        state.prepare_run();
        state.status = RunStatus::Title;
        state
    }

    /// Pick the mode for the next run. Ignored while a run is in progress.
    /// The current run's `config` is untouched until `prepare_run`.
    ///
    /// Returns the mode now selected.
    pub fn select_mode(&mut self, key: &str) -> GameMode {
        if self.status == RunStatus::Running {
            return self.mode;
        }
        self.mode = GameMode::from_key(key);
        log::info!("Mode selected: {}", self.mode.as_str());
        self.mode
    }

    /// Reset the world and every run counter; status becomes `Ready`
    pub fn prepare_run(&mut self) {
        self.config = self.mode.config();
        let (base, min, max) = Terrain::viewport_bounds(self.viewport.height);
        let seed = self.rng.random();
        self.terrain.reset(seed, base, min, max, TERRAIN_STEP);
        self.terrain.ensure(self.viewport.width * 2.0);
        self.bike = Bike::at_start(&mut self.terrain);

        self.bullets.clear();
        self.enemy_shots.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.spawner = Spawner::default();
        self.weapon = Weapon::default();
        self.timers = Timers::default();
        self.camera.snap(self.bike.pos, &self.viewport);

        self.distance = 0.0;
        self.kills = 0;
        self.elapsed = 0.0;
        self.shield_charges = 0;
        self.status = RunStatus::Ready;
    }

    /// Start (or restart) a run from any status
    pub fn start_run(&mut self) {
        self.prepare_run();
        self.status = RunStatus::Running;
        log::info!(
            "Run started: mode={} terrain_seed={}",
            self.mode.as_str(),
            self.terrain.seed()
        );
    }

    /// Change the viewport; terrain bounds follow on the next run
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Fire the boost button, starting a run first if needed
    pub fn activate_boost(&mut self) {
        if self.status != RunStatus::Running {
            self.start_run();
        }
        self.timers.boost = BOOST_DURATION;
        self.timers.flash = BOOST_FLASH;
        self.bike.vel += BOOST_KICK;
        self.events.push(GameEvent::BoostActivated);
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.timers.rapid_fire > 0.0
    }

    /// Apply a collected power-up
    pub fn apply_powerup(&mut self, kind: PowerupKind) {
        match kind {
            PowerupKind::Shield => {
                self.shield_charges = (self.shield_charges + 1).min(MAX_SHIELD_CHARGES);
                self.timers.shield_flash = SHIELD_PICKUP_FLASH;
            }
            PowerupKind::Rapid => {
                self.timers.rapid_fire = RAPID_DURATION;
            }
        }
        self.events.push(GameEvent::PowerupCollected(kind));
    }

    /// Spend a shield charge to survive a hit.
    ///
    /// Returns false if no charge was available.
    pub fn try_use_shield(&mut self, ground_y: Option<f32>, flash: f32) -> bool {
        if self.shield_charges == 0 {
            return false;
        }
        self.shield_charges -= 1;
        self.timers.shield_flash = flash;
        self.bike.shield_bounce(ground_y);
        self.events.push(GameEvent::ShieldAbsorbed);
        log::debug!("Shield absorbed a hit, {} left", self.shield_charges);
        true
    }

    /// End the run in a crash
    pub fn crash(&mut self) {
        if self.status != RunStatus::Running {
            return;
        }
        self.status = RunStatus::Crashed;
        self.events.push(GameEvent::Crashed);
        log::info!(
            "Crashed at {:.0} m with {} kills after {:.1}s",
            self.distance / 5.0,
            self.kills,
            self.elapsed
        );
    }

    /// End the run with the objective met
    pub fn win(&mut self, kind: ObjectiveKind) {
        if self.status != RunStatus::Running {
            return;
        }
        self.status = RunStatus::Win;
        self.events.push(GameEvent::ObjectiveComplete(kind));
        log::info!("Objective complete ({:?}) in mode {}", kind, self.mode.as_str());
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Hand all pending events to a sink, each exactly once
    pub fn dispatch_events<S: EventSink + ?Sized>(&mut self, sink: &mut S) {
        for event in self.events.drain(..) {
            sink.notify(&event);
        }
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            status: self.status,
            mode: self.mode,
            config: &self.config,
            viewport: self.viewport,
            camera: self.camera.pos,
            bike: &self.bike,
            terrain: &self.terrain,
            bullets: &self.bullets,
            enemy_shots: &self.enemy_shots,
            enemies: &self.enemies,
            powerups: &self.powerups,
            timers: self.timers,
            distance: self.distance,
            best_distance: self.best_distance,
            kills: self.kills,
            elapsed: self.elapsed,
            shield_charges: self.shield_charges,
        }
    }
}

/// Borrowed view of one frame
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub status: RunStatus,
    pub mode: GameMode,
    pub config: &'a ModeConfig,
    pub viewport: Viewport,
    pub camera: Vec2,
    pub bike: &'a Bike,
    terrain: &'a Terrain,
    pub bullets: &'a [Bullet],
    pub enemy_shots: &'a [EnemyShot],
    pub enemies: &'a [Enemy],
    pub powerups: &'a [Powerup],
    pub timers: Timers,
    pub distance: f32,
    pub best_distance: f32,
    pub kills: u32,
    pub elapsed: f32,
    pub shield_charges: u8,
}

impl Snapshot<'_> {
    /// Ground height at `x` (base height where nothing is generated yet)
    pub fn ground_height(&self, x: f32) -> f32 {
        self.terrain.sampled_height(x)
    }

    /// Ground points from `x0` to `x1` every `step` pixels
    pub fn ground_profile(&self, x0: f32, x1: f32, step: f32) -> Vec<Vec2> {
        if !step.is_finite() || step <= 0.0 || !x0.is_finite() || !x1.is_finite() || x1 < x0 {
            return Vec::new();
        }
        let count = ((x1 - x0) / step).floor() as usize + 1;
        (0..count)
            .map(|i| {
                let x = x0 + i as f32 * step;
                Vec2::new(x, self.terrain.sampled_height(x))
            })
            .collect()
    }

    /// Ground points across the visible area
    pub fn visible_ground(&self) -> Vec<Vec2> {
        self.ground_profile(self.camera.x, self.camera.x + self.viewport.width, TERRAIN_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> GameState {
        GameState::new(2024, Viewport::default())
    }

    #[test]
    fn test_new_is_title_with_world_ready() {
        let state = state();
        assert_eq!(state.status, RunStatus::Title);
        assert_eq!(state.mode, GameMode::Standard);
        assert!(!state.terrain.is_empty());
        assert!((state.bike.pos.x - BIKE_START_X).abs() < f32::EPSILON);
    }

    #[test]
    fn test_start_run_resets_everything() {
        let mut state = state();
        state.start_run();
        state.kills = 9;
        state.distance = 1234.0;
        state.shield_charges = 2;
        state.timers.rapid_fire = 3.0;
        state.enemies.push(Enemy::spawn(EnemyKind::Drone, 700.0, 500.0, &mut state.rng));
        state.crash();
        assert_eq!(state.status, RunStatus::Crashed);

        let old_seed = state.terrain.seed();
        state.start_run();
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(state.kills, 0);
        assert_eq!(state.distance, 0.0);
        assert_eq!(state.shield_charges, 0);
        assert_eq!(state.timers, Timers::default());
        assert!(state.enemies.is_empty());
        assert_ne!(state.terrain.seed(), old_seed);
    }

    #[test]
    fn test_mode_locked_while_running() {
        let mut state = state();
        assert_eq!(state.select_mode("nightmare"), GameMode::Nightmare);
        state.start_run();
        assert_eq!(state.select_mode("chill"), GameMode::Nightmare);
        assert_eq!(state.config, GameMode::Nightmare.config());

        state.crash();
        assert_eq!(state.select_mode("bogus"), GameMode::Standard);
        // The finished run keeps its record until the next one starts
        assert_eq!(state.config, GameMode::Nightmare.config());
        state.start_run();
        assert_eq!(state.config, GameMode::Standard.config());
    }

    #[test]
    fn test_shield_caps_at_three() {
        let mut state = state();
        for _ in 0..5 {
            state.apply_powerup(PowerupKind::Shield);
        }
        assert_eq!(state.shield_charges, MAX_SHIELD_CHARGES);
        assert_eq!(state.drain_events().len(), 5);
    }

    #[test]
    fn test_rapid_restarts_timer() {
        let mut state = state();
        state.apply_powerup(PowerupKind::Rapid);
        state.timers.decay(5.0);
        assert!(state.rapid_fire_active());
        state.apply_powerup(PowerupKind::Rapid);
        assert_eq!(state.timers.rapid_fire, RAPID_DURATION);
        state.timers.decay(RAPID_DURATION + 1.0);
        assert!(!state.rapid_fire_active());
    }

    #[test]
    fn test_shield_use() {
        let mut state = state();
        state.start_run();
        assert!(!state.try_use_shield(None, SHIELD_HIT_FLASH));
        state.shield_charges = 1;
        assert!(state.try_use_shield(None, SHIELD_HIT_FLASH));
        assert_eq!(state.shield_charges, 0);
        assert!(!state.bike.on_ground);
        assert_eq!(state.drain_events(), vec![GameEvent::ShieldAbsorbed]);
    }

    #[test]
    fn test_boost_starts_run() {
        let mut state = state();
        state.activate_boost();
        assert_eq!(state.status, RunStatus::Running);
        assert_eq!(state.timers.boost, BOOST_DURATION);
        assert_eq!(state.bike.vel, BOOST_KICK);
        assert_eq!(state.drain_events(), vec![GameEvent::BoostActivated]);
    }

    #[test]
    fn test_events_dispatched_once() {
        let mut state = state();
        state.start_run();
        state.crash();
        state.crash();
        let mut sink: Vec<GameEvent> = Vec::new();
        state.dispatch_events(&mut sink);
        assert_eq!(sink, vec![GameEvent::Crashed]);
        state.dispatch_events(&mut sink);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_camera_follow_frame_rate_independent() {
        let viewport = Viewport::default();
        let target = Vec2::new(1000.0, 300.0);

        let mut coarse = Camera::default();
        coarse.follow(target, &viewport, 1.0 / 30.0);

        let mut fine = Camera::default();
        fine.follow(target, &viewport, 1.0 / 60.0);
        fine.follow(target, &viewport, 1.0 / 60.0);

        assert!((coarse.pos - fine.pos).length() < 1e-2);
    }

    #[test]
    fn test_snapshot_ground_profile() {
        let state = state();
        let snap = state.snapshot();
        let profile = snap.ground_profile(0.0, 180.0, 18.0);
        assert_eq!(profile.len(), 11);
        assert_eq!(profile[3].y, snap.ground_height(54.0));
        assert!(snap.ground_profile(10.0, 0.0, 18.0).is_empty());
        assert!(!snap.visible_ground().is_empty());
    }

    #[test]
    fn test_viewport_sanitized() {
        let v = Viewport::sanitized(-3.0, f32::NAN);
        assert_eq!(v, Viewport::default());
        let v = Viewport::sanitized(800.0, 600.0);
        assert_eq!(v.width, 800.0);
    }
}
