//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped frame step, advanced only by `tick`
//! - Seeded RNG only (terrain noise is a pure hash of seed and index)
//! - No rendering, storage, or platform dependencies

pub mod collision;
pub mod entities;
pub mod modes;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod vehicle;

pub use collision::{circles_overlap, within};
pub use entities::{
    Bullet, Enemy, EnemyKind, EnemyShot, Powerup, PowerupKind, Spawner, Weapon,
};
pub use modes::{GameMode, ModeConfig, Objective, ObjectiveKind};
pub use state::{
    Camera, EventSink, GameEvent, GameState, LogSink, RunStatus, Snapshot, Timers, Viewport,
};
pub use terrain::Terrain;
pub use tick::{TickInput, clamp_dt, tick};
pub use vehicle::{Bike, Contact, Controls, CrashCause, CrashProbe};
