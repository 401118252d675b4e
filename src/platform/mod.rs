//! Platform layer
//!
//! The browser drives the simulation through [`web::WebGame`] (wasm32 only).
//! Each tick hands the page one serialized [`Frame`]; building it is plain
//! Rust so it is shared with native tests.

#[cfg(target_arch = "wasm32")]
pub mod web;

use glam::Vec2;
use serde::Serialize;

use crate::hud::Hud;
use crate::sim::{Bike, Bullet, Enemy, EnemyShot, GameEvent, Powerup, RunStatus, Snapshot, Timers};

/// Everything the page needs to draw and voice one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame<'a> {
    pub status: RunStatus,
    pub camera: Vec2,
    pub bike: &'a Bike,
    /// Visible ground polyline
    pub ground: Vec<Vec2>,
    pub bullets: &'a [Bullet],
    pub enemy_shots: &'a [EnemyShot],
    pub enemies: &'a [Enemy],
    pub powerups: &'a [Powerup],
    pub timers: Timers,
    pub hud: Hud,
    pub events: Vec<GameEvent>,
}

impl<'a> Frame<'a> {
    pub fn new(snapshot: &Snapshot<'a>, events: Vec<GameEvent>) -> Self {
        Self {
            status: snapshot.status,
            camera: snapshot.camera,
            bike: snapshot.bike,
            ground: snapshot.visible_ground(),
            bullets: snapshot.bullets,
            enemy_shots: snapshot.enemy_shots,
            enemies: snapshot.enemies,
            powerups: snapshot.powerups,
            timers: snapshot.timers,
            hud: Hud::from_snapshot(snapshot),
            events,
        }
    }

    /// Serialize for the page; an empty object if serialization fails
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::warn!("Failed to serialize frame: {}", e);
            "{}".to_string()
        })
    }
}
