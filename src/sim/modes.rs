//! Game modes and their win conditions
//!
//! A fixed registry: every mode is an immutable record picked once at run
//! start. Unknown selection keys resolve to [`GameMode::Standard`].

use serde::{Deserialize, Serialize};

/// What an objective counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveKind {
    /// Distance traveled (pixels)
    Distance,
    /// Enemies destroyed
    Kills,
}

/// A mode-scoped win condition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: f32,
}

impl Objective {
    pub const fn distance(target: f32) -> Self {
        Self {
            kind: ObjectiveKind::Distance,
            target,
        }
    }

    pub const fn kills(target: u32) -> Self {
        Self {
            kind: ObjectiveKind::Kills,
            target: target as f32,
        }
    }

    /// True once the run's progress meets the target
    pub fn is_met(&self, distance: f32, kills: u32) -> bool {
        match self.kind {
            ObjectiveKind::Distance => distance >= self.target,
            ObjectiveKind::Kills => kills as f32 >= self.target,
        }
    }
}

/// Tuning record for a mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModeConfig {
    /// Enemy and power-up density (higher = smaller gaps)
    pub spawn_factor: f32,
    /// Enemy movement scale
    pub enemy_speed: f32,
    /// Enemies and their shots can't hurt the rider
    pub friendly: bool,
    pub objective: Option<Objective>,
    pub description: &'static str,
}

/// Lowest spawn factor honored, so gaps stay finite
const MIN_SPAWN_FACTOR: f32 = 0.25;

impl ModeConfig {
    /// Spawn factor with its floor applied
    pub fn effective_spawn_factor(&self) -> f32 {
        self.spawn_factor.max(MIN_SPAWN_FACTOR)
    }
}

/// Selectable game modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Chill,
    #[default]
    Standard,
    Nightmare,
    Infiltrator,
    Chaos,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Chill,
        GameMode::Standard,
        GameMode::Nightmare,
        GameMode::Infiltrator,
        GameMode::Chaos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Chill => "chill",
            GameMode::Standard => "standard",
            GameMode::Nightmare => "nightmare",
            GameMode::Infiltrator => "infiltrator",
            GameMode::Chaos => "chaos",
        }
    }

    /// Resolve a selection key, falling back to the default mode
    pub fn from_key(key: &str) -> Self {
        let key = key.trim().to_lowercase();
        match Self::ALL.iter().find(|mode| mode.as_str() == key) {
            Some(mode) => *mode,
            None => {
                log::warn!("Unknown mode '{}', using {}", key, Self::default().as_str());
                Self::default()
            }
        }
    }

    pub fn config(&self) -> ModeConfig {
        match self {
            GameMode::Chill => ModeConfig {
                spawn_factor: 0.35,
                enemy_speed: 0.55,
                friendly: false,
                objective: None,
                description: "Coast endlessly, low pressure.",
            },
            GameMode::Standard => ModeConfig {
                spawn_factor: 0.8,
                enemy_speed: 0.85,
                friendly: false,
                objective: Some(Objective::distance(1800.0)),
                description: "Ride far and shoot foes.",
            },
            GameMode::Nightmare => ModeConfig {
                spawn_factor: 1.3,
                enemy_speed: 1.2,
                friendly: false,
                objective: Some(Objective::kills(12)),
                description: "Tougher enemies; rack up kills.",
            },
            GameMode::Infiltrator => ModeConfig {
                spawn_factor: 0.7,
                enemy_speed: 0.8,
                friendly: true,
                objective: Some(Objective::distance(1400.0)),
                description: "Enemies ignore you; sneak through.",
            },
            GameMode::Chaos => ModeConfig {
                spawn_factor: 1.6,
                enemy_speed: 1.35,
                friendly: false,
                objective: Some(Objective::distance(1000.0)),
                description: "Dense spawns, sprint or crash.",
            },
        }
    }
}
