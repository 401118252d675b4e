//! Player selections
//!
//! Persisted separately from the best-distance record in LocalStorage.
//! Every selection resolves through a fixed key table with a default entry,
//! so a stale or hand-edited key never fails a load.

use serde::{Deserialize, Serialize};

use crate::sim::GameMode;

/// Backdrop theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum World {
    #[default]
    Neon,
    Desert,
    Snow,
    Toxic,
}

impl World {
    pub const ALL: [World; 4] = [World::Neon, World::Desert, World::Snow, World::Toxic];

    pub fn as_str(&self) -> &'static str {
        match self {
            World::Neon => "neon",
            World::Desert => "desert",
            World::Snow => "snow",
            World::Toxic => "toxic",
        }
    }

    pub fn from_key(key: &str) -> Self {
        resolve_key(&Self::ALL, key, Self::as_str, "world")
    }
}

/// Bike paint job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BikeStyle {
    #[default]
    Nova,
    Duner,
    Frost,
    Shadow,
}

impl BikeStyle {
    pub const ALL: [BikeStyle; 4] = [
        BikeStyle::Nova,
        BikeStyle::Duner,
        BikeStyle::Frost,
        BikeStyle::Shadow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BikeStyle::Nova => "nova",
            BikeStyle::Duner => "duner",
            BikeStyle::Frost => "frost",
            BikeStyle::Shadow => "shadow",
        }
    }

    pub fn from_key(key: &str) -> Self {
        resolve_key(&Self::ALL, key, Self::as_str, "bike")
    }
}

/// Background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MusicTrack {
    #[default]
    Chip,
    Jazz,
    Bigband,
    Funk,
}

impl MusicTrack {
    pub const ALL: [MusicTrack; 4] = [
        MusicTrack::Chip,
        MusicTrack::Jazz,
        MusicTrack::Bigband,
        MusicTrack::Funk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MusicTrack::Chip => "chip",
            MusicTrack::Jazz => "jazz",
            MusicTrack::Bigband => "bigband",
            MusicTrack::Funk => "funk",
        }
    }

    pub fn from_key(key: &str) -> Self {
        resolve_key(&Self::ALL, key, Self::as_str, "track")
    }
}

/// Look `key` up among `options`, falling back to the first (default) entry
fn resolve_key<T: Copy>(options: &[T], key: &str, name: fn(&T) -> &'static str, what: &str) -> T {
    let key = key.trim().to_lowercase();
    if let Some(found) = options.iter().find(|&option| name(option) == key) {
        return *found;
    }
    let fallback = options[0];
    log::warn!("Unknown {} '{}', using {}", what, key, name(&fallback));
    fallback
}

/// Saved selections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: GameMode,
    pub world: World,
    pub bike: BikeStyle,
    pub track: MusicTrack,
}

impl Settings {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "moto_mayhem_settings";

    /// Apply raw selection keys from the UI, each with its own fallback
    pub fn select(&mut self, mode: &str, world: &str, bike: &str, track: &str) {
        self.mode = GameMode::from_key(mode);
        self.world = World::from_key(world);
        self.bike = BikeStyle::from_key(bike);
        self.track = MusicTrack::from_key(track);
    }

    /// Parse saved JSON, falling back to defaults
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Discarding malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
