//! Best-distance record
//!
//! A single scalar persisted to LocalStorage. It is only ever written when a
//! run beats the stored value.

use serde::{Deserialize, Serialize};

/// Pixels per displayed metre
pub const PIXELS_PER_METER: f32 = 5.0;

/// Furthest distance ever reached (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestRecord {
    pub distance: f32,
}

impl BestRecord {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "moto_mayhem_best";

    pub fn new(distance: f32) -> Self {
        Self {
            distance: if distance.is_finite() { distance.max(0.0) } else { 0.0 },
        }
    }

    /// Record `distance` if it beats the current best.
    ///
    /// Returns true if the record changed.
    pub fn submit(&mut self, distance: f32) -> bool {
        if !distance.is_finite() || distance <= self.distance {
            return false;
        }
        self.distance = distance;
        true
    }

    /// Load the best record from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(distance) = raw.trim().parse::<f32>() {
                    log::info!("Loaded best distance: {} m", to_meters(distance));
                    return Self::new(distance);
                }
                log::warn!("Ignoring malformed best distance '{}'", raw);
            }
        }

        Self::default()
    }

    /// Save the best record to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if storage
                .set_item(Self::STORAGE_KEY, &self.distance.to_string())
                .is_err()
            {
                log::warn!("Failed to save best distance");
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

/// Convert a pixel distance to whole metres
pub fn to_meters(distance: f32) -> u32 {
    if distance.is_finite() && distance > 0.0 {
        (distance / PIXELS_PER_METER).floor() as u32
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_only_improves() {
        let mut best = BestRecord::default();
        assert!(best.submit(500.0));
        assert!(!best.submit(499.0));
        assert!(!best.submit(500.0));
        assert!(!best.submit(f32::NAN));
        assert!(best.submit(1234.0));
        assert_eq!(best.distance, 1234.0);
    }

    #[test]
    fn test_meters() {
        assert_eq!(to_meters(BestRecord::new(1804.0).distance), 360);
        assert_eq!(BestRecord::new(-20.0).distance, 0.0);
        assert_eq!(to_meters(4.9), 0);
        assert_eq!(to_meters(f32::INFINITY), 0);
    }
}
