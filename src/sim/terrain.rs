//! Procedural terrain height field
//!
//! Heights are generated one sample at a time as the query frontier moves
//! forward and are memoized for the rest of the run. Every sample is a pure
//! function of its index, the seed, and the sample before it, so two terrains
//! built from the same parameters agree everywhere.

use crate::consts::TERRAIN_STEP;

/// Samples generated past the requested coordinate so interpolation and
/// central differences never read off the end
const LOOKAHEAD_SAMPLES: usize = 6;

/// Weight of the previous sample when blending toward the target height
const SMOOTHING: f32 = 0.72;

/// Rolling hills: (frequency per sample, amplitude)
const HILLS_FAST: (f32, f32) = (0.1, 140.0);
const HILLS_SLOW: (f32, f32) = (0.027, 220.0);
/// Per-sample jitter amplitude (centered)
const JITTER: f32 = 140.0;

/// Kicker every N samples: (period, amplitude)
const KICKER: (usize, f32) = (34, 240.0);
/// Canyon every N samples: (period, amplitude)
const CANYON: (usize, f32) = (41, 200.0);

/// Hash salts so each random term draws an independent stream
const SALT_JITTER: u64 = 0x9E37_79B9;
const SALT_KICKER: u64 = 0x85EB_CA6B;
const SALT_CANYON: u64 = 0xC2B2_AE35;

/// Infinite 1D height field along the x axis
#[derive(Debug, Clone)]
pub struct Terrain {
    seed: u64,
    base: f32,
    min: f32,
    max: f32,
    step: f32,
    samples: Vec<f32>,
}

impl Terrain {
    pub fn new(seed: u64, base: f32, min: f32, max: f32, step: f32) -> Self {
        let mut terrain = Self {
            seed,
            base,
            min,
            max,
            step,
            samples: Vec::new(),
        };
        terrain.reset(seed, base, min, max, step);
        terrain
    }

    /// Terrain proportioned for a viewport of the given height
    pub fn for_viewport(seed: u64, viewport_height: f32) -> Self {
        let (base, min, max) = Self::viewport_bounds(viewport_height);
        Self::new(seed, base, min, max, TERRAIN_STEP)
    }

    /// (base, min, max) for a viewport height
    pub fn viewport_bounds(viewport_height: f32) -> (f32, f32, f32) {
        (
            viewport_height * 0.64,
            viewport_height * 0.14,
            viewport_height - 20.0,
        )
    }

    /// Discard all samples and start over with new parameters
    pub fn reset(&mut self, seed: u64, base: f32, min: f32, max: f32, step: f32) {
        self.seed = seed;
        self.base = base;
        self.min = min.min(max);
        self.max = max.max(min);
        self.step = if step > 0.0 { step } else { TERRAIN_STEP };
        self.samples.clear();
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn base(&self) -> f32 {
        self.base
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Number of samples generated so far
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Grow the sample buffer so queries up to `x_max` are valid
    pub fn ensure(&mut self, x_max: f32) {
        if !x_max.is_finite() || x_max < 0.0 {
            return;
        }
        let needed = (x_max / self.step).ceil() as usize + LOOKAHEAD_SAMPLES;
        while self.samples.len() <= needed {
            let h = self.next_sample();
            self.samples.push(h);
        }
    }

    /// Ground height at `x`, generating samples on demand
    pub fn height(&mut self, x: f32) -> f32 {
        if x.is_nan() || x < 0.0 {
            return self.base;
        }
        self.ensure(x);
        self.sampled_height(x)
    }

    /// Slope (dy/dx) at `x` by central difference over one step
    pub fn slope(&mut self, x: f32) -> f32 {
        let h1 = self.height(x - self.step);
        let h2 = self.height(x + self.step);
        (h2 - h1) / (2.0 * self.step)
    }

    /// Ground height from already-generated samples only.
    ///
    /// Coordinates past the frontier (or negative) read as the base height.
    pub fn sampled_height(&self, x: f32) -> f32 {
        if x.is_nan() || x < 0.0 {
            return self.base;
        }
        let fi = x / self.step;
        let i = fi.floor() as usize;
        let t = fi - i as f32;
        let a = self.samples.get(i).copied().unwrap_or(self.base);
        let b = self.samples.get(i + 1).copied().unwrap_or(self.base);
        a + (b - a) * t
    }

    fn next_sample(&self) -> f32 {
        let i = self.samples.len();
        let fi = i as f32;

        let rolling = (fi * HILLS_FAST.0).sin() * HILLS_FAST.1 + (fi * HILLS_SLOW.0).sin() * HILLS_SLOW.1;
        let jitter = (self.noise(i, SALT_JITTER) - 0.5) * JITTER;
        let kicker = if i % KICKER.0 == 0 {
            (0.6 + self.noise(i, SALT_KICKER)) * KICKER.1
        } else {
            0.0
        };
        let canyon = if i % CANYON.0 == 0 {
            -self.noise(i, SALT_CANYON) * CANYON.1
        } else {
            0.0
        };

        let target = self.base + rolling + jitter + kicker + canyon;
        let prev = match i {
            0 => self.base,
            _ => self.samples[i - 1],
        };
        (prev * SMOOTHING + target * (1.0 - SMOOTHING)).clamp(self.min, self.max)
    }

    /// Uniform value in [0, 1) that depends only on (index, salt, seed)
    fn noise(&self, index: usize, salt: u64) -> f32 {
        let mut z = self
            .seed
            .wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(salt.wrapping_mul(0xD1B5_4A32_D192_ED03));
        // splitmix64 finalizer
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Upper bound on |h(x + step) - h(x)| for these parameters
    pub fn max_step_delta(&self) -> f32 {
        let above = HILLS_FAST.1 + HILLS_SLOW.1 + JITTER * 0.5 + 1.6 * KICKER.1;
        let below = HILLS_FAST.1 + HILLS_SLOW.1 + JITTER * 0.5 + CANYON.1;
        let target_hi = self.base + above;
        let target_lo = self.base - below;
        let spread = (target_hi - self.min).max(self.max - target_lo);
        spread * (1.0 - SMOOTHING)
    }
}

#[cfg(test)]
impl Terrain {
    /// Straight ramp `y = y0 + slope * x`, fully generated over 36 000 px
    pub(crate) fn ramp(y0: f32, slope: f32) -> Self {
        let samples: Vec<f32> = (0..2000)
            .map(|i| y0 + slope * i as f32 * TERRAIN_STEP)
            .collect();
        let (min, max) = samples
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &h| (lo.min(h), hi.max(h)));
        Self {
            seed: 0,
            base: y0,
            min,
            max,
            step: TERRAIN_STEP,
            samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_terrain(seed: u64) -> Terrain {
        Terrain::for_viewport(seed, 800.0)
    }

    #[test]
    fn test_negative_x_is_base() {
        let mut terrain = sample_terrain(7);
        assert_eq!(terrain.height(-50.0), terrain.base());
        assert_eq!(terrain.height(f32::NAN), terrain.base());
    }

    #[test]
    fn test_ensure_grows_but_never_rewrites() {
        let mut terrain = sample_terrain(42);
        terrain.ensure(1000.0);
        let before: Vec<f32> = (0..40).map(|i| terrain.sampled_height(i as f32 * 18.0)).collect();
        let len = terrain.len();

        terrain.ensure(20_000.0);
        assert!(terrain.len() > len);
        for (i, h) in before.iter().enumerate() {
            assert_eq!(terrain.sampled_height(i as f32 * 18.0), *h);
        }

        // Shrinking requests leave the buffer alone
        let len = terrain.len();
        terrain.ensure(10.0);
        assert_eq!(terrain.len(), len);
    }

    #[test]
    fn test_interpolates_between_samples() {
        let mut terrain = sample_terrain(3);
        let a = terrain.height(36.0);
        let b = terrain.height(54.0);
        let mid = terrain.height(45.0);
        assert!((mid - (a + b) * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_slope_is_central_difference() {
        let mut terrain = sample_terrain(11);
        let x = 500.0;
        let expected = (terrain.height(x + 18.0) - terrain.height(x - 18.0)) / 36.0;
        assert!((terrain.slope(x) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_sampled_height_past_frontier_is_base() {
        let terrain = sample_terrain(5);
        assert!(terrain.is_empty());
        assert_eq!(terrain.sampled_height(300.0), terrain.base());
    }

    #[test]
    fn test_reset_clears_samples() {
        let mut terrain = sample_terrain(5);
        terrain.ensure(3000.0);
        terrain.reset(6, 500.0, 100.0, 780.0, 18.0);
        assert!(terrain.is_empty());
        assert_eq!(terrain.seed(), 6);
    }

    #[test]
    fn test_seeds_differ() {
        let mut a = sample_terrain(1);
        let mut b = sample_terrain(2);
        let differs = (0..200).any(|i| {
            let x = i as f32 * 18.0;
            (a.height(x) - b.height(x)).abs() > 1e-3
        });
        assert!(differs);
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_heights(seed in any::<u64>(), x in 0.0f32..20_000.0) {
            let mut a = sample_terrain(seed);
            let mut b = sample_terrain(seed);
            // Different growth order must not matter
            b.ensure(25_000.0);
            let h = a.height(x);
            prop_assert_eq!(h, a.height(x));
            prop_assert_eq!(h, b.height(x));
        }

        #[test]
        fn prop_heights_bounded(seed in any::<u64>(), x in 0.0f32..30_000.0) {
            let mut terrain = sample_terrain(seed);
            let h = terrain.height(x);
            prop_assert!(h >= terrain.min() - 1e-3 && h <= terrain.max() + 1e-3);
        }

        #[test]
        fn prop_no_cliffs(seed in any::<u64>(), x in 0.0f32..30_000.0) {
            let mut terrain = sample_terrain(seed);
            let step = terrain.step();
            let delta = (terrain.height(x + step) - terrain.height(x)).abs();
            prop_assert!(delta <= terrain.max_step_delta() + 1e-2);
        }
    }
}
