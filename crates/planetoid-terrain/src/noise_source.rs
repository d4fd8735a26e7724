//! Seeded coherent-noise source shared by every terrain channel.
//!
//! All channels sample one simplex field; each channel decorrelates itself
//! with its own frequency and an additive coordinate offset ("salt").

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use noise::{NoiseFn, Simplex};

/// Deterministic simplex noise derived from a seed string.
#[derive(Clone)]
pub struct NoiseSource {
    seed: u32,
    simplex: Simplex,
}

impl NoiseSource {
    /// Create a source from a numeric seed.
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            simplex: Simplex::new(seed),
        }
    }

    /// Create a source from a seed string. Same string, same noise.
    pub fn from_seed_str(seed: &str) -> Self {
        Self::new(derive_seed(seed))
    }

    /// The numeric seed in use.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// 3D noise in `[-1, 1]` at `point * frequency + salt`.
    ///
    /// Sampling on the unit sphere keeps the field continuous across the
    /// phi = 0 / 2π seam and at the poles.
    pub fn sample(&self, point: DVec3, frequency: f64, salt: f64) -> f64 {
        let p = point * frequency + DVec3::splat(salt);
        self.simplex.get([p.x, p.y, p.z]).clamp(-1.0, 1.0)
    }

    /// Same as [`NoiseSource::sample`], remapped to `[0, 1]`.
    pub fn sample01(&self, point: DVec3, frequency: f64, salt: f64) -> f64 {
        (self.sample(point, frequency, salt) + 1.0) * 0.5
    }
}

impl fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoiseSource").field("seed", &self.seed).finish()
    }
}

/// Hash a seed string into the 32-bit seed the simplex permutation table takes.
fn derive_seed(seed: &str) -> u32 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    let h = hasher.finish();
    (h ^ (h >> 32)) as u32
}
