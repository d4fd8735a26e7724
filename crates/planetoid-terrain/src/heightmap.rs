//! Multi-octave fractal Brownian motion (fBm) over the shared noise source.
//!
//! Composites multiple octaves of simplex noise to produce natural-looking
//! planetary height values with features at many spatial frequencies.

use glam::DVec3;

use crate::NoiseSource;

/// Configuration for one fBm evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FbmParams {
    /// Number of noise octaves to composite.
    pub octaves: u32,
    /// Frequency of the first (lowest) octave.
    pub base_frequency: f64,
    /// Amplitude of the first octave.
    pub amplitude: f64,
    /// Frequency multiplier between successive octaves.
    pub lacunarity: f64,
    /// Amplitude multiplier between successive octaves.
    pub persistence: f64,
    /// Coordinate offset decorrelating this channel.
    pub salt: f64,
}

impl Default for FbmParams {
    fn default() -> Self {
        Self {
            octaves: 5,
            base_frequency: 1.0,
            amplitude: 1.0,
            lacunarity: 2.0,
            persistence: 0.5,
            salt: 0.0,
        }
    }
}

impl FbmParams {
    /// Theoretical maximum absolute value (geometric series of octave amplitudes).
    pub fn max_amplitude(&self) -> f64 {
        let mut sum = 0.0;
        let mut amp = self.amplitude.abs();
        for _ in 0..self.octaves {
            sum += amp;
            amp *= self.persistence.abs();
        }
        sum
    }
}

/// Sample fBm at a point on the unit sphere.
///
/// Each octave's frequency is `base_frequency * lacunarity^i` and its
/// amplitude `amplitude * persistence^i`; octave `i` also shifts the salt so
/// octaves do not line up.
pub fn fbm(noise: &NoiseSource, point: DVec3, params: &FbmParams) -> f64 {
    let mut total = 0.0;
    let mut frequency = params.base_frequency;
    let mut amplitude = params.amplitude;

    for octave in 0..params.octaves {
        let salt = params.salt + octave as f64 * 19.19;
        total += noise.sample(point, frequency, salt) * amplitude;
        frequency *= params.lacunarity;
        amplitude *= params.persistence;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn sphere_points(n: usize) -> impl Iterator<Item = DVec3> {
        (0..n).map(move |i| {
            let t = i as f64 / n as f64;
            let theta = t * std::f64::consts::PI;
            let phi = t * 37.0;
            DVec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
        })
    }

    #[test]
    fn test_determinism_same_seed_same_point() {
        let a = NoiseSource::new(42);
        let b = NoiseSource::new(42);
        let params = FbmParams::default();
        let p = DVec3::new(0.6, 0.0, 0.8);
        assert_eq!(fbm(&a, p, &params), fbm(&b, p, &params));
    }

    #[test]
    fn test_within_max_amplitude() {
        let noise = NoiseSource::new(3);
        let params = FbmParams {
            amplitude: 0.02,
            ..Default::default()
        };
        let max = params.max_amplitude();
        for p in sphere_points(2000) {
            let h = fbm(&noise, p, &params);
            assert!(h.abs() <= max + EPSILON, "height {h} exceeds {max}");
        }
    }

    #[test]
    fn test_max_amplitude_calculation() {
        let params = FbmParams {
            amplitude: 1000.0,
            persistence: 0.5,
            octaves: 4,
            ..Default::default()
        };
        assert!((params.max_amplitude() - 1875.0).abs() < EPSILON);
    }

    #[test]
    fn test_zero_amplitude_returns_zero() {
        let noise = NoiseSource::new(1);
        let params = FbmParams {
            amplitude: 0.0,
            ..Default::default()
        };
        assert_eq!(fbm(&noise, DVec3::X, &params), 0.0);
    }

    #[test]
    fn test_more_octaves_adds_detail() {
        let noise = NoiseSource::new(7);
        let one = FbmParams {
            octaves: 1,
            base_frequency: 2.0,
            ..Default::default()
        };
        let eight = FbmParams {
            octaves: 8,
            ..one
        };

        let step = 0.002;
        let (mut diff_1, mut diff_8) = (0.0, 0.0);
        for i in 0..1000 {
            let a = DVec3::new(i as f64 * step, 0.3, 0.1);
            let b = DVec3::new((i + 1) as f64 * step, 0.3, 0.1);
            diff_1 += (fbm(&noise, b, &one) - fbm(&noise, a, &one)).abs();
            diff_8 += (fbm(&noise, b, &eight) - fbm(&noise, a, &eight)).abs();
        }
        assert!(
            diff_8 > diff_1,
            "8 octaves should add high-frequency detail: {diff_1} vs {diff_8}"
        );
    }
}
