//! Per-vertex color: feature palette, secondary blending, shading and tints.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::DVec3;
use hashbrown::HashMap;
use planetoid_config::ColorConfig;
use planetoid_geometry::VertexKey;
use planetoid_terrain::{FeatureKind, FeatureLabel, NoiseSource, TerrainSample};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// RGB color with channels in `0..=255`.
pub type Rgb = [f64; 3];

const FALLBACK: Rgb = [128.0, 128.0, 128.0];
const COOL: Rgb = [150.0, 180.0, 255.0];
const WARM: Rgb = [255.0, 160.0, 60.0];
const SNOW: Rgb = [245.0, 248.0, 255.0];

const BLEND_FREQUENCY: f64 = 3.7;
const BLEND_SALT: f64 = 811.0;
const DITHER_FREQUENCY: f64 = 23.0;
const DITHER_SALT: f64 = 947.0;

const DEFAULT_BLEND_CAP: f64 = 0.5;
const MIN_BRIGHTNESS: f64 = 0.6;
const MAX_BRIGHTNESS: f64 = 1.4;
const MAX_TINT: f64 = 0.5;
const POLAR_LATITUDE: f64 = 60.0;
const POLAR_MIN_HEIGHT: f64 = 0.01;
const MAX_WHITENING: f64 = 0.8;
const UNDERWATER_SHADE: f64 = 0.65;

/// Linear blend between two RGB colors, clamped to `0..=255`.
///
/// `w = 0.0` returns `a`, `w = 1.0` returns `b`.
pub fn blend_colors(a: Rgb, b: Rgb, w: f64) -> Rgb {
    let w = w.clamp(0.0, 1.0);
    clamp([
        a[0] * (1.0 - w) + b[0] * w,
        a[1] * (1.0 - w) + b[1] * w,
        a[2] * (1.0 - w) + b[2] * w,
    ])
}

fn clamp(c: Rgb) -> Rgb {
    c.map(|v| v.clamp(0.0, 255.0))
}

fn scale(c: Rgb, factor: f64) -> Rgb {
    clamp(c.map(|v| v * factor))
}

/// Maps terrain samples to vertex colors.
///
/// Stages run in a fixed order: palette color of the primary feature,
/// secondary blend, height brightness, temperature tint, polar whitening,
/// underwater darkening, then optional dithering.
#[derive(Debug, Clone)]
pub struct ColorManager {
    palette: HashMap<FeatureLabel, Rgb>,
    blend_caps: HashMap<(FeatureLabel, FeatureLabel), f64>,
    noise: NoiseSource,
    dithering: bool,
    dither_strength: f64,
    height_shading: f64,
}

impl ColorManager {
    /// Create a manager with the built-in palette.
    pub fn new(config: &ColorConfig, noise: NoiseSource) -> Self {
        let mut blend_caps: HashMap<(FeatureLabel, FeatureLabel), f64> = HashMap::new();
        blend_caps.insert((FeatureKind::Valley.into(), FeatureLabel::River), 0.8);
        blend_caps.insert((FeatureKind::Valley.into(), FeatureLabel::Tributary), 0.6);
        blend_caps.insert((FeatureKind::Volcano.into(), FeatureLabel::Underwater), 0.3);

        Self {
            palette: default_palette(),
            blend_caps,
            noise,
            dithering: config.dithering,
            dither_strength: config.dither_strength.max(0.0),
            height_shading: config.height_shading,
        }
    }

    /// Palette color of a label, grey if it has none.
    pub fn label_color(&self, label: FeatureLabel) -> Rgb {
        self.palette.get(&label).copied().unwrap_or(FALLBACK)
    }

    /// Maximum blend weight from a primary toward a secondary label.
    pub fn blend_cap(&self, primary: FeatureLabel, secondary: FeatureLabel) -> f64 {
        self.blend_caps
            .get(&(primary, secondary))
            .copied()
            .unwrap_or(DEFAULT_BLEND_CAP)
    }

    /// Color of a vertex from its terrain sample and latitude in degrees.
    pub fn color(&self, sample: &TerrainSample, key: VertexKey, latitude: f64) -> Rgb {
        let point = key.coord().unit_direction();

        let mut color = sample
            .primary_feature()
            .map_or(FALLBACK, |label| self.label_color(label));

        if let (Some(primary), Some(secondary)) = (sample.primary_feature(), sample.secondary_feature())
        {
            let w = self.noise.sample01(point, BLEND_FREQUENCY, BLEND_SALT)
                * self.blend_cap(primary, secondary);
            color = blend_colors(color, self.label_color(secondary), w);
        }

        let brightness =
            (1.0 + sample.height * self.height_shading).clamp(MIN_BRIGHTNESS, MAX_BRIGHTNESS);
        color = scale(color, brightness);

        if sample.temperature < 0.0 {
            let w = (-sample.temperature / 30.0).min(1.0) * MAX_TINT;
            color = blend_colors(color, COOL, w);
        } else if sample.temperature > 30.0 {
            let w = ((sample.temperature - 30.0) / 30.0).min(1.0) * MAX_TINT;
            color = blend_colors(color, WARM, w);
        }

        if latitude.abs() > POLAR_LATITUDE && sample.height > POLAR_MIN_HEIGHT {
            let w = ((latitude.abs() - POLAR_LATITUDE) / (90.0 - POLAR_LATITUDE)).min(1.0)
                * MAX_WHITENING;
            color = blend_colors(color, SNOW, w);
        }

        if sample.is_underwater() {
            color = scale(color, UNDERWATER_SHADE);
        }

        if self.dithering && self.dither_strength > 0.0 {
            color = self.dither(color, key, point);
        }

        clamp(color)
    }

    /// Luminance jitter on roughly half of the vertices, reproducible per key.
    fn dither(&self, color: Rgb, key: VertexKey, point: DVec3) -> Rgb {
        if self.noise.sample01(point, DITHER_FREQUENCY, DITHER_SALT) < 0.5 {
            return color;
        }
        let mut hasher = DefaultHasher::new();
        self.noise.seed().hash(&mut hasher);
        key.hash(&mut hasher);
        let mut rng = ChaCha8Rng::seed_from_u64(hasher.finish());
        let jitter = rng.random_range(-self.dither_strength..=self.dither_strength);
        clamp(color.map(|v| v + jitter))
    }
}

fn default_palette() -> HashMap<FeatureLabel, Rgb> {
    let kinds: [(FeatureKind, Rgb); 17] = [
        (FeatureKind::Canyon, [176.0, 96.0, 58.0]),
        (FeatureKind::Crater, [120.0, 110.0, 100.0]),
        (FeatureKind::Dune, [222.0, 196.0, 128.0]),
        (FeatureKind::Fjord, [70.0, 96.0, 120.0]),
        (FeatureKind::Geyser, [214.0, 220.0, 200.0]),
        (FeatureKind::Glacier, [225.0, 240.0, 250.0]),
        (FeatureKind::Hills, [110.0, 150.0, 80.0]),
        (FeatureKind::Karst, [160.0, 160.0, 140.0]),
        (FeatureKind::Lake, [60.0, 110.0, 170.0]),
        (FeatureKind::Mesa, [190.0, 110.0, 70.0]),
        (FeatureKind::Mountain, [130.0, 120.0, 115.0]),
        (FeatureKind::Plateau, [150.0, 130.0, 100.0]),
        (FeatureKind::Reef, [80.0, 190.0, 180.0]),
        (FeatureKind::TectonicPlate, [105.0, 95.0, 90.0]),
        (FeatureKind::Valley, [90.0, 140.0, 70.0]),
        (FeatureKind::Volcano, [90.0, 40.0, 30.0]),
        (FeatureKind::Wetland, [80.0, 110.0, 70.0]),
    ];
    let mut palette: HashMap<FeatureLabel, Rgb> = kinds
        .into_iter()
        .map(|(kind, color)| (FeatureLabel::Feature(kind), color))
        .collect();
    palette.insert(FeatureLabel::River, [50.0, 100.0, 190.0]);
    palette.insert(FeatureLabel::Tributary, [70.0, 120.0, 190.0]);
    palette.insert(FeatureLabel::Mouth, [60.0, 130.0, 160.0]);
    palette.insert(FeatureLabel::Underwater, [30.0, 60.0, 120.0]);
    palette
}

#[cfg(test)]
mod tests {
    use planetoid_geometry::ParamCoord;
    use planetoid_terrain::BiomeKind;

    use super::*;

    fn manager(dithering: bool) -> ColorManager {
        let config = ColorConfig {
            dithering,
            dither_strength: 6.0,
            height_shading: 6.0,
        };
        ColorManager::new(&config, NoiseSource::new(7))
    }

    fn sample(features: Vec<FeatureLabel>, height: f64, temperature: f64) -> TerrainSample {
        TerrainSample {
            height,
            features,
            temperature,
            biome: BiomeKind::Temperate,
            tier: 0,
            distance: 1.0,
        }
    }

    fn key() -> VertexKey {
        VertexKey::new(ParamCoord::new(1.1, 2.3))
    }

    fn luminance(c: Rgb) -> f64 {
        c.iter().sum::<f64>() / 3.0
    }

    #[test]
    fn test_blend_colors_endpoints_and_clamp() {
        let a = [255.0, 0.0, 0.0];
        let b = [0.0, 0.0, 255.0];
        assert_eq!(blend_colors(a, b, 0.0), a);
        assert_eq!(blend_colors(a, b, 1.0), b);
        assert_eq!(blend_colors(a, b, 0.5), [127.5, 0.0, 127.5]);
        assert_eq!(blend_colors(a, b, 3.0), b, "weight is clamped to 1");
        assert_eq!(blend_colors([300.0, -5.0, 10.0], [300.0, -5.0, 10.0], 0.5), [255.0, 0.0, 10.0]);
    }

    #[test]
    fn test_no_features_is_neutral_grey() {
        let c = manager(false).color(&sample(vec![], 0.0, 15.0), key(), 10.0);
        assert_eq!(c, FALLBACK);
    }

    #[test]
    fn test_primary_palette_color() {
        let m = manager(false);
        let s = sample(vec![FeatureKind::Dune.into()], 0.0, 15.0);
        assert_eq!(m.color(&s, key(), 10.0), m.label_color(FeatureKind::Dune.into()));
    }

    #[test]
    fn test_secondary_blend_is_capped() {
        let m = manager(false);
        let valley: FeatureLabel = FeatureKind::Valley.into();
        assert_eq!(m.blend_cap(valley, FeatureLabel::River), 0.8);
        assert_eq!(m.blend_cap(FeatureKind::Crater.into(), FeatureKind::Hills.into()), 0.5);

        let base = m.label_color(valley);
        let river = m.label_color(FeatureLabel::River);
        for i in 0..50 {
            let k = VertexKey::new(ParamCoord::new(0.2 + i as f64 * 0.05, 0.1 * i as f64));
            let s = sample(vec![valley, FeatureLabel::River], 0.0, 15.0);
            let c = m.color(&s, k, 10.0);
            for ch in 0..3 {
                let lo = base[ch].min(river[ch]) - 1e-9;
                let hi = base[ch].max(river[ch]) + 1e-9;
                assert!(c[ch] >= lo && c[ch] <= hi, "channel {ch} out of blend range: {c:?}");
            }
            // Never more than 80% of the way to the river color.
            let max_shift = (river[2] - base[2]).abs() * 0.8 + 1e-9;
            assert!((c[2] - base[2]).abs() <= max_shift);
        }
    }

    #[test]
    fn test_height_brightness_is_bounded() {
        let m = manager(false);
        let label: FeatureLabel = FeatureKind::Mountain.into();
        let base = luminance(m.label_color(label));
        let high = luminance(m.color(&sample(vec![label], 1.0, 15.0), key(), 10.0));
        let low = luminance(m.color(&sample(vec![label], -1.0, 15.0), key(), 10.0));
        assert!((high - base * MAX_BRIGHTNESS).abs() < 1e-9, "high={high} base={base}");
        assert!((low - base * MIN_BRIGHTNESS).abs() < 1e-9, "low={low} base={base}");
    }

    #[test]
    fn test_temperature_tints() {
        let m = manager(false);
        let mild = m.color(&sample(vec![], 0.0, 15.0), key(), 10.0);
        let cold = m.color(&sample(vec![], 0.0, -30.0), key(), 10.0);
        let hot = m.color(&sample(vec![], 0.0, 60.0), key(), 10.0);
        assert!(cold[2] > mild[2] && cold[0] < cold[2], "cold tint should be blue: {cold:?}");
        assert!(hot[0] > mild[0] && hot[2] < mild[2], "hot tint should be orange: {hot:?}");
    }

    #[test]
    fn test_polar_whitening_needs_altitude_and_latitude() {
        let m = manager(false);
        let label: FeatureLabel = FeatureKind::Mountain.into();
        let s = sample(vec![label], 0.02, 15.0);
        let temperate = m.color(&s, key(), 40.0);
        let polar = m.color(&s, key(), -85.0);
        assert!(luminance(polar) > luminance(temperate));

        let lowland = sample(vec![label], 0.0, 15.0);
        assert_eq!(m.color(&lowland, key(), 85.0), m.color(&lowland, key(), 40.0));
    }

    #[test]
    fn test_underwater_darkens() {
        let m = manager(false);
        let dry = m.color(&sample(vec![FeatureKind::Reef.into()], 0.0, 15.0), key(), 10.0);
        let wet = m.color(
            &sample(vec![FeatureKind::Reef.into(), FeatureLabel::Underwater], 0.0, 15.0),
            key(),
            10.0,
        );
        assert!(luminance(wet) < luminance(dry));
    }

    #[test]
    fn test_dithering_is_bounded_and_reproducible() {
        let plain = manager(false);
        let dithered = manager(true);
        let mut jittered = 0;
        for i in 0..200 {
            let k = VertexKey::new(ParamCoord::new(0.1 + i as f64 * 0.015, i as f64 * 0.03));
            let s = sample(vec![], 0.0, 15.0);
            let a = plain.color(&s, k, 10.0);
            let b = dithered.color(&s, k, 10.0);
            assert_eq!(b, dithered.color(&s, k, 10.0), "dithering must be deterministic");
            for ch in 0..3 {
                assert!((a[ch] - b[ch]).abs() <= 6.0 + 1e-9);
            }
            if a != b {
                jittered += 1;
            }
        }
        assert!(jittered > 0, "some vertices should be jittered");
        assert!(jittered < 200, "noise gate should skip some vertices");
    }

    #[test]
    fn test_every_label_has_a_palette_entry() {
        let m = manager(false);
        for kind in FeatureKind::ALL {
            assert!(m.palette.contains_key(&FeatureLabel::Feature(kind)), "{kind} missing");
        }
        for label in [
            FeatureLabel::River,
            FeatureLabel::Tributary,
            FeatureLabel::Mouth,
            FeatureLabel::Underwater,
        ] {
            assert!(m.palette.contains_key(&label));
        }
    }
}
