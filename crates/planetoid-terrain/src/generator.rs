//! Tiered terrain generation with an append-only per-position cache.
//!
//! Tier 0 lays down planetary fBm and the ocean band. Each further tier runs
//! its feature generators in name order, erodes their net contribution and
//! adds fine detail. After every tier the biome, water state and temperature
//! are refreshed, so refining a record one tier at a time gives exactly the
//! same result as computing it in one go.

use std::sync::Arc;

use glam::DVec3;
use hashbrown::HashMap;
use planetoid_config::TerrainConfig;
use planetoid_geometry::{Ellipsoid, ParamCoord, VertexKey};
use tracing::info;

use crate::{
    BiomeClassifier, BiomeKind, BiomeTable, FbmParams, FeatureAccumulator, FeatureContext,
    FeatureKind, FeatureLabel, FeatureSet, NoiseSource, TerrainCache, TerrainError,
    TerrainRecord, TerrainSample, TierSchedule, fbm, solar_incidence, temperature,
};

const BASE_SALT: f64 = 0.0;
const OCEAN_SALT: f64 = 301.7;
const AGE_SALT: f64 = 409.3;
const AGE_FREQUENCY: f64 = 2.7;
const DETAIL_SALT: f64 = 517.1;

/// Per-position values that do not depend on height.
#[derive(Clone, Copy, Debug)]
struct Site {
    point: DVec3,
    normal: DVec3,
    latitude: f64,
    incidence: f64,
}

/// Immutable generation parameters and the stateless tier computations.
#[derive(Clone, Debug)]
struct Pipeline {
    noise: NoiseSource,
    ellipsoid: Ellipsoid,
    biomes: Arc<BiomeTable>,
    classifier: BiomeClassifier,
    features: FeatureSet,
    tiers: TierSchedule,
    base: FbmParams,
    ocean_frequency: f64,
    ocean_amplitude: f64,
    detail_frequency: f64,
    detail_amplitude: f64,
    water_level: f64,
    water_blend: f64,
    incident: DVec3,
    erosion_factor: f64,
    age_multipliers: HashMap<FeatureLabel, f64>,
}

impl Pipeline {
    fn site(&self, coord: ParamCoord) -> Site {
        let normal = self.ellipsoid.normal(coord);
        Site {
            point: coord.unit_direction(),
            normal,
            latitude: self.classifier.latitude(normal),
            incidence: solar_incidence(normal, self.incident),
        }
    }

    /// Planetary tier: biome-scaled fBm plus the ocean depression band.
    fn planetary(&self, site: &Site) -> TerrainRecord {
        let provisional = self.classifier.classify(site.normal, 0.0);
        let biome = self.biomes.get(provisional);
        let params = FbmParams {
            octaves: biome.octaves.min(self.base.octaves),
            base_frequency: self.base.base_frequency * biome.frequency_scale,
            amplitude: self.base.amplitude * biome.amplitude_scale,
            ..self.base
        };
        let ocean = -self.ocean_amplitude
            * self
                .noise
                .sample(site.point, self.ocean_frequency, OCEAN_SALT)
                .max(0.0);

        let mut record = TerrainRecord {
            height: 0.0,
            features: Vec::new(),
            temperature: 0.0,
            biome: provisional,
            tier_heights: vec![fbm(&self.noise, site.point, &params) + ocean],
        };
        self.refresh(&mut record, site);
        record
    }

    /// One feature tier on top of everything committed so far.
    fn feature_tier(&self, record: &mut TerrainRecord, site: &Site, tier: u8) {
        let raw = record.raw_height();
        let biome = record.biome;
        let params = self.biomes.get(biome);
        let mut features = FeatureAccumulator::new(std::mem::take(&mut record.features));

        let mut feature_sum = 0.0;
        for generator in self.features.for_tier(tier, self.tiers.finest_tier()) {
            let ctx = FeatureContext {
                point: site.point,
                height: raw + feature_sum,
                temperature: record.temperature,
                biome,
                water_level: self.water_level,
            };
            feature_sum += generator.apply(&self.noise, &ctx, &mut features, params).delta;
        }
        record.features = features.into_labels();

        let eroded = feature_sum * (1.0 - self.erosion_factor * self.age(record, site, tier));
        let detail = self.detail_amplitude
            * self.tiers.detail_scale(tier)
            * self.noise.sample(
                site.point,
                self.detail_frequency * f64::from(1u32 << (tier - 1).min(20)),
                DETAIL_SALT + f64::from(tier),
            );

        record.tier_heights.push(eroded + detail);
        self.refresh(record, site);
    }

    /// Noise-derived age in `[0, 1]`, scaled by the primary label's multiplier.
    fn age(&self, record: &TerrainRecord, site: &Site, tier: u8) -> f64 {
        let multiplier = record
            .primary_feature()
            .and_then(|label| self.age_multipliers.get(&label).copied())
            .unwrap_or(1.0);
        let base = self
            .noise
            .sample01(site.point, AGE_FREQUENCY, AGE_SALT + f64::from(tier));
        (base * multiplier).clamp(0.0, 1.0)
    }

    /// Reclassify, apply the water pass and recompute temperature.
    fn refresh(&self, record: &mut TerrainRecord, site: &Site) {
        let raw = record.raw_height();
        record.biome = self.classifier.classify(site.normal, raw);

        if raw < self.water_level {
            if !record.is_underwater() {
                record.features.push(FeatureLabel::Underwater);
            }
        } else {
            record.features.retain(|l| *l != FeatureLabel::Underwater);
        }
        record.height = self.water_blended(raw);

        record.temperature = temperature(
            record.height,
            site.latitude,
            site.incidence,
            record.primary_feature(),
        );
    }

    /// Bring a record up to `tier`, computing only missing tiers.
    fn refine(&self, cached: Option<TerrainRecord>, coord: ParamCoord, tier: u8) -> TerrainRecord {
        let cached = match cached {
            Some(r) if r.highest_tier().is_some_and(|t| t >= tier) => return r,
            other => other.filter(|r| !r.tier_heights.is_empty()),
        };
        let site = self.site(coord);
        let mut record = cached.unwrap_or_else(|| self.planetary(&site));
        for next in record.tier_heights.len() as u8..=tier {
            self.feature_tier(&mut record, &site, next);
        }
        record
    }

    /// Submerged heights recover part of their distance to the water level.
    fn water_blended(&self, raw: f64) -> f64 {
        if raw < self.water_level {
            raw + (self.water_level - raw) * self.water_blend
        } else {
            raw
        }
    }

    /// Upper bound on `|height|` over the whole surface.
    fn max_abs_height(&self) -> f64 {
        let base = FbmParams {
            amplitude: self.base.amplitude * self.biomes.max_amplitude_scale(),
            ..self.base
        }
        .max_amplitude();
        let detail: f64 = (1..=self.tiers.finest_tier())
            .map(|t| self.detail_amplitude.abs() * self.tiers.detail_scale(t))
            .sum();
        let raw = base + self.ocean_amplitude.abs() + self.features.total_amplitude() + detail;
        raw.max(self.water_level.abs())
    }
}

/// Terrain generator for one planet: generation parameters plus the record cache.
#[derive(Debug)]
pub struct TerrainGenerator {
    pipeline: Pipeline,
    cache: TerrainCache,
}

impl TerrainGenerator {
    /// Build a generator with the default biome table.
    ///
    /// # Errors
    ///
    /// Fails on unknown feature names in `disabled_features` or
    /// `age_multipliers`, invalid tier distances, or an invalid bucket size.
    pub fn new(
        config: &TerrainConfig,
        seed: &str,
        ellipsoid: Ellipsoid,
    ) -> Result<Self, TerrainError> {
        Self::with_biomes(config, seed, ellipsoid, Arc::new(BiomeTable::default()))
    }

    /// Build a generator sharing an existing biome table.
    ///
    /// # Errors
    ///
    /// Same as [`TerrainGenerator::new`].
    pub fn with_biomes(
        config: &TerrainConfig,
        seed: &str,
        ellipsoid: Ellipsoid,
        biomes: Arc<BiomeTable>,
    ) -> Result<Self, TerrainError> {
        let features = FeatureSet::with_disabled(config.disabled_features.as_slice())?;
        let tiers = TierSchedule::try_new(config.tier_distances.clone())?;
        let cache = TerrainCache::try_new(config.bucket_size, config.max_cached_buckets)?;

        let mut age_multipliers = HashMap::new();
        for (name, multiplier) in &config.age_multipliers {
            let label = FeatureLabel::from_name(name)
                .ok_or_else(|| TerrainError::UnknownFeature(name.clone()))?;
            age_multipliers.insert(label, *multiplier);
        }

        let noise = NoiseSource::from_seed_str(seed);
        info!(
            seed,
            numeric_seed = noise.seed(),
            tiers = tiers.finest_tier(),
            disabled = config.disabled_features.len(),
            "Terrain generator ready"
        );

        let pipeline = Pipeline {
            noise,
            ellipsoid,
            biomes,
            classifier: BiomeClassifier::new(DVec3::from_array(config.rotation_axis)),
            features,
            tiers,
            base: FbmParams {
                octaves: config.octaves,
                base_frequency: config.base_frequency,
                amplitude: config.base_amplitude,
                lacunarity: config.lacunarity,
                persistence: config.persistence,
                salt: BASE_SALT,
            },
            ocean_frequency: config.ocean_frequency,
            ocean_amplitude: config.ocean_amplitude,
            detail_frequency: config.detail_frequency,
            detail_amplitude: config.detail_amplitude,
            water_level: config.water_level,
            water_blend: config.water_blend.clamp(0.0, 1.0),
            incident: DVec3::from_array(config.incident_vector),
            erosion_factor: config.erosion_factor.clamp(0.0, 1.0),
            age_multipliers,
        };

        Ok(Self { pipeline, cache })
    }

    /// Terrain at a position for a camera `distance` away.
    ///
    /// Only tiers beyond what is cached are computed; committed tiers are
    /// never recomputed, so a nearer query after a farther one refines the
    /// same record and a farther query after a nearer one returns it as is.
    ///
    /// Records are cached per exact position. Nearby positions in the same
    /// coarse bucket each compute their own base tier rather than reusing a
    /// neighbour's, so heights never depend on which position was sampled
    /// first.
    pub fn sample(&mut self, coord: ParamCoord, distance: f64) -> TerrainSample {
        let key = VertexKey::new(coord);
        let tier = self.pipeline.tiers.required_tier(distance);
        let cached = self.cache.take(key);
        let record = self.pipeline.refine(cached, key.coord(), tier);
        let sample = TerrainSample::from_record(&record, distance);
        self.cache.insert(key, record);
        sample
    }

    /// Planetary-tier height only, for coarse distance estimates.
    ///
    /// Finer tiers already cached at the position are ignored, so the answer
    /// does not depend on earlier queries.
    pub fn coarse_height(&mut self, coord: ParamCoord) -> f64 {
        let key = VertexKey::new(coord);
        let cached = self.cache.take(key);
        let record = self.pipeline.refine(cached, key.coord(), 0);
        let planetary = record.tier_heights.first().copied().unwrap_or(record.height);
        self.cache.insert(key, record);
        self.pipeline.water_blended(planetary)
    }

    /// Cached record of a position, if any.
    pub fn cached(&self, coord: ParamCoord) -> Option<&TerrainRecord> {
        self.cache.get(VertexKey::new(coord))
    }

    /// Enable or disable a feature generator. Cached records keep their
    /// features until [`TerrainGenerator::clear_cache`].
    pub fn set_feature_enabled(&mut self, kind: FeatureKind, enabled: bool) {
        self.pipeline.features.set_enabled(kind, enabled);
    }

    /// Whether a feature generator is enabled.
    pub fn is_feature_enabled(&self, kind: FeatureKind) -> bool {
        self.pipeline.features.is_enabled(kind)
    }

    /// Drop every cached record.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Number of cached records.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// Upper bound on `|height|` for any position and tier.
    pub fn max_abs_height(&self) -> f64 {
        self.pipeline.max_abs_height()
    }

    /// Biome at a position for an explicit height.
    pub fn biome_at(&self, coord: ParamCoord, height: f64) -> BiomeKind {
        self.pipeline
            .classifier
            .classify(self.pipeline.ellipsoid.normal(coord), height)
    }

    /// Latitude in degrees of a position.
    pub fn latitude_at(&self, coord: ParamCoord) -> f64 {
        self.pipeline
            .classifier
            .latitude(self.pipeline.ellipsoid.normal(coord))
    }

    /// The shared biome table.
    pub fn biome_table(&self) -> &Arc<BiomeTable> {
        &self.pipeline.biomes
    }

    /// The ellipsoid heights displace.
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.pipeline.ellipsoid
    }

    /// The seeded noise source.
    pub fn noise(&self) -> &NoiseSource {
        &self.pipeline.noise
    }

    /// The tier schedule.
    pub fn tiers(&self) -> &TierSchedule {
        &self.pipeline.tiers
    }

    /// Configured water level.
    pub fn water_level(&self) -> f64 {
        self.pipeline.water_level
    }
}
